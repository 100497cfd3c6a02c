use super::*;

#[test]
fn gamma_is_monotonic_and_floored() {
    let lut = gamma_table();
    assert_eq!(lut[0], VISUAL_LIGHT_MIN);
    assert_eq!(lut[15], 255);
    for w in lut.windows(2) {
        assert!(w[0] <= w[1]);
    }
    // low levels are lifted above linear
    assert!(lut[4] > (4 * 255 / 15) as u8);
}

#[test]
fn corner_taps_skip_off_diagonals() {
    let taps = corner_taps(1, 1);
    assert_eq!(taps.len(), 7);
    assert!(!taps.contains(&(1, -1)));
    assert!(!taps.contains(&(-1, 1)));
    assert!(taps.contains(&(1, 1)));
    assert!(taps.contains(&(-1, -1)));
    assert!(taps.contains(&(0, 0)));

    let taps = corner_taps(-1, 1);
    assert!(!taps.contains(&(-1, -1)));
    assert!(!taps.contains(&(1, 1)));
}

#[test]
fn diagonal_corners_share_taps() {
    let sorted = |su, sv| {
        let mut t = corner_taps(su, sv);
        t.sort_unstable();
        t
    };
    assert_eq!(sorted(1, 1), sorted(-1, -1));
    assert_eq!(sorted(1, -1), sorted(-1, 1));
    assert_ne!(sorted(1, 1), sorted(1, -1));
}

#[test]
fn uniform_samples_average_to_themselves() {
    let lit = BlockState::new(0).with_sunlight(15).with_lamp(3, 0, 9);
    let out = average_corner(&[lit; CORNER_TAPS]);
    assert_eq!(out, [gamma(3), gamma(0), gamma(9), 255]);
}

#[test]
fn mixed_samples_land_between() {
    let dark = BlockState::new(1);
    let lit = BlockState::new(0).with_sunlight(15);
    let out = average_corner(&[dark, lit]);
    assert!(out[3] > VISUAL_LIGHT_MIN && out[3] < 255);
}

#[test]
fn relight_shadows_below_first_block() {
    let mut col = vec![BlockState::new(0); 16];
    col[3] = BlockState::new(2);
    col[9] = BlockState::new(2);
    let top = relight_column(&mut col);
    assert_eq!(top, Some(9));
    for (y, c) in col.iter().enumerate() {
        let want = if y > 9 { 15 } else { 0 };
        assert_eq!(c.sunlight(), want, "y={y}");
    }
    assert_eq!(col[9].block_type(), 2);
}

#[test]
fn open_column_is_fully_lit() {
    let mut col = vec![BlockState::new(0); 8];
    assert_eq!(relight_column(&mut col), None);
    assert!(col.iter().all(|c| c.sunlight() == 15));
}
