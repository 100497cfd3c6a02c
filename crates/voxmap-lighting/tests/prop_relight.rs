use proptest::prelude::*;
use voxmap_blocks::BlockState;
use voxmap_lighting::{CORNER_TAPS, average_corner, corner_taps, gamma, relight_column};

fn column() -> impl Strategy<Value = Vec<BlockState>> {
    proptest::collection::vec(prop_oneof![4 => Just(0u8), 1 => 1u8..8], 1..64)
        .prop_map(|ids| ids.into_iter().map(BlockState::new).collect())
}

fn light_state() -> impl Strategy<Value = BlockState> {
    (0u8..16, 0u8..16, 0u8..16, 0u8..16)
        .prop_map(|(s, r, g, b)| BlockState::new(0).with_sunlight(s).with_lamp(r, g, b))
}

proptest! {
    #[test]
    fn sunlight_never_increases_with_depth(mut col in column()) {
        relight_column(&mut col);
        for y in 1..col.len() {
            prop_assert!(col[y - 1].sunlight() <= col[y].sunlight());
        }
    }

    #[test]
    fn relight_preserves_block_types(mut col in column()) {
        let before: Vec<u8> = col.iter().map(|c| c.block_type()).collect();
        relight_column(&mut col);
        let after: Vec<u8> = col.iter().map(|c| c.block_type()).collect();
        prop_assert_eq!(before, after);
    }

    #[test]
    fn relight_is_idempotent(mut col in column()) {
        relight_column(&mut col);
        let once = col.clone();
        relight_column(&mut col);
        prop_assert_eq!(once, col);
    }

    #[test]
    fn corner_average_is_bounded(samples in proptest::collection::vec(light_state(), CORNER_TAPS)) {
        let out = average_corner(&samples);
        for ch in 0..4 {
            let vals: Vec<u8> = samples.iter().map(|s| gamma(s.light_channels()[ch])).collect();
            let lo = *vals.iter().min().unwrap();
            let hi = *vals.iter().max().unwrap();
            prop_assert!(out[ch] >= lo && out[ch] <= hi);
        }
    }

    #[test]
    fn corner_taps_are_distinct(su in prop_oneof![Just(-1), Just(1)], sv in prop_oneof![Just(-1), Just(1)]) {
        let taps = corner_taps(su, sv);
        for i in 0..taps.len() {
            for j in (i + 1)..taps.len() {
                prop_assert_ne!(taps[i], taps[j]);
            }
        }
        prop_assert!(taps.contains(&(su, sv)));
    }
}
