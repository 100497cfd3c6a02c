use proptest::prelude::*;
use voxmap_blocks::registry::resolve_faces;
use voxmap_blocks::{BlockConfigError, BlockRegistry, BlockState, Density, FaceSlot};

const BLOCKS_TOML: &str = r#"
fallback_image = 63

[[blocks]]
name = "air"
density = "none"

[[blocks]]
name = "rock"
density = "solid"
top = 5

[[blocks]]
name = "brine"
density = "liquid"
alpha = true
backfaces = true
left = 40

[[blocks]]
name = "turf"
top = 1
bottom = 2
left = 3
"#;

#[test]
fn loads_table_from_toml() {
    let reg = BlockRegistry::from_toml_str(BLOCKS_TOML).unwrap();
    assert_eq!(reg.len(), 4);

    let rock = reg.get(reg.id_by_name("rock").unwrap()).unwrap();
    assert_eq!(rock.faces, [5; 6]);
    assert_eq!(rock.density, Density::Solid);

    let brine = reg.get(reg.id_by_name("brine").unwrap()).unwrap();
    assert_eq!(brine.faces, [63, 63, 40, 40, 40, 40]);
    assert!(brine.alpha && brine.backfaces);
    assert_eq!(brine.density, Density::Liquid);

    let turf = reg.get(3).unwrap();
    assert_eq!(turf.image(FaceSlot::Top), 1);
    assert_eq!(turf.image(FaceSlot::Back), 3);
    assert_eq!(turf.density, Density::None);
}

#[test]
fn malformed_toml_is_a_parse_error() {
    let err = BlockRegistry::from_toml_str("blocks = 3").unwrap_err();
    assert!(matches!(err, BlockConfigError::Parse(_)));
}

#[test]
fn empty_table_is_rejected() {
    let err = BlockRegistry::from_toml_str("").unwrap_err();
    assert!(matches!(err, BlockConfigError::Empty));
}

#[test]
fn builtin_ids_are_contiguous() {
    let reg = BlockRegistry::builtin();
    for (i, (id, info)) in reg.iter().enumerate() {
        assert_eq!(id as usize, i);
        assert_eq!(reg.id_by_name(&info.name), Some(id));
    }
}

fn face_slots() -> impl Strategy<Value = [Option<u16>; 6]> {
    proptest::array::uniform6(proptest::option::of(0u16..512))
}

proptest! {
    #[test]
    fn resolved_faces_follow_last_set_slot(faces in face_slots(), fallback in 0u16..512) {
        let out = resolve_faces(faces, fallback);
        let mut last = fallback;
        for i in 0..6 {
            if let Some(img) = faces[i] {
                last = img;
                prop_assert_eq!(out[i], img);
            }
            prop_assert_eq!(out[i], last);
        }
    }

    #[test]
    fn state_fields_are_independent(ty in any::<u8>(), meta in any::<u8>(), sun in 0u8..16, r in 0u8..16, g in 0u8..16, b in 0u8..16) {
        let s = BlockState::new(ty).with_metadata(meta).with_lamp(r, g, b).with_sunlight(sun);
        prop_assert_eq!(s.block_type(), ty);
        prop_assert_eq!(s.metadata(), meta);
        prop_assert_eq!(s.lamp(), [r, g, b]);
        prop_assert_eq!(s.sunlight(), sun);
        prop_assert_eq!(BlockState::from_raw(s.raw()), s);
        let moved = s.with_sunlight(15 - sun).with_block_type(ty.wrapping_add(1));
        prop_assert_eq!(moved.lamp(), [r, g, b]);
        prop_assert_eq!(moved.metadata(), meta);
    }
}
