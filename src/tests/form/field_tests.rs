use serde_json::{Value, json};

use crate::{
    domain::{Category, Platform},
    form::{
        Draft, DraftField, DraftPhoto, PhotoFile, REGISTRY, Rotation, field_label, values_equal,
    },
    tests::fixtures::{complete_draft, jpeg},
};

#[test]
fn registry_is_indexed_by_field() {
    for (index, descriptor) in REGISTRY.iter().enumerate() {
        assert_eq!(descriptor.field as usize, index);
        assert_eq!(DraftField::from_name(descriptor.name), Some(descriptor.field));
    }
    assert_eq!(DraftField::ALL.len(), REGISTRY.len());
}

#[test]
fn platforms_are_not_editable() {
    assert!(!DraftField::EDITABLE.contains(&DraftField::Platforms));
    assert_eq!(DraftField::EDITABLE.len(), DraftField::ALL.len() - 1);
}

#[test]
fn labels_fall_back_to_the_raw_name() {
    assert_eq!(field_label("shippingAvailable"), "Shipping available");
    assert_eq!(field_label("packageSize"), "Package size");
    assert_eq!(field_label("mystery"), "mystery");
}

#[test]
fn default_draft_ships_by_default() {
    let draft = Draft::default();
    assert!(draft.shipping_available);
    assert!(draft.photos.is_empty());
    assert_eq!(draft.value_of(DraftField::Price), Value::Null);
}

#[test]
fn set_field_coerces_loose_values() {
    let mut draft = Draft::default();
    draft.set_field(DraftField::Price, json!("12.50")).unwrap();
    assert_eq!(draft.price, Some(12.5));
    draft.set_field(DraftField::Price, json!("")).unwrap();
    assert_eq!(draft.price, None);
    draft.set_field(DraftField::Category, json!("SHOES")).unwrap();
    assert_eq!(draft.category, Some(Category::Shoes));
    draft.set_field(DraftField::Title, Value::Null).unwrap();
    assert_eq!(draft.title, "");
    draft
        .set_field(DraftField::Platforms, json!(["EBAY", "SUBITO"]))
        .unwrap();
    assert_eq!(draft.platforms, vec![Platform::Ebay, Platform::Subito]);
}

#[test]
fn set_field_reports_the_field_pointer() {
    let mut draft = Draft::default();
    let err = draft.set_field(DraftField::Price, json!("cheap")).unwrap_err();
    assert_eq!(err.pointer, "/price");
    let err = draft.set_field(DraftField::Category, json!("CARS")).unwrap_err();
    assert_eq!(err.pointer, "/category");
    let err = draft
        .set_field(DraftField::Photos, json!([{"name": "a.jpg"}]))
        .unwrap_err();
    assert_eq!(err.pointer, "/photos");
    assert_eq!(draft, Draft::default());
}

#[test]
fn clone_is_independent() {
    let original = complete_draft();
    let mut copy = original.clone();
    assert_eq!(copy, original);

    copy.title.push_str(" (edited)");
    copy.colors.clear();
    copy.photos[0].rotation = Rotation::Half;
    assert_eq!(original.title, "Levi's 501 jeans");
    assert!(!original.colors.is_empty());
    assert_eq!(original.photos[0].rotation, Rotation::None);
}

#[test]
fn photos_serialize_without_file_contents() {
    let mut draft = Draft::default();
    draft.photos.push(DraftPhoto::pending(jpeg("a.jpg")));
    draft.rotate_photo(0, Rotation::Quarter, None);

    let value = serde_json::to_value(&draft).unwrap();
    assert_eq!(
        value["photos"],
        json!([{"name": "a.jpg", "size": 4, "type": "image/jpeg", "rotation": 90, "displayRotation": 90}])
    );
}

#[test]
fn move_photo_clamps_targets_past_the_end() {
    let mut draft = Draft::default();
    for name in ["a.jpg", "b.jpg", "c.jpg"] {
        assert!(draft.push_photo(DraftPhoto::pending(jpeg(name)), 6));
    }
    assert!(draft.move_photo(0, 10));
    let names: Vec<&str> = draft
        .photos
        .iter()
        .filter_map(DraftPhoto::pending_file)
        .map(|file| file.name.as_str())
        .collect();
    assert_eq!(names, vec!["b.jpg", "c.jpg", "a.jpg"]);
    assert!(!draft.move_photo(3, 0));
    assert!(!draft.push_photo(DraftPhoto::pending(jpeg("d.jpg")), 3));
}

#[test]
fn rotation_rejects_odd_angles() {
    assert!(serde_json::from_value::<Rotation>(json!(45)).is_err());
    assert_eq!(
        serde_json::from_value::<Rotation>(json!(270)).unwrap(),
        Rotation::ThreeQuarter
    );
}

#[test]
fn pending_photos_compare_by_metadata_as_values_but_by_bytes_as_drafts() {
    let with_bytes = |bytes: Vec<u8>| Draft {
        photos: vec![DraftPhoto::pending(PhotoFile::new("front.jpg", "image/jpeg", bytes))],
        ..complete_draft()
    };
    let first = with_bytes(vec![0xFF, 0xD8, 0x01]);
    let second = with_bytes(vec![0xFF, 0xD8, 0x02]);

    assert!(values_equal(
        Some(&first.value_of(DraftField::Photos)),
        Some(&second.value_of(DraftField::Photos))
    ));
    assert_ne!(first, second);

    let longer = with_bytes(vec![0xFF, 0xD8, 0x01, 0x02]);
    assert!(!values_equal(
        Some(&first.value_of(DraftField::Photos)),
        Some(&longer.value_of(DraftField::Photos))
    ));
}
