use serde_json::json;

use crate::{
    domain::Category,
    form::{
        Draft, DraftField, DraftPhoto, InvalidStepError, WizardStep, is_step_completed,
        previous_steps_valid, validate_listing, validate_step, validate_step_number,
    },
    tests::fixtures::{complete_draft, jpeg},
};

#[test]
fn complete_draft_passes_every_step() {
    let draft = complete_draft();
    for step in WizardStep::ALL {
        let validation = validate_step(&draft, step);
        assert!(validation.is_valid, "step {step:?}: {:?}", validation.errors);
    }
}

#[test]
fn photo_count_must_be_between_one_and_six() {
    let mut draft = complete_draft();
    draft.photos.clear();
    let validation = validate_step(&draft, WizardStep::Photos);
    assert_eq!(
        validation.error(DraftField::Photos),
        Some("Upload at least one photo")
    );

    draft.photos = (0..7)
        .map(|i| DraftPhoto::pending(jpeg(&format!("{i}.jpg"))))
        .collect();
    let validation = validate_step(&draft, WizardStep::Photos);
    assert_eq!(
        validation.error(DraftField::Photos),
        Some("At most 6 photos are allowed")
    );
}

#[test]
fn basics_reject_blank_and_long_text_and_bad_prices() {
    let mut draft = complete_draft();
    draft.title = "   ".to_string();
    draft.description = "\n".to_string();
    draft.price = Some(0.0);
    draft.category = None;
    draft.condition = None;
    let errors = validate_step(&draft, WizardStep::Basics).errors;
    assert_eq!(errors.get(&DraftField::Title).map(String::as_str), Some("Title is required"));
    for field in [
        DraftField::Description,
        DraftField::Price,
        DraftField::Category,
        DraftField::Condition,
    ] {
        assert!(errors.contains_key(&field), "{field} should be reported");
    }

    draft.title = "x".repeat(81);
    let errors = validate_step(&draft, WizardStep::Basics).errors;
    assert_eq!(
        errors.get(&DraftField::Title).map(String::as_str),
        Some("Title cannot exceed 80 characters")
    );

    draft.title = "è".repeat(80);
    draft.price = Some(f64::NAN);
    let errors = validate_step(&draft, WizardStep::Basics).errors;
    assert!(!errors.contains_key(&DraftField::Title));
    assert!(errors.contains_key(&DraftField::Price));
}

#[test]
fn size_is_required_for_clothing_but_not_other() {
    let mut draft = complete_draft();
    draft.size.clear();
    let validation = validate_step(&draft, WizardStep::Details);
    assert!(validation.error(DraftField::Size).is_some());

    draft.category = Some(Category::Other);
    draft.brand.clear();
    let validation = validate_step(&draft, WizardStep::Details);
    assert!(validation.error(DraftField::Size).is_none());
    assert!(validation.error(DraftField::Brand).is_none());
    assert!(validation.is_valid);
}

#[test]
fn details_wait_for_a_category() {
    let draft = Draft::default();
    assert!(validate_step(&draft, WizardStep::Details).is_valid);
}

#[test]
fn brand_is_required_for_other_categories() {
    let mut draft = complete_draft();
    draft.category = Some(Category::Electronics);
    draft.brand = "  ".to_string();
    let validation = validate_step(&draft, WizardStep::Details);
    assert_eq!(validation.error(DraftField::Brand), Some("Brand is required"));
    assert!(validation.error(DraftField::Size).is_none());
}

#[test]
fn package_size_depends_on_shipping() {
    let mut draft = complete_draft();
    draft.package_size = None;
    let validation = validate_step(&draft, WizardStep::Shipping);
    assert!(validation.error(DraftField::PackageSize).is_some());

    draft.shipping_available = false;
    let validation = validate_step(&draft, WizardStep::Shipping);
    assert!(validation.is_valid);

    draft.city = " ".to_string();
    draft.province.clear();
    let validation = validate_step(&draft, WizardStep::Shipping);
    assert!(validation.error(DraftField::City).is_some());
    assert!(validation.error(DraftField::Province).is_some());
}

#[test]
fn platforms_need_at_least_one_entry() {
    let mut draft = complete_draft();
    draft.platforms.clear();
    let validation = validate_step(&draft, WizardStep::Platforms);
    assert_eq!(
        validation.error(DraftField::Platforms),
        Some("Select at least one platform")
    );
}

#[test]
fn out_of_range_steps_are_invalid_without_errors() {
    let draft = complete_draft();
    for step in [0, 6, 200] {
        let validation = validate_step_number(&draft, step);
        assert!(!validation.is_valid);
        assert!(validation.errors.is_empty());
    }
}

#[test]
fn completion_requires_every_earlier_step() {
    let mut draft = complete_draft();
    draft.photos.clear();
    assert!(validate_step_number(&draft, 2).is_valid);
    assert!(!is_step_completed(&draft, 2));
    assert!(!previous_steps_valid(&draft, 5));
    assert!(previous_steps_valid(&draft, 1));

    draft.photos.push(DraftPhoto::pending(jpeg("a.jpg")));
    assert!(is_step_completed(&draft, 2));
    assert!(is_step_completed(&draft, 5));
}

#[test]
fn listing_validation_skips_platforms() {
    let mut draft = complete_draft();
    draft.platforms.clear();
    assert!(validate_listing(&draft).is_empty());

    draft.photos.clear();
    draft.title.clear();
    let errors = validate_listing(&draft);
    let fields: Vec<DraftField> = errors.keys().copied().collect();
    assert_eq!(fields, vec![DraftField::Photos, DraftField::Title]);
}

#[test]
fn unknown_step_numbers_are_typed_errors() {
    assert_eq!(WizardStep::try_from(3), Ok(WizardStep::Details));
    let err = WizardStep::try_from(9).unwrap_err();
    assert_eq!(err, InvalidStepError { step: 9 });
    assert_eq!(err.to_string(), "no wizard step 9");

    assert!(serde_json::from_value::<WizardStep>(json!(0)).is_err());
    assert_eq!(
        serde_json::from_value::<WizardStep>(json!(5)).unwrap(),
        WizardStep::Platforms
    );
}
