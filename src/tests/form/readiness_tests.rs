use crate::{
    domain::{Category, Platform},
    form::{Draft, DraftField, readiness, readiness_all},
    tests::fixtures::complete_draft,
};

#[test]
fn missing_fields_follow_each_platform_list() {
    let mut draft = complete_draft();
    draft.description.clear();
    draft.brand.clear();

    let vinted = readiness(&draft, Platform::Vinted);
    assert!(!vinted.ready);
    assert_eq!(
        vinted.missing_fields,
        vec![DraftField::Description, DraftField::Brand]
    );

    let subito = readiness(&draft, Platform::Subito);
    assert!(subito.missing_fields.contains(&DraftField::Description));
    assert!(!subito.missing_fields.contains(&DraftField::Brand));

    let ebay = readiness(&draft, Platform::Ebay);
    assert!(ebay.ready);
}

#[test]
fn vinted_size_only_counts_for_sized_categories() {
    let mut draft = complete_draft();
    draft.size.clear();
    assert_eq!(
        readiness(&draft, Platform::Vinted).missing_fields,
        vec![DraftField::Size]
    );

    draft.category = Some(Category::Electronics);
    assert!(readiness(&draft, Platform::Vinted).ready);

    draft.category = None;
    let missing = readiness(&draft, Platform::Vinted).missing_fields;
    assert_eq!(missing, vec![DraftField::Category]);
}

#[test]
fn empty_draft_is_ready_nowhere() {
    let draft = Draft::default();
    let all = readiness_all(&draft);
    assert_eq!(all.len(), Platform::ALL.len());
    assert!(all.iter().all(|entry| !entry.ready));
    let ebay = &all[0];
    assert_eq!(ebay.platform, Platform::Ebay);
    assert_eq!(ebay.missing_fields.len(), 7);
}
