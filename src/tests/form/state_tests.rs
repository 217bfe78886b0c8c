use std::sync::Arc;

use serde_json::json;

use crate::{
    app::{DEFAULT_DRAFT_KEY, FormOptions, ToastKind, ToastQueue},
    domain::{ListingStatus, Platform},
    form::{Draft, DraftField, ListingForm, Rotation, SubmitMode, WizardStep},
    io::{DraftStore, MemoryStore},
    service::{InMemoryListingService, ListingService},
    tests::fixtures::{create_payload, jpeg},
};

fn form_with_store() -> (ListingForm, Arc<MemoryStore>) {
    let store = Arc::new(MemoryStore::new());
    let form = ListingForm::new(store.clone(), FormOptions::default());
    (form, store)
}

fn fill_happy_path(form: &mut ListingForm) {
    form.add_photo(jpeg("front.jpg"));
    let fields = [
        (DraftField::Title, json!("Test")),
        (DraftField::Description, json!("Test desc")),
        (DraftField::Price, json!(50)),
        (DraftField::Category, json!("ELECTRONICS")),
        (DraftField::Condition, json!("GOOD")),
        (DraftField::Brand, json!("Sony")),
        (DraftField::City, json!("Milano")),
        (DraftField::Province, json!("MI")),
        (DraftField::PackageSize, json!("SMALL")),
        (DraftField::Platforms, json!(["EBAY"])),
    ];
    for (field, value) in fields {
        form.update_field(field, value).unwrap();
    }
}

#[test]
fn next_step_requires_a_valid_current_step() {
    let (mut form, store) = form_with_store();
    assert_eq!(form.current_step(), WizardStep::Photos);
    assert!(!form.can_go_next());
    assert!(!form.next_step());
    assert_eq!(store.load(DEFAULT_DRAFT_KEY).unwrap(), None);

    form.add_photo(jpeg("a.jpg"));
    assert!(form.next_step());
    assert_eq!(form.current_step(), WizardStep::Basics);
    assert!(store.load(DEFAULT_DRAFT_KEY).unwrap().is_some());
}

#[test]
fn jumping_forward_needs_every_earlier_step() {
    let (mut form, _) = form_with_store();
    form.add_photo(jpeg("a.jpg"));
    assert!(form.next_step());

    assert!(form.go_to_step(1));
    assert_eq!(form.current_step(), WizardStep::Photos);
    assert!(form.can_go_to_step(2));
    assert!(!form.go_to_step(3));
    assert!(!form.go_to_step(0));
    assert!(!form.go_to_step(6));
    assert!(!form.prev_step());

    fill_happy_path(&mut form);
    assert!(form.go_to_step(5));
    assert_eq!(form.current_step(), WizardStep::Platforms);
    assert!(!form.next_step());
    assert!(form.prev_step());
    assert_eq!(form.current_step(), WizardStep::Shipping);
}

#[test]
fn photos_beyond_the_limit_are_ignored() {
    let store = Arc::new(MemoryStore::new());
    let mut form = ListingForm::new(store, FormOptions::default().with_max_photos(2));
    assert!(form.add_photo(jpeg("a.jpg")));
    assert!(form.add_photo(jpeg("b.jpg")));
    assert!(!form.add_photo(jpeg("c.jpg")));
    assert_eq!(form.draft().photos.len(), 2);

    assert!(form.set_photo_rotation(1, Rotation::Quarter, None));
    assert_eq!(form.draft().photos[1].display_rotation, 90);
    assert!(form.set_photo_rotation(1, Rotation::None, Some(360)));
    assert_eq!(form.draft().photos[1].display_rotation, 360);
    assert!(!form.set_photo_rotation(5, Rotation::Half, None));

    assert!(form.reorder_photos(1, 0));
    assert_eq!(form.draft().photos[0].pending_file().unwrap().name, "b.jpg");
    assert!(form.remove_photo(0).is_some());
    assert!(form.remove_photo(4).is_none());
    assert_eq!(form.draft().photos.len(), 1);
}

#[test]
fn saved_drafts_restore_without_photos() {
    let (mut form, store) = form_with_store();
    form.add_photo(jpeg("a.jpg"));
    form.add_photo(jpeg("b.jpg"));
    form.update_field(DraftField::Title, json!("X")).unwrap();
    assert!(form.next_step());

    let blob = store.load(DEFAULT_DRAFT_KEY).unwrap().unwrap();
    let raw: serde_json::Value = serde_json::from_str(&blob).unwrap();
    assert_eq!(raw["_currentStep"], json!(2));
    assert!(raw["_savedAt"].is_string());
    assert_eq!(raw["photos"][1]["name"], json!("b.jpg"));
    assert!(raw["photos"][0].get("bytes").is_none());

    let mut restored = ListingForm::new(store, FormOptions::default());
    assert!(restored.load_draft());
    assert_eq!(restored.draft().title, "X");
    assert!(restored.draft().photos.is_empty());
    assert_eq!(restored.current_step(), WizardStep::Basics);
}

#[test]
fn malformed_drafts_count_as_missing() {
    let (mut form, store) = form_with_store();
    assert!(!form.load_draft());

    store.save(DEFAULT_DRAFT_KEY, "{not json").unwrap();
    form.update_field(DraftField::City, json!("Bari")).unwrap();
    assert!(!form.load_draft());
    assert_eq!(form.draft().city, "Bari");

    store
        .save(DEFAULT_DRAFT_KEY, r#"{"price": "free"}"#)
        .unwrap();
    assert!(!form.load_draft());
}

#[test]
fn restored_step_is_clamped() {
    let (mut form, store) = form_with_store();
    store
        .save(DEFAULT_DRAFT_KEY, r#"{"title": "Lamp", "_currentStep": 9}"#)
        .unwrap();
    assert!(form.load_draft());
    assert_eq!(form.current_step(), WizardStep::Platforms);
    assert!(form.draft().shipping_available);

    store
        .save(DEFAULT_DRAFT_KEY, r#"{"title": "Lamp", "_currentStep": "two"}"#)
        .unwrap();
    assert!(form.load_draft());
    assert_eq!(form.current_step(), WizardStep::Photos);
}

#[test]
fn reset_drops_the_saved_draft() {
    let (mut form, store) = form_with_store();
    fill_happy_path(&mut form);
    form.save_draft();
    form.reset();
    assert_eq!(form.draft(), &Draft::default());
    assert_eq!(store.load(DEFAULT_DRAFT_KEY).unwrap(), None);
}

#[tokio::test]
async fn submit_creates_uploads_and_resets() {
    let (mut form, store) = form_with_store();
    let service = InMemoryListingService::new();
    let toasts = ToastQueue::default();

    fill_happy_path(&mut form);
    assert!((1..=4).all(|step| form.is_step_completed(step)));
    form.go_to_step(5);
    form.save_draft();

    let id = form
        .submit(&service, &toasts, SubmitMode::Draft)
        .await
        .expect("listing id");

    assert_eq!(form.draft(), &Draft::default());
    assert_eq!(form.current_step(), WizardStep::Photos);
    assert!(!form.is_submitting());
    assert_eq!(store.load(DEFAULT_DRAFT_KEY).unwrap(), None);

    let toast = toasts.last().unwrap();
    assert_eq!(toast.kind, ToastKind::Success);
    assert_eq!(toast.message, "Draft saved");

    let listing = service.get(&id).await.unwrap();
    assert_eq!(listing.title, "Test");
    assert_eq!(listing.province, "MI");
    assert_eq!(listing.photos.len(), 1);
    assert_eq!(listing.status, ListingStatus::Draft);
    assert_eq!(listing.platforms(), vec![Platform::Ebay]);
}

#[tokio::test]
async fn submit_and_publish_activates_the_listing() {
    let (mut form, _) = form_with_store();
    let service = InMemoryListingService::new();
    let toasts = ToastQueue::default();
    fill_happy_path(&mut form);

    let id = form
        .submit(&service, &toasts, SubmitMode::Publish)
        .await
        .unwrap();
    let listing = service.get(&id).await.unwrap();
    assert_eq!(listing.status, ListingStatus::Active);
    assert_eq!(toasts.last().unwrap().message, "Listing published");
}

#[tokio::test]
async fn failed_submit_keeps_the_wizard_state() {
    let (mut form, _) = form_with_store();
    let service = InMemoryListingService::new();
    let toasts = ToastQueue::default();
    fill_happy_path(&mut form);
    form.update_field(DraftField::Province, json!("Milano")).unwrap();
    form.go_to_step(4);

    let outcome = form.submit(&service, &toasts, SubmitMode::Draft).await;
    assert!(outcome.is_none());
    assert!(!form.is_submitting());
    assert_eq!(form.draft().province, "Milano");
    assert_eq!(form.current_step(), WizardStep::Shipping);

    let toast = toasts.last().unwrap();
    assert_eq!(toast.kind, ToastKind::Error);
    assert_eq!(toast.message, "Province is required (2-letter code)");
    assert!(service.snapshot().await.listings.is_empty());
}

#[tokio::test]
async fn submit_without_price_reports_the_field() {
    let (mut form, _) = form_with_store();
    let service = InMemoryListingService::new();
    let toasts = ToastQueue::default();
    fill_happy_path(&mut form);
    form.update_field(DraftField::Price, json!(null)).unwrap();

    assert!(form.submit(&service, &toasts, SubmitMode::Draft).await.is_none());
    assert_eq!(toasts.last().unwrap().message, "Enter a valid price");
}

#[tokio::test]
async fn duplicates_start_over_from_photos() {
    let (mut form, _) = form_with_store();
    let service = InMemoryListingService::new();
    let source = service.create(create_payload("Oak table")).await.unwrap();

    form.load_duplicate_source(&service, &source.id).await;
    assert!(form.is_duplicating());
    assert_eq!(form.current_step(), WizardStep::Photos);
    assert_eq!(form.draft().title, "Copy of — Oak table");
    assert_eq!(form.draft().brand, "Ikea");
    assert!(form.draft().photos.is_empty());
    assert_eq!(
        form.draft().platforms,
        vec![Platform::Subito, Platform::Facebook]
    );

    let before = form.draft().clone();
    form.load_duplicate_source(&service, "missing").await;
    assert_eq!(form.draft(), &before);
}

#[tokio::test]
async fn submit_phases_guard_against_a_second_submit() {
    let (mut form, _) = form_with_store();
    let service = InMemoryListingService::new();
    let toasts = ToastQueue::default();
    fill_happy_path(&mut form);

    let pending = form
        .begin_submit(SubmitMode::Publish, &toasts)
        .expect("pending submit");
    assert_eq!(pending.mode(), SubmitMode::Publish);
    assert!(form.is_submitting());
    assert!(form.begin_submit(SubmitMode::Draft, &toasts).is_none());
    assert!(toasts.is_empty());

    let outcome = pending.send(&service).await;
    let id = form
        .finish_submit(SubmitMode::Publish, outcome, &toasts)
        .expect("listing id");
    assert!(!form.is_submitting());
    assert_eq!(form.draft(), &Draft::default());
    assert_eq!(
        service.get(&id).await.unwrap().status,
        ListingStatus::Active
    );
}
