use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;
use tokio::sync::Notify;

use crate::{
    app::{FormOptions, Session, ToastKind},
    domain::{Listing, ListingStatus, ListingSummary, Photo, Platform, PlatformPublication},
    form::{DraftField, ListingForm, PhotoFile, SubmitMode},
    io::MemoryStore,
    service::{
        CreateListingPayload, InMemoryListingService, ListingFilter, ListingService,
        ServiceResult, UpdateListingPayload,
    },
    tests::fixtures::{create_payload, jpeg},
};

/// Parks `create` and `update` until the test releases them.
#[derive(Default)]
struct GatedService {
    inner: InMemoryListingService,
    entered: Notify,
    release: Notify,
}

impl GatedService {
    async fn hold(&self) {
        self.entered.notify_one();
        self.release.notified().await;
    }
}

#[async_trait]
impl ListingService for GatedService {
    async fn create(&self, payload: CreateListingPayload) -> ServiceResult<Listing> {
        self.hold().await;
        self.inner.create(payload).await
    }

    async fn update(&self, id: &str, payload: UpdateListingPayload) -> ServiceResult<Listing> {
        self.hold().await;
        self.inner.update(id, payload).await
    }

    async fn remove(&self, id: &str) -> ServiceResult<()> {
        self.inner.remove(id).await
    }

    async fn upload_photos(&self, id: &str, files: Vec<PhotoFile>) -> ServiceResult<Vec<Photo>> {
        self.inner.upload_photos(id, files).await
    }

    async fn get(&self, id: &str) -> ServiceResult<Listing> {
        self.inner.get(id).await
    }

    async fn list(&self, filter: ListingFilter) -> ServiceResult<Vec<ListingSummary>> {
        self.inner.list(filter).await
    }

    async fn reorder_photos(&self, id: &str, photo_ids: Vec<String>) -> ServiceResult<Vec<Photo>> {
        self.inner.reorder_photos(id, photo_ids).await
    }

    async fn delete_photo(&self, id: &str, photo_id: &str) -> ServiceResult<()> {
        self.inner.delete_photo(id, photo_id).await
    }

    async fn publish(&self, id: &str) -> ServiceResult<Listing> {
        self.inner.publish(id).await
    }

    async fn publish_platform(
        &self,
        id: &str,
        platform: Platform,
    ) -> ServiceResult<PlatformPublication> {
        self.inner.publish_platform(id, platform).await
    }

    async fn add_platform(
        &self,
        id: &str,
        platform: Platform,
    ) -> ServiceResult<PlatformPublication> {
        self.inner.add_platform(id, platform).await
    }

    async fn remove_platform(&self, id: &str, platform: Platform) -> ServiceResult<()> {
        self.inner.remove_platform(id, platform).await
    }

    async fn mark_sold(&self, id: &str, platform: Option<Platform>) -> ServiceResult<Listing> {
        self.inner.mark_sold(id, platform).await
    }

    async fn revert_to_draft(&self, id: &str) -> ServiceResult<Listing> {
        self.inner.revert_to_draft(id).await
    }

    async fn duplicate(&self, id: &str) -> ServiceResult<Listing> {
        self.inner.duplicate(id).await
    }
}

fn gated_session() -> (Session, Arc<GatedService>) {
    let service = Arc::new(GatedService::default());
    let session = Session::new(
        service.clone(),
        Arc::new(MemoryStore::new()),
        FormOptions::default(),
    );
    (session, service)
}

fn fill_bike(form: &mut ListingForm) {
    form.add_photo(jpeg("a.jpg"));
    for (field, value) in [
        (DraftField::Title, json!("Bike")),
        (DraftField::Description, json!("City bike")),
        (DraftField::Price, json!(80)),
        (DraftField::Category, json!("SPORTS")),
        (DraftField::Condition, json!("FAIR")),
        (DraftField::City, json!("Padova")),
        (DraftField::Province, json!("pd")),
        (DraftField::ShippingAvailable, json!(false)),
        (DraftField::Platforms, json!(["FACEBOOK"])),
    ] {
        form.update_field(field, value).unwrap();
    }
}

#[tokio::test]
async fn clones_share_one_wizard() {
    let session = Session::in_memory();
    let other = session.clone();

    session
        .form()
        .lock()
        .await
        .update_field(DraftField::Title, json!("Shared"))
        .unwrap();
    assert_eq!(other.form().lock().await.draft().title, "Shared");
}

#[tokio::test]
async fn submit_then_edit_round_trip() {
    let session = Session::in_memory();
    fill_bike(&mut *session.form().lock().await);

    let id = session.submit(SubmitMode::Publish).await.unwrap();
    assert!(session.refresh_board(Some(ListingStatus::Active), None).await);
    assert_eq!(session.board().lock().await.listings().len(), 1);

    let listing = session.edit(&id).await.unwrap();
    assert_eq!(listing.province, "PD");
    session
        .editor()
        .lock()
        .await
        .update_field(DraftField::Price, json!(70))
        .unwrap();
    let saved = session.save_edit().await.unwrap();
    assert_eq!(saved.price, 70.0);
    assert!(!session.editor().lock().await.is_edit_mode());

    assert!(session.delete_listing(&id).await);
    assert!(session.edit(&id).await.is_none());
    assert_eq!(session.toasts().last().unwrap().kind, ToastKind::Error);
}

#[tokio::test]
async fn duplicate_goes_through_the_shared_service() {
    let session = Session::in_memory();
    let source = session
        .service()
        .create(create_payload("Desk"))
        .await
        .unwrap();
    session.duplicate_into_form(&source.id).await;
    let form = session.form().lock().await;
    assert!(form.is_duplicating());
    assert_eq!(form.draft().title, "Copy of — Desk");
}

#[tokio::test]
async fn form_stays_reachable_while_a_submit_is_in_flight() {
    let (session, service) = gated_session();
    fill_bike(&mut *session.form().lock().await);

    let observer = async {
        service.entered.notified().await;
        {
            let mut form = session
                .form()
                .try_lock()
                .expect("form lock is free during the service call");
            assert!(form.is_submitting());
            assert!(
                form.begin_submit(SubmitMode::Draft, session.toasts().as_ref())
                    .is_none()
            );
        }
        service.release.notify_one();
    };
    let (id, ()) = tokio::join!(session.submit(SubmitMode::Publish), observer);

    let id = id.expect("listing id");
    let form = session.form().lock().await;
    assert!(!form.is_submitting());
    assert_eq!(form.draft().title, "");
    drop(form);
    let listing = session.service().get(&id).await.unwrap();
    assert_eq!(listing.status, ListingStatus::Active);
    assert_eq!(session.toasts().last().unwrap().message, "Listing published");
}

#[tokio::test]
async fn editor_stays_reachable_while_a_save_is_in_flight() {
    let (session, service) = gated_session();
    let stored = service.inner.create(create_payload("Lamp")).await.unwrap();
    assert!(session.edit(&stored.id).await.is_some());
    session
        .editor()
        .lock()
        .await
        .update_field(DraftField::Price, json!(99))
        .unwrap();

    let observer = async {
        service.entered.notified().await;
        {
            let mut editor = session
                .editor()
                .try_lock()
                .expect("editor lock is free during the service call");
            assert!(editor.is_saving());
            assert!(editor.is_edit_mode());
            assert!(editor.begin_save().is_none());
        }
        service.release.notify_one();
    };
    let (saved, ()) = tokio::join!(session.save_edit(), observer);

    assert_eq!(saved.expect("saved listing").price, 99.0);
    let editor = session.editor().lock().await;
    assert!(!editor.is_saving());
    assert!(!editor.is_edit_mode());
}
