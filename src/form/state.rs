use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;

use crate::app::{FormOptions, Notifier};
use crate::domain::{Listing, Platform};
use crate::io::{DraftStore, MemoryStore};
use crate::service::{CreateListingPayload, ListingService, ServiceError};

use super::{
    error::FieldCoercionError,
    field::{Draft, DraftField, DraftPhoto, PhotoFile, Rotation},
    readiness::{PlatformReadiness, readiness, readiness_all},
    validate::{StepValidation, WizardStep, is_step_completed, previous_steps_valid, validate_step},
};

const CURRENT_STEP_KEY: &str = "_currentStep";

/// How a finished wizard is handed to the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitMode {
    Draft,
    Publish,
}

impl SubmitMode {
    fn success_message(self) -> &'static str {
        match self {
            SubmitMode::Draft => "Draft saved",
            SubmitMode::Publish => "Listing published",
        }
    }

    fn failure_message(self) -> &'static str {
        match self {
            SubmitMode::Draft => "Could not save the draft",
            SubmitMode::Publish => "Could not publish the listing",
        }
    }
}

#[derive(Serialize)]
struct PersistedDraft<'a> {
    #[serde(flatten)]
    draft: &'a Draft,
    #[serde(rename = "_currentStep")]
    current_step: WizardStep,
    #[serde(rename = "_savedAt")]
    saved_at: DateTime<Utc>,
}

/// The creation wizard: one draft walked through five validated steps.
pub struct ListingForm {
    draft: Draft,
    current_step: WizardStep,
    is_duplicating: bool,
    is_submitting: bool,
    store: Arc<dyn DraftStore>,
    options: FormOptions,
}

impl Default for ListingForm {
    fn default() -> Self {
        Self::new(Arc::new(MemoryStore::new()), FormOptions::default())
    }
}

impl ListingForm {
    pub fn new(store: Arc<dyn DraftStore>, options: FormOptions) -> Self {
        Self {
            draft: Draft::default(),
            current_step: WizardStep::FIRST,
            is_duplicating: false,
            is_submitting: false,
            store,
            options,
        }
    }

    pub fn draft(&self) -> &Draft {
        &self.draft
    }

    pub fn current_step(&self) -> WizardStep {
        self.current_step
    }

    pub fn is_duplicating(&self) -> bool {
        self.is_duplicating
    }

    pub fn is_submitting(&self) -> bool {
        self.is_submitting
    }

    pub fn options(&self) -> &FormOptions {
        &self.options
    }

    pub fn step_validation(&self) -> StepValidation {
        validate_step(&self.draft, self.current_step)
    }

    pub fn can_go_next(&self) -> bool {
        self.step_validation().is_valid
    }

    pub fn is_step_completed(&self, step: u8) -> bool {
        is_step_completed(&self.draft, step)
    }

    /// Going back is always allowed; going forward needs every earlier step valid.
    pub fn can_go_to_step(&self, step: u8) -> bool {
        match WizardStep::from_number(step) {
            None => false,
            Some(target) if target <= self.current_step => true,
            Some(_) => previous_steps_valid(&self.draft, step),
        }
    }

    pub fn go_to_step(&mut self, step: u8) -> bool {
        if !self.can_go_to_step(step) {
            return false;
        }
        if let Some(target) = WizardStep::from_number(step) {
            log::debug!("wizard jumps to step {step}");
            self.current_step = target;
        }
        true
    }

    /// Advances one step when the current one validates, then saves the draft.
    pub fn next_step(&mut self) -> bool {
        let Some(next) = self.current_step.next() else {
            return false;
        };
        if !self.can_go_next() {
            return false;
        }
        log::debug!("wizard advances to step {}", next.number());
        self.current_step = next;
        if self.options.autosave {
            self.save_draft();
        }
        true
    }

    pub fn prev_step(&mut self) -> bool {
        match self.current_step.prev() {
            Some(prev) => {
                self.current_step = prev;
                true
            }
            None => false,
        }
    }

    pub fn update_field(&mut self, field: DraftField, value: Value) -> Result<(), FieldCoercionError> {
        self.draft.set_field(field, value)
    }

    /// Silently ignored once the photo limit is reached.
    pub fn add_photo(&mut self, file: PhotoFile) -> bool {
        self.draft
            .push_photo(DraftPhoto::pending(file), self.options.max_photos)
    }

    pub fn set_photo_rotation(
        &mut self,
        index: usize,
        rotation: Rotation,
        display_rotation: Option<i32>,
    ) -> bool {
        self.draft.rotate_photo(index, rotation, display_rotation)
    }

    pub fn remove_photo(&mut self, index: usize) -> Option<DraftPhoto> {
        self.draft.remove_photo(index)
    }

    pub fn reorder_photos(&mut self, from: usize, to: usize) -> bool {
        self.draft.move_photo(from, to)
    }

    pub fn readiness(&self, platform: Platform) -> PlatformReadiness {
        readiness(&self.draft, platform)
    }

    pub fn readiness_all(&self) -> Vec<PlatformReadiness> {
        readiness_all(&self.draft)
    }

    /// Writes the draft and current step under the configured key. Photos are
    /// stored as metadata only.
    pub fn save_draft(&self) {
        let persisted = PersistedDraft {
            draft: &self.draft,
            current_step: self.current_step,
            saved_at: Utc::now(),
        };
        let blob = match serde_json::to_string(&persisted) {
            Ok(blob) => blob,
            Err(err) => {
                log::warn!("could not serialize the listing draft: {err}");
                return;
            }
        };
        if let Err(err) = self.store.save(&self.options.draft_key, &blob) {
            log::warn!("could not save the listing draft: {err:#}");
        }
    }

    /// Restores a saved draft. Photos never come back, since file contents are
    /// not persisted. Missing or unreadable data counts as "no draft".
    pub fn load_draft(&mut self) -> bool {
        let blob = match self.store.load(&self.options.draft_key) {
            Ok(Some(blob)) => blob,
            Ok(None) => return false,
            Err(err) => {
                log::warn!("could not read the listing draft: {err:#}");
                return false;
            }
        };
        let Ok(raw) = serde_json::from_str::<Value>(&blob) else {
            return false;
        };
        let Ok(mut draft) = serde_json::from_value::<Draft>(raw.clone()) else {
            return false;
        };
        draft.photos.clear();

        self.draft = draft;
        self.current_step = restored_step(raw.get(CURRENT_STEP_KEY));
        log::debug!("restored listing draft at step {}", self.current_step.number());
        true
    }

    pub fn clear_draft(&self) {
        if let Err(err) = self.store.remove(&self.options.draft_key) {
            log::warn!("could not clear the listing draft: {err:#}");
        }
    }

    /// Back to an empty wizard on step 1; the saved draft is dropped as well.
    pub fn reset(&mut self) {
        self.draft = Draft::default();
        self.current_step = WizardStep::FIRST;
        self.is_duplicating = false;
        self.is_submitting = false;
        self.clear_draft();
    }

    /// Starts a new listing from an existing one. Photos have to be picked
    /// again; target platforms come from the source's publications.
    pub fn populate_from_listing(&mut self, listing: &Listing) {
        let mut draft = Draft::from_listing(listing);
        draft.photos.clear();
        draft.title = format!("Copy of — {}", listing.title);
        draft.platforms = listing
            .platform_publications
            .iter()
            .map(|publication| publication.platform)
            .collect();

        self.draft = draft;
        self.current_step = WizardStep::FIRST;
        self.is_duplicating = true;
    }

    /// Fetches a listing and populates the wizard from it. A failed fetch
    /// leaves the wizard as it was.
    pub async fn load_duplicate_source(&mut self, service: &dyn ListingService, id: &str) {
        match service.get(id).await {
            Ok(listing) => self.populate_from_listing(&listing),
            Err(err) => log::debug!("duplicate source {id} unavailable: {err}"),
        }
    }

    /// Creates the listing, uploads pending photos and optionally publishes
    /// it. Returns the new id; on failure the wizard keeps its state and the
    /// notifier receives the reason.
    pub async fn submit(
        &mut self,
        service: &dyn ListingService,
        notifier: &dyn Notifier,
        mode: SubmitMode,
    ) -> Option<String> {
        let pending = self.begin_submit(mode, notifier)?;
        let outcome = pending.send(service).await;
        self.finish_submit(mode, outcome, notifier)
    }

    /// Captures what to send and flags the wizard as submitting, so the
    /// service calls can run without holding the wizard. `None` while another
    /// submit is in flight or when the draft cannot form a payload.
    pub fn begin_submit(
        &mut self,
        mode: SubmitMode,
        notifier: &dyn Notifier,
    ) -> Option<PendingSubmit> {
        if self.is_submitting {
            log::debug!("submit ignored: another one is in flight");
            return None;
        }
        let payload = match CreateListingPayload::from_draft(&self.draft) {
            Ok(payload) => payload,
            Err(err) => {
                notifier.error(&err.message);
                return None;
            }
        };
        let files = self
            .draft
            .photos
            .iter()
            .filter_map(DraftPhoto::pending_file)
            .cloned()
            .collect();

        self.is_submitting = true;
        Some(PendingSubmit {
            mode,
            payload,
            files,
        })
    }

    /// Applies the outcome of [`PendingSubmit::send`]: reset on success, keep
    /// the wizard as it is on failure.
    pub fn finish_submit(
        &mut self,
        mode: SubmitMode,
        outcome: Result<String, ServiceError>,
        notifier: &dyn Notifier,
    ) -> Option<String> {
        self.is_submitting = false;
        match outcome {
            Ok(id) => {
                self.reset();
                notifier.success(mode.success_message());
                Some(id)
            }
            Err(err) => {
                notifier.error(&err.user_message(mode.failure_message()));
                None
            }
        }
    }
}

/// A wizard submission detached from the wizard itself.
#[derive(Debug, Clone)]
pub struct PendingSubmit {
    mode: SubmitMode,
    payload: CreateListingPayload,
    files: Vec<PhotoFile>,
}

impl PendingSubmit {
    pub fn mode(&self) -> SubmitMode {
        self.mode
    }

    pub async fn send(self, service: &dyn ListingService) -> Result<String, ServiceError> {
        let created = service.create(self.payload).await?;
        if !self.files.is_empty() {
            service.upload_photos(&created.id, self.files).await?;
        }
        if self.mode == SubmitMode::Publish {
            service.publish(&created.id).await?;
        }

        log::info!("wizard submitted listing {}", created.id);
        Ok(created.id)
    }
}

fn restored_step(raw: Option<&Value>) -> WizardStep {
    let Some(number) = raw.and_then(Value::as_u64) else {
        return WizardStep::FIRST;
    };
    let number = number.clamp(1, u64::from(WizardStep::LAST.number()));
    u8::try_from(number)
        .ok()
        .and_then(WizardStep::from_number)
        .unwrap_or(WizardStep::FIRST)
}
