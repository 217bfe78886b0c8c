use indexmap::IndexSet;
use serde_json::Value;

use crate::app::Notifier;
use crate::domain::Listing;
use crate::service::{ListingService, ServiceError, UpdateListingPayload};

use super::{
    error::FieldCoercionError,
    field::{Draft, DraftField, DraftPhoto, PhotoFile, Rotation, field_label},
    validate::{ErrorMap, MAX_PHOTOS, validate_listing},
    value::values_equal,
};

/// In-place editing of a stored listing with change tracking against the
/// state it had when editing began.
#[derive(Debug, Default)]
pub struct ListingEditor {
    working: Option<Draft>,
    snapshot: Option<Draft>,
    is_edit_mode: bool,
    is_saving: bool,
    listing_id: Option<String>,
}

impl ListingEditor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_edit_mode(&self) -> bool {
        self.is_edit_mode
    }

    pub fn is_saving(&self) -> bool {
        self.is_saving
    }

    pub fn listing_id(&self) -> Option<&str> {
        self.listing_id.as_deref()
    }

    pub fn working_copy(&self) -> Option<&Draft> {
        self.working.as_ref()
    }

    pub fn snapshot(&self) -> Option<&Draft> {
        self.snapshot.as_ref()
    }

    /// Copies the editable fields of `listing` into a working draft and keeps
    /// an identical snapshot to diff against.
    pub fn enter_edit(&mut self, listing: &Listing) {
        let draft = Draft::from_listing(listing);
        self.snapshot = Some(draft.clone());
        self.working = Some(draft);
        self.listing_id = Some(listing.id.clone());
        self.is_edit_mode = true;
        log::debug!("editing listing {}", listing.id);
    }

    pub fn exit_edit(&mut self) {
        self.is_edit_mode = false;
        self.working = None;
        self.snapshot = None;
        self.listing_id = None;
        self.is_saving = false;
    }

    /// No-op outside edit mode.
    pub fn update_field(&mut self, field: DraftField, value: Value) -> Result<(), FieldCoercionError> {
        match self.working.as_mut() {
            Some(draft) => draft.set_field(field, value),
            None => Ok(()),
        }
    }

    pub fn add_photo(&mut self, file: PhotoFile) -> bool {
        self.working
            .as_mut()
            .is_some_and(|draft| draft.push_photo(DraftPhoto::pending(file), MAX_PHOTOS))
    }

    /// Only photos added during this edit can be rotated. Stored photos keep
    /// the orientation they were uploaded with.
    pub fn set_photo_rotation(
        &mut self,
        index: usize,
        rotation: Rotation,
        display_rotation: Option<i32>,
    ) -> bool {
        let Some(draft) = self.working.as_mut() else {
            return false;
        };
        if draft
            .photos
            .get(index)
            .is_none_or(|photo| photo.pending_file().is_none())
        {
            return false;
        }
        draft.rotate_photo(index, rotation, display_rotation)
    }

    pub fn remove_photo(&mut self, index: usize) -> Option<DraftPhoto> {
        self.working.as_mut()?.remove_photo(index)
    }

    pub fn reorder_photos(&mut self, from: usize, to: usize) -> bool {
        self.working
            .as_mut()
            .is_some_and(|draft| draft.move_photo(from, to))
    }

    /// Resets the working draft to the snapshot.
    pub fn discard(&mut self) {
        if let Some(snapshot) = &self.snapshot {
            self.working = Some(snapshot.clone());
        }
    }

    /// Editable fields whose working value differs from the snapshot, in
    /// registry order.
    pub fn modified_fields(&self) -> IndexSet<DraftField> {
        let (Some(working), Some(snapshot)) = (&self.working, &self.snapshot) else {
            return IndexSet::new();
        };
        DraftField::EDITABLE
            .into_iter()
            .filter(|field| {
                !values_equal(
                    Some(&working.value_of(*field)),
                    Some(&snapshot.value_of(*field)),
                )
            })
            .collect()
    }

    pub fn has_changes(&self) -> bool {
        !self.modified_fields().is_empty()
    }

    pub fn is_field_modified(&self, name: &str) -> bool {
        DraftField::from_name(name).is_some_and(|field| self.modified_fields().contains(&field))
    }

    pub fn validation_errors(&self) -> ErrorMap {
        self.working
            .as_ref()
            .map(validate_listing)
            .unwrap_or_default()
    }

    pub fn is_valid(&self) -> bool {
        self.validation_errors().is_empty()
    }

    pub fn field_label(&self, name: &str) -> String {
        field_label(name)
    }

    /// Sends the modified fields as a partial update and syncs the photo list.
    /// Leaves edit mode and returns the fresh listing on success; on failure
    /// the working draft stays untouched and the notifier gets the reason.
    pub async fn save(
        &mut self,
        service: &dyn ListingService,
        notifier: &dyn Notifier,
    ) -> Option<Listing> {
        let plan = self.begin_save()?;
        let outcome = plan.run(service).await;
        self.finish_save(outcome, notifier)
    }

    /// Plans the service calls for the current changes and flags the editor
    /// as saving. `None` outside edit mode or while a save is in flight.
    pub fn begin_save(&mut self) -> Option<SavePlan> {
        if self.is_saving {
            return None;
        }
        let (Some(id), Some(working), Some(snapshot)) =
            (&self.listing_id, &self.working, &self.snapshot)
        else {
            return None;
        };
        let plan = SavePlan::build(id, working, snapshot, &self.modified_fields());
        self.is_saving = true;
        Some(plan)
    }

    /// Applies the outcome of [`SavePlan::run`]. Edit mode is left only when
    /// the saved listing is still the one being edited.
    pub fn finish_save(
        &mut self,
        outcome: Result<Listing, ServiceError>,
        notifier: &dyn Notifier,
    ) -> Option<Listing> {
        self.is_saving = false;
        match outcome {
            Ok(listing) => {
                log::info!("saved changes to listing {}", listing.id);
                if self.listing_id.as_deref() == Some(listing.id.as_str()) {
                    self.exit_edit();
                }
                notifier.success("Changes saved");
                Some(listing)
            }
            Err(err) => {
                notifier.error(&err.user_message("Could not save the changes"));
                None
            }
        }
    }
}

/// Service calls needed to bring a stored listing in line with the working
/// draft.
#[derive(Debug, Clone)]
pub struct SavePlan {
    listing_id: String,
    update: UpdateListingPayload,
    deleted_photos: Vec<String>,
    new_files: Vec<PhotoFile>,
    /// Final photo order; `None` marks a slot filled by the next upload.
    order: Vec<Option<String>>,
    photos_changed: bool,
}

impl SavePlan {
    fn build(
        listing_id: &str,
        working: &Draft,
        snapshot: &Draft,
        modified: &IndexSet<DraftField>,
    ) -> Self {
        let update = UpdateListingPayload::from_draft_fields(working, modified.iter().copied());
        let photos_changed = modified.contains(&DraftField::Photos);

        let kept: Vec<&str> = working
            .photos
            .iter()
            .filter_map(DraftPhoto::stored_photo)
            .map(|photo| photo.id.as_str())
            .collect();
        let deleted_photos = snapshot
            .photos
            .iter()
            .filter_map(DraftPhoto::stored_photo)
            .filter(|photo| !kept.contains(&photo.id.as_str()))
            .map(|photo| photo.id.clone())
            .collect();
        let new_files = working
            .photos
            .iter()
            .filter_map(DraftPhoto::pending_file)
            .cloned()
            .collect();
        let order = working
            .photos
            .iter()
            .map(|photo| photo.stored_photo().map(|stored| stored.id.clone()))
            .collect();

        Self {
            listing_id: listing_id.to_string(),
            update,
            deleted_photos,
            new_files,
            order,
            photos_changed,
        }
    }

    pub fn listing_id(&self) -> &str {
        &self.listing_id
    }

    pub async fn run(self, service: &dyn ListingService) -> Result<Listing, ServiceError> {
        let id = self.listing_id.as_str();
        if !self.update.is_empty() {
            service.update(id, self.update).await?;
        }
        if !self.photos_changed {
            return service.get(id).await;
        }

        for photo_id in &self.deleted_photos {
            service.delete_photo(id, photo_id).await?;
        }

        let uploaded = if self.new_files.is_empty() {
            Vec::new()
        } else {
            service.upload_photos(id, self.new_files).await?
        };

        let mut uploaded_ids = uploaded.into_iter().map(|photo| photo.id);
        let wanted: Vec<String> = self
            .order
            .into_iter()
            .filter_map(|slot| slot.or_else(|| uploaded_ids.next()))
            .collect();

        let current = service.get(id).await?;
        let current_order: Vec<String> = current
            .ordered_photos()
            .into_iter()
            .map(|photo| photo.id.clone())
            .collect();
        if !wanted.is_empty() && wanted != current_order {
            service.reorder_photos(id, wanted).await?;
            return service.get(id).await;
        }
        Ok(current)
    }
}
