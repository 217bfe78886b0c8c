use std::sync::Arc;

use tokio::sync::Mutex;

use crate::domain::{Listing, ListingStatus};
use crate::form::{ListingEditor, ListingForm, SubmitMode};
use crate::io::{DraftStore, MemoryStore};
use crate::service::{InMemoryListingService, ListingService};

use super::{
    board::ListingBoard,
    notify::{Notifier, ToastQueue},
    options::FormOptions,
};

/// Owns the one wizard, editor and board instance every consumer shares.
///
/// Cloning is cheap and yields handles to the same state.
#[derive(Clone)]
pub struct Session {
    form: Arc<Mutex<ListingForm>>,
    editor: Arc<Mutex<ListingEditor>>,
    board: Arc<Mutex<ListingBoard>>,
    service: Arc<dyn ListingService>,
    toasts: Arc<ToastQueue>,
}

impl Session {
    pub fn new(
        service: Arc<dyn ListingService>,
        store: Arc<dyn DraftStore>,
        options: FormOptions,
    ) -> Self {
        let toasts = Arc::new(ToastQueue::new(options.toast_duration));
        Self {
            form: Arc::new(Mutex::new(ListingForm::new(store, options))),
            editor: Arc::new(Mutex::new(ListingEditor::new())),
            board: Arc::new(Mutex::new(ListingBoard::new())),
            service,
            toasts,
        }
    }

    /// A session backed by an empty in-memory service and draft store.
    pub fn in_memory() -> Self {
        Self::new(
            Arc::new(InMemoryListingService::new()),
            Arc::new(MemoryStore::new()),
            FormOptions::default(),
        )
    }

    pub fn form(&self) -> &Arc<Mutex<ListingForm>> {
        &self.form
    }

    pub fn editor(&self) -> &Arc<Mutex<ListingEditor>> {
        &self.editor
    }

    pub fn board(&self) -> &Arc<Mutex<ListingBoard>> {
        &self.board
    }

    pub fn service(&self) -> &Arc<dyn ListingService> {
        &self.service
    }

    pub fn toasts(&self) -> &Arc<ToastQueue> {
        &self.toasts
    }

    /// Submits the shared wizard. The wizard is only locked while the
    /// request is prepared and while its outcome is applied, so other
    /// handles can watch `is_submitting` in between.
    pub async fn submit(&self, mode: SubmitMode) -> Option<String> {
        let pending = self
            .form
            .lock()
            .await
            .begin_submit(mode, self.toasts.as_ref())?;
        let outcome = pending.send(self.service.as_ref()).await;
        self.form
            .lock()
            .await
            .finish_submit(mode, outcome, self.toasts.as_ref())
    }

    /// Fetches a listing and starts a new wizard from it. A failed fetch
    /// leaves the wizard as it was.
    pub async fn duplicate_into_form(&self, id: &str) {
        match self.service.get(id).await {
            Ok(listing) => self.form.lock().await.populate_from_listing(&listing),
            Err(err) => log::debug!("duplicate source {id} unavailable: {err}"),
        }
    }

    /// Loads a listing and opens it in the editor.
    pub async fn edit(&self, id: &str) -> Option<Listing> {
        match self.service.get(id).await {
            Ok(listing) => {
                self.editor.lock().await.enter_edit(&listing);
                Some(listing)
            }
            Err(err) => {
                self.toasts
                    .error(&err.user_message("Could not load the listing"));
                None
            }
        }
    }

    /// Saves the shared editor without holding it across the service calls.
    pub async fn save_edit(&self) -> Option<Listing> {
        let plan = self.editor.lock().await.begin_save()?;
        let outcome = plan.run(self.service.as_ref()).await;
        self.editor
            .lock()
            .await
            .finish_save(outcome, self.toasts.as_ref())
    }

    pub async fn refresh_board(&self, status: Option<ListingStatus>, search: Option<&str>) -> bool {
        let mut board = self.board.lock().await;
        board
            .fetch(self.service.as_ref(), self.toasts.as_ref(), status, search)
            .await
    }

    pub async fn delete_listing(&self, id: &str) -> bool {
        let mut board = self.board.lock().await;
        board
            .delete(self.service.as_ref(), self.toasts.as_ref(), id)
            .await
    }
}
