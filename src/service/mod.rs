//! The remote listing service boundary and an in-process implementation of it.

mod memory;
mod options;
mod payload;
mod upload;

use std::fmt;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::{Category, Listing, ListingStatus, ListingSummary, Photo, Platform, PlatformPublication};
use crate::form::PhotoFile;

pub use memory::{CatalogSnapshot, InMemoryListingService};
pub use options::{ServiceOptions, UploadLimits};
pub use payload::{CreateListingPayload, PayloadIssue, PayloadValidator, UpdateListingPayload};
pub use upload::{generate_filename, upload_url, validate_file};

/// Failure reported by a listing service call.
///
/// A server-supplied message wins over a transport message when building the
/// text shown to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceError {
    pub status: Option<u16>,
    pub server_message: Option<String>,
    pub transport_message: Option<String>,
}

impl ServiceError {
    pub fn rejected(status: u16, message: impl Into<String>) -> Self {
        Self {
            status: Some(status),
            server_message: Some(message.into()),
            transport_message: None,
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::rejected(400, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::rejected(404, message)
    }

    pub fn transport(message: impl Into<String>) -> Self {
        Self {
            status: None,
            server_message: None,
            transport_message: Some(message.into()),
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.status == Some(404)
    }

    pub fn user_message(&self, fallback: &str) -> String {
        [&self.server_message, &self.transport_message]
            .into_iter()
            .flatten()
            .map(String::as_str)
            .find(|message| !message.trim().is_empty())
            .unwrap_or(fallback)
            .to_string()
    }
}

impl fmt::Display for ServiceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let message = self.user_message("listing service request failed");
        match self.status {
            Some(status) => write!(f, "{status}: {message}"),
            None => f.write_str(&message),
        }
    }
}

impl std::error::Error for ServiceError {}

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Filters accepted by [`ListingService::list`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ListingFilter {
    pub status: Option<ListingStatus>,
    pub category: Option<Category>,
    pub search: Option<String>,
}

impl ListingFilter {
    pub fn with_status(mut self, status: ListingStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn with_category(mut self, category: Category) -> Self {
        self.category = Some(category);
        self
    }

    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = Some(search.into());
        self
    }
}

#[async_trait]
pub trait ListingService: Send + Sync {
    async fn create(&self, payload: CreateListingPayload) -> ServiceResult<Listing>;

    async fn update(&self, id: &str, payload: UpdateListingPayload) -> ServiceResult<Listing>;

    async fn remove(&self, id: &str) -> ServiceResult<()>;

    async fn upload_photos(&self, id: &str, files: Vec<PhotoFile>) -> ServiceResult<Vec<Photo>>;

    async fn get(&self, id: &str) -> ServiceResult<Listing>;

    async fn list(&self, filter: ListingFilter) -> ServiceResult<Vec<ListingSummary>>;

    async fn reorder_photos(&self, id: &str, photo_ids: Vec<String>) -> ServiceResult<Vec<Photo>>;

    async fn delete_photo(&self, id: &str, photo_id: &str) -> ServiceResult<()>;

    /// Publishes every draft or failed publication of the listing.
    async fn publish(&self, id: &str) -> ServiceResult<Listing>;

    async fn publish_platform(
        &self,
        id: &str,
        platform: Platform,
    ) -> ServiceResult<PlatformPublication>;

    async fn add_platform(&self, id: &str, platform: Platform)
    -> ServiceResult<PlatformPublication>;

    async fn remove_platform(&self, id: &str, platform: Platform) -> ServiceResult<()>;

    async fn mark_sold(&self, id: &str, platform: Option<Platform>) -> ServiceResult<Listing>;

    async fn revert_to_draft(&self, id: &str) -> ServiceResult<Listing>;

    async fn duplicate(&self, id: &str) -> ServiceResult<Listing>;
}
