use std::time::Duration;

use crate::form::MAX_PHOTOS;

pub const DEFAULT_DRAFT_KEY: &str = "relist_listing_draft";
pub const DEFAULT_TOAST_DURATION: Duration = Duration::from_secs(5);

/// Knobs for the listing wizard and its notifications.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormOptions {
    pub draft_key: String,
    pub max_photos: usize,
    pub toast_duration: Duration,
    pub autosave: bool,
}

impl Default for FormOptions {
    fn default() -> Self {
        Self {
            draft_key: DEFAULT_DRAFT_KEY.to_string(),
            max_photos: MAX_PHOTOS,
            toast_duration: DEFAULT_TOAST_DURATION,
            autosave: true,
        }
    }
}

impl FormOptions {
    pub fn with_draft_key(mut self, key: impl Into<String>) -> Self {
        self.draft_key = key.into();
        self
    }

    pub fn with_max_photos(mut self, max: usize) -> Self {
        self.max_photos = max;
        self
    }

    pub fn with_toast_duration(mut self, duration: Duration) -> Self {
        self.toast_duration = duration;
        self
    }

    /// Controls whether advancing a step writes the draft to the store.
    pub fn with_autosave(mut self, enabled: bool) -> Self {
        self.autosave = enabled;
        self
    }
}
