use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::domain::{ListingStatus, ListingSummary, ParseEnumError};
use crate::service::{ListingFilter, ListingService};

use super::notify::Notifier;

/// Local status filter of the dashboard.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum BoardFilter {
    #[default]
    All,
    Status(ListingStatus),
}

impl BoardFilter {
    pub fn matches(self, summary: &ListingSummary) -> bool {
        match self {
            BoardFilter::All => true,
            BoardFilter::Status(status) => summary.status == status,
        }
    }
}

impl FromStr for BoardFilter {
    type Err = ParseEnumError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        if raw.trim().eq_ignore_ascii_case("all") {
            return Ok(BoardFilter::All);
        }
        raw.parse().map(BoardFilter::Status)
    }
}

impl fmt::Display for BoardFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BoardFilter::All => f.write_str("all"),
            BoardFilter::Status(status) => write!(f, "{status}"),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterCounts {
    pub all: usize,
    pub active: usize,
    pub draft: usize,
    pub sold: usize,
}

/// Listing summaries shown on the dashboard.
#[derive(Debug, Default)]
pub struct ListingBoard {
    listings: Vec<ListingSummary>,
    pending: bool,
    error: Option<String>,
    active_filter: BoardFilter,
}

impl ListingBoard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn listings(&self) -> &[ListingSummary] {
        &self.listings
    }

    pub fn is_pending(&self) -> bool {
        self.pending
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn active_filter(&self) -> BoardFilter {
        self.active_filter
    }

    pub fn set_filter(&mut self, filter: BoardFilter) {
        self.active_filter = filter;
    }

    /// Reloads the summaries. A failure keeps the previous list, records the
    /// message and notifies.
    pub async fn fetch(
        &mut self,
        service: &dyn ListingService,
        notifier: &dyn Notifier,
        status: Option<ListingStatus>,
        search: Option<&str>,
    ) -> bool {
        let mut filter = ListingFilter::default();
        if let Some(status) = status {
            filter = filter.with_status(status);
        }
        if let Some(search) = search.filter(|term| !term.trim().is_empty()) {
            filter = filter.with_search(search);
        }

        self.pending = true;
        self.error = None;
        let outcome = service.list(filter).await;
        self.pending = false;

        match outcome {
            Ok(listings) => {
                self.listings = listings;
                true
            }
            Err(err) => {
                let message = err.user_message("Could not load the listings");
                notifier.error(&message);
                self.error = Some(message);
                false
            }
        }
    }

    pub async fn delete(
        &mut self,
        service: &dyn ListingService,
        notifier: &dyn Notifier,
        id: &str,
    ) -> bool {
        match service.remove(id).await {
            Ok(()) => {
                self.listings.retain(|summary| summary.id != id);
                notifier.success("Listing deleted");
                true
            }
            Err(err) => {
                notifier.error(&err.user_message("Could not delete the listing"));
                false
            }
        }
    }

    pub fn filtered(&self) -> Vec<&ListingSummary> {
        self.listings
            .iter()
            .filter(|summary| self.active_filter.matches(summary))
            .collect()
    }

    pub fn filter_counts(&self) -> FilterCounts {
        let count = |status: ListingStatus| {
            self.listings
                .iter()
                .filter(|summary| summary.status == status)
                .count()
        };
        FilterCounts {
            all: self.listings.len(),
            active: count(ListingStatus::Active),
            draft: count(ListingStatus::Draft),
            sold: count(ListingStatus::Sold),
        }
    }
}
