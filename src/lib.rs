#![deny(rust_2018_idioms)]

pub mod app;
pub mod domain;
pub mod form;
pub mod io;
pub mod service;

pub use app::{FormOptions, Notifier, Session, ToastKind, ToastQueue};
pub use domain::{Listing, ListingStatus, Platform};
pub use form::{Draft, DraftField, ListingEditor, ListingForm, SubmitMode, WizardStep};
pub use io::{DocumentFormat, OutputDestination, OutputOptions, parse_document_str};
pub use service::{InMemoryListingService, ListingService, ServiceError};

pub mod prelude {
    pub use super::{
        Draft, DraftField, FormOptions, InMemoryListingService, Listing, ListingEditor,
        ListingForm, ListingService, ListingStatus, Notifier, Platform, Session, SubmitMode,
        ToastKind, ToastQueue, WizardStep,
    };
}
