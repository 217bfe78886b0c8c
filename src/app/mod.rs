//! Shared session state and its user-facing plumbing.

mod board;
mod notify;
mod options;
mod session;

pub use board::{BoardFilter, FilterCounts, ListingBoard};
pub use notify::{LogNotifier, Notifier, Toast, ToastKind, ToastQueue};
pub use options::{DEFAULT_DRAFT_KEY, DEFAULT_TOAST_DURATION, FormOptions};
pub use session::Session;
