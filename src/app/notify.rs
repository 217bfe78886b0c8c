use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

use serde::Serialize;

use super::options::DEFAULT_TOAST_DURATION;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ToastKind {
    Success,
    Error,
    Warning,
    Info,
}

/// Sink for user-facing messages produced by engine operations.
pub trait Notifier: Send + Sync {
    fn notify(&self, kind: ToastKind, message: &str);

    fn success(&self, message: &str) {
        self.notify(ToastKind::Success, message);
    }

    fn error(&self, message: &str) {
        self.notify(ToastKind::Error, message);
    }

    fn warning(&self, message: &str) {
        self.notify(ToastKind::Warning, message);
    }

    fn info(&self, message: &str) {
        self.notify(ToastKind::Info, message);
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    pub id: u64,
    pub kind: ToastKind,
    pub message: String,
    /// `None` keeps the toast until it is removed by hand.
    pub duration: Option<Duration>,
    pub shown_at: Instant,
}

impl Toast {
    pub fn is_expired(&self, now: Instant) -> bool {
        self.duration
            .is_some_and(|duration| now.saturating_duration_since(self.shown_at) >= duration)
    }
}

#[derive(Debug, Default)]
struct ToastState {
    last_id: u64,
    toasts: Vec<Toast>,
}

/// Ordered list of active toasts, oldest first. Expired toasts are dropped
/// whenever the queue is touched.
#[derive(Debug)]
pub struct ToastQueue {
    state: Mutex<ToastState>,
    default_duration: Duration,
}

impl Default for ToastQueue {
    fn default() -> Self {
        Self::new(DEFAULT_TOAST_DURATION)
    }
}

impl ToastQueue {
    pub fn new(default_duration: Duration) -> Self {
        Self {
            state: Mutex::new(ToastState::default()),
            default_duration,
        }
    }

    fn state(&self) -> MutexGuard<'_, ToastState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn live_state(&self) -> MutexGuard<'_, ToastState> {
        let mut state = self.state();
        let now = Instant::now();
        state.toasts.retain(|toast| !toast.is_expired(now));
        state
    }

    /// Shows a toast and returns its id. A zero duration makes it sticky.
    pub fn show(&self, kind: ToastKind, message: impl Into<String>, duration: Duration) -> u64 {
        let mut state = self.live_state();
        state.last_id += 1;
        let id = state.last_id;
        state.toasts.push(Toast {
            id,
            kind,
            message: message.into(),
            duration: (!duration.is_zero()).then_some(duration),
            shown_at: Instant::now(),
        });
        id
    }

    pub fn remove(&self, id: u64) -> bool {
        let mut state = self.state();
        let before = state.toasts.len();
        state.toasts.retain(|toast| toast.id != id);
        state.toasts.len() != before
    }

    /// Drops every toast whose duration has elapsed at `now`.
    pub fn prune_expired(&self, now: Instant) -> usize {
        let mut state = self.state();
        let before = state.toasts.len();
        state.toasts.retain(|toast| !toast.is_expired(now));
        before - state.toasts.len()
    }

    pub fn toasts(&self) -> Vec<Toast> {
        self.live_state().toasts.clone()
    }

    pub fn last(&self) -> Option<Toast> {
        self.live_state().toasts.last().cloned()
    }

    pub fn clear(&self) {
        self.state().toasts.clear();
    }

    pub fn len(&self) -> usize {
        self.live_state().toasts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Notifier for ToastQueue {
    fn notify(&self, kind: ToastKind, message: &str) {
        match kind {
            ToastKind::Error => log::warn!("{message}"),
            _ => log::debug!("{message}"),
        }
        self.show(kind, message, self.default_duration);
    }
}

/// Notifier that only logs.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, kind: ToastKind, message: &str) {
        match kind {
            ToastKind::Error => log::error!("{message}"),
            ToastKind::Warning => log::warn!("{message}"),
            ToastKind::Success | ToastKind::Info => log::info!("{message}"),
        }
    }
}
