use std::time::{Duration, Instant};

use crate::app::{Notifier, ToastKind, ToastQueue};

#[test]
fn toasts_get_increasing_ids_in_arrival_order() {
    let queue = ToastQueue::default();
    queue.success("Saved");
    queue.error("Failed");
    queue.warning("Careful");
    queue.info("FYI");

    let toasts = queue.toasts();
    let ids: Vec<u64> = toasts.iter().map(|toast| toast.id).collect();
    assert_eq!(ids, vec![1, 2, 3, 4]);
    let kinds: Vec<ToastKind> = toasts.iter().map(|toast| toast.kind).collect();
    assert_eq!(
        kinds,
        vec![
            ToastKind::Success,
            ToastKind::Error,
            ToastKind::Warning,
            ToastKind::Info
        ]
    );
    assert_eq!(toasts[0].duration, Some(Duration::from_secs(5)));
}

#[test]
fn removal_is_by_id() {
    let queue = ToastQueue::default();
    let first = queue.show(ToastKind::Info, "one", Duration::from_secs(1));
    let second = queue.show(ToastKind::Info, "two", Duration::from_secs(1));
    assert!(queue.remove(first));
    assert!(!queue.remove(first));
    assert_eq!(queue.len(), 1);
    assert_eq!(queue.last().unwrap().id, second);
    queue.clear();
    assert!(queue.is_empty());
}

#[test]
fn expired_toasts_are_pruned_but_sticky_ones_stay() {
    let queue = ToastQueue::new(Duration::from_secs(10));
    queue.error("short lived");
    let sticky = queue.show(ToastKind::Warning, "sticky", Duration::ZERO);

    assert_eq!(queue.prune_expired(Instant::now()), 0);
    let later = Instant::now() + Duration::from_secs(60);
    assert_eq!(queue.prune_expired(later), 1);
    let remaining = queue.toasts();
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].id, sticky);
    assert_eq!(remaining[0].duration, None);
}

#[test]
fn elapsed_toasts_disappear_without_a_manual_prune() {
    let queue = ToastQueue::new(Duration::from_millis(1));
    queue.error("boom");
    let sticky = queue.show(ToastKind::Info, "pinned", Duration::ZERO);
    std::thread::sleep(Duration::from_millis(20));

    assert_eq!(queue.len(), 1);
    assert_eq!(queue.last().unwrap().id, sticky);
    assert_eq!(queue.toasts().len(), 1);

    queue.remove(sticky);
    assert!(queue.toasts().is_empty());
    assert!(queue.last().is_none());
    assert!(queue.is_empty());
}
