// SPDX-License-Identifier: MIT

//! Process-wide session and UI state store.
//!
//! Two independent slices behind one injected store instance:
//! - user: the signed-in profile, replaced wholesale by `SetUser`
//! - busy: a reference-counted in-flight indicator
//!
//! There is no ambient singleton; the store is created at the composition
//! root and handed to every service that needs it. State lives for the
//! process lifetime only.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use tokio::sync::watch;

use crate::models::SessionUser;

/// Actions on the user slice.
#[derive(Debug, Clone)]
pub enum UserAction {
    /// Replace the whole user record. There is no partial merge; callers
    /// spread existing fields themselves.
    SetUser(SessionUser),
    /// Reset to signed-out.
    ClearUser,
}

/// Pure reducer for the user slice.
fn reduce_user(_state: Option<SessionUser>, action: UserAction) -> Option<SessionUser> {
    match action {
        UserAction::SetUser(user) => Some(user),
        UserAction::ClearUser => None,
    }
}

/// Session and UI state container.
#[derive(Clone)]
pub struct SessionStore {
    user_tx: Arc<watch::Sender<Option<SessionUser>>>,
    busy_count: Arc<AtomicUsize>,
    busy_tx: Arc<watch::Sender<bool>>,
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionStore {
    /// Create an empty store: no user, not busy.
    pub fn new() -> Self {
        let (user_tx, _) = watch::channel(None);
        let (busy_tx, _) = watch::channel(false);
        Self {
            user_tx: Arc::new(user_tx),
            busy_count: Arc::new(AtomicUsize::new(0)),
            busy_tx: Arc::new(busy_tx),
        }
    }

    /// Apply an action to the user slice.
    pub fn dispatch(&self, action: UserAction) {
        self.user_tx.send_modify(|state| {
            let previous = state.take();
            *state = reduce_user(previous, action);
        });
    }

    /// Current user, if signed in.
    pub fn current_user(&self) -> Option<SessionUser> {
        self.user_tx.borrow().clone()
    }

    /// Observe user slice changes.
    pub fn subscribe_user(&self) -> watch::Receiver<Option<SessionUser>> {
        self.user_tx.subscribe()
    }

    /// Mark an operation in flight. The indicator stays on until every
    /// outstanding guard has been dropped, so overlapping operations
    /// cannot clear it early.
    pub fn begin_busy(&self) -> BusyGuard {
        let count = self.busy_count.fetch_add(1, Ordering::SeqCst) + 1;
        self.busy_tx.send_replace(count > 0);
        BusyGuard {
            count: Arc::clone(&self.busy_count),
            tx: Arc::clone(&self.busy_tx),
        }
    }

    /// Whether any operation is in flight.
    pub fn is_busy(&self) -> bool {
        self.busy_count.load(Ordering::SeqCst) > 0
    }

    /// Observe busy indicator changes.
    pub fn subscribe_busy(&self) -> watch::Receiver<bool> {
        self.busy_tx.subscribe()
    }
}

/// In-flight token for one operation; releases its share of the busy
/// indicator on drop.
pub struct BusyGuard {
    count: Arc<AtomicUsize>,
    tx: Arc<watch::Sender<bool>>,
}

impl Drop for BusyGuard {
    fn drop(&mut self) {
        let count = self.count.fetch_sub(1, Ordering::SeqCst) - 1;
        self.tx.send_replace(count > 0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_user(uid: &str) -> SessionUser {
        SessionUser {
            uid: uid.to_string(),
            email: Some("test@example.com".to_string()),
            display_name: Some("Test".to_string()),
            full_name: Some("Test User".to_string()),
            avatar: None,
        }
    }

    #[test]
    fn test_set_user_replaces_whole_record() {
        let store = SessionStore::new();
        store.dispatch(UserAction::SetUser(test_user("u1")));

        // A record without the email replaces the old one entirely; no
        // merge happens on the caller's behalf.
        let partial = SessionUser {
            uid: "u1".to_string(),
            email: None,
            display_name: None,
            full_name: None,
            avatar: Some("https://example.com/a.png".to_string()),
        };
        store.dispatch(UserAction::SetUser(partial.clone()));

        assert_eq!(store.current_user(), Some(partial));
    }

    #[test]
    fn test_clear_user_resets_to_empty() {
        let store = SessionStore::new();
        store.dispatch(UserAction::SetUser(test_user("u1")));
        store.dispatch(UserAction::ClearUser);
        assert_eq!(store.current_user(), None);
    }

    #[test]
    fn test_busy_guard_refcounts_overlapping_operations() {
        let store = SessionStore::new();
        assert!(!store.is_busy());

        let first = store.begin_busy();
        let second = store.begin_busy();
        assert!(store.is_busy());

        // The first operation finishing must not clear the indicator
        // while the second is still in flight.
        drop(first);
        assert!(store.is_busy());

        drop(second);
        assert!(!store.is_busy());
    }

    #[tokio::test]
    async fn test_busy_watch_observes_transitions() {
        let store = SessionStore::new();
        let mut rx = store.subscribe_busy();
        assert!(!*rx.borrow());

        let guard = store.begin_busy();
        rx.changed().await.unwrap();
        assert!(*rx.borrow());

        drop(guard);
        rx.changed().await.unwrap();
        assert!(!*rx.borrow());
    }
}
