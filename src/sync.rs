// SPDX-License-Identifier: MIT

//! Live collection subscription plumbing.
//!
//! Folds Firestore listener events into complete replacement snapshots:
//! every change yields the full current list, pushed through a watch
//! channel, so consumers always render a consistent snapshot and never a
//! partial merge. Subscription handles are scoped: dropping one disposes
//! its listener, and the registry guarantees at most one live listener
//! per (screen, collection) pair.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

use dashmap::DashMap;
use firestore::FirestoreListenEvent;
use tokio::sync::watch;

use crate::db::StoreListener;
use crate::error::{AppError, Result};

/// Extract the bare document id from a full resource path.
pub fn doc_id_from_path(path: &str) -> &str {
    path.rsplit('/').next().unwrap_or(path)
}

/// Ordered map of document id to view model, emitting a full snapshot
/// after every applied event. An empty collection snapshots to an empty
/// vec, never to an absent value.
#[derive(Debug, Default)]
pub struct SnapshotAssembler<T> {
    docs: BTreeMap<String, T>,
}

impl<T: Clone> SnapshotAssembler<T> {
    pub fn new() -> Self {
        Self {
            docs: BTreeMap::new(),
        }
    }

    /// Insert or replace a document.
    pub fn upsert(&mut self, doc_id: String, value: T) {
        self.docs.insert(doc_id, value);
    }

    /// Remove a document by bare id or full resource path.
    pub fn remove(&mut self, doc_id_or_path: &str) {
        self.docs.remove(doc_id_from_path(doc_id_or_path));
    }

    /// The complete current list.
    pub fn snapshot(&self) -> Vec<T> {
        self.docs.values().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.docs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.docs.is_empty()
    }
}

/// Identity of a live subscription: which screen opened it, over which
/// collection.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SubscriptionKey {
    pub screen: String,
    pub collection: &'static str,
}

impl SubscriptionKey {
    pub fn new(screen: &str, collection: &'static str) -> Self {
        Self {
            screen: screen.to_string(),
            collection,
        }
    }
}

/// Registry of live listeners. Registering a key disposes any previous
/// listener under that key first, so a remounting screen can never hold
/// two live subscriptions over the same collection.
#[derive(Clone, Default)]
pub struct SubscriptionRegistry {
    active: Arc<DashMap<SubscriptionKey, StoreListener>>,
}

impl SubscriptionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Track a started listener under a key, shutting down the previous
    /// holder of that key if there is one.
    pub async fn register(&self, key: SubscriptionKey, listener: StoreListener) {
        self.dispose(&key).await;
        self.active.insert(key, listener);
    }

    /// Shut down and forget the listener under a key, if any.
    pub async fn dispose(&self, key: &SubscriptionKey) {
        if let Some((_, mut listener)) = self.active.remove(key) {
            if let Err(err) = listener.shutdown().await {
                tracing::warn!(
                    error = %err,
                    screen = %key.screen,
                    collection = key.collection,
                    "Failed to shut down listener"
                );
            } else {
                tracing::debug!(
                    screen = %key.screen,
                    collection = key.collection,
                    "Listener disposed"
                );
            }
        }
    }

    /// Dispose without awaiting, for drop paths.
    pub fn dispose_detached(&self, key: SubscriptionKey) {
        let registry = self.clone();
        if let Ok(handle) = tokio::runtime::Handle::try_current() {
            handle.spawn(async move {
                registry.dispose(&key).await;
            });
        }
    }

    pub fn len(&self) -> usize {
        self.active.len()
    }

    pub fn is_empty(&self) -> bool {
        self.active.is_empty()
    }
}

/// A live, server-pushed list. `current()` is always the latest complete
/// snapshot. The subscription stays open until the handle is dropped or
/// explicitly unsubscribed.
pub struct LiveList<T> {
    rx: watch::Receiver<Vec<T>>,
    key: SubscriptionKey,
    registry: SubscriptionRegistry,
    disposed: bool,
}

impl<T: Clone> LiveList<T> {
    pub(crate) fn new(
        rx: watch::Receiver<Vec<T>>,
        key: SubscriptionKey,
        registry: SubscriptionRegistry,
    ) -> Self {
        Self {
            rx,
            key,
            registry,
            disposed: false,
        }
    }

    /// The latest complete snapshot.
    pub fn current(&self) -> Vec<T> {
        self.rx.borrow().clone()
    }

    /// Wait for the next emission. Returns false once the feed is closed.
    pub async fn changed(&mut self) -> bool {
        self.rx.changed().await.is_ok()
    }

    /// Explicitly dispose the subscription.
    pub async fn unsubscribe(mut self) {
        self.disposed = true;
        let key = self.key.clone();
        self.registry.dispose(&key).await;
    }
}

impl<T: std::fmt::Debug> std::fmt::Debug for LiveList<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LiveList")
            .field("key", &self.key)
            .field("disposed", &self.disposed)
            .finish_non_exhaustive()
    }
}

impl<T> Drop for LiveList<T> {
    fn drop(&mut self) {
        if self.disposed {
            return;
        }
        self.registry.dispose_detached(self.key.clone());
    }
}

/// Local description of one applied listener event.
enum Change<T> {
    Upsert(String, T),
    Remove(String),
}

/// Start a listener, folding its events into replacement snapshots.
///
/// `map_doc` converts a deserialized stored document into the view model
/// (returning `None` drops the document from the list); `finalize` runs
/// on every snapshot before emission (ordering, cache write-through).
/// Returns the snapshot receiver and the started listener, which the
/// caller hands to the registry.
pub(crate) async fn start_snapshot_feed<S, T, M, F>(
    mut listener: StoreListener,
    map_doc: M,
    finalize: F,
) -> Result<(watch::Receiver<Vec<T>>, StoreListener)>
where
    S: serde::de::DeserializeOwned + Send + 'static,
    T: Clone + Send + Sync + 'static,
    M: Fn(S) -> Option<T> + Send + Sync + 'static,
    F: Fn(&mut Vec<T>) + Send + Sync + 'static,
{
    let (tx, rx) = watch::channel(Vec::new());
    let tx = Arc::new(tx);
    let assembler = Arc::new(Mutex::new(SnapshotAssembler::new()));
    let map_doc = Arc::new(map_doc);
    let finalize = Arc::new(finalize);

    listener
        .start(move |event| {
            let tx = Arc::clone(&tx);
            let assembler = Arc::clone(&assembler);
            let map_doc = Arc::clone(&map_doc);
            let finalize = Arc::clone(&finalize);

            async move {
                let change = match event {
                    FirestoreListenEvent::DocumentChange(ref change) => match &change.document {
                        Some(doc) => {
                            match firestore::FirestoreDb::deserialize_doc_to::<S>(doc) {
                                Ok(stored) => {
                                    let doc_id = doc_id_from_path(&doc.name).to_string();
                                    match map_doc(stored) {
                                        Some(value) => Some(Change::Upsert(doc_id, value)),
                                        None => Some(Change::Remove(doc_id)),
                                    }
                                }
                                Err(err) => {
                                    tracing::warn!(
                                        error = %err,
                                        doc = %doc.name,
                                        "Skipping undecodable document in snapshot"
                                    );
                                    None
                                }
                            }
                        }
                        None => None,
                    },
                    FirestoreListenEvent::DocumentDelete(ref deleted) => Some(Change::Remove(
                        doc_id_from_path(&deleted.document).to_string(),
                    )),
                    FirestoreListenEvent::DocumentRemove(ref removed) => Some(Change::Remove(
                        doc_id_from_path(&removed.document).to_string(),
                    )),
                    _ => None,
                };

                if let Some(change) = change {
                    let mut snapshot = {
                        let mut state = match assembler.lock() {
                            Ok(guard) => guard,
                            Err(poisoned) => poisoned.into_inner(),
                        };
                        match change {
                            Change::Upsert(doc_id, value) => state.upsert(doc_id, value),
                            Change::Remove(doc_id) => state.remove(&doc_id),
                        }
                        state.snapshot()
                    };
                    finalize(&mut snapshot);
                    tx.send_replace(snapshot);
                }

                Ok(())
            }
        })
        .await
        .map_err(|e| AppError::Subscription(e.to_string()))?;

    Ok((rx, listener))
}
