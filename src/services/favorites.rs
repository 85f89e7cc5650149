// SPDX-License-Identifier: MIT

//! Favorites service: cache-backed live view and dual-write toggle.
//!
//! The favorites list is served live from the store whenever possible,
//! with every snapshot written through to the on-device cache. When the
//! subscription cannot be established the cached list is served as a
//! static result and no error reaches the caller.

use crate::cache::FavoritesCache;
use crate::db::{collections, targets, FirestoreDb};
use crate::error::{AppError, Result};
use crate::models::{Favorite, RecipeDetail, RecipeId};
use crate::store::SessionStore;
use crate::sync::{start_snapshot_feed, LiveList, SubscriptionKey, SubscriptionRegistry};

/// Outcome of a favorite toggle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FavoriteToggle {
    Added,
    Removed,
}

/// A favorites list view: live while the subscription is healthy, cached
/// and static when it could not be established.
pub enum FavoritesView {
    Live(LiveList<Favorite>),
    Cached(Vec<Favorite>),
}

impl std::fmt::Debug for FavoritesView {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FavoritesView::Live(_) => f.debug_tuple("Live").finish(),
            FavoritesView::Cached(favorites) => {
                f.debug_tuple("Cached").field(favorites).finish()
            }
        }
    }
}

impl FavoritesView {
    /// The list to render.
    pub fn current(&self) -> Vec<Favorite> {
        match self {
            FavoritesView::Live(list) => list.current(),
            FavoritesView::Cached(favorites) => favorites.clone(),
        }
    }

    pub fn is_live(&self) -> bool {
        matches!(self, FavoritesView::Live(_))
    }
}

/// Favorites reconciliation: remote subcollection, local cache, and the
/// toggle dual-write.
#[derive(Clone)]
pub struct FavoritesService {
    db: FirestoreDb,
    cache: FavoritesCache,
    store: SessionStore,
    subscriptions: SubscriptionRegistry,
}

impl FavoritesService {
    pub fn new(
        db: FirestoreDb,
        cache: FavoritesCache,
        store: SessionStore,
        subscriptions: SubscriptionRegistry,
    ) -> Self {
        Self {
            db,
            cache,
            store,
            subscriptions,
        }
    }

    /// Subscribe to the signed-in user's favorites.
    ///
    /// On subscription failure the cached list is served instead; the
    /// failure is logged and absorbed, never surfaced.
    pub async fn subscribe(&self, screen: &str) -> Result<FavoritesView> {
        let user = self.store.current_user().ok_or(AppError::Unauthorized)?;
        let _busy = self.store.begin_busy();

        let key = SubscriptionKey::new(screen, collections::FAVORITES);
        self.subscriptions.dispose(&key).await;

        match self.open_live(&user.uid, key).await {
            Ok(view) => Ok(FavoritesView::Live(view)),
            Err(err) => {
                tracing::error!(error = %err, uid = %user.uid, "Favorites subscription failed, serving cache");
                Ok(FavoritesView::Cached(self.cache.read_or_empty()))
            }
        }
    }

    async fn open_live(&self, uid: &str, key: SubscriptionKey) -> Result<LiveList<Favorite>> {
        let listener = self
            .db
            .favorites_listener(uid, targets::FAVORITES)
            .await?;

        let cache = self.cache.clone();
        let (rx, listener) = start_snapshot_feed::<Favorite, Favorite, _, _>(
            listener,
            Some,
            move |snapshot| {
                if let Err(err) = cache.write(snapshot) {
                    tracing::warn!(error = %err, "Failed to write favorites cache");
                }
            },
        )
        .await?;

        self.subscriptions.register(key.clone(), listener).await;
        Ok(LiveList::new(rx, key, self.subscriptions.clone()))
    }

    /// Toggle a recipe's favorite membership.
    ///
    /// The cache is updated first; the remote write follows and may still
    /// fail after the cache has changed. There is no compensating
    /// rollback, so a remote failure leaves the two stores divergent
    /// until the next successful snapshot.
    pub async fn toggle(&self, detail: &RecipeDetail) -> Result<FavoriteToggle> {
        let user = self.store.current_user().ok_or(AppError::Unauthorized)?;
        let _busy = self.store.begin_busy();

        let favorite = Favorite::from_detail(detail);
        let mut favorites = self.cache.read()?;

        let outcome = match favorites.iter().position(|f| f.id == favorite.id) {
            Some(index) => {
                favorites.remove(index);
                self.cache.write(&favorites)?;
                self.db.delete_favorite(&user.uid, &favorite.id).await?;
                FavoriteToggle::Removed
            }
            None => {
                favorites.push(favorite.clone());
                self.cache.write(&favorites)?;
                self.db.set_favorite(&user.uid, &favorite).await?;
                FavoriteToggle::Added
            }
        };

        tracing::info!(id = %favorite.id, ?outcome, "Favorite toggled");
        Ok(outcome)
    }

    /// Whether a recipe is currently favorited, per the cache.
    pub fn is_favorite(&self, id: &RecipeId) -> bool {
        let key = id.as_key();
        self.cache
            .read_or_empty()
            .iter()
            .any(|favorite| favorite.id == key)
    }
}
