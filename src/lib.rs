// SPDX-License-Identifier: MIT

//! Recipe-Box: the data layer of a mobile recipe application.
//!
//! Search and browse recipes from an external API, author and edit your
//! own in Firestore with live snapshot subscriptions, keep favorites in
//! sync between a per-user subcollection and an on-device cache, and
//! track session and busy state in one injected store.

pub mod cache;
pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod services;
pub mod store;
pub mod sync;
pub mod text;
pub mod time_utils;

use cache::FavoritesCache;
use config::Config;
use db::FirestoreDb;
use error::Result;
use services::{AuthClient, AuthService, FavoritesService, RecipeService, SpoonacularClient};
use store::SessionStore;
use sync::SubscriptionRegistry;

/// Shared application state, wired at the composition root.
pub struct AppState {
    pub config: Config,
    pub db: FirestoreDb,
    pub store: SessionStore,
    pub auth: AuthService,
    pub recipes: RecipeService,
    pub favorites: FavoritesService,
}

impl AppState {
    /// Connect to the remote store and wire every service around one
    /// injected session store.
    pub async fn new(config: Config) -> Result<Self> {
        let db = FirestoreDb::new(&config.gcp_project_id).await?;
        Ok(Self::with_db(config, db))
    }

    /// Build state around an existing database handle (tests pass the
    /// offline mock here).
    pub fn with_db(config: Config, db: FirestoreDb) -> Self {
        let store = SessionStore::new();
        let subscriptions = SubscriptionRegistry::new();
        let cache = FavoritesCache::new(&config.cache_dir);

        let api = SpoonacularClient::new(
            config.spoonacular_base_url.as_str(),
            config.spoonacular_api_key.as_str(),
        );
        let auth_client = AuthClient::new(
            config.firebase_auth_url.as_str(),
            config.firebase_api_key.as_str(),
        );

        let auth = AuthService::new(auth_client, db.clone(), store.clone());
        let recipes = RecipeService::new(
            api,
            db.clone(),
            store.clone(),
            subscriptions.clone(),
        );
        let favorites = FavoritesService::new(db.clone(), cache, store.clone(), subscriptions);

        Self {
            config,
            db,
            store,
            auth,
            recipes,
            favorites,
        }
    }
}
