// SPDX-License-Identifier: MIT

//! Firestore client wrapper with typed operations.
//!
//! Provides high-level operations for:
//! - Recipes (user-authored recipe documents)
//! - Favorites (per-user denormalized subcollection)
//! - Users (profile documents)
//! - Snapshot listeners feeding the sync layer

use crate::db::collections;
use crate::error::AppError;
use crate::models::{Favorite, RecipeUpdate, StoredRecipe, UserDoc};
use futures_util::TryStreamExt;

/// Listener handle type used across the crate. Listen state is held in
/// memory so every fresh subscription replays the full current
/// collection before deltas.
pub type StoreListener =
    firestore::FirestoreListener<firestore::FirestoreDb, firestore::FirestoreMemListenStateStorage>;

/// Firestore database client.
#[derive(Clone)]
pub struct FirestoreDb {
    client: Option<firestore::FirestoreDb>,
}

impl FirestoreDb {
    /// Create a new Firestore client.
    ///
    /// For local development with emulator, set FIRESTORE_EMULATOR_HOST.
    pub async fn new(project_id: &str) -> Result<Self, AppError> {
        // If the emulator environment variable is set, use unauthenticated connection
        // to avoid local credential warnings and leakage.
        if std::env::var("FIRESTORE_EMULATOR_HOST").is_ok() {
            return Self::create_emulator_client(project_id).await;
        }

        let client = firestore::FirestoreDb::new(project_id)
            .await
            .map_err(|e| AppError::Database(format!("Failed to connect to Firestore: {}", e)))?;

        tracing::info!(project = project_id, "Connected to Firestore");

        Ok(Self {
            client: Some(client),
        })
    }

    /// Create a Firestore client for the emulator with unauthenticated access.
    async fn create_emulator_client(project_id: &str) -> Result<Self, AppError> {
        tracing::info!("Using unauthenticated connection for Firestore Emulator");

        let token_source = gcloud_sdk::ExternalJwtFunctionSource::new(|| async {
            Ok(gcloud_sdk::Token {
                token_type: "Bearer".to_string(),
                token: gcloud_sdk::SecretValue::new(
                    "eyJhbGciOiJub25lIn0.eyJ1aWQiOiJ0ZXN0In0."
                        .to_string()
                        .into(),
                ),
                expiry: chrono::Utc::now() + chrono::Duration::hours(1),
            })
        });

        let options = firestore::FirestoreDbOptions::new(project_id.to_string());

        let client = firestore::FirestoreDb::with_options_token_source(
            options,
            gcloud_sdk::GCP_DEFAULT_SCOPES.clone(),
            gcloud_sdk::TokenSourceType::ExternalSource(Box::new(token_source)),
        )
        .await
        .map_err(|e| {
            AppError::Database(format!("Failed to connect to Firestore Emulator: {}", e))
        })?;

        tracing::info!(
            project = project_id,
            "Connected to Firestore (Emulator/Unauthenticated)"
        );

        Ok(Self {
            client: Some(client),
        })
    }

    /// Create a mock Firestore client for testing (offline mode).
    ///
    /// All database operations will return an error if called.
    pub fn new_mock() -> Self {
        Self { client: None }
    }

    /// Helper to get the client or return an error if offline.
    fn get_client(&self) -> Result<&firestore::FirestoreDb, AppError> {
        self.client
            .as_ref()
            .ok_or_else(|| AppError::Database("Database not connected (offline mode)".to_string()))
    }

    // ─── Recipe Operations ───────────────────────────────────────

    /// Get a recipe document by id.
    pub async fn get_recipe(&self, recipe_id: &str) -> Result<Option<StoredRecipe>, AppError> {
        self.get_client()?
            .fluent()
            .select()
            .by_id_in(collections::RECIPES)
            .obj()
            .one(recipe_id)
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Create a recipe document with a store-generated id.
    ///
    /// Returns the stored record with `doc_id` populated.
    pub async fn create_recipe(&self, recipe: &StoredRecipe) -> Result<StoredRecipe, AppError> {
        self.get_client()?
            .fluent()
            .insert()
            .into(collections::RECIPES)
            .generate_document_id()
            .object(recipe)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Update the mutable fields of an existing recipe document.
    ///
    /// The field mask covers exactly the editable fields plus the update
    /// stamp; `created_by` and `created_at` are never written.
    pub async fn update_recipe(
        &self,
        recipe_id: &str,
        update: &RecipeUpdate,
    ) -> Result<(), AppError> {
        let _: () = self
            .get_client()?
            .fluent()
            .update()
            .fields(firestore::paths!(RecipeUpdate::{
                title,
                summary,
                image_url,
                ingredients,
                instructions,
                updated_at
            }))
            .in_col(collections::RECIPES)
            .document_id(recipe_id)
            .object(update)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    /// Delete a recipe document.
    pub async fn delete_recipe(&self, recipe_id: &str) -> Result<(), AppError> {
        self.get_client()?
            .fluent()
            .delete()
            .from(collections::RECIPES)
            .document_id(recipe_id)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    /// One-shot query of a user's recipes, newest first.
    pub async fn recipes_for_user(&self, uid: &str) -> Result<Vec<StoredRecipe>, AppError> {
        let owner = uid.to_string();
        let stream = self
            .get_client()?
            .fluent()
            .select()
            .from(collections::RECIPES)
            .filter(move |q| q.for_all([q.field("created_by.uid").eq(owner.clone())]))
            .order_by([(
                "created_at",
                firestore::FirestoreQueryDirection::Descending,
            )])
            .obj::<StoredRecipe>()
            .stream_query_with_errors()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        stream
            .try_collect()
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    // ─── Favorite Operations ─────────────────────────────────────

    /// Create or overwrite a favorite document at
    /// `users/{uid}/favorites/{favorite.id}`.
    pub async fn set_favorite(&self, uid: &str, favorite: &Favorite) -> Result<(), AppError> {
        let client = self.get_client()?;
        let parent_path = client
            .parent_path(collections::USERS, uid)
            .map_err(|e| AppError::Database(e.to_string()))?;

        let _: () = client
            .fluent()
            .update()
            .in_col(collections::FAVORITES)
            .document_id(&favorite.id)
            .parent(&parent_path)
            .object(favorite)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    /// Delete a favorite document.
    pub async fn delete_favorite(&self, uid: &str, favorite_id: &str) -> Result<(), AppError> {
        let client = self.get_client()?;
        let parent_path = client
            .parent_path(collections::USERS, uid)
            .map_err(|e| AppError::Database(e.to_string()))?;

        client
            .fluent()
            .delete()
            .from(collections::FAVORITES)
            .parent(&parent_path)
            .document_id(favorite_id)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    /// One-shot read of a user's favorites subcollection.
    pub async fn list_favorites(&self, uid: &str) -> Result<Vec<Favorite>, AppError> {
        let client = self.get_client()?;
        let parent_path = client
            .parent_path(collections::USERS, uid)
            .map_err(|e| AppError::Database(e.to_string()))?;

        client
            .fluent()
            .select()
            .from(collections::FAVORITES)
            .parent(&parent_path)
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    // ─── User Profile Operations ─────────────────────────────────

    /// Get a user profile document by uid.
    pub async fn get_user_profile(&self, uid: &str) -> Result<Option<UserDoc>, AppError> {
        self.get_client()?
            .fluent()
            .select()
            .by_id_in(collections::USERS)
            .obj()
            .one(uid)
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Create or update a user profile document.
    pub async fn set_user_profile(&self, profile: &UserDoc) -> Result<(), AppError> {
        let _: () = self
            .get_client()?
            .fluent()
            .update()
            .in_col(collections::USERS)
            .document_id(&profile.uid)
            .object(profile)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    // ─── Snapshot Listeners ──────────────────────────────────────

    /// Create a listener over the `recipes` collection, optionally scoped
    /// to one owner's documents. The caller starts it with its handler
    /// and owns its shutdown.
    pub async fn recipes_listener(
        &self,
        owned_by: Option<&str>,
        target_id: u32,
    ) -> Result<StoreListener, AppError> {
        let client = self.get_client()?;
        let mut listener = client
            .create_listener(firestore::FirestoreMemListenStateStorage::new())
            .await
            .map_err(|e| AppError::Subscription(e.to_string()))?;

        let query = client.fluent().select().from(collections::RECIPES);
        let target = firestore::FirestoreListenerTarget::new(target_id);
        match owned_by {
            Some(uid) => {
                let owner = uid.to_string();
                query
                    .filter(move |q| q.for_all([q.field("created_by.uid").eq(owner.clone())]))
                    .listen()
                    .add_target(target, &mut listener)
            }
            None => query.listen().add_target(target, &mut listener),
        }
        .map_err(|e| AppError::Subscription(e.to_string()))?;

        Ok(listener)
    }

    /// Create a listener over a user's favorites subcollection.
    pub async fn favorites_listener(
        &self,
        uid: &str,
        target_id: u32,
    ) -> Result<StoreListener, AppError> {
        let client = self.get_client()?;
        let parent_path = client
            .parent_path(collections::USERS, uid)
            .map_err(|e| AppError::Subscription(e.to_string()))?;

        let mut listener = client
            .create_listener(firestore::FirestoreMemListenStateStorage::new())
            .await
            .map_err(|e| AppError::Subscription(e.to_string()))?;

        client
            .fluent()
            .select()
            .from(collections::FAVORITES)
            .parent(&parent_path)
            .listen()
            .add_target(
                firestore::FirestoreListenerTarget::new(target_id),
                &mut listener,
            )
            .map_err(|e| AppError::Subscription(e.to_string()))?;

        Ok(listener)
    }
}
