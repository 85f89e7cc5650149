// SPDX-License-Identifier: MIT

//! Recipe reconciliation service.
//!
//! Maintains per-screen derived recipe lists by merging:
//! 1. one-shot search results from the recipe API
//! 2. live `recipes` collection snapshots from the store
//! and performs the owned-recipe mutations (create, edit, delete) plus
//! lazy detail resolution.

use crate::db::{collections, targets, FirestoreDb};
use crate::error::{AppError, Result};
use crate::models::{
    CreatedBy, Recipe, RecipeDetail, RecipeForm, RecipeId, RecipeSource, RecipeUpdate, StoredRecipe,
};
use crate::store::SessionStore;
use crate::sync::{start_snapshot_feed, LiveList, SubscriptionKey, SubscriptionRegistry};
use crate::time_utils;
use tokio::sync::watch;
use validator::Validate;

use super::SpoonacularClient;

/// Seed query issued when the discovery feed opens.
const INITIAL_FEED_QUERY: &str = "popular";

/// Recipe search, feeds, and owned-recipe mutations.
#[derive(Clone)]
pub struct RecipeService {
    api: SpoonacularClient,
    db: FirestoreDb,
    store: SessionStore,
    subscriptions: SubscriptionRegistry,
}

impl RecipeService {
    pub fn new(
        api: SpoonacularClient,
        db: FirestoreDb,
        store: SessionStore,
        subscriptions: SubscriptionRegistry,
    ) -> Self {
        Self {
            api,
            db,
            store,
            subscriptions,
        }
    }

    /// One-shot recipe search. A blank query is a no-op.
    pub async fn search(&self, query: &str) -> Result<Vec<Recipe>> {
        if query.trim().is_empty() {
            return Ok(Vec::new());
        }
        let _busy = self.store.begin_busy();
        self.api.search(query).await
    }

    /// Open the discovery feed for a screen: a live subscription over the
    /// whole `recipes` collection, seeded with a one-shot search so the
    /// screen has content before any user query.
    ///
    /// Subscription failure is absorbed: the feed opens with an empty,
    /// static live list and only the log records the problem.
    pub async fn discovery_feed(&self, screen: &str) -> DiscoveryFeed {
        let live = match self.subscribe_recipes(screen, None).await {
            Ok(live) => live,
            Err(err) => {
                tracing::error!(error = %err, "Recipe feed subscription failed, feed stays empty");
                let (_tx, rx) = watch::channel(Vec::new());
                LiveList::new(
                    rx,
                    SubscriptionKey::new(screen, collections::RECIPES),
                    self.subscriptions.clone(),
                )
            }
        };

        let mut feed = DiscoveryFeed {
            live,
            search_results: Vec::new(),
            error: None,
        };
        feed.run_search(self, INITIAL_FEED_QUERY).await;
        feed
    }

    /// Live list of the signed-in user's own recipes, newest first.
    pub async fn subscribe_owned(&self, screen: &str) -> Result<LiveList<Recipe>> {
        let user = self.store.current_user().ok_or(AppError::Unauthorized)?;
        self.subscribe_recipes(screen, Some(user.uid)).await
    }

    async fn subscribe_recipes(
        &self,
        screen: &str,
        owned_by: Option<String>,
    ) -> Result<LiveList<Recipe>> {
        let key = SubscriptionKey::new(screen, collections::RECIPES);
        // A remounting screen replaces its previous listener.
        self.subscriptions.dispose(&key).await;

        let target_id = if owned_by.is_some() {
            targets::OWNED_RECIPES
        } else {
            targets::RECIPES_FEED
        };
        let listener = self.db.recipes_listener(owned_by.as_deref(), target_id).await?;

        let (rx, listener) = start_snapshot_feed::<StoredRecipe, Recipe, _, _>(
            listener,
            Recipe::from_stored,
            |snapshot| snapshot.sort_by(|a, b| b.created_at.cmp(&a.created_at)),
        )
        .await?;

        self.subscriptions.register(key.clone(), listener).await;
        Ok(LiveList::new(rx, key, self.subscriptions.clone()))
    }

    /// Create a recipe, or update an existing one when `edit_id` is set.
    ///
    /// Creation stamps the signed-in author and a creation time; editing
    /// writes only the five mutable fields plus an update stamp.
    pub async fn upsert_owned(&self, form: &RecipeForm, edit_id: Option<&str>) -> Result<()> {
        let user = self.store.current_user().ok_or(AppError::Unauthorized)?;
        form.validate()
            .map_err(|e| AppError::InvalidRecipe(e.to_string()))?;

        let _busy = self.store.begin_busy();
        let now = time_utils::now_rfc3339();

        match edit_id {
            Some(recipe_id) => {
                let update = RecipeUpdate {
                    title: form.title.clone(),
                    summary: form.summary.clone(),
                    image_url: form.image_url.clone(),
                    ingredients: form.ingredients.clone(),
                    instructions: form.instructions.clone(),
                    updated_at: now,
                };
                self.db.update_recipe(recipe_id, &update).await?;
                tracing::info!(recipe_id, "Recipe updated");
            }
            None => {
                let stored = StoredRecipe {
                    doc_id: None,
                    title: form.title.clone(),
                    summary: form.summary.clone(),
                    image_url: form.image_url.clone(),
                    ingredients: form.ingredients.clone(),
                    instructions: form.instructions.clone(),
                    ready_in_minutes: None,
                    source: RecipeSource::Firebase,
                    created_by: CreatedBy {
                        uid: user.uid.clone(),
                        display_name: user
                            .display_name
                            .unwrap_or_else(|| "Anonymous".to_string()),
                    },
                    created_at: now,
                    updated_at: None,
                };
                let created = self.db.create_recipe(&stored).await?;
                tracing::info!(recipe_id = ?created.doc_id, "Recipe created");
            }
        }

        Ok(())
    }

    /// Delete an owned recipe document.
    pub async fn delete_owned(&self, recipe_id: &str) -> Result<()> {
        if self.store.current_user().is_none() {
            return Err(AppError::Unauthorized);
        }
        let _busy = self.store.begin_busy();
        self.db.delete_recipe(recipe_id).await?;
        tracing::info!(recipe_id, "Recipe deleted");
        Ok(())
    }

    /// Resolve full detail for a recipe summary.
    ///
    /// Store-sourced records already carry their detail fields, so no
    /// fetch happens; external ids go through the information endpoint,
    /// with an absent ingredient list defaulting to empty.
    pub async fn resolve_detail(&self, recipe: &Recipe) -> Result<RecipeDetail> {
        match &recipe.id {
            RecipeId::Owned(_) => Ok(RecipeDetail::from_recipe(recipe)),
            RecipeId::External(id) => {
                let _busy = self.store.begin_busy();
                self.api.recipe_information(*id).await
            }
        }
    }
}

/// Derived view state for the discovery screen: one-shot search results
/// overlaid on the live recipe feed.
pub struct DiscoveryFeed {
    live: LiveList<Recipe>,
    search_results: Vec<Recipe>,
    error: Option<String>,
}

impl DiscoveryFeed {
    /// The list the screen renders. Non-empty search results display in
    /// place of the live feed; an empty result set falls back to the
    /// feed, indistinguishable from no search at all.
    pub fn visible(&self) -> Vec<Recipe> {
        if !self.search_results.is_empty() {
            self.search_results.clone()
        } else {
            self.live.current()
        }
    }

    /// Inline error message for the screen, if the last search failed.
    pub fn last_error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Run a search and keep its results for display. Failures become the
    /// screen's inline message and leave previous results in place; a
    /// blank query is a no-op.
    pub async fn run_search(&mut self, recipes: &RecipeService, query: &str) {
        if query.trim().is_empty() {
            return;
        }
        match recipes.search(query).await {
            Ok(results) => {
                self.error = None;
                self.search_results = results;
            }
            Err(err) => {
                tracing::error!(error = %err, query, "Recipe search failed");
                self.error = err.user_message();
            }
        }
    }

    /// Drop the search overlay, returning the screen to the live feed.
    pub fn clear_search(&mut self) {
        self.search_results.clear();
    }

    /// Wait for the next live feed emission.
    pub async fn feed_changed(&mut self) -> bool {
        self.live.changed().await
    }

    /// Dispose the underlying subscription.
    pub async fn close(self) {
        self.live.unsubscribe().await;
    }
}
