// SPDX-License-Identifier: MIT

//! Favorite model: a denormalized, user-scoped snapshot of a recipe.

use serde::{Deserialize, Serialize};

use crate::models::{RecipeDetail, RecipeSource};

/// Favorite record, stored both in the per-user Firestore subcollection
/// and in the on-device cache.
///
/// A favorite is a snapshot, not a reference: edits to the original
/// recipe do not propagate into it. The `id` field always equals the
/// storage key the record is persisted under.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Favorite {
    /// Recipe id, string-serialized (the storage key).
    pub id: String,
    pub title: String,
    pub image: String,
    #[serde(default)]
    pub ready_in_minutes: Option<u32>,
    #[serde(default)]
    pub summary: String,
    /// Ingredient lines flattened to a single string.
    #[serde(default)]
    pub ingredients: String,
    #[serde(default)]
    pub source: RecipeSource,
}

impl Favorite {
    /// Snapshot a resolved recipe detail into a favorite record.
    pub fn from_detail(detail: &RecipeDetail) -> Self {
        Self {
            id: detail.id.as_key(),
            title: detail.title.clone(),
            image: detail.image.clone(),
            ready_in_minutes: detail.ready_in_minutes,
            summary: detail.summary.clone(),
            ingredients: detail.ingredients.join(", "),
            source: detail.source,
        }
    }
}
