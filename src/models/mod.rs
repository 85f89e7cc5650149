// SPDX-License-Identifier: MIT

//! Data models for the application.

pub mod favorite;
pub mod recipe;
pub mod user;

pub use favorite::Favorite;
pub use recipe::{
    CreatedBy, Recipe, RecipeDetail, RecipeForm, RecipeId, RecipeSource, RecipeUpdate, StoredRecipe,
};
pub use user::{SessionUser, UserDoc};
