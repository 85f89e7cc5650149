// SPDX-License-Identifier: MIT

//! Services module - business logic layer.

pub mod auth;
pub mod favorites;
pub mod recipes;
pub mod spoonacular;

pub use auth::{AuthClient, AuthService, AuthTokens};
pub use favorites::{FavoriteToggle, FavoritesService, FavoritesView};
pub use recipes::{DiscoveryFeed, RecipeService};
pub use spoonacular::SpoonacularClient;
