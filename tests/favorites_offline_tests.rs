// SPDX-License-Identifier: MIT

//! Favorites behavior with the remote store unreachable: optimistic cache
//! writes, fallback serving, and the toggle round-trip law.

use recipe_box::cache::FavoritesCache;
use recipe_box::error::AppError;
use recipe_box::models::{Favorite, RecipeDetail, RecipeId, RecipeSource};

mod common;

fn soup_detail() -> RecipeDetail {
    RecipeDetail {
        id: RecipeId::External(42),
        title: "Soup".to_string(),
        image: "https://example.com/soup.jpg".to_string(),
        ready_in_minutes: Some(25),
        summary: "Warm soup".to_string(),
        instructions: "Simmer.".to_string(),
        ingredients: vec!["water".to_string(), "salt".to_string()],
        source: RecipeSource::Api,
    }
}

#[tokio::test]
async fn test_toggle_writes_cache_before_failing_remote_write() {
    let dir = tempfile::tempdir().unwrap();
    let state = common::create_test_app(dir.path());
    common::sign_in_test_user(&state, "u1");

    // The remote write fails (offline mock) but the cache mutation has
    // already happened: the stores are left divergent by design.
    let err = state.favorites.toggle(&soup_detail()).await.unwrap_err();
    assert!(matches!(err, AppError::Database(_)));
    assert!(state.favorites.is_favorite(&RecipeId::External(42)));
}

#[tokio::test]
async fn test_toggle_twice_restores_original_membership() {
    let dir = tempfile::tempdir().unwrap();
    let state = common::create_test_app(dir.path());
    common::sign_in_test_user(&state, "u1");

    let detail = soup_detail();
    assert!(!state.favorites.is_favorite(&detail.id));

    let _ = state.favorites.toggle(&detail).await;
    assert!(state.favorites.is_favorite(&detail.id));

    let _ = state.favorites.toggle(&detail).await;
    assert!(!state.favorites.is_favorite(&detail.id));
}

#[tokio::test]
async fn test_cached_favorite_id_matches_storage_key() {
    let dir = tempfile::tempdir().unwrap();
    let state = common::create_test_app(dir.path());
    common::sign_in_test_user(&state, "u1");

    let detail = soup_detail();
    let _ = state.favorites.toggle(&detail).await;

    let cache = FavoritesCache::new(dir.path());
    let cached = cache.read().unwrap();
    assert_eq!(cached.len(), 1);
    assert_eq!(cached[0].id, "42");
    assert_eq!(cached[0].id, detail.id.as_key());
}

#[tokio::test]
async fn test_subscribe_falls_back_to_cache_without_error() {
    let dir = tempfile::tempdir().unwrap();

    // Seed the cache as a previous session would have left it.
    let cache = FavoritesCache::new(dir.path());
    let seeded = vec![Favorite {
        id: "1".to_string(),
        title: "Cached Soup".to_string(),
        image: "https://example.com/c.jpg".to_string(),
        ready_in_minutes: Some(10),
        summary: String::new(),
        ingredients: String::new(),
        source: RecipeSource::Api,
    }];
    cache.write(&seeded).unwrap();

    let state = common::create_test_app(dir.path());
    common::sign_in_test_user(&state, "u1");

    // The listener cannot be established offline; the cached list is
    // served as a static view and no error reaches the caller.
    let view = state.favorites.subscribe("favorites").await.unwrap();
    assert!(!view.is_live());
    assert_eq!(view.current(), seeded);
}

#[tokio::test]
async fn test_mutations_require_a_session_user() {
    let dir = tempfile::tempdir().unwrap();
    let state = common::create_test_app(dir.path());

    assert!(matches!(
        state.favorites.toggle(&soup_detail()).await.unwrap_err(),
        AppError::Unauthorized
    ));
    assert!(matches!(
        state.favorites.subscribe("favorites").await.unwrap_err(),
        AppError::Unauthorized
    ));
}
