// SPDX-License-Identifier: MIT

use recipe_box::error::AppError;

#[test]
fn test_network_errors_surface_inline_messages() {
    let err = AppError::RecipeApi("HTTP 500: boom".to_string());
    assert_eq!(err.user_message().as_deref(), Some("Unable to load recipes."));
}

#[test]
fn test_persistence_errors_surface_alerts() {
    let err = AppError::Database("write failed".to_string());
    assert_eq!(
        err.user_message().as_deref(),
        Some("Something went wrong while saving")
    );
}

#[test]
fn test_subscription_errors_are_absorbed() {
    let err = AppError::Subscription("listener dropped".to_string());
    assert_eq!(err.user_message(), None);

    let err = AppError::Cache("bad json".to_string());
    assert_eq!(err.user_message(), None);
}

#[test]
fn test_auth_error_classification() {
    assert!(AppError::Unauthorized.is_auth_error());
    assert!(AppError::InvalidCredentials.is_auth_error());
    assert!(!AppError::Database("x".to_string()).is_auth_error());
    assert!(!AppError::RecipeApi("x".to_string()).is_auth_error());
}

#[test]
fn test_validation_errors_carry_their_own_message() {
    let err = AppError::InvalidRecipe("Title is required".to_string());
    assert_eq!(err.user_message().as_deref(), Some("Title is required"));
}
