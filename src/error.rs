// SPDX-License-Identifier: MIT

//! Application error types with consistent user-facing messages.

/// Application error type covering every remote boundary of the crate.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Authentication required")]
    Unauthorized,

    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Invalid recipe: {0}")]
    InvalidRecipe(String),

    #[error("Recipe API error: {0}")]
    RecipeApi(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Subscription error: {0}")]
    Subscription(String),

    #[error("Cache error: {0}")]
    Cache(String),

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    /// Message shown to the user for this error, or `None` when the error
    /// is absorbed (logged only) rather than surfaced.
    ///
    /// Search and detail fetch failures become inline screen messages,
    /// store write failures become transient alerts, and subscription
    /// failures are swallowed after logging.
    pub fn user_message(&self) -> Option<String> {
        match self {
            AppError::Unauthorized => Some("Please sign in first".to_string()),
            AppError::InvalidCredentials => Some("Invalid email or password".to_string()),
            AppError::NotFound(_) => Some("Recipe not found".to_string()),
            AppError::InvalidRecipe(msg) => Some(msg.clone()),
            AppError::RecipeApi(_) => Some("Unable to load recipes.".to_string()),
            AppError::Database(msg) => {
                tracing::error!(error = %msg, "Database error");
                Some("Something went wrong while saving".to_string())
            }
            AppError::Subscription(msg) => {
                tracing::error!(error = %msg, "Subscription error");
                None
            }
            AppError::Cache(msg) => {
                tracing::error!(error = %msg, "Cache error");
                None
            }
            AppError::Internal(err) => {
                tracing::error!(error = %err, "Internal error");
                Some("Something went wrong".to_string())
            }
        }
    }

    /// True for errors raised because no user is signed in.
    pub fn is_auth_error(&self) -> bool {
        matches!(self, AppError::Unauthorized | AppError::InvalidCredentials)
    }
}

/// Result type alias used throughout the crate.
pub type Result<T> = std::result::Result<T, AppError>;
