// SPDX-License-Identifier: MIT

//! Firebase Auth client and sign-in/sign-up flows.
//!
//! Handles:
//! - Email/password sign-in and sign-up via the Identity Toolkit REST API
//! - Profile document load/store in the `users` collection
//! - Session store updates (set user, clear user, avatar change)

use crate::db::FirestoreDb;
use crate::error::AppError;
use crate::models::{SessionUser, UserDoc};
use crate::store::{SessionStore, UserAction};
use serde::Deserialize;

/// Firebase Auth REST client.
#[derive(Clone)]
pub struct AuthClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl AuthClient {
    /// Create a new client against a base URL (overridable for tests).
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into(),
            api_key: api_key.into(),
        }
    }

    /// Sign in with email and password.
    pub async fn sign_in(&self, email: &str, password: &str) -> Result<AuthTokens, AppError> {
        self.post_json(
            "signInWithPassword",
            serde_json::json!({
                "email": email,
                "password": password,
                "returnSecureToken": true,
            }),
        )
        .await
    }

    /// Create a new account with email and password.
    pub async fn sign_up(&self, email: &str, password: &str) -> Result<AuthTokens, AppError> {
        self.post_json(
            "signUp",
            serde_json::json!({
                "email": email,
                "password": password,
                "returnSecureToken": true,
            }),
        )
        .await
    }

    /// Set the display name on the authenticated account.
    pub async fn update_display_name(
        &self,
        id_token: &str,
        display_name: &str,
    ) -> Result<(), AppError> {
        let _: serde_json::Value = self
            .post_json(
                "update",
                serde_json::json!({
                    "idToken": id_token,
                    "displayName": display_name,
                    "returnSecureToken": false,
                }),
            )
            .await?;
        Ok(())
    }

    /// POST to an `accounts:{endpoint}` method and parse the response.
    async fn post_json<T: for<'de> Deserialize<'de>>(
        &self,
        endpoint: &str,
        body: serde_json::Value,
    ) -> Result<T, AppError> {
        let url = format!("{}/accounts:{}?key={}", self.base_url, endpoint, self.api_key);
        let response = self
            .http
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| AppError::Internal(anyhow::anyhow!("Auth request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();

            // 400 carries credential problems (EMAIL_NOT_FOUND,
            // INVALID_PASSWORD, EMAIL_EXISTS, ...)
            if status.as_u16() == 400 {
                tracing::warn!(body = %body, "Auth request rejected");
                return Err(AppError::InvalidCredentials);
            }

            return Err(AppError::Internal(anyhow::anyhow!(
                "Auth request failed with status {}: {}",
                status,
                body
            )));
        }

        response
            .json()
            .await
            .map_err(|e| AppError::Internal(anyhow::anyhow!("Auth response parse error: {}", e)))
    }
}

/// Token response from the Identity Toolkit API.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthTokens {
    /// Firebase uid
    pub local_id: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub display_name: Option<String>,
    pub id_token: String,
    #[serde(default)]
    pub refresh_token: String,
    #[serde(default)]
    pub expires_in: String,
}

// ─────────────────────────────────────────────────────────────────────────────
// AuthService - High-level flows updating the session store
// ─────────────────────────────────────────────────────────────────────────────

/// High-level auth service: REST calls, profile documents, and session
/// store updates in one place.
#[derive(Clone)]
pub struct AuthService {
    client: AuthClient,
    db: FirestoreDb,
    store: SessionStore,
}

impl AuthService {
    pub fn new(client: AuthClient, db: FirestoreDb, store: SessionStore) -> Self {
        Self { client, db, store }
    }

    /// Sign in and populate the session user from the profile document.
    ///
    /// A missing or unreadable profile document degrades to the fields
    /// the auth response carries; sign-in still succeeds.
    pub async fn sign_in(&self, email: &str, password: &str) -> Result<SessionUser, AppError> {
        let _busy = self.store.begin_busy();

        let tokens = self.client.sign_in(email, password).await?;

        let profile = match self.db.get_user_profile(&tokens.local_id).await {
            Ok(profile) => profile,
            Err(err) => {
                tracing::warn!(error = %err, "Failed to load user profile, continuing with auth fields");
                None
            }
        };

        let user = SessionUser {
            uid: tokens.local_id.clone(),
            email: Some(tokens.email.clone()),
            display_name: profile
                .as_ref()
                .and_then(|p| p.display_name.clone())
                .or_else(|| tokens.display_name.clone()),
            full_name: profile.map(|p| p.full_name),
            avatar: None,
        };

        self.store.dispatch(UserAction::SetUser(user.clone()));
        tracing::info!(uid = %user.uid, "User signed in");
        Ok(user)
    }

    /// Create an account, store the profile document, and sign the new
    /// user into the session.
    pub async fn sign_up(
        &self,
        full_name: &str,
        display_name: &str,
        email: &str,
        password: &str,
    ) -> Result<SessionUser, AppError> {
        let _busy = self.store.begin_busy();

        let tokens = self.client.sign_up(email, password).await?;
        self.client
            .update_display_name(&tokens.id_token, display_name)
            .await?;

        let profile = UserDoc {
            uid: tokens.local_id.clone(),
            email: Some(email.to_string()),
            display_name: Some(display_name.to_string()),
            full_name: full_name.to_string(),
        };

        if let Err(err) = self.db.set_user_profile(&profile).await {
            tracing::warn!(error = %err, "Failed to store user profile, continuing anyway");
        }

        let user = SessionUser {
            uid: tokens.local_id,
            email: Some(email.to_string()),
            display_name: Some(display_name.to_string()),
            full_name: Some(full_name.to_string()),
            avatar: None,
        };

        self.store.dispatch(UserAction::SetUser(user.clone()));
        tracing::info!(uid = %user.uid, "User signed up");
        Ok(user)
    }

    /// Clear the session.
    pub fn sign_out(&self) {
        self.store.dispatch(UserAction::ClearUser);
        tracing::info!("User signed out");
    }

    /// Replace the session user's avatar.
    ///
    /// The user slice has no partial merge, so the whole record is spread
    /// here and dispatched as a replacement.
    pub fn choose_avatar(&self, avatar_url: &str) -> Result<SessionUser, AppError> {
        let mut user = self.store.current_user().ok_or(AppError::Unauthorized)?;
        user.avatar = Some(avatar_url.to_string());
        self.store.dispatch(UserAction::SetUser(user.clone()));
        Ok(user)
    }
}
