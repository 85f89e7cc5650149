//! User models: in-memory session record and stored profile document.

use serde::{Deserialize, Serialize};

/// Signed-in user held in the session store.
///
/// Held only in process memory; cleared on sign-out, reset on cold start.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionUser {
    pub uid: String,
    pub email: Option<String>,
    pub display_name: Option<String>,
    pub full_name: Option<String>,
    #[serde(default)]
    pub avatar: Option<String>,
}

/// User profile document stored at `users/{uid}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserDoc {
    pub uid: String,
    pub email: Option<String>,
    pub display_name: Option<String>,
    pub full_name: String,
}
