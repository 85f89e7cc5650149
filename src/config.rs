//! Application configuration loaded from environment variables.
//!
//! Keys are read once at startup and cached in memory; `.env` files are
//! honored for local development.

use std::env;
use std::path::PathBuf;

/// Application configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Recipe search API key (Spoonacular)
    pub spoonacular_api_key: String,
    /// Recipe search API base URL (overridable for tests)
    pub spoonacular_base_url: String,
    /// Firebase web API key (public, used by the Auth REST API)
    pub firebase_api_key: String,
    /// Firebase Auth REST base URL (overridable for tests)
    pub firebase_auth_url: String,
    /// GCP project ID hosting the Firestore database
    pub gcp_project_id: String,
    /// Directory holding the on-device favorites cache file
    pub cache_dir: PathBuf,
}

impl Default for Config {
    /// Default config for testing only.
    fn default() -> Self {
        Self {
            spoonacular_api_key: "test_api_key".to_string(),
            spoonacular_base_url: "https://api.spoonacular.com".to_string(),
            firebase_api_key: "test_firebase_key".to_string(),
            firebase_auth_url: "https://identitytoolkit.googleapis.com/v1".to_string(),
            gcp_project_id: "test-project".to_string(),
            cache_dir: std::env::temp_dir(),
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        Ok(Self {
            spoonacular_api_key: env::var("SPOONACULAR_API_KEY")
                .map(|v| v.trim().to_string())
                .map_err(|_| ConfigError::Missing("SPOONACULAR_API_KEY"))?,
            spoonacular_base_url: env::var("SPOONACULAR_BASE_URL")
                .unwrap_or_else(|_| "https://api.spoonacular.com".to_string()),
            firebase_api_key: env::var("FIREBASE_API_KEY")
                .map(|v| v.trim().to_string())
                .map_err(|_| ConfigError::Missing("FIREBASE_API_KEY"))?,
            firebase_auth_url: env::var("FIREBASE_AUTH_URL")
                .unwrap_or_else(|_| "https://identitytoolkit.googleapis.com/v1".to_string()),
            gcp_project_id: env::var("GCP_PROJECT_ID").unwrap_or_else(|_| "local-dev".to_string()),
            cache_dir: env::var("RECIPE_CACHE_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from(".")),
        })
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_from_env() {
        env::set_var("SPOONACULAR_API_KEY", "test_id");
        env::set_var("FIREBASE_API_KEY", "test_fb");

        let config = Config::from_env().expect("Config should load");

        assert_eq!(config.spoonacular_api_key, "test_id");
        assert_eq!(config.firebase_api_key, "test_fb");
        assert_eq!(config.spoonacular_base_url, "https://api.spoonacular.com");
    }
}
