// SPDX-License-Identifier: MIT

use recipe_box::config::Config;
use recipe_box::db::FirestoreDb;
use recipe_box::models::SessionUser;
use recipe_box::store::UserAction;
use recipe_box::AppState;
use std::path::Path;

/// Check if emulator is available via environment variable.
#[allow(dead_code)]
pub fn emulator_available() -> bool {
    std::env::var("FIRESTORE_EMULATOR_HOST").is_ok()
}

/// Install a test subscriber so RUST_LOG controls test output.
#[allow(dead_code)]
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();
}

/// Skip test with message if emulator not available.
#[macro_export]
macro_rules! require_emulator {
    () => {
        if !crate::common::emulator_available() {
            eprintln!("⚠️  Skipping: FIRESTORE_EMULATOR_HOST not set");
            return;
        }
    };
}

/// Create a test database connection.
#[allow(dead_code)]
pub async fn test_db() -> FirestoreDb {
    init_tracing();
    FirestoreDb::new("test-project")
        .await
        .expect("Failed to connect to Firestore emulator")
}

/// Create a mock database connection (offline).
#[allow(dead_code)]
pub fn test_db_offline() -> FirestoreDb {
    FirestoreDb::new_mock()
}

/// Create app state wired against the offline mock, caching into the
/// given directory.
#[allow(dead_code)]
pub fn create_test_app(cache_dir: &Path) -> AppState {
    let config = Config {
        cache_dir: cache_dir.to_path_buf(),
        ..Config::default()
    };
    AppState::with_db(config, test_db_offline())
}

/// Create app state against the emulator, caching into the given
/// directory.
#[allow(dead_code)]
pub async fn create_emulator_app(cache_dir: &Path) -> AppState {
    let config = Config {
        cache_dir: cache_dir.to_path_buf(),
        ..Config::default()
    };
    AppState::with_db(config, test_db().await)
}

/// Put a signed-in user into the session store.
#[allow(dead_code)]
pub fn sign_in_test_user(state: &AppState, uid: &str) {
    state.store.dispatch(UserAction::SetUser(SessionUser {
        uid: uid.to_string(),
        email: Some("test@example.com".to_string()),
        display_name: Some("Test Cook".to_string()),
        full_name: Some("Test Cook".to_string()),
        avatar: None,
    }));
}

/// Generate a unique user id for test isolation.
#[allow(dead_code)]
pub fn unique_uid() -> String {
    use std::time::{SystemTime, UNIX_EPOCH};
    format!(
        "user-{}",
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_nanos()
    )
}
