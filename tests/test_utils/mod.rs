//! Test utilities for integration tests
use std::env;
use std::fs;
use std::time::SystemTime;

use finpilot::auth::{Session, SessionStore};
use finpilot::core::AppConfig;
use finpilot::core::db::{async_db, initialize_db};

/// Org id seeded by `logged_in_session`.
pub const TEST_ORG_ID: &str = "b52b3b8c-30d1-4e64-a9d6-2a8f17f3d002";

/// Creates a config rooted in a fresh temporary directory, pointed at
/// the given mock server.
pub fn test_config(backend_url: &str) -> AppConfig {
    // Create a unique directory for the test with a randomly
    // generated name using a timestamp to avoid collisions
    let temp_dir = env::temp_dir();
    let ts = SystemTime::now()
        .duration_since(SystemTime::UNIX_EPOCH)
        .unwrap()
        .as_nanos()
        .to_string();
    let dir = temp_dir.join(ts);
    fs::create_dir_all(&dir).expect("Failed to create base directory");

    AppConfig {
        backend_url: backend_url.to_string(),
        chat_service_url: backend_url.to_string(),
        ml_service_url: backend_url.to_string(),
        storage_path: dir.display().to_string(),
        db_path: dir.join("finpilot.sqlite3").display().to_string(),
    }
}

/// Opens a session backed by a fresh session database.
pub async fn test_session(config: &AppConfig) -> Session {
    let db = async_db(&config.db_path)
        .await
        .expect("Failed to connect to async db");
    db.call(|conn| {
        initialize_db(conn).expect("Failed to migrate db");
        Ok(())
    })
    .await
    .unwrap();
    Session::new(config, SessionStore::new(db))
}

/// A session with tokens and an active org already stored, as if the
/// user had logged in earlier.
pub async fn logged_in_session(config: &AppConfig, access: &str, refresh: &str) -> Session {
    let session = test_session(config).await;
    session
        .store()
        .save_tokens(access, refresh)
        .await
        .expect("Failed to seed tokens");
    session
        .store()
        .save_org_id(TEST_ORG_ID)
        .await
        .expect("Failed to seed org id");
    session
}
