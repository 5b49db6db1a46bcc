// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use mortality_predictor::config::Config;
use mortality_predictor::db::FirestoreDb;
use mortality_predictor::middleware::auth::{create_jwt, Role};
use mortality_predictor::routes::create_router;
use mortality_predictor::services::ScoringService;
use mortality_predictor::AppState;
use std::sync::Arc;

/// Check if emulator is available via environment variable.
#[allow(dead_code)]
pub fn emulator_available() -> bool {
    std::env::var("FIRESTORE_EMULATOR_HOST").is_ok()
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
    FirestoreDb::new("test-project")
        .await
        .expect("Failed to connect to Firestore emulator")
}

/// Create a mock database connection (offline).
#[allow(dead_code)]
pub fn test_db_offline() -> FirestoreDb {
    FirestoreDb::new_mock()
}

/// Create a test app with offline mock dependencies.
/// Returns the router and the shared state.
#[allow(dead_code)]
pub fn create_test_app() -> (axum::Router, Arc<AppState>) {
    create_test_app_with_config(Config::test_default(), test_db_offline())
}

/// Create a test app whose cookies follow the given frontend URL.
#[allow(dead_code)]
pub fn create_test_app_with_frontend_url(frontend_url: &str) -> (axum::Router, Arc<AppState>) {
    let mut config = Config::test_default();
    config.frontend_url = frontend_url.to_string();
    create_test_app_with_config(config, test_db_offline())
}

/// Create a test app backed by the given database.
#[allow(dead_code)]
pub fn create_test_app_with_config(
    config: Config,
    db: FirestoreDb,
) -> (axum::Router, Arc<AppState>) {
    let state = Arc::new(AppState {
        config,
        db,
        scoring_service: ScoringService::default(),
    });

    (create_router(state.clone()), state)
}

/// Sign a session token with the test key.
#[allow(dead_code)]
pub fn create_test_jwt(subject: &str, role: Role) -> String {
    let config = Config::test_default();
    create_jwt(subject, role, &config.jwt_signing_key).expect("Failed to sign test token")
}
