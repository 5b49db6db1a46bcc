// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Firestore client wrapper with typed operations.
//!
//! Provides high-level operations for:
//! - Users (registration and credential lookup)
//! - Predictions (scored submissions, newest first)

use crate::db::collections;
use crate::error::AppError;
use crate::models::{PredictionRecord, User};

/// Firestore database client.
#[derive(Clone)]
pub struct FirestoreDb {
    client: Option<firestore::FirestoreDb>,
}

impl FirestoreDb {
    /// Create a new Firestore client.
    ///
    /// For local development with emulator, set FIRESTORE_EMULATOR_HOST.
    pub async fn new(project_id: &str) -> Result<Self, AppError> {
        // If the emulator environment variable is set, use unauthenticated connection
        // to avoid local credential warnings and leakage.
        if std::env::var("FIRESTORE_EMULATOR_HOST").is_ok() {
            return Self::create_emulator_client(project_id).await;
        }

        let client = firestore::FirestoreDb::new(project_id)
            .await
            .map_err(|e| AppError::Database(format!("Failed to connect to Firestore: {}", e)))?;

        tracing::info!(project = project_id, "Connected to Firestore");

        Ok(Self {
            client: Some(client),
        })
    }

    /// Create a Firestore client for the emulator with unauthenticated access.
    async fn create_emulator_client(project_id: &str) -> Result<Self, AppError> {
        tracing::info!("Using unauthenticated connection for Firestore Emulator");

        let token_source = gcloud_sdk::ExternalJwtFunctionSource::new(|| async {
            Ok(gcloud_sdk::Token {
                token_type: "Bearer".to_string(),
                token: gcloud_sdk::SecretValue::new(
                    "eyJhbGciOiJub25lIn0.eyJ1aWQiOiJ0ZXN0In0."
                        .to_string()
                        .into(),
                ),
                expiry: chrono::Utc::now() + chrono::Duration::hours(1),
            })
        });

        let options = firestore::FirestoreDbOptions::new(project_id.to_string());

        let client = firestore::FirestoreDb::with_options_token_source(
            options,
            gcloud_sdk::GCP_DEFAULT_SCOPES.clone(),
            gcloud_sdk::TokenSourceType::ExternalSource(Box::new(token_source)),
        )
        .await
        .map_err(|e| {
            AppError::Database(format!("Failed to connect to Firestore Emulator: {}", e))
        })?;

        tracing::info!(
            project = project_id,
            "Connected to Firestore (Emulator/Unauthenticated)"
        );

        Ok(Self {
            client: Some(client),
        })
    }

    /// Create a mock Firestore client for testing (offline mode).
    ///
    /// All database operations will return an error if called.
    pub fn new_mock() -> Self {
        Self { client: None }
    }

    /// Helper to get the client or return an error if offline.
    fn get_client(&self) -> Result<&firestore::FirestoreDb, AppError> {
        self.client
            .as_ref()
            .ok_or_else(|| AppError::Database("Database not connected (offline mode)".to_string()))
    }

    // ─── User Operations ─────────────────────────────────────────

    /// Store a newly registered user under a generated document ID.
    ///
    /// Usernames are not checked for uniqueness.
    pub async fn create_user(&self, user: &User) -> Result<User, AppError> {
        let doc_id = uuid::Uuid::new_v4().to_string();

        let _: () = self
            .get_client()?
            .fluent()
            .update()
            .in_col(collections::CLIENT_REGISTER)
            .document_id(&doc_id)
            .object(user)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        let mut stored = user.clone();
        stored.id = Some(doc_id);
        Ok(stored)
    }

    /// Get a user by document ID.
    pub async fn get_user(&self, user_id: &str) -> Result<Option<User>, AppError> {
        self.get_client()?
            .fluent()
            .select()
            .by_id_in(collections::CLIENT_REGISTER)
            .obj()
            .one(user_id)
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find the first user whose username and password both match exactly.
    pub async fn find_user_by_credentials(
        &self,
        username: &str,
        password: &str,
    ) -> Result<Option<User>, AppError> {
        let users: Vec<User> = self
            .get_client()?
            .fluent()
            .select()
            .from(collections::CLIENT_REGISTER)
            .filter(|q| {
                q.for_all([
                    q.field("username").eq(username),
                    q.field("password").eq(password),
                ])
            })
            .limit(1)
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(users.into_iter().next())
    }

    /// List all registered users.
    pub async fn list_users(&self) -> Result<Vec<User>, AppError> {
        self.get_client()?
            .fluent()
            .select()
            .from(collections::CLIENT_REGISTER)
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    // ─── Prediction Operations ───────────────────────────────────

    /// Store a scored prediction under a generated document ID.
    pub async fn insert_prediction(
        &self,
        record: &PredictionRecord,
    ) -> Result<PredictionRecord, AppError> {
        let doc_id = uuid::Uuid::new_v4().to_string();

        let _: () = self
            .get_client()?
            .fluent()
            .update()
            .in_col(collections::MORTALITY_PREDICTIONS)
            .document_id(&doc_id)
            .object(record)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        tracing::debug!(prediction_id = %doc_id, "Prediction stored");

        let mut stored = record.clone();
        stored.id = Some(doc_id);
        Ok(stored)
    }

    /// List predictions ordered by timestamp, newest first.
    ///
    /// Records without a `timestamp` field are not returned by the ordered query.
    pub async fn list_predictions(
        &self,
        limit: Option<u32>,
    ) -> Result<Vec<PredictionRecord>, AppError> {
        let query = self
            .get_client()?
            .fluent()
            .select()
            .from(collections::MORTALITY_PREDICTIONS)
            .order_by([(
                "timestamp",
                firestore::FirestoreQueryDirection::Descending,
            )]);

        let query = match limit {
            Some(limit) => query.limit(limit),
            None => query,
        };

        query
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }
}
