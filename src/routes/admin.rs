// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Admin views over all users and predictions.
//!
//! These routes sit behind `require_admin` (see routes/mod.rs).

use crate::error::Result;
use crate::models::scoring::ModelCatalog;
use crate::models::{PredictionStats, PredictionSummary, UserProfile};
use crate::services::export::{predictions_to_csv, EXPORT_FILE_NAME};
use crate::AppState;
use axum::{
    extract::State,
    http::header,
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use std::sync::Arc;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/admin/users", get(list_users))
        .route("/api/admin/predictions", get(list_predictions))
        .route("/api/admin/stats", get(get_stats))
        .route("/api/admin/models", get(get_models))
        .route("/api/admin/export.csv", get(export_csv))
}

/// All registered users, without passwords.
async fn list_users(State(state): State<Arc<AppState>>) -> Result<Json<Vec<UserProfile>>> {
    let users = state.db.list_users().await?;
    Ok(Json(users.iter().map(UserProfile::from).collect()))
}

/// All predictions, newest first.
async fn list_predictions(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<PredictionSummary>>> {
    let records = state.db.list_predictions(None).await?;
    Ok(Json(
        records.into_iter().map(PredictionSummary::from).collect(),
    ))
}

/// Aggregate statistics, computed from the full collections on every call.
async fn get_stats(State(state): State<Arc<AppState>>) -> Result<Json<PredictionStats>> {
    let (users, records) =
        tokio::try_join!(state.db.list_users(), state.db.list_predictions(None))?;

    let stats = PredictionStats::from_records(users.len() as u32, &records);
    tracing::debug!(
        total_users = stats.total_users,
        total_predictions = stats.total_predictions,
        "Computed admin stats"
    );

    Ok(Json(stats))
}

async fn get_models(State(state): State<Arc<AppState>>) -> Json<ModelCatalog> {
    Json(state.scoring_service.catalog())
}

/// Download every prediction as CSV.
async fn export_csv(State(state): State<Arc<AppState>>) -> Result<impl IntoResponse> {
    let records = state.db.list_predictions(None).await?;
    let body = predictions_to_csv(&records);

    tracing::info!(rows = records.len(), "Exported predictions");

    Ok((
        [
            (header::CONTENT_TYPE, "text/csv".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{EXPORT_FILE_NAME}\""),
            ),
        ],
        body,
    ))
}
