// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Mortality Predictor API Server
//!
//! Scores hospital patient records with a fixed four-model ensemble and
//! stores the predictions in Firestore.

use mortality_predictor::{
    config::Config, db::FirestoreDb, services::ScoringService, AppState,
};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize structured JSON logging for GCP
    init_logging()?;

    // Load configuration from environment
    let config = Config::from_env()?;
    tracing::info!(port = config.port, "Starting Mortality Predictor API");

    // Initialize Firestore database
    let db = FirestoreDb::new(&config.gcp_project_id).await?;

    // Load scoring parameters
    let scoring_service = match &config.model_params_path {
        Some(path) => {
            tracing::info!(path = %path, "Loading model parameters");
            ScoringService::load_from_file(path)?
        }
        None => {
            tracing::info!("Using built-in model parameters");
            ScoringService::default()
        }
    };

    // Build shared state
    let state = Arc::new(AppState {
        config: config.clone(),
        db,
        scoring_service,
    });

    // Build router
    let app = mortality_predictor::routes::create_router(state);

    // Start server
    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(address = %addr, "Server listening");

    axum::serve(listener, app).await?;
    Ok(())
}

/// Initialize structured JSON logging (GCP-compliant).
fn init_logging() -> Result<(), Box<dyn std::error::Error>> {
    let format = tracing_subscriber::fmt::layer()
        .json()
        .with_target(false)
        .with_current_span(true)
        .flatten_event(true);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("mortality_predictor=debug".parse()?)
                .add_directive("info".parse()?),
        )
        .with(format)
        .init();
    Ok(())
}
