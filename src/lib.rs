// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Mortality Predictor: hospital patient risk scoring service
//!
//! This crate provides the backend API for registering clinicians, scoring
//! patient records with a fixed four-model ensemble, and reviewing the
//! stored predictions from an admin dashboard.

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod time_utils;

use config::Config;
use db::FirestoreDb;
use services::ScoringService;

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub db: FirestoreDb,
    pub scoring_service: ScoringService,
}
