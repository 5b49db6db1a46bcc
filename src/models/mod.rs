// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Data models for the application.

pub mod prediction;
pub mod scoring;
pub mod stats;
pub mod user;

pub use prediction::{PredictionRecord, PredictionSummary};
pub use scoring::{EnsembleOutcome, Label, ModelParams, ScoringInput};
pub use stats::PredictionStats;
pub use user::{User, UserProfile};
