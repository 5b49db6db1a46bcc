// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! API routes for authenticated users.

use crate::error::{AppError, Result};
use crate::middleware::auth::AuthUser;
use crate::models::{PredictionRecord, PredictionSummary, ScoringInput, UserProfile};
use crate::AppState;
use axum::{
    extract::{Query, State},
    http::StatusCode,
    routing::get,
    Extension, Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use validator::{Validate, ValidationError};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

const DEFAULT_LIMIT: u32 = 50;
const MAX_LIMIT: u32 = 200;

/// API routes (require authentication via JWT).
/// The auth middleware is applied in routes/mod.rs for these routes.
pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/me", get(get_me))
        .route(
            "/api/predictions",
            get(list_predictions).post(create_prediction),
        )
}

// ─── User Profile ────────────────────────────────────────────

/// Get current user profile.
async fn get_me(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<UserProfile>> {
    if user.is_admin() {
        return Err(AppError::NotFound(
            "Admin sessions have no user profile".to_string(),
        ));
    }

    let profile = state
        .db
        .get_user(&user.user_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("User {} not found", user.user_id)))?;

    Ok(Json(UserProfile::from(&profile)))
}

// ─── Predictions ─────────────────────────────────────────────

fn default_no() -> String {
    "No".to_string()
}

fn default_male() -> String {
    "Male".to_string()
}

fn validate_gender(value: &str) -> std::result::Result<(), ValidationError> {
    match value {
        "Male" | "Female" => Ok(()),
        _ => Err(ValidationError::new("gender")),
    }
}

fn validate_yes_no(value: &str) -> std::result::Result<(), ValidationError> {
    match value {
        "Yes" | "No" => Ok(()),
        _ => Err(ValidationError::new("yes_no")),
    }
}

/// Prediction form. Field names match the stored record.
#[derive(Debug, Deserialize, Validate)]
pub struct PredictionRequest {
    #[serde(rename = "Fid")]
    #[validate(length(min = 1, max = 300))]
    pub fid: String,
    #[serde(rename = "PatientId")]
    #[validate(length(min = 1, max = 300))]
    pub patient_id: String,
    #[serde(rename = "ICU_AppointmentID", default)]
    #[validate(length(max = 300))]
    pub icu_appointment_id: String,
    #[serde(rename = "Gender", default = "default_male")]
    #[validate(custom(function = "validate_gender"))]
    pub gender: String,
    #[serde(rename = "ScheduledDay", default)]
    #[validate(length(max = 300))]
    pub scheduled_day: String,
    #[serde(rename = "AppointmentDay", default)]
    #[validate(length(max = 300))]
    pub appointment_day: String,
    /// Parsed leniently by the scorers; non-numeric values score as 0
    #[serde(rename = "Age")]
    #[validate(length(min = 1, max = 300))]
    pub age: String,
    #[serde(rename = "Scheduled_Doctor", default)]
    #[validate(length(max = 300))]
    pub scheduled_doctor: String,
    #[serde(rename = "Scholarship", default = "default_no")]
    #[validate(custom(function = "validate_yes_no"))]
    pub scholarship: String,
    #[serde(rename = "Hipertension", default = "default_no")]
    #[validate(custom(function = "validate_yes_no"))]
    pub hypertension: String,
    #[serde(rename = "Diabetes", default = "default_no")]
    #[validate(custom(function = "validate_yes_no"))]
    pub diabetes: String,
    #[serde(rename = "Alcoholism", default = "default_no")]
    #[validate(custom(function = "validate_yes_no"))]
    pub alcoholism: String,
    #[serde(rename = "Handcap", default = "default_no")]
    #[validate(custom(function = "validate_yes_no"))]
    pub handicap: String,
    #[serde(rename = "SMS_received", default = "default_no")]
    #[validate(custom(function = "validate_yes_no"))]
    pub sms_received: String,
    #[serde(rename = "Patient_Diagnosis", default)]
    #[validate(length(max = 300))]
    pub patient_diagnosis: String,
}

impl PredictionRequest {
    fn scoring_input(&self) -> ScoringInput {
        ScoringInput {
            age: self.age.clone(),
            gender: self.gender.clone(),
            hypertension: self.hypertension.clone(),
            diabetes: self.diabetes.clone(),
            alcoholism: Some(self.alcoholism.clone()),
            handicap: Some(self.handicap.clone()),
        }
    }
}

/// Score a patient and store the result.
async fn create_prediction(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Json(req): Json<PredictionRequest>,
) -> Result<(StatusCode, Json<PredictionSummary>)> {
    req.validate()?;

    let outcome = state.scoring_service.predict(&req.scoring_input());
    let votes = outcome.models.votes;

    let record = PredictionRecord {
        id: None,
        fid: req.fid,
        patient_id: req.patient_id,
        icu_appointment_id: req.icu_appointment_id,
        gender: req.gender,
        scheduled_day: req.scheduled_day,
        appointment_day: req.appointment_day,
        age: req.age,
        scheduled_doctor: req.scheduled_doctor,
        scholarship: req.scholarship,
        hypertension: req.hypertension,
        diabetes: req.diabetes,
        alcoholism: req.alcoholism,
        handicap: req.handicap,
        sms_received: req.sms_received,
        patient_diagnosis: req.patient_diagnosis,
        prediction: outcome.prediction,
        confidence: Some(outcome.confidence_percent()),
        models: Some(outcome.models),
        timestamp: Some(chrono::Utc::now()),
        user_id: Some(user.user_id.clone()),
    };

    let stored = state.db.insert_prediction(&record).await?;

    tracing::info!(
        user_id = %user.user_id,
        prediction_id = stored.id.as_deref().unwrap_or_default(),
        prediction = %outcome.prediction,
        confidence = outcome.confidence,
        good_votes = votes.good,
        bad_votes = votes.bad,
        "Prediction recorded"
    );

    Ok((StatusCode::CREATED, Json(PredictionSummary::from(stored))))
}

#[derive(Deserialize)]
struct PredictionsQuery {
    /// Maximum number of records, newest first
    #[serde(default = "default_limit")]
    limit: u32,
}

fn default_limit() -> u32 {
    DEFAULT_LIMIT
}

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct PredictionsResponse {
    pub predictions: Vec<PredictionSummary>,
    pub limit: u32,
}

/// Recent predictions across all users.
async fn list_predictions(
    State(state): State<Arc<AppState>>,
    Query(params): Query<PredictionsQuery>,
) -> Result<Json<PredictionsResponse>> {
    if params.limit == 0 {
        return Err(AppError::BadRequest(
            "Limit must be greater than 0".to_string(),
        ));
    }
    let limit = params.limit.min(MAX_LIMIT);

    let predictions = state
        .db
        .list_predictions(Some(limit))
        .await?
        .into_iter()
        .map(PredictionSummary::from)
        .collect();

    Ok(Json(PredictionsResponse { predictions, limit }))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request_json() -> serde_json::Value {
        serde_json::json!({
            "Fid": "F-100",
            "PatientId": "P-100",
            "Age": "72",
            "Gender": "Female",
            "Hipertension": "Yes"
        })
    }

    #[test]
    fn test_prediction_request_defaults() {
        let req: PredictionRequest = serde_json::from_value(request_json()).unwrap();
        assert_eq!(req.diabetes, "No");
        assert_eq!(req.sms_received, "No");
        assert_eq!(req.icu_appointment_id, "");
        assert!(req.validate().is_ok());

        let input = req.scoring_input();
        assert_eq!(input.age, "72");
        assert_eq!(input.alcoholism.as_deref(), Some("No"));
    }

    #[test]
    fn test_prediction_request_rejects_unknown_choice() {
        let mut json = request_json();
        json["Gender"] = "Other".into();
        json["Diabetes"] = "Maybe".into();
        let req: PredictionRequest = serde_json::from_value(json).unwrap();

        let errors = req.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("gender"));
        assert!(fields.contains_key("diabetes"));
    }

    #[test]
    fn test_prediction_request_requires_identifiers() {
        let mut json = request_json();
        json["PatientId"] = "".into();
        let req: PredictionRequest = serde_json::from_value(json).unwrap();
        assert!(req.validate().is_err());
    }
}
