// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Prediction record model for storage and API.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

use crate::models::scoring::{Label, ModelBreakdown};
use crate::time_utils::format_utc_rfc3339;

/// Stored prediction in the `mortality_predictions` collection.
///
/// Immutable once written. Field names match the existing documents.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredictionRecord {
    /// Firestore document ID (populated on reads)
    #[serde(rename = "_firestore_id", default, skip_serializing)]
    pub id: Option<String>,
    #[serde(rename = "Fid", default)]
    pub fid: String,
    #[serde(rename = "PatientId", default)]
    pub patient_id: String,
    #[serde(rename = "ICU_AppointmentID", default)]
    pub icu_appointment_id: String,
    #[serde(rename = "Gender", default)]
    pub gender: String,
    #[serde(rename = "ScheduledDay", default)]
    pub scheduled_day: String,
    #[serde(rename = "AppointmentDay", default)]
    pub appointment_day: String,
    /// Age as submitted (string-encoded integer)
    #[serde(rename = "Age", default)]
    pub age: String,
    #[serde(rename = "Scheduled_Doctor", default)]
    pub scheduled_doctor: String,
    #[serde(rename = "Scholarship", default)]
    pub scholarship: String,
    #[serde(rename = "Hipertension", default)]
    pub hypertension: String,
    #[serde(rename = "Diabetes", default)]
    pub diabetes: String,
    #[serde(rename = "Alcoholism", default)]
    pub alcoholism: String,
    #[serde(rename = "Handcap", default)]
    pub handicap: String,
    #[serde(rename = "SMS_received", default)]
    pub sms_received: String,
    #[serde(rename = "Patient_Diagnosis", default)]
    pub patient_diagnosis: String,
    /// Ensemble label
    #[serde(rename = "Prediction")]
    pub prediction: Label,
    /// Ensemble confidence as a whole percentage
    #[serde(rename = "Confidence", default)]
    pub confidence: Option<u32>,
    /// Per-scorer snapshot
    #[serde(rename = "MLModels", default)]
    pub models: Option<ModelBreakdown>,
    #[serde(default, with = "firestore::serialize_as_optional_timestamp")]
    pub timestamp: Option<DateTime<Utc>>,
    #[serde(rename = "userId", default)]
    pub user_id: Option<String>,
}

/// Prediction as returned by the API.
#[derive(Debug, Clone, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct PredictionSummary {
    pub id: String,
    pub fid: String,
    pub patient_id: String,
    pub icu_appointment_id: String,
    pub gender: String,
    pub scheduled_day: String,
    pub appointment_day: String,
    pub age: String,
    pub scheduled_doctor: String,
    pub scholarship: String,
    pub hypertension: String,
    pub diabetes: String,
    pub alcoholism: String,
    pub handicap: String,
    pub sms_received: String,
    pub patient_diagnosis: String,
    pub prediction: Label,
    pub confidence: Option<u32>,
    pub models: Option<ModelBreakdown>,
    pub timestamp: Option<String>,
    pub user_id: Option<String>,
}

impl From<PredictionRecord> for PredictionSummary {
    fn from(r: PredictionRecord) -> Self {
        Self {
            id: r.id.unwrap_or_default(),
            fid: r.fid,
            patient_id: r.patient_id,
            icu_appointment_id: r.icu_appointment_id,
            gender: r.gender,
            scheduled_day: r.scheduled_day,
            appointment_day: r.appointment_day,
            age: r.age,
            scheduled_doctor: r.scheduled_doctor,
            scholarship: r.scholarship,
            hypertension: r.hypertension,
            diabetes: r.diabetes,
            alcoholism: r.alcoholism,
            handicap: r.handicap,
            sms_received: r.sms_received,
            patient_diagnosis: r.patient_diagnosis,
            prediction: r.prediction,
            confidence: r.confidence,
            models: r.models,
            timestamp: r.timestamp.map(format_utc_rfc3339),
            user_id: r.user_id,
        }
    }
}
