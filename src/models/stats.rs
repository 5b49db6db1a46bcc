//! Aggregate prediction statistics for the admin dashboard.
//!
//! Computed on demand from the full prediction list; nothing is stored.

use serde::Serialize;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

use crate::models::scoring::{parse_age, Label};
use crate::models::PredictionRecord;

/// Age bucket labels, in display order.
pub const AGE_BUCKETS: [&str; 8] = [
    "<20", "20-29", "30-39", "40-49", "50-59", "60-69", "70-79", "80+",
];

/// Comorbidity combinations across predictions.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct RiskFactorBreakdown {
    pub hypertension_only: u32,
    pub diabetes_only: u32,
    pub both: u32,
    pub none: u32,
}

/// Prediction count for one age bucket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct AgeBucketCount {
    pub bucket: String,
    pub count: u32,
}

/// Aggregate view over users and predictions.
#[derive(Debug, Clone, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct PredictionStats {
    // ─── Totals ──────────────────────────────────────────────────
    pub total_users: u32,
    pub total_predictions: u32,

    // ─── Outcomes ────────────────────────────────────────────────
    pub good_predictions: u32,
    pub bad_predictions: u32,
    /// Share of "Good" predictions in percent (0 when there are none)
    pub good_ratio: f64,
    /// Share of "Bad" predictions in percent (0 when there are none)
    pub bad_ratio: f64,
    /// Mean stored confidence percentage over records that carry one
    pub average_confidence: f64,

    // ─── Demographics ────────────────────────────────────────────
    pub male_count: u32,
    pub female_count: u32,
    pub hypertension_count: u32,
    pub diabetes_count: u32,
    pub risk_factors: RiskFactorBreakdown,
    /// Prediction count per age bucket, in [`AGE_BUCKETS`] order
    pub age_distribution: Vec<AgeBucketCount>,
}

impl PredictionStats {
    /// Aggregate a set of prediction records.
    pub fn from_records(total_users: u32, records: &[PredictionRecord]) -> Self {
        let mut stats = Self {
            total_users,
            total_predictions: records.len() as u32,
            good_predictions: 0,
            bad_predictions: 0,
            good_ratio: 0.0,
            bad_ratio: 0.0,
            average_confidence: 0.0,
            male_count: 0,
            female_count: 0,
            hypertension_count: 0,
            diabetes_count: 0,
            risk_factors: RiskFactorBreakdown::default(),
            age_distribution: AGE_BUCKETS
                .iter()
                .map(|bucket| AgeBucketCount {
                    bucket: bucket.to_string(),
                    count: 0,
                })
                .collect(),
        };

        let mut confidence_sum = 0u64;
        let mut confidence_count = 0u64;

        for record in records {
            match record.prediction {
                Label::Good => stats.good_predictions += 1,
                Label::Bad => stats.bad_predictions += 1,
            }

            match record.gender.as_str() {
                "Male" => stats.male_count += 1,
                "Female" => stats.female_count += 1,
                _ => {}
            }

            let hypertension = record.hypertension == "Yes";
            let diabetes = record.diabetes == "Yes";
            if hypertension {
                stats.hypertension_count += 1;
            }
            if diabetes {
                stats.diabetes_count += 1;
            }
            match (hypertension, diabetes) {
                (true, false) => stats.risk_factors.hypertension_only += 1,
                (false, true) => stats.risk_factors.diabetes_only += 1,
                (true, true) => stats.risk_factors.both += 1,
                (false, false) => stats.risk_factors.none += 1,
            }

            stats.age_distribution[age_bucket_index(parse_age(&record.age))].count += 1;

            if let Some(confidence) = record.confidence {
                confidence_sum += u64::from(confidence);
                confidence_count += 1;
            }
        }

        if stats.total_predictions > 0 {
            let total = f64::from(stats.total_predictions);
            stats.good_ratio = f64::from(stats.good_predictions) / total * 100.0;
            stats.bad_ratio = f64::from(stats.bad_predictions) / total * 100.0;
        }
        if confidence_count > 0 {
            stats.average_confidence = confidence_sum as f64 / confidence_count as f64;
        }

        stats
    }
}

/// Map an age to its bucket label.
pub fn age_bucket(age: i64) -> &'static str {
    AGE_BUCKETS[age_bucket_index(age)]
}

fn age_bucket_index(age: i64) -> usize {
    match age {
        i64::MIN..=19 => 0,
        20..=29 => 1,
        30..=39 => 2,
        40..=49 => 3,
        50..=59 => 4,
        60..=69 => 5,
        70..=79 => 6,
        _ => 7,
    }
}
