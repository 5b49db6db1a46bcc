// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Scoring types: inputs, per-scorer results, ensemble output and the
//! parameter tables that drive the four fixed-formula scorers.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// Outcome label. Stored verbatim as `"Good"` / `"Bad"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub enum Label {
    Good,
    Bad,
}

impl Label {
    pub fn as_str(&self) -> &'static str {
        match self {
            Label::Good => "Good",
            Label::Bad => "Bad",
        }
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Raw scorer input, exactly as submitted on the prediction form.
#[derive(Debug, Clone, Default)]
pub struct ScoringInput {
    /// String-encoded integer age
    pub age: String,
    /// "Male" or "Female"
    pub gender: String,
    /// "Yes" or "No"
    pub hypertension: String,
    /// "Yes" or "No"
    pub diabetes: String,
    pub alcoholism: Option<String>,
    pub handicap: Option<String>,
}

/// Numeric features derived from a [`ScoringInput`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Features {
    pub age: i64,
    pub female: bool,
    pub hypertension: bool,
    pub diabetes: bool,
    pub alcoholism: bool,
    pub handicap: bool,
}

impl From<&ScoringInput> for Features {
    fn from(input: &ScoringInput) -> Self {
        Self {
            age: parse_age(&input.age),
            female: input.gender == "Female",
            hypertension: is_yes(&input.hypertension),
            diabetes: is_yes(&input.diabetes),
            alcoholism: input.alcoholism.as_deref().is_some_and(is_yes),
            handicap: input.handicap.as_deref().is_some_and(is_yes),
        }
    }
}

fn is_yes(value: &str) -> bool {
    value == "Yes"
}

/// Parse the leading integer of an age string.
///
/// Leading whitespace and a sign are accepted, trailing garbage is ignored.
/// Anything without leading digits (or out of range) yields 0.
pub fn parse_age(raw: &str) -> i64 {
    let trimmed = raw.trim_start();
    let (negative, rest) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };

    let digits_len = rest.bytes().take_while(|b| b.is_ascii_digit()).count();
    if digits_len == 0 {
        return 0;
    }

    match rest[..digits_len].parse::<i64>() {
        Ok(value) if negative => -value,
        Ok(value) => value,
        // Overflow scores as 0 rather than saturating; hex prefixes never parse.
        Err(_) => 0,
    }
}

/// Label and confidence produced by a single scorer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct ScorerResult {
    pub prediction: Label,
    /// Confidence in [0, 1]
    pub confidence: f64,
}

/// Vote tally across the four scorers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct Votes {
    pub good: u32,
    pub bad: u32,
}

/// Per-scorer breakdown, persisted as the `MLModels` field.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct ModelBreakdown {
    pub svm: ScorerResult,
    pub naive_bayes: ScorerResult,
    pub logistic_regression: ScorerResult,
    pub decision_tree: ScorerResult,
    pub votes: Votes,
}

impl ModelBreakdown {
    /// Scorer results in a fixed order (svm, naive bayes, logistic, tree).
    pub fn results(&self) -> [ScorerResult; 4] {
        [
            self.svm,
            self.naive_bayes,
            self.logistic_regression,
            self.decision_tree,
        ]
    }
}

/// Combined ensemble output.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EnsembleOutcome {
    pub prediction: Label,
    /// Mean scorer confidence, rounded to two decimals
    pub confidence: f64,
    pub models: ModelBreakdown,
}

impl EnsembleOutcome {
    /// Confidence as a whole percentage (what gets stored on the record).
    pub fn confidence_percent(&self) -> u32 {
        (self.confidence * 100.0).round().clamp(0.0, 100.0) as u32
    }
}

// ─── Parameters ──────────────────────────────────────────────

/// Every weight, threshold and rule used by the scorers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ModelParams {
    pub svm: SvmParams,
    pub naive_bayes: NaiveBayesParams,
    pub logistic_regression: LogisticParams,
    pub decision_tree: DecisionTreeParams,
}

/// Fixed linear weights over the six features.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SvmParams {
    pub age: f64,
    pub gender: f64,
    pub hypertension: f64,
    pub diabetes: f64,
    pub alcoholism: f64,
    pub handicap: f64,
    pub bias: f64,
    pub confidence_scale: f64,
    pub confidence_floor: f64,
    pub confidence_cap: f64,
}

impl Default for SvmParams {
    fn default() -> Self {
        Self {
            age: -0.08,
            gender: 0.12,
            hypertension: -0.35,
            diabetes: -0.28,
            alcoholism: -0.15,
            handicap: -0.20,
            bias: 0.65,
            confidence_scale: 0.4,
            confidence_floor: 0.6,
            confidence_cap: 0.95,
        }
    }
}

/// Threshold risk accumulator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NaiveBayesParams {
    pub age_threshold: i64,
    pub age_risk_per_year: f64,
    pub risk_factor_weight: f64,
    /// Diabetes penalty as a fraction of `risk_factor_weight`
    pub diabetes_factor: f64,
    pub base_success_rate: f64,
    pub min_probability: f64,
}

impl Default for NaiveBayesParams {
    fn default() -> Self {
        Self {
            age_threshold: 60,
            age_risk_per_year: 0.02,
            risk_factor_weight: 0.3,
            diabetes_factor: 0.8,
            base_success_rate: 0.72,
            min_probability: 0.1,
        }
    }
}

/// Logistic regression coefficients.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogisticParams {
    pub intercept: f64,
    pub age: f64,
    pub gender: f64,
    pub hypertension: f64,
    pub diabetes: f64,
}

impl Default for LogisticParams {
    fn default() -> Self {
        Self {
            intercept: 2.1,
            age: -0.025,
            gender: 0.3,
            hypertension: -1.2,
            diabetes: -0.8,
        }
    }
}

/// Conjunction of optional predicates; an empty condition always matches.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RuleCondition {
    /// Matches when age is strictly greater
    pub age_above: Option<i64>,
    /// Matches when age is strictly smaller
    pub age_below: Option<i64>,
    pub hypertension: Option<bool>,
    pub diabetes: Option<bool>,
}

impl RuleCondition {
    pub fn matches(&self, features: &Features) -> bool {
        self.age_above.is_none_or(|limit| features.age > limit)
            && self.age_below.is_none_or(|limit| features.age < limit)
            && self
                .hypertension
                .is_none_or(|want| features.hypertension == want)
            && self.diabetes.is_none_or(|want| features.diabetes == want)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rule {
    pub condition: RuleCondition,
    pub prediction: Label,
    pub confidence: f64,
}

/// Ordered rule table plus the fallback risk count.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionTreeParams {
    /// Evaluated top to bottom, first match wins
    pub rules: Vec<Rule>,
    pub fallback_risk_factor_weight: f64,
    pub fallback_age_threshold: i64,
    pub fallback_age_penalty: f64,
    pub fallback_bad_threshold: f64,
    pub fallback_confidence: f64,
}

impl Default for DecisionTreeParams {
    fn default() -> Self {
        Self {
            rules: vec![
                Rule {
                    condition: RuleCondition {
                        age_above: Some(70),
                        hypertension: Some(true),
                        ..Default::default()
                    },
                    prediction: Label::Bad,
                    confidence: 0.85,
                },
                Rule {
                    condition: RuleCondition {
                        age_above: Some(80),
                        ..Default::default()
                    },
                    prediction: Label::Bad,
                    confidence: 0.90,
                },
                Rule {
                    condition: RuleCondition {
                        hypertension: Some(true),
                        diabetes: Some(true),
                        ..Default::default()
                    },
                    prediction: Label::Bad,
                    confidence: 0.78,
                },
                Rule {
                    condition: RuleCondition {
                        age_below: Some(30),
                        ..Default::default()
                    },
                    prediction: Label::Good,
                    confidence: 0.92,
                },
                Rule {
                    condition: RuleCondition {
                        age_below: Some(50),
                        hypertension: Some(false),
                        diabetes: Some(false),
                        ..Default::default()
                    },
                    prediction: Label::Good,
                    confidence: 0.88,
                },
            ],
            fallback_risk_factor_weight: 0.2,
            fallback_age_threshold: 60,
            fallback_age_penalty: 0.3,
            fallback_bad_threshold: 0.4,
            fallback_confidence: 0.7,
        }
    }
}

// ─── Model Catalog ───────────────────────────────────────────

/// Reported metrics for one model, as shown on the admin models tab.
#[derive(Debug, Clone, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct ModelMetrics {
    pub name: String,
    pub accuracy: f64,
    pub precision: f64,
    pub recall: f64,
    pub f1_score: f64,
}

/// Summary figures of the reference dataset.
#[derive(Debug, Clone, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct DatasetSummary {
    pub total_records: u32,
    pub good_outcomes: u32,
    pub bad_outcomes: u32,
    pub average_age: f64,
    pub male_share: f64,
    pub female_share: f64,
    pub hypertension_prevalence: f64,
    pub diabetes_prevalence: f64,
    pub alcoholism_prevalence: f64,
}

/// Static descriptive data about the scorers. Nothing here is trained.
#[derive(Debug, Clone, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct ModelCatalog {
    pub models: Vec<ModelMetrics>,
    pub ensemble_accuracy: f64,
    pub feature_importance: BTreeMap<String, f64>,
    pub dataset: DatasetSummary,
}
