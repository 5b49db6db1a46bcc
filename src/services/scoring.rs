// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Ensemble mortality scoring.
//!
//! Four independent fixed-formula scorers vote on an outcome label:
//! - a linear score over fixed weights ("SVM")
//! - a threshold risk accumulator ("Naive Bayes")
//! - a logistic sigmoid ("Logistic Regression")
//! - an ordered rule table ("Decision Tree")
//!
//! All scorers are pure functions of the input and their parameter struct.

use crate::models::scoring::{
    DatasetSummary, DecisionTreeParams, EnsembleOutcome, Features, Label, LogisticParams,
    ModelBreakdown, ModelCatalog, ModelMetrics, ModelParams, NaiveBayesParams, ScorerResult,
    ScoringInput, SvmParams, Votes,
};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

/// Service holding the active parameter set.
#[derive(Debug, Default, Clone)]
pub struct ScoringService {
    params: ModelParams,
}

impl ScoringService {
    pub fn new(params: ModelParams) -> Self {
        Self { params }
    }

    /// Load parameters from a JSON file.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ScoringError> {
        let json_data =
            fs::read_to_string(path.as_ref()).map_err(|e| ScoringError::IoError(e.to_string()))?;
        Self::load_from_json(&json_data)
    }

    /// Load parameters from a JSON string. Missing scorer sections keep their defaults.
    pub fn load_from_json(json_data: &str) -> Result<Self, ScoringError> {
        let params: ModelParams = serde_json::from_str(json_data)
            .map_err(|e| ScoringError::ParseError(e.to_string()))?;
        check_params(&params)?;

        tracing::info!(
            rules = params.decision_tree.rules.len(),
            "Loaded model parameters"
        );
        Ok(Self { params })
    }

    pub fn params(&self) -> &ModelParams {
        &self.params
    }

    /// Score an input with all four scorers and combine by majority vote.
    pub fn predict(&self, input: &ScoringInput) -> EnsembleOutcome {
        ensemble_predict(&Features::from(input), &self.params)
    }

    /// Static metrics and dataset figures shown on the admin models view.
    pub fn catalog(&self) -> ModelCatalog {
        let metric = |name: &str, accuracy, precision, recall, f1_score| ModelMetrics {
            name: name.to_string(),
            accuracy,
            precision,
            recall,
            f1_score,
        };

        let feature_importance = BTreeMap::from([
            ("Age".to_string(), 0.35),
            ("Hypertension".to_string(), 0.28),
            ("Diabetes".to_string(), 0.22),
            ("Gender".to_string(), 0.08),
            ("Alcoholism".to_string(), 0.04),
            ("Disability".to_string(), 0.03),
        ]);

        ModelCatalog {
            models: vec![
                metric("Support Vector Machine (SVM)", 92.3, 91.5, 93.1, 92.3),
                metric("Naive Bayes", 89.7, 88.2, 91.3, 89.7),
                metric("Logistic Regression", 85.4, 84.8, 86.2, 85.5),
                metric("Decision Trees", 88.1, 87.5, 88.7, 88.1),
                metric("SGD Classifier", 86.9, 85.3, 88.5, 86.9),
            ],
            ensemble_accuracy: 91.0,
            feature_importance,
            dataset: DatasetSummary {
                total_records: 6094,
                good_outcomes: 3247,
                bad_outcomes: 2847,
                average_age: 42.3,
                male_share: 0.52,
                female_share: 0.48,
                hypertension_prevalence: 0.23,
                diabetes_prevalence: 0.18,
                alcoholism_prevalence: 0.11,
            },
        }
    }
}

fn flag(value: bool) -> f64 {
    if value {
        1.0
    } else {
        0.0
    }
}

fn label_from(good: bool) -> Label {
    if good {
        Label::Good
    } else {
        Label::Bad
    }
}

/// Linear score over fixed weights; positive means "Good".
pub fn svm_predict(features: &Features, w: &SvmParams) -> ScorerResult {
    let score = features.age as f64 * w.age
        + flag(features.female) * w.gender
        + flag(features.hypertension) * w.hypertension
        + flag(features.diabetes) * w.diabetes
        + flag(features.alcoholism) * w.alcoholism
        + flag(features.handicap) * w.handicap
        + w.bias;

    ScorerResult {
        prediction: label_from(score > 0.0),
        confidence: (score.abs() * w.confidence_scale + w.confidence_floor).min(w.confidence_cap),
    }
}

/// Base success rate minus accumulated age and comorbidity risk.
pub fn naive_bayes_predict(features: &Features, nb: &NaiveBayesParams) -> ScorerResult {
    let mut risk = 0.0;

    if features.age > nb.age_threshold {
        risk += (features.age - nb.age_threshold) as f64 * nb.age_risk_per_year;
    }
    if features.hypertension {
        risk += nb.risk_factor_weight;
    }
    if features.diabetes {
        risk += nb.risk_factor_weight * nb.diabetes_factor;
    }

    let probability = (nb.base_success_rate - risk).max(nb.min_probability);
    probability_result(probability)
}

/// Sigmoid over a fixed linear logit.
pub fn logistic_regression_predict(features: &Features, coef: &LogisticParams) -> ScorerResult {
    let logit = coef.intercept
        + features.age as f64 * coef.age
        + flag(features.female) * coef.gender
        + flag(features.hypertension) * coef.hypertension
        + flag(features.diabetes) * coef.diabetes;

    probability_result(sigmoid(logit))
}

/// First matching rule wins; otherwise a small risk count decides.
pub fn decision_tree_predict(features: &Features, tree: &DecisionTreeParams) -> ScorerResult {
    if let Some(rule) = tree.rules.iter().find(|r| r.condition.matches(features)) {
        return ScorerResult {
            prediction: rule.prediction,
            confidence: rule.confidence,
        };
    }

    let risk_factors = [features.hypertension, features.diabetes]
        .iter()
        .filter(|&&f| f)
        .count();
    let age_risk = if features.age > tree.fallback_age_threshold {
        tree.fallback_age_penalty
    } else {
        0.0
    };
    let total_risk = risk_factors as f64 * tree.fallback_risk_factor_weight + age_risk;

    ScorerResult {
        prediction: label_from(total_risk <= tree.fallback_bad_threshold),
        confidence: tree.fallback_confidence,
    }
}

/// Run all scorers and combine them.
pub fn ensemble_predict(features: &Features, params: &ModelParams) -> EnsembleOutcome {
    combine(ModelBreakdown {
        svm: svm_predict(features, &params.svm),
        naive_bayes: naive_bayes_predict(features, &params.naive_bayes),
        logistic_regression: logistic_regression_predict(features, &params.logistic_regression),
        decision_tree: decision_tree_predict(features, &params.decision_tree),
        votes: Votes::default(),
    })
}

/// Majority vote with averaged confidence.
///
/// The final label is "Good" only on a strict majority, so a 2-2 split
/// resolves to "Bad". Any `votes` already present are recomputed.
pub fn combine(mut models: ModelBreakdown) -> EnsembleOutcome {
    let results = models.results();

    let good = results
        .iter()
        .filter(|r| r.prediction == Label::Good)
        .count() as u32;
    let bad = results.len() as u32 - good;
    models.votes = Votes { good, bad };

    let mean = results.iter().map(|r| r.confidence).sum::<f64>() / results.len() as f64;

    EnsembleOutcome {
        prediction: label_from(good > bad),
        confidence: (mean * 100.0).round() / 100.0,
        models,
    }
}

/// Reject parameter sets that could push a scorer's confidence outside [0, 1].
///
/// Weights feeding a probability must be non-negative so the Naive Bayes
/// probability stays within [min_probability, base_success_rate].
pub fn check_params(params: &ModelParams) -> Result<(), ScoringError> {
    let svm = &params.svm;
    for (name, value) in [
        ("svm.age", svm.age),
        ("svm.gender", svm.gender),
        ("svm.hypertension", svm.hypertension),
        ("svm.diabetes", svm.diabetes),
        ("svm.alcoholism", svm.alcoholism),
        ("svm.handicap", svm.handicap),
        ("svm.bias", svm.bias),
        ("logistic_regression.intercept", params.logistic_regression.intercept),
        ("logistic_regression.age", params.logistic_regression.age),
        ("logistic_regression.gender", params.logistic_regression.gender),
        (
            "logistic_regression.hypertension",
            params.logistic_regression.hypertension,
        ),
        ("logistic_regression.diabetes", params.logistic_regression.diabetes),
        (
            "decision_tree.fallback_risk_factor_weight",
            params.decision_tree.fallback_risk_factor_weight,
        ),
        (
            "decision_tree.fallback_age_penalty",
            params.decision_tree.fallback_age_penalty,
        ),
        (
            "decision_tree.fallback_bad_threshold",
            params.decision_tree.fallback_bad_threshold,
        ),
    ] {
        finite(name, value)?;
    }

    let nb = &params.naive_bayes;
    for (name, value) in [
        ("svm.confidence_scale", svm.confidence_scale),
        ("naive_bayes.age_risk_per_year", nb.age_risk_per_year),
        ("naive_bayes.risk_factor_weight", nb.risk_factor_weight),
        ("naive_bayes.diabetes_factor", nb.diabetes_factor),
    ] {
        non_negative(name, value)?;
    }

    for (name, value) in [
        ("svm.confidence_floor", svm.confidence_floor),
        ("svm.confidence_cap", svm.confidence_cap),
        ("naive_bayes.base_success_rate", nb.base_success_rate),
        ("naive_bayes.min_probability", nb.min_probability),
        (
            "decision_tree.fallback_confidence",
            params.decision_tree.fallback_confidence,
        ),
    ] {
        unit_interval(name, value)?;
    }

    for (i, rule) in params.decision_tree.rules.iter().enumerate() {
        unit_interval(&format!("decision_tree.rules[{i}].confidence"), rule.confidence)?;
    }

    Ok(())
}

fn finite(name: &str, value: f64) -> Result<(), ScoringError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(ScoringError::InvalidParams(format!("{name} must be finite")))
    }
}

fn non_negative(name: &str, value: f64) -> Result<(), ScoringError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ScoringError::InvalidParams(format!(
            "{name} must be non-negative, got {value}"
        )))
    }
}

fn unit_interval(name: &str, value: f64) -> Result<(), ScoringError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(ScoringError::InvalidParams(format!(
            "{name} must be within [0, 1], got {value}"
        )))
    }
}

fn sigmoid(x: f64) -> f64 {
    1.0 / (1.0 + (-x).exp())
}

fn probability_result(probability: f64) -> ScorerResult {
    ScorerResult {
        prediction: label_from(probability > 0.5),
        confidence: (probability - 0.5).abs() * 2.0,
    }
}

/// Errors from loading model parameters.
#[derive(Debug, thiserror::Error)]
pub enum ScoringError {
    #[error("Failed to read file: {0}")]
    IoError(String),

    #[error("Failed to parse model parameters: {0}")]
    ParseError(String),

    #[error("Model parameter out of range: {0}")]
    InvalidParams(String),
}
