// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Property tests for the ensemble scorers.

use mortality_predictor::models::scoring::{Features, Label, ModelParams, ScoringInput};
use mortality_predictor::models::PredictionRecord;
use mortality_predictor::models::PredictionStats;
use mortality_predictor::services::scoring::{
    decision_tree_predict, ensemble_predict, logistic_regression_predict, naive_bayes_predict,
    svm_predict,
};
use mortality_predictor::services::ScoringService;
use proptest::prelude::*;

fn yes_no() -> impl Strategy<Value = String> {
    prop_oneof![Just("Yes".to_string()), Just("No".to_string())]
}

fn scoring_input() -> impl Strategy<Value = ScoringInput> {
    (
        prop_oneof![
            (-200i64..100_000).prop_map(|a| a.to_string()),
            "[ 0-9a-z+-]{0,12}",
        ],
        prop_oneof![Just("Male".to_string()), Just("Female".to_string())],
        yes_no(),
        yes_no(),
        proptest::option::of(yes_no()),
        proptest::option::of(yes_no()),
    )
        .prop_map(
            |(age, gender, hypertension, diabetes, alcoholism, handicap)| ScoringInput {
                age,
                gender,
                hypertension,
                diabetes,
                alcoholism,
                handicap,
            },
        )
}

fn record(prediction: Label, age: &str, hypertension: &str, diabetes: &str) -> PredictionRecord {
    serde_json::from_value(serde_json::json!({
        "Age": age,
        "Gender": "Male",
        "Hipertension": hypertension,
        "Diabetes": diabetes,
        "Prediction": prediction,
        "Confidence": 80,
    }))
    .unwrap()
}

proptest! {
    #[test]
    fn scorer_confidence_is_bounded(input in scoring_input()) {
        let params = ModelParams::default();
        let features = Features::from(&input);

        for result in [
            svm_predict(&features, &params.svm),
            naive_bayes_predict(&features, &params.naive_bayes),
            logistic_regression_predict(&features, &params.logistic_regression),
            decision_tree_predict(&features, &params.decision_tree),
        ] {
            prop_assert!((0.0..=1.0).contains(&result.confidence), "{result:?}");
        }

        let outcome = ensemble_predict(&features, &params);
        prop_assert!((0.0..=1.0).contains(&outcome.confidence));
        prop_assert!(outcome.confidence_percent() <= 100);
    }

    #[test]
    fn scoring_is_deterministic(input in scoring_input()) {
        let service = ScoringService::default();
        let first = service.predict(&input);
        let second = service.predict(&input);

        prop_assert_eq!(first.prediction, second.prediction);
        prop_assert_eq!(first.confidence, second.confidence);
        prop_assert_eq!(first.models, second.models);
    }

    #[test]
    fn votes_always_total_four(input in scoring_input()) {
        let outcome = ScoringService::default().predict(&input);
        let votes = outcome.models.votes;
        prop_assert_eq!(votes.good + votes.bad, 4);
        prop_assert_eq!(outcome.prediction == Label::Good, votes.good > votes.bad);
    }

    #[test]
    fn stats_ratios_sum_to_hundred(labels in proptest::collection::vec(any::<bool>(), 1..40)) {
        let records: Vec<PredictionRecord> = labels
            .iter()
            .map(|&good| record(if good { Label::Good } else { Label::Bad }, "45", "No", "No"))
            .collect();

        let stats = PredictionStats::from_records(1, &records);
        prop_assert!((stats.good_ratio + stats.bad_ratio - 100.0).abs() < 1e-9);
        prop_assert_eq!(stats.good_predictions + stats.bad_predictions, labels.len() as u32);
    }
}

#[test]
fn stats_for_empty_collection_are_zero() {
    let stats = PredictionStats::from_records(3, &[]);
    assert_eq!(stats.total_users, 3);
    assert_eq!(stats.total_predictions, 0);
    assert_eq!(stats.good_ratio, 0.0);
    assert_eq!(stats.bad_ratio, 0.0);
    assert_eq!(stats.average_confidence, 0.0);
}

#[test]
fn elderly_hypertensive_patient_hits_first_rule() {
    let input = ScoringInput {
        age: "75".to_string(),
        gender: "Male".to_string(),
        hypertension: "Yes".to_string(),
        diabetes: "No".to_string(),
        ..Default::default()
    };
    let features = Features::from(&input);
    let result = decision_tree_predict(&features, &ModelParams::default().decision_tree);

    assert_eq!(result.prediction, Label::Bad);
    assert_eq!(result.confidence, 0.85);
}
