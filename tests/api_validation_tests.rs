// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! API input validation tests.
//!
//! Validation runs before any database access, so every case here answers
//! 400 even with the offline database.

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
};
use mortality_predictor::middleware::auth::Role;
use serde_json::json;
use tower::ServiceExt;

mod common;

fn prediction_body() -> serde_json::Value {
    json!({
        "Fid": "F-1",
        "PatientId": "P-1",
        "Age": "64",
        "Gender": "Male",
        "Hipertension": "Yes",
        "Diabetes": "No"
    })
}

async fn post_json(uri: &str, token: Option<&str>, body: serde_json::Value) -> StatusCode {
    let (app, _) = common::create_test_app();

    let mut builder = Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }

    app.oneshot(builder.body(Body::from(body.to_string())).unwrap())
        .await
        .unwrap()
        .status()
}

#[tokio::test]
async fn test_prediction_rejects_unknown_gender() {
    let token = common::create_test_jwt("user-1", Role::User);
    let mut body = prediction_body();
    body["Gender"] = "Unknown".into();

    let status = post_json("/api/predictions", Some(&token), body).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_prediction_rejects_empty_patient_id() {
    let token = common::create_test_jwt("user-1", Role::User);
    let mut body = prediction_body();
    body["PatientId"] = "".into();

    let status = post_json("/api/predictions", Some(&token), body).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_prediction_rejects_long_diagnosis() {
    let token = common::create_test_jwt("user-1", Role::User);
    let mut body = prediction_body();
    body["Patient_Diagnosis"] = "a".repeat(301).into();

    let status = post_json("/api/predictions", Some(&token), body).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_prediction_valid_body_reaches_database() {
    let token = common::create_test_jwt("user-1", Role::User);

    let status = post_json("/api/predictions", Some(&token), prediction_body()).await;
    // Offline database
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn test_register_rejects_invalid_email() {
    let body = json!({
        "username": "nurse",
        "email": "not-an-email",
        "password": "secret"
    });

    let status = post_json("/auth/register", None, body).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_login_requires_both_fields() {
    let body = json!({ "username": "nurse", "password": "" });

    let status = post_json("/auth/login", None, body).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_prediction_list_rejects_zero_limit() {
    let (app, _) = common::create_test_app();
    let token = common::create_test_jwt("user-1", Role::User);

    let response = app
        .oneshot(
            Request::builder()
                .method("GET")
                .uri("/api/predictions?limit=0")
                .header(header::AUTHORIZATION, format!("Bearer {}", token))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
