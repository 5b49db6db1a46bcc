// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Registration, login and session routes.

use axum::{
    extract::State,
    http::StatusCode,
    routing::post,
    Json, Router,
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use validator::Validate;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

use crate::error::{AppError, Result};
use crate::middleware::auth::{create_jwt, Role, ADMIN_SUBJECT, SESSION_COOKIE, SESSION_TTL_SECS};
use crate::models::{User, UserProfile};
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
        .route("/auth/admin", post(admin_login))
        .route("/auth/logout", post(logout))
}

/// Registration form.
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(length(min = 1, max = 30))]
    pub username: String,
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1, max = 100))]
    pub password: String,
    #[serde(default)]
    #[validate(length(max = 30))]
    pub phoneno: String,
    #[serde(default)]
    #[validate(length(max = 100))]
    pub country: String,
    #[serde(default)]
    #[validate(length(max = 100))]
    pub state: String,
    #[serde(default)]
    #[validate(length(max = 100))]
    pub city: String,
    #[serde(default)]
    #[validate(length(max = 30))]
    pub gender: String,
    #[serde(default)]
    #[validate(length(max = 300))]
    pub address: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct AdminLoginRequest {
    pub code: String,
}

/// Issued session.
#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct SessionResponse {
    pub token: String,
    pub role: String,
    /// Present for user sessions only
    pub user: Option<UserProfile>,
}

/// Register a new user. Usernames are not checked for uniqueness.
async fn register(
    State(state): State<Arc<AppState>>,
    Json(req): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<UserProfile>)> {
    req.validate()?;

    let user = User {
        id: None,
        username: req.username,
        email: req.email,
        password: req.password,
        phoneno: req.phoneno,
        country: req.country,
        state: req.state,
        city: req.city,
        gender: req.gender,
        address: req.address,
        registered_at: Some(Utc::now()),
    };

    let stored = state.db.create_user(&user).await?;

    tracing::info!(
        user_id = stored.id.as_deref().unwrap_or_default(),
        username = %stored.username,
        "User registered"
    );

    Ok((StatusCode::CREATED, Json(UserProfile::from(&stored))))
}

/// Log in with an exact username/password match.
async fn login(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Json(req): Json<LoginRequest>,
) -> Result<(CookieJar, Json<SessionResponse>)> {
    if req.username.is_empty() || req.password.is_empty() {
        return Err(AppError::BadRequest(
            "Username and password are required".to_string(),
        ));
    }

    let Some(user) = state
        .db
        .find_user_by_credentials(&req.username, &req.password)
        .await?
    else {
        tracing::warn!(username = %req.username, "Login failed");
        return Err(AppError::InvalidCredentials);
    };

    let user_id = user
        .id
        .clone()
        .ok_or_else(|| AppError::Internal(anyhow::anyhow!("User document has no ID")))?;
    let token = create_jwt(&user_id, Role::User, &state.config.jwt_signing_key)?;

    tracing::info!(user_id = %user_id, "User logged in");

    let jar = jar.add(session_cookie(token.clone(), &state.config.frontend_url));
    Ok((
        jar,
        Json(SessionResponse {
            token,
            role: "user".to_string(),
            user: Some(UserProfile::from(&user)),
        }),
    ))
}

/// Exchange a shared admin code for an admin session.
async fn admin_login(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Json(req): Json<AdminLoginRequest>,
) -> Result<(CookieJar, Json<SessionResponse>)> {
    if !is_admin_code(&state.config.admin_codes, &req.code) {
        tracing::warn!("Admin login failed");
        return Err(AppError::InvalidCredentials);
    }

    let token = create_jwt(ADMIN_SUBJECT, Role::Admin, &state.config.jwt_signing_key)?;
    tracing::info!("Admin session issued");

    let jar = jar.add(session_cookie(token.clone(), &state.config.frontend_url));
    Ok((
        jar,
        Json(SessionResponse {
            token,
            role: "admin".to_string(),
            user: None,
        }),
    ))
}

/// Clear the session cookie.
async fn logout(State(state): State<Arc<AppState>>, jar: CookieJar) -> (CookieJar, StatusCode) {
    let removal = base_cookie(String::new(), &state.config.frontend_url);
    (jar.remove(removal), StatusCode::NO_CONTENT)
}

fn is_admin_code(codes: &[String], candidate: &str) -> bool {
    !candidate.is_empty() && codes.iter().any(|code| code == candidate)
}

/// Cookie attributes shared by creation and removal, so browsers match them.
fn base_cookie(value: String, frontend_url: &str) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, value))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(frontend_url.starts_with("https://"))
        .build()
}

fn session_cookie(token: String, frontend_url: &str) -> Cookie<'static> {
    let mut cookie = base_cookie(token, frontend_url);
    cookie.set_max_age(time::Duration::seconds(SESSION_TTL_SECS as i64));
    cookie
}
