//! Application configuration loaded from environment variables.
//!
//! A `.env` file is honored for local development.

use std::env;

/// Admin codes accepted when `ADMIN_CODES` is not set.
pub const DEFAULT_ADMIN_CODES: [&str; 2] = ["ADMIN123", "Admin"];

/// Application configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Frontend URL (allowed CORS origin)
    pub frontend_url: String,
    /// GCP project ID (Firestore)
    pub gcp_project_id: String,
    /// Server port
    pub port: u16,
    /// JWT signing key for session tokens (raw bytes)
    pub jwt_signing_key: Vec<u8>,
    /// Shared codes granting an admin session
    pub admin_codes: Vec<String>,
    /// Optional JSON file overriding the built-in model parameters
    pub model_params_path: Option<String>,
}

impl Config {
    /// Default config for testing only.
    pub fn test_default() -> Self {
        Self {
            frontend_url: "http://localhost:3000".to_string(),
            gcp_project_id: "test-project".to_string(),
            port: 8080,
            jwt_signing_key: b"test_jwt_key_32_bytes_minimum!!".to_vec(),
            admin_codes: DEFAULT_ADMIN_CODES.iter().map(|c| c.to_string()).collect(),
            model_params_path: None,
        }
    }

    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        let jwt_signing_key = env::var("JWT_SIGNING_KEY")
            .map_err(|_| ConfigError::Missing("JWT_SIGNING_KEY"))?
            .into_bytes();
        if jwt_signing_key.is_empty() {
            return Err(ConfigError::Invalid("JWT_SIGNING_KEY must not be empty"));
        }

        let admin_codes = match env::var("ADMIN_CODES") {
            Ok(raw) => parse_admin_codes(&raw),
            Err(_) => DEFAULT_ADMIN_CODES.iter().map(|c| c.to_string()).collect(),
        };
        if admin_codes.is_empty() {
            return Err(ConfigError::Invalid("ADMIN_CODES must list at least one code"));
        }

        Ok(Self {
            frontend_url: env::var("FRONTEND_URL")
                .unwrap_or_else(|_| "http://localhost:3000".to_string()),
            gcp_project_id: env::var("GCP_PROJECT_ID").unwrap_or_else(|_| "local-dev".to_string()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .unwrap_or(8080),
            jwt_signing_key,
            admin_codes,
            model_params_path: env::var("MODEL_PARAMS_PATH")
                .ok()
                .filter(|p| !p.trim().is_empty()),
        })
    }
}

/// Split a comma-separated code list, dropping blanks.
fn parse_admin_codes(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .map(String::from)
        .collect()
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),

    #[error("Invalid configuration: {0}")]
    Invalid(&'static str),
}
