//! Registered user model for storage and API.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

use crate::time_utils::format_utc_rfc3339;

/// User record stored in the `client_register` collection.
///
/// Field names match the existing documents. The password is stored as
/// submitted and compared by exact match at login.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    /// Firestore document ID (populated on reads)
    #[serde(rename = "_firestore_id", default, skip_serializing)]
    pub id: Option<String>,
    pub username: String,
    #[serde(default)]
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub phoneno: String,
    #[serde(default)]
    pub country: String,
    #[serde(default)]
    pub state: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub gender: String,
    #[serde(default)]
    pub address: String,
    /// Server timestamp at registration (absent on seeded users)
    #[serde(
        rename = "registeredAt",
        default,
        with = "firestore::serialize_as_optional_timestamp"
    )]
    pub registered_at: Option<DateTime<Utc>>,
}

/// Public view of a user (never includes the password).
#[derive(Debug, Clone, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct UserProfile {
    pub id: String,
    pub username: String,
    pub email: String,
    pub phoneno: String,
    pub country: String,
    pub state: String,
    pub city: String,
    pub gender: String,
    pub address: String,
    pub registered_at: Option<String>,
}

impl From<&User> for UserProfile {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.clone().unwrap_or_default(),
            username: user.username.clone(),
            email: user.email.clone(),
            phoneno: user.phoneno.clone(),
            country: user.country.clone(),
            state: user.state.clone(),
            city: user.city.clone(),
            gender: user.gender.clone(),
            address: user.address.clone(),
            registered_at: user.registered_at.map(format_utc_rfc3339),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_profile_omits_password() {
        let user = User {
            id: Some("abc".to_string()),
            username: "alice".to_string(),
            email: "alice@example.com".to_string(),
            password: "hunter2".to_string(),
            phoneno: String::new(),
            country: "India".to_string(),
            state: String::new(),
            city: "Bangalore".to_string(),
            gender: "Female".to_string(),
            address: String::new(),
            registered_at: Some(Utc.with_ymd_and_hms(2024, 3, 1, 9, 30, 0).unwrap()),
        };

        let json = serde_json::to_value(UserProfile::from(&user)).unwrap();
        assert!(json.get("password").is_none());
        assert_eq!(json["id"], "abc");
        assert_eq!(json["registered_at"], "2024-03-01T09:30:00Z");
    }
}
