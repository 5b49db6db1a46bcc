//! Database layer (Firestore).

pub mod firestore;

pub use firestore::FirestoreDb;

/// Collection names as constants.
pub mod collections {
    /// Registered users
    pub const CLIENT_REGISTER: &str = "client_register";
    /// Scored prediction submissions
    pub const MORTALITY_PREDICTIONS: &str = "mortality_predictions";
}
