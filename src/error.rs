//! Application-level errors.

use log::error;
use uuid::Uuid;

#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum AppError {
    #[error("Missing config with key \"{key}\"")]
    MissingConfig { key: String },

    #[error("Configuration error: {msg}")]
    ConfigurationError { msg: String },
}

impl AppError {
    /// Logs an unexpected error under a fresh reference id and returns the id,
    /// so users can quote it back.
    pub fn log_with_ref(error: &(dyn std::error::Error + Send + Sync)) -> String {
        let ref_id = Uuid::new_v4().simple().to_string();
        error!("[ref:{}] {:?}", ref_id, error);
        ref_id
    }
}
