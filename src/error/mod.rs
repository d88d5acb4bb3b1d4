use thiserror::Error;

/// Errors raised by the notification subsystem.
///
/// Only `InvalidPayload` is ever surfaced to callers. It is a construction
/// contract violation caught before any state mutation. Everything else is
/// recovered internally: a corrupt durable slot degrades the store to an empty
/// collection, storage and feedback failures are logged and swallowed.
#[derive(Error, Debug)]
pub enum NotificationError {
    #[error("Invalid payload: {0}")]
    InvalidPayload(String),

    #[error("Durable slot corrupt: {0}")]
    Corruption(#[from] serde_json::Error),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),
}

pub type Result<T> = std::result::Result<T, NotificationError>;
