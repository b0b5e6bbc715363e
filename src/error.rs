//! Error types.
//!
//! Only persistence, configuration, and number parsing can fail. Unknown
//! bookmark or shape ids and out-of-range zoom requests are tolerated where
//! they occur (no-op or clamp) and never surface here.

/// A string that is not a decimal number.
#[derive(Debug, thiserror::Error)]
#[error("invalid decimal '{text}': {source}")]
pub struct ScalarParseError {
    pub text: String,
    #[source]
    pub source: bigdecimal::ParseBigDecimalError,
}

/// Failure talking to the durable blob store.
#[derive(Debug, thiserror::Error)]
pub enum PersistenceError {
    #[error("storage io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("snapshot encoding error: {0}")]
    Encode(#[from] serde_json::Error),
    #[error("invalid storage key: {0}")]
    InvalidKey(String),
}

/// Invalid engine configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid value for {var}: {value}")]
    InvalidValue { var: String, value: String },
    #[error("min range {min} must be positive and below max range {max}")]
    InvalidRangeBounds { min: String, max: String },
}
