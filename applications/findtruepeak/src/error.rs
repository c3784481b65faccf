/// Driver error types
use thiserror::Error;

pub type Result<T> = std::result::Result<T, MeterError>;

#[derive(Debug, Error)]
pub enum MeterError {
    #[error("Failed to open {path}: {reason}")]
    Open { path: String, reason: String },

    #[error("Decode error: {0}")]
    Decode(String),

    #[error("No audio tracks found")]
    NoAudioTrack,

    #[error("Stream does not declare its {0}")]
    MissingStreamParameter(&'static str),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Stream ended after {decoded} of {declared} frames")]
    Truncated { declared: u64, decoded: u64 },

    #[error("Measurement error: {0}")]
    Estimator(#[from] truepeak::TruePeakError),
}

impl From<config::ConfigError> for MeterError {
    fn from(err: config::ConfigError) -> Self {
        MeterError::Config(err.to_string())
    }
}
