//! Error types for true peak estimation

use std::collections::TryReserveError;
use thiserror::Error;

/// Result type for true peak operations
pub type Result<T> = std::result::Result<T, TruePeakError>;

/// Errors that can occur while creating or feeding a [`crate::TruePeakEstimator`]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TruePeakError {
    /// Channel count must be at least one
    #[error("Invalid channel count: {0} (must be at least 1)")]
    InvalidChannelCount(usize),

    /// Only 44100 Hz and 48000 Hz have coefficient tables
    #[error("Unsupported sample rate: {0} Hz (supported: 44100, 48000)")]
    UnsupportedSampleRate(u32),

    /// Sample buffer holds fewer values than `channels * frames`
    #[error("Sample buffer too short: expected {expected} samples, got {actual}")]
    BufferTooShort { expected: usize, actual: usize },

    /// Interleaved buffer length is not a whole number of frames
    #[error("Sample count {len} is not divisible by channel count {channels}")]
    MisalignedBuffer { len: usize, channels: usize },

    /// Channel index past the estimator's channel count
    #[error("Channel {channel} out of range (estimator has {channels} channels)")]
    ChannelOutOfRange { channel: usize, channels: usize },

    /// Per-channel storage could not be reserved
    #[error("Allocation failed: {0}")]
    Allocation(String),
}

impl From<TryReserveError> for TruePeakError {
    fn from(err: TryReserveError) -> Self {
        Self::Allocation(err.to_string())
    }
}
