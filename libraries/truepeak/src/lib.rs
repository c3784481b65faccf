//! True peak estimation per ITU-R BS.1770
//!
//! The sample peak of a digital signal can understate the level the
//! reconstructed analog signal reaches between samples. This crate estimates
//! that inter-sample ("true") peak by 4x oversampling each channel with a
//! 4-phase, 12-tap polyphase interpolator and tracking the largest absolute
//! interpolated value.
//!
//! # Architecture
//!
//! ```text
//! interleaved chunk ──► Sample::to_linear ──► ChannelHistory (ring of 12)
//!                                                   │
//!                                                   ▼
//!                                  FilterBank (4 phases x 12 taps)
//!                                                   │
//!                                                   ▼
//!                                       running max |y| per channel
//! ```
//!
//! The crate performs no I/O: callers decode audio themselves and push
//! interleaved buffers in stream order.
//!
//! # Example
//!
//! ```
//! use truepeak::{linear_to_dbtp, TruePeakEstimator};
//!
//! let mut estimator = TruePeakEstimator::new(1, 44100)?;
//! let sine: Vec<f32> = (0..4410)
//!     .map(|i| (2.0 * std::f32::consts::PI * 11025.0 * i as f32 / 44100.0 + 0.785).sin())
//!     .collect();
//! estimator.add_frames(&sine)?;
//!
//! let report = estimator.finish();
//! println!("True peak: {:.2} dBTP", linear_to_dbtp(report.max_peak()));
//! # Ok::<(), truepeak::TruePeakError>(())
//! ```

#![deny(unsafe_code)]

mod coefficients;
mod error;
mod estimator;
mod history;
mod report;
mod sample;

pub use coefficients::{FilterBank, SampleRate, FILTER_SIZE, PHASES};
pub use error::{Result, TruePeakError};
pub use estimator::TruePeakEstimator;
pub use report::{format_db, linear_to_dbtp, TruePeakReport, DEFAULT_DB_PRECISION};
pub use sample::{Sample, I32_SCALE};
