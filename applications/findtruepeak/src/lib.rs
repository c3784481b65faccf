//! findtruepeak
//!
//! Command line true peak meter: decodes audio files with Symphonia and
//! feeds them through [`truepeak::TruePeakEstimator`].
//!
//! This library exposes the driver components for testing purposes.

pub mod config;
pub mod error;
pub mod measure;
pub mod output;
pub mod reader;

pub use config::{MeterConfig, OutputFormat};
pub use error::{MeterError, Result};
pub use measure::measure_file;
pub use reader::{AudioStream, DecodedChunk};
