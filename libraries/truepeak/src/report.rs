//! Measurement results

use crate::coefficients::SampleRate;
use serde::Serialize;
use std::fmt;

/// Default number of decimals when printing dBTP values
pub const DEFAULT_DB_PRECISION: usize = 6;

/// Convert a linear magnitude to dBTP (`20 * log10(x)`)
///
/// Zero maps to negative infinity.
pub fn linear_to_dbtp(linear: f64) -> f64 {
    if linear > 0.0 {
        20.0 * linear.log10()
    } else {
        f64::NEG_INFINITY
    }
}

/// Format a dBTP value, printing `-inf` for silence
pub fn format_db(db: f64, precision: usize) -> String {
    if db == f64::NEG_INFINITY {
        "-inf".to_string()
    } else {
        format!("{:.*}", precision, db)
    }
}

/// Per-channel true peaks of one measured stream
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TruePeakReport {
    /// Input sample rate
    pub sample_rate: SampleRate,
    /// Number of channels
    pub channels: usize,
    /// Frames pushed into the estimator
    pub frames: u64,
    /// Maximum true peak per channel (linear)
    pub peaks: Vec<f64>,
}

impl TruePeakReport {
    /// True peak of `channel` in dBTP
    pub fn peak_db(&self, channel: usize) -> Option<f64> {
        self.peaks.get(channel).copied().map(linear_to_dbtp)
    }

    /// All channels in dBTP
    pub fn peaks_db(&self) -> Vec<f64> {
        self.peaks.iter().copied().map(linear_to_dbtp).collect()
    }

    /// Largest true peak across channels (linear)
    pub fn max_peak(&self) -> f64 {
        self.peaks.iter().copied().fold(0.0, f64::max)
    }

    /// Largest true peak across channels in dBTP
    pub fn max_peak_db(&self) -> f64 {
        linear_to_dbtp(self.max_peak())
    }
}

impl fmt::Display for TruePeakReport {
    /// One `Channel <i>\t MaxTP : <dB>` line per channel
    ///
    /// The formatter precision (`{:.2}`) sets the decimals, default 6.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let precision = f.precision().unwrap_or(DEFAULT_DB_PRECISION);
        for (channel, db) in self.peaks_db().into_iter().enumerate() {
            if channel > 0 {
                writeln!(f)?;
            }
            write!(f, "Channel {}\t MaxTP : {}", channel, format_db(db, precision))?;
        }
        Ok(())
    }
}
