/// File-level true peak measurement
use crate::config::MeterConfig;
use crate::error::{MeterError, Result};
use crate::reader::AudioStream;
use std::path::Path;
use truepeak::{TruePeakEstimator, TruePeakReport};

/// Decode `path` and measure the true peak of every channel
///
/// Every decoded chunk is pushed exactly once, in stream order. Nothing is
/// returned for a file that fails to open, has a corrupt packet, or ends
/// before the frame count its container declares.
pub fn measure_file(path: &Path, config: &MeterConfig) -> Result<TruePeakReport> {
    let mut stream = AudioStream::open(path)?;
    tracing::info!(
        path = %path.display(),
        channels = stream.channels(),
        sample_rate = stream.sample_rate(),
        total_frames = ?stream.total_frames(),
        "Opened audio stream"
    );

    let mut estimator = TruePeakEstimator::new(stream.channels(), stream.sample_rate())?;

    let mut chunks = 0_usize;
    while let Some(chunk) = stream.next_chunk()? {
        chunk.push_into(&mut estimator, config.chunk_frames)?;
        chunks += 1;
    }

    let report = estimator.finish();

    if let Some(declared) = stream.total_frames() {
        if report.frames < declared {
            return Err(MeterError::Truncated {
                declared,
                decoded: report.frames,
            });
        }
    }

    tracing::debug!(
        path = %path.display(),
        chunks,
        frames = report.frames,
        max_peak_db = report.max_peak_db(),
        "Measured true peak"
    );

    Ok(report)
}
