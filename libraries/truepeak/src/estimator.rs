//! Streaming true peak estimator
//!
//! Feeds interleaved audio through a 4-phase polyphase interpolator (4x
//! oversampling, ITU-R BS.1770 Annex 2) and keeps the largest absolute
//! interpolated value seen on each channel.

use crate::coefficients::{FilterBank, SampleRate, FILTER_SIZE};
use crate::error::{Result, TruePeakError};
use crate::history::ChannelHistory;
use crate::report::{linear_to_dbtp, TruePeakReport};
use crate::sample::Sample;

/// True peak meter for one audio stream
///
/// Frames must be pushed in stream order; chunk boundaries do not matter.
/// The running maxima only ever grow, so reads taken before the last push
/// are "maximum so far".
///
/// # Example
///
/// ```
/// use truepeak::TruePeakEstimator;
///
/// let mut estimator = TruePeakEstimator::new(2, 48000)?;
///
/// // Two frames of interleaved stereo
/// estimator.push_f32(&[0.5, -0.25, 0.5, -0.25], 2)?;
///
/// let left = estimator.max_true_peak(0)?;
/// assert!(left > 0.0);
/// # Ok::<(), truepeak::TruePeakError>(())
/// ```
#[derive(Debug, Clone)]
pub struct TruePeakEstimator {
    /// Input sample rate
    sample_rate: SampleRate,
    /// Coefficients for `sample_rate`, shared by all channels
    bank: &'static FilterBank,
    /// One history ring per channel
    histories: Vec<ChannelHistory>,
    /// Running maximum (linear) per channel
    max_peaks: Vec<f64>,
    /// Ring slot written by the next frame, shared by all channels
    pos: usize,
    /// Frames pushed so far
    frames_processed: u64,
}

impl TruePeakEstimator {
    /// Create an estimator for `channels` interleaved channels
    ///
    /// # Arguments
    /// * `channels` - Number of channels (at least 1)
    /// * `sample_rate` - Input rate in Hz (44100 or 48000)
    ///
    /// # Errors
    /// Returns error if the channel count is zero, the rate has no
    /// coefficient table, or channel storage cannot be allocated
    pub fn new(channels: usize, sample_rate: u32) -> Result<Self> {
        Self::with_rate(channels, SampleRate::try_from(sample_rate)?)
    }

    /// Create an estimator from an already validated rate
    pub fn with_rate(channels: usize, sample_rate: SampleRate) -> Result<Self> {
        if channels == 0 {
            return Err(TruePeakError::InvalidChannelCount(channels));
        }

        let mut histories = Vec::new();
        histories.try_reserve_exact(channels)?;
        histories.resize_with(channels, ChannelHistory::default);

        let mut max_peaks = Vec::new();
        max_peaks.try_reserve_exact(channels)?;
        max_peaks.resize(channels, 0.0);

        tracing::debug!(channels, sample_rate = sample_rate.hz(), "Created true peak estimator");

        Ok(Self {
            sample_rate,
            bank: sample_rate.filter_bank(),
            histories,
            max_peaks,
            pos: 0,
            frames_processed: 0,
        })
    }

    /// Number of interleaved channels
    pub fn channels(&self) -> usize {
        self.histories.len()
    }

    /// Input sample rate
    pub fn sample_rate(&self) -> SampleRate {
        self.sample_rate
    }

    /// Coefficients selected for the input rate
    pub fn filter_bank(&self) -> &'static FilterBank {
        self.bank
    }

    /// Frames pushed since creation
    pub fn frames_processed(&self) -> u64 {
        self.frames_processed
    }

    /// Push `frames` frames of interleaved samples
    ///
    /// Only the first `channels * frames` values of `samples` are read.
    /// Pushing zero frames does nothing.
    ///
    /// # Errors
    /// Returns [`TruePeakError::BufferTooShort`] if `samples` holds fewer
    /// than `channels * frames` values. The estimator is left untouched.
    pub fn push_samples<S: Sample>(&mut self, samples: &[S], frames: usize) -> Result<()> {
        if frames == 0 {
            return Ok(());
        }

        let channels = self.channels();
        let expected = channels
            .checked_mul(frames)
            .filter(|&expected| expected <= samples.len())
            .ok_or(TruePeakError::BufferTooShort {
                expected: channels.saturating_mul(frames),
                actual: samples.len(),
            })?;

        let bank = self.bank;
        let mut pos = self.pos;
        for frame in samples[..expected].chunks_exact(channels) {
            for ((history, max_peak), sample) in self
                .histories
                .iter_mut()
                .zip(self.max_peaks.iter_mut())
                .zip(frame)
            {
                history.write(pos, sample.to_linear());
                for value in history.interpolate(pos, bank) {
                    let magnitude = value.abs();
                    if magnitude > *max_peak {
                        *max_peak = magnitude;
                    }
                }
            }
            pos = (pos + 1) % FILTER_SIZE;
        }

        self.pos = pos;
        self.frames_processed += frames as u64;
        tracing::trace!(frames, total = self.frames_processed, "Pushed frames");

        Ok(())
    }

    /// Push frames of 64-bit float samples
    pub fn push_f64(&mut self, samples: &[f64], frames: usize) -> Result<()> {
        self.push_samples(samples, frames)
    }

    /// Push frames of 32-bit float samples
    pub fn push_f32(&mut self, samples: &[f32], frames: usize) -> Result<()> {
        self.push_samples(samples, frames)
    }

    /// Push frames of 32-bit integer samples (scaled by `1 / i32::MAX`)
    pub fn push_i32(&mut self, samples: &[i32], frames: usize) -> Result<()> {
        self.push_samples(samples, frames)
    }

    /// Push a whole interleaved buffer
    ///
    /// # Notes
    /// - Samples should be interleaved (L R L R... for stereo)
    /// - Length must be divisible by channel count
    pub fn add_frames<S: Sample>(&mut self, samples: &[S]) -> Result<()> {
        let channels = self.channels();
        if samples.len() % channels != 0 {
            return Err(TruePeakError::MisalignedBuffer {
                len: samples.len(),
                channels,
            });
        }
        self.push_samples(samples, samples.len() / channels)
    }

    /// Largest true peak seen so far on `channel` (linear, never negative)
    ///
    /// # Errors
    /// Returns [`TruePeakError::ChannelOutOfRange`] for an invalid index
    pub fn max_true_peak(&self, channel: usize) -> Result<f64> {
        self.max_peaks
            .get(channel)
            .copied()
            .ok_or(TruePeakError::ChannelOutOfRange {
                channel,
                channels: self.channels(),
            })
    }

    /// Largest true peak seen so far on `channel`, in dBTP
    ///
    /// An untouched or silent channel reports negative infinity.
    pub fn max_true_peak_db(&self, channel: usize) -> Result<f64> {
        self.max_true_peak(channel).map(linear_to_dbtp)
    }

    /// Running maxima of all channels (linear)
    pub fn max_true_peaks(&self) -> &[f64] {
        &self.max_peaks
    }

    /// Current results without ending the measurement
    pub fn snapshot(&self) -> TruePeakReport {
        TruePeakReport {
            sample_rate: self.sample_rate,
            channels: self.channels(),
            frames: self.frames_processed,
            peaks: self.max_peaks.clone(),
        }
    }

    /// End the measurement and release the filter state
    pub fn finish(self) -> TruePeakReport {
        tracing::debug!(
            frames = self.frames_processed,
            channels = self.channels(),
            "Finished true peak measurement"
        );
        TruePeakReport {
            sample_rate: self.sample_rate,
            channels: self.histories.len(),
            frames: self.frames_processed,
            peaks: self.max_peaks,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_estimator_creation() {
        assert!(TruePeakEstimator::new(1, 44100).is_ok());
        assert!(TruePeakEstimator::new(2, 48000).is_ok());
        assert!(TruePeakEstimator::new(8, 48000).is_ok());

        assert_eq!(
            TruePeakEstimator::new(0, 48000).unwrap_err(),
            TruePeakError::InvalidChannelCount(0)
        );
        assert_eq!(
            TruePeakEstimator::new(2, 96000).unwrap_err(),
            TruePeakError::UnsupportedSampleRate(96000)
        );
        assert_eq!(
            TruePeakEstimator::new(2, 22050).unwrap_err(),
            TruePeakError::UnsupportedSampleRate(22050)
        );
        assert!(TruePeakEstimator::with_rate(0, SampleRate::Hz44100).is_err());
    }

    #[test]
    fn test_fresh_estimator_reads_zero() {
        let estimator = TruePeakEstimator::new(3, 48000).unwrap();
        for channel in 0..3 {
            assert_eq!(estimator.max_true_peak(channel).unwrap(), 0.0);
            assert_eq!(estimator.max_true_peak_db(channel).unwrap(), f64::NEG_INFINITY);
        }
        assert_eq!(estimator.frames_processed(), 0);
    }

    #[test]
    fn test_channel_out_of_range() {
        let estimator = TruePeakEstimator::new(2, 48000).unwrap();
        assert_eq!(
            estimator.max_true_peak(2).unwrap_err(),
            TruePeakError::ChannelOutOfRange {
                channel: 2,
                channels: 2
            }
        );
    }

    #[test]
    fn test_zero_frames_is_noop() {
        let mut estimator = TruePeakEstimator::new(1, 48000).unwrap();
        estimator.push_f64(&[], 0).unwrap();
        // Buffer content is ignored when no frames are requested
        estimator.push_f64(&[1.0], 0).unwrap();
        assert_eq!(estimator.max_true_peak(0).unwrap(), 0.0);
        assert_eq!(estimator.pos, 0);
        assert_eq!(estimator.frames_processed(), 0);
    }

    #[test]
    fn test_short_buffer_does_not_mutate() {
        let mut estimator = TruePeakEstimator::new(2, 48000).unwrap();
        estimator.push_f64(&[0.5, 0.5], 1).unwrap();
        let before = estimator.snapshot();
        let pos = estimator.pos;

        let err = estimator.push_f64(&[1.0, 1.0, 1.0], 2).unwrap_err();
        assert_eq!(
            err,
            TruePeakError::BufferTooShort {
                expected: 4,
                actual: 3
            }
        );
        assert_eq!(estimator.snapshot(), before);
        assert_eq!(estimator.pos, pos);
    }

    #[test]
    fn test_overflowing_frame_count_is_rejected() {
        let mut estimator = TruePeakEstimator::new(2, 48000).unwrap();
        let result = estimator.push_f32(&[0.0; 4], usize::MAX);
        assert!(matches!(result, Err(TruePeakError::BufferTooShort { .. })));
    }

    #[test]
    fn test_extra_samples_are_ignored() {
        let mut estimator = TruePeakEstimator::new(1, 48000).unwrap();
        estimator.push_f64(&[0.0, 0.0, 1.0], 2).unwrap();
        assert_eq!(estimator.max_true_peak(0).unwrap(), 0.0);
        assert_eq!(estimator.frames_processed(), 2);
    }

    #[test]
    fn test_cursor_wraps_after_filter_size_frames() {
        let mut estimator = TruePeakEstimator::new(2, 44100).unwrap();
        estimator.push_f32(&[0.0; 2 * 13], 13).unwrap();
        assert_eq!(estimator.pos, 1);
    }

    #[test]
    fn test_add_frames_requires_whole_frames() {
        let mut estimator = TruePeakEstimator::new(2, 44100).unwrap();
        assert_eq!(
            estimator.add_frames(&[0.1_f32; 5]).unwrap_err(),
            TruePeakError::MisalignedBuffer {
                len: 5,
                channels: 2
            }
        );
        estimator.add_frames(&[0.1_f32; 6]).unwrap();
        assert_eq!(estimator.frames_processed(), 3);
    }

    #[test]
    fn test_single_impulse_reads_newest_taps() {
        let mut estimator = TruePeakEstimator::new(1, 48000).unwrap();
        estimator.push_f64(&[1.0], 1).unwrap();

        let bank = estimator.filter_bank();
        let expected = bank
            .phases()
            .iter()
            .map(|phase| phase[0].abs())
            .fold(0.0, f64::max);
        assert_eq!(estimator.max_true_peak(0).unwrap(), expected);
        assert_eq!(expected, 0.0291748046875);
    }

    #[test]
    fn test_finish_returns_running_maxima() {
        let mut estimator = TruePeakEstimator::new(2, 48000).unwrap();
        estimator.push_f64(&[0.5, 0.0, 0.5, 0.0, 0.5, 0.0], 3).unwrap();
        let peaks = estimator.max_true_peaks().to_vec();

        let report = estimator.finish();
        assert_eq!(report.peaks, peaks);
        assert_eq!(report.frames, 3);
        assert_eq!(report.channels, 2);
        assert_eq!(report.sample_rate, SampleRate::Hz48000);
        assert_eq!(report.peaks[1], 0.0);
    }
}
