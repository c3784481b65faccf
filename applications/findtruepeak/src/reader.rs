/// Streaming audio reader using Symphonia
///
/// Opens a file once, reports its channel count and sample rate, then hands
/// out interleaved decoded chunks in stream order. The sample representation
/// of each chunk follows the decoder output so integer and double precision
/// sources reach the estimator without an intermediate f32 conversion.
use crate::error::{MeterError, Result};
use std::path::Path;
use symphonia::core::audio::{AudioBufferRef, SampleBuffer};
use symphonia::core::codecs::{Decoder, DecoderOptions};
use symphonia::core::errors::Error as SymphoniaError;
use symphonia::core::formats::{FormatOptions, FormatReader};
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;
use truepeak::{Sample, TruePeakEstimator};

/// One decoded packet, interleaved
#[derive(Debug, Clone, PartialEq)]
pub enum DecodedChunk {
    F64(Vec<f64>),
    F32(Vec<f32>),
    S32(Vec<i32>),
}

impl DecodedChunk {
    /// Push the chunk into `estimator`, at most `chunk_frames` frames per call
    pub fn push_into(
        &self,
        estimator: &mut TruePeakEstimator,
        chunk_frames: usize,
    ) -> truepeak::Result<()> {
        match self {
            Self::F64(samples) => push_chunked(estimator, samples, chunk_frames),
            Self::F32(samples) => push_chunked(estimator, samples, chunk_frames),
            Self::S32(samples) => push_chunked(estimator, samples, chunk_frames),
        }
    }
}

fn push_chunked<S: Sample>(
    estimator: &mut TruePeakEstimator,
    samples: &[S],
    chunk_frames: usize,
) -> truepeak::Result<()> {
    let chunk_len = chunk_frames.max(1) * estimator.channels();
    for chunk in samples.chunks(chunk_len) {
        estimator.add_frames(chunk)?;
    }
    Ok(())
}

/// Open audio file being read packet by packet
pub struct AudioStream {
    /// Format reader (container parser)
    format: Box<dyn FormatReader>,
    /// Audio decoder
    decoder: Box<dyn Decoder>,
    /// Track ID
    track_id: u32,
    /// Sample rate
    sample_rate: u32,
    /// Number of channels
    channels: usize,
    /// Frame count declared by the container, if any
    total_frames: Option<u64>,
}

impl AudioStream {
    /// Open and probe `path`
    pub fn open(path: &Path) -> Result<Self> {
        let file = std::fs::File::open(path).map_err(|e| MeterError::Open {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;

        let mss = MediaSourceStream::new(Box::new(file), Default::default());

        // Hint the format registry with the extension
        let mut hint = Hint::new();
        if let Some(ext) = path.extension().and_then(|e| e.to_str()) {
            hint.with_extension(ext);
        }

        let probed = symphonia::default::get_probe()
            .format(
                &hint,
                mss,
                &FormatOptions::default(),
                &MetadataOptions::default(),
            )
            .map_err(|e| MeterError::Open {
                path: path.display().to_string(),
                reason: e.to_string(),
            })?;

        let format = probed.format;

        let track = format.default_track().ok_or(MeterError::NoAudioTrack)?;

        let sample_rate = track
            .codec_params
            .sample_rate
            .ok_or(MeterError::MissingStreamParameter("sample rate"))?;
        let channels = track
            .codec_params
            .channels
            .map(|c| c.count())
            .ok_or(MeterError::MissingStreamParameter("channel layout"))?;
        let track_id = track.id;
        let total_frames = track.codec_params.n_frames;

        let decoder = symphonia::default::get_codecs()
            .make(&track.codec_params, &DecoderOptions::default())
            .map_err(|e| MeterError::Decode(format!("Failed to create decoder: {}", e)))?;

        Ok(Self {
            format,
            decoder,
            track_id,
            sample_rate,
            channels,
            total_frames,
        })
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn channels(&self) -> usize {
        self.channels
    }

    pub fn total_frames(&self) -> Option<u64> {
        self.total_frames
    }

    /// Decode the next packet of the selected track
    ///
    /// Returns `Ok(None)` at end of stream. A container that stops early also
    /// ends here; callers compare against [`AudioStream::total_frames`].
    pub fn next_chunk(&mut self) -> Result<Option<DecodedChunk>> {
        loop {
            let packet = match self.format.next_packet() {
                Ok(packet) => packet,
                Err(SymphoniaError::IoError(e))
                    if e.kind() == std::io::ErrorKind::UnexpectedEof =>
                {
                    return Ok(None);
                }
                Err(SymphoniaError::ResetRequired) => {
                    self.decoder.reset();
                    continue;
                }
                Err(e) => {
                    return Err(MeterError::Decode(format!("Failed to read packet: {}", e)));
                }
            };

            if packet.track_id() != self.track_id {
                continue;
            }

            let decoded = match self.decoder.decode(&packet) {
                Ok(decoded) => decoded,
                Err(SymphoniaError::DecodeError(e)) => {
                    // A dropped packet would leave a gap in the measurement
                    return Err(MeterError::Decode(format!("Corrupt packet: {}", e)));
                }
                Err(e) => {
                    return Err(MeterError::Decode(format!("Decode error: {}", e)));
                }
            };

            let channels = decoded.spec().channels.count();
            if channels != self.channels {
                return Err(MeterError::Decode(format!(
                    "Channel count changed mid-stream: {} -> {}",
                    self.channels, channels
                )));
            }

            if decoded.frames() == 0 {
                continue;
            }

            return Ok(Some(Self::convert_buffer(decoded)));
        }
    }

    /// Interleave a decoded buffer in the closest supported representation
    fn convert_buffer(decoded: AudioBufferRef) -> DecodedChunk {
        match decoded {
            AudioBufferRef::F64(_) => DecodedChunk::F64(interleave(decoded)),
            AudioBufferRef::S32(_) => DecodedChunk::S32(interleave(decoded)),
            _ => DecodedChunk::F32(interleave(decoded)),
        }
    }
}

fn interleave<S>(decoded: AudioBufferRef) -> Vec<S>
where
    S: symphonia::core::sample::Sample + symphonia::core::conv::ConvertibleSample,
{
    let spec = *decoded.spec();
    let mut buffer = SampleBuffer::<S>::new(decoded.capacity() as u64, spec);
    buffer.copy_interleaved_ref(decoded);
    buffer.samples().to_vec()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_into_splits_large_chunks() {
        let chunk = DecodedChunk::F64(vec![0.25; 2 * 25]);

        let mut split = TruePeakEstimator::new(2, 48000).unwrap();
        chunk.push_into(&mut split, 4).unwrap();
        let mut whole = TruePeakEstimator::new(2, 48000).unwrap();
        chunk.push_into(&mut whole, 1000).unwrap();

        assert_eq!(split.frames_processed(), 25);
        assert_eq!(split.max_true_peaks(), whole.max_true_peaks());
    }

    #[test]
    fn test_open_missing_file() {
        let result = AudioStream::open(Path::new("/nonexistent/audio.wav"));
        assert!(matches!(result, Err(MeterError::Open { .. })));
    }
}
