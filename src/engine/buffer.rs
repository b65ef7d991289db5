//! Sample Buffer
//!
//! Provides the multi-channel PCM container every edit operates on.
//! Samples are stored non-interleaved as 32-bit floats, nominally in
//! [-1.0, 1.0] but never clamped on creation.

use crate::error::{Result, WaveditError};

// ============================================================================
// Helper Functions
// ============================================================================

/// Convert decibels to linear amplitude
#[inline]
pub fn db_to_linear(db: f32) -> f32 {
    10.0_f32.powf(db / 20.0)
}

/// Convert linear amplitude to decibels
///
/// # Returns
/// Value in decibels. Returns -f32::INFINITY for zero input.
#[inline]
pub fn linear_to_db(linear: f32) -> f32 {
    if linear <= 0.0 {
        f32::NEG_INFINITY
    } else {
        20.0 * linear.log10()
    }
}

/// Calculate the peak level of a whole buffer in dB
///
/// # Returns
/// Peak level in dB. Returns -f32::INFINITY for empty or silent buffers.
pub fn peak_db(buffer: &SampleBuffer) -> f32 {
    let peak = buffer
        .samples
        .iter()
        .flat_map(|channel| channel.iter())
        .map(|&s| s.abs())
        .fold(0.0_f32, f32::max);

    linear_to_db(peak)
}

// ============================================================================
// Sample Buffer
// ============================================================================

/// Multi-channel floating point PCM audio
///
/// Every channel holds exactly `len()` samples and there is always at least
/// one channel. A buffer is owned by exactly one clip at a time; edits that
/// mutate samples work on a clone.
///
/// # Example
/// ```
/// use wavedit::engine::SampleBuffer;
///
/// // Half a second of stereo silence at 8 kHz
/// let buffer = SampleBuffer::new(2, 4000, 8000);
/// assert_eq!(buffer.channels(), 2);
/// assert_eq!(buffer.len(), 4000);
/// assert!((buffer.duration_secs() - 0.5).abs() < 1e-9);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct SampleBuffer {
    /// Sample data: outer Vec is channels, inner Vec is samples
    pub(crate) samples: Vec<Vec<f32>>,
    /// Sample rate in Hz
    pub(crate) sample_rate: u32,
}

impl SampleBuffer {
    /// Create a silent buffer
    ///
    /// `channels` and `sample_rate` are raised to at least 1 so the
    /// structural invariant always holds.
    pub fn new(channels: usize, length: usize, sample_rate: u32) -> Self {
        Self {
            samples: vec![vec![0.0_f32; length]; channels.max(1)],
            sample_rate: sample_rate.max(1),
        }
    }

    /// Create a buffer from per-channel sample vectors
    ///
    /// # Errors
    /// `InvalidInput` if there are no channels, the channels differ in
    /// length, or the sample rate is zero.
    pub fn from_channels(samples: Vec<Vec<f32>>, sample_rate: u32) -> Result<Self> {
        if samples.is_empty() {
            return Err(WaveditError::invalid_input(
                "sample buffer needs at least one channel",
            ));
        }

        if sample_rate == 0 {
            return Err(WaveditError::invalid_input("sample rate must be positive"));
        }

        let length = samples[0].len();
        if let Some((idx, ch)) = samples
            .iter()
            .enumerate()
            .find(|(_, ch)| ch.len() != length)
        {
            return Err(WaveditError::invalid_input(format!(
                "channel {} has {} samples, expected {}",
                idx,
                ch.len(),
                length
            )));
        }

        Ok(Self {
            samples,
            sample_rate,
        })
    }

    /// Create a buffer from interleaved sample data
    ///
    /// # Arguments
    /// * `interleaved` - Interleaved samples (L, R, L, R, ... for stereo)
    /// * `channels` - Number of interleaved channels
    /// * `sample_rate` - Sample rate in Hz
    pub fn from_interleaved(interleaved: &[f32], channels: usize, sample_rate: u32) -> Result<Self> {
        if channels == 0 {
            return Err(WaveditError::invalid_input(
                "sample buffer needs at least one channel",
            ));
        }

        if interleaved.len() % channels != 0 {
            return Err(WaveditError::invalid_input(format!(
                "interleaved data length {} is not divisible by channel count {}",
                interleaved.len(),
                channels
            )));
        }

        let frames = interleaved.len() / channels;
        let mut samples = vec![Vec::with_capacity(frames); channels];

        for frame in interleaved.chunks_exact(channels) {
            for (ch, &sample) in frame.iter().enumerate() {
                samples[ch].push(sample);
            }
        }

        Self::from_channels(samples, sample_rate)
    }

    /// Convert the buffer to interleaved order
    pub fn to_interleaved(&self) -> Vec<f32> {
        let mut interleaved = Vec::with_capacity(self.channels() * self.len());

        for frame in 0..self.len() {
            for channel in &self.samples {
                interleaved.push(channel[frame]);
            }
        }

        interleaved
    }

    /// Get the number of channels
    #[inline]
    pub fn channels(&self) -> usize {
        self.samples.len()
    }

    /// Get the number of samples per channel
    #[inline]
    pub fn len(&self) -> usize {
        self.samples.first().map(|ch| ch.len()).unwrap_or(0)
    }

    /// Check if the buffer holds no samples
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Sample rate in Hz
    #[inline]
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Get the duration in seconds
    #[inline]
    pub fn duration_secs(&self) -> f64 {
        self.len() as f64 / self.sample_rate as f64
    }

    /// Convert a time in seconds to a sample index
    ///
    /// The time is clamped to `[0, duration]` and converted with
    /// `floor(seconds * sample_rate)`. Times at or past the end map to
    /// `len()` exactly so that float rounding never drops the last sample.
    pub fn secs_to_sample(&self, secs: f64) -> usize {
        if secs.is_nan() || secs <= 0.0 {
            return 0;
        }
        if secs >= self.duration_secs() {
            return self.len();
        }
        ((secs * self.sample_rate as f64).floor() as usize).min(self.len())
    }

    /// Get immutable access to a channel's samples
    ///
    /// # Panics
    /// Panics if the channel index is out of bounds
    #[inline]
    pub fn channel(&self, index: usize) -> &[f32] {
        &self.samples[index]
    }

    /// Get mutable access to a channel's samples
    ///
    /// # Panics
    /// Panics if the channel index is out of bounds
    #[inline]
    pub fn channel_mut(&mut self, index: usize) -> &mut [f32] {
        &mut self.samples[index]
    }

    /// Iterate over all channels
    pub fn iter_channels(&self) -> impl Iterator<Item = &[f32]> {
        self.samples.iter().map(|ch| ch.as_slice())
    }

    /// Get a sample, or None if out of bounds
    #[inline]
    pub fn get_sample(&self, channel: usize, index: usize) -> Option<f32> {
        self.samples
            .get(channel)
            .and_then(|ch| ch.get(index).copied())
    }

    /// Check if all samples are finite (not NaN or Infinity)
    pub fn is_finite(&self) -> bool {
        self.samples
            .iter()
            .flat_map(|ch| ch.iter())
            .all(|s| s.is_finite())
    }

    /// Consume the buffer and return its channel data
    pub fn into_channels(self) -> Vec<Vec<f32>> {
        self.samples
    }
}

// ============================================================================
// Tests
// ============================================================================
