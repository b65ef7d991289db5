//! Buffer Operations
//!
//! Stateless sample-accurate transforms over `SampleBuffer`: slicing,
//! concatenation, range gain, range fades and peak scanning.
//!
//! Times are seconds, converted with `SampleBuffer::secs_to_sample`. The
//! mutating transforms take the buffer by value and hand it back, so the
//! caller must have cloned it first if the original is still owned by a clip.

use std::fmt;
use std::ops::Range;

use log::warn;
use serde::{Deserialize, Serialize};

use crate::engine::buffer::SampleBuffer;
use crate::error::{Result, WaveditError};

/// Direction of a linear fade
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FadeKind {
    /// Ramp from silence up to full level
    In,
    /// Ramp from full level down towards silence
    Out,
}

impl fmt::Display for FadeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FadeKind::In => write!(f, "fade-in"),
            FadeKind::Out => write!(f, "fade-out"),
        }
    }
}

/// Resolve a `[start, end)` time range into clamped sample indices
///
/// The returned range is empty when `end <= start`.
pub fn sample_range(buffer: &SampleBuffer, start_secs: f64, end_secs: f64) -> Range<usize> {
    let start = buffer.secs_to_sample(start_secs);
    let end = buffer.secs_to_sample(end_secs).max(start);
    start..end
}

/// Copy the `[start_secs, end_secs)` region into a new buffer
///
/// Both bounds are clamped to the buffer duration. A reversed or empty
/// range yields a zero-length buffer with the same channel layout.
pub fn slice(buffer: &SampleBuffer, start_secs: f64, end_secs: f64) -> SampleBuffer {
    let range = sample_range(buffer, start_secs, end_secs);

    SampleBuffer {
        samples: buffer
            .samples
            .iter()
            .map(|ch| ch[range.clone()].to_vec())
            .collect(),
        sample_rate: buffer.sample_rate,
    }
}

/// Join buffers end to end
///
/// The result takes the first buffer's sample rate and the widest channel
/// count. Buffers with fewer channels contribute silence on the missing
/// channels for their span. Mixed sample rates are not resampled.
///
/// # Errors
/// `InvalidInput` if `buffers` is empty.
pub fn concat<'a, I>(buffers: I) -> Result<SampleBuffer>
where
    I: IntoIterator<Item = &'a SampleBuffer>,
{
    let buffers: Vec<&SampleBuffer> = buffers.into_iter().collect();
    let first = buffers
        .first()
        .ok_or_else(|| WaveditError::invalid_input("concat requires at least one buffer"))?;

    let sample_rate = first.sample_rate;
    let channels = buffers.iter().map(|b| b.channels()).max().unwrap_or(1);
    let length: usize = buffers.iter().map(|b| b.len()).sum();

    if buffers.iter().any(|b| b.sample_rate != sample_rate) {
        warn!(
            "concat: mixed sample rates, using {} Hz without resampling",
            sample_rate
        );
    }

    let mut samples = vec![Vec::with_capacity(length); channels];
    for buffer in &buffers {
        for (ch, out) in samples.iter_mut().enumerate() {
            match buffer.samples.get(ch) {
                Some(src) => out.extend_from_slice(src),
                None => out.resize(out.len() + buffer.len(), 0.0),
            }
        }
    }

    Ok(SampleBuffer {
        samples,
        sample_rate,
    })
}

/// Multiply every sample in the time range by `gain`
pub fn apply_gain_range(
    mut buffer: SampleBuffer,
    start_secs: f64,
    end_secs: f64,
    gain: f32,
) -> SampleBuffer {
    apply_gain_range_in_place(&mut buffer, start_secs, end_secs, gain);
    buffer
}

/// In-place form of [`apply_gain_range`]
pub fn apply_gain_range_in_place(
    buffer: &mut SampleBuffer,
    start_secs: f64,
    end_secs: f64,
    gain: f32,
) {
    let range = sample_range(buffer, start_secs, end_secs);
    for channel in &mut buffer.samples {
        for sample in &mut channel[range.clone()] {
            *sample *= gain;
        }
    }
}

/// Apply a linear fade over the time range
///
/// For local position `t = (i - start) / max(1, range_len)` each sample is
/// scaled by `t` (fade in) or `1 - t` (fade out). The first sample of a
/// fade in is exactly zero; the ramp never reaches the opposite extreme.
pub fn apply_fade_range(
    mut buffer: SampleBuffer,
    start_secs: f64,
    end_secs: f64,
    kind: FadeKind,
) -> SampleBuffer {
    apply_fade_range_in_place(&mut buffer, start_secs, end_secs, kind);
    buffer
}

/// In-place form of [`apply_fade_range`]
pub fn apply_fade_range_in_place(
    buffer: &mut SampleBuffer,
    start_secs: f64,
    end_secs: f64,
    kind: FadeKind,
) {
    let range = sample_range(buffer, start_secs, end_secs);
    let span = range.len().max(1) as f32;

    for channel in &mut buffer.samples {
        for (offset, sample) in channel[range.clone()].iter_mut().enumerate() {
            let t = offset as f32 / span;
            let factor = match kind {
                FadeKind::In => t,
                FadeKind::Out => 1.0 - t,
            };
            *sample *= factor;
        }
    }
}

/// Largest absolute sample value across all channels in the time range
///
/// Returns 0.0 for an empty buffer or an empty range.
pub fn peak_abs(buffer: &SampleBuffer, start_secs: f64, end_secs: f64) -> f32 {
    let range = sample_range(buffer, start_secs, end_secs);
    buffer
        .samples
        .iter()
        .flat_map(|ch| ch[range.clone()].iter())
        .map(|&s| s.abs())
        .fold(0.0_f32, f32::max)
}

// ============================================================================
// Tests
// ============================================================================
