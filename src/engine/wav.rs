//! WAV encoding and import
//!
//! `WavEncoder` writes the canonical 44-byte RIFF/WAVE header followed by
//! interleaved little-endian PCM16 frames. The header is always the plain
//! 16-byte `fmt ` chunk, whatever the channel count.
//!
//! Import goes through `hound` and stands in for an external decoder: it
//! turns a WAV file into a `SampleBuffer` without any resampling.

use std::fs;
use std::io::Read;
use std::path::Path;

use hound::{SampleFormat, WavReader};
use log::debug;

use crate::engine::buffer::SampleBuffer;
use crate::error::{Result, WaveditError};

/// Size of the canonical header in bytes
pub const WAV_HEADER_LEN: usize = 44;

const PCM_FORMAT: u16 = 1;
const BITS_PER_SAMPLE: u16 = 16;
const FMT_CHUNK_LEN: u32 = 16;

// ============================================================================
// Encoder
// ============================================================================

/// PCM16 WAV serializer
pub struct WavEncoder;

impl WavEncoder {
    /// Encode a buffer as a complete WAV file
    ///
    /// Samples are clamped to [-1, 1] and scaled asymmetrically: negative
    /// values by 32768 and non-negative values by 32767, so -1.0 becomes
    /// -32768 and 1.0 becomes 32767. A zero-length buffer produces a
    /// header-only file with a zero data length.
    ///
    /// # Errors
    /// `UnsupportedFormat` if the channel count, byte rate or data length
    /// does not fit its RIFF header field.
    pub fn encode(buffer: &SampleBuffer) -> Result<Vec<u8>> {
        let header = WavHeader::for_buffer(buffer)?;
        let frames = buffer.len();

        let mut out = Vec::with_capacity(WAV_HEADER_LEN + header.data_len as usize);
        header.write(&mut out);

        for frame in 0..frames {
            for channel in buffer.iter_channels() {
                out.extend_from_slice(&Self::to_pcm16(channel[frame]).to_le_bytes());
            }
        }

        debug!(
            "wav: encoded {} frame(s), {} ch, {} bytes",
            frames,
            header.channels,
            out.len()
        );
        Ok(out)
    }

    /// Convert one float sample to a signed 16-bit value
    #[inline]
    pub fn to_pcm16(sample: f32) -> i16 {
        let s = sample.clamp(-1.0, 1.0);
        if s < 0.0 {
            (s * 32768.0) as i16
        } else {
            (s * 32767.0) as i16
        }
    }
}

/// Header fields, checked against their RIFF widths
struct WavHeader {
    channels: u16,
    sample_rate: u32,
    byte_rate: u32,
    block_align: u16,
    data_len: u32,
    riff_len: u32,
}

impl WavHeader {
    fn for_buffer(buffer: &SampleBuffer) -> Result<Self> {
        let channels = u16::try_from(buffer.channels())
            .map_err(|_| too_large(format!("{} channels", buffer.channels())))?;
        let block_align = channels
            .checked_mul(BITS_PER_SAMPLE / 8)
            .ok_or_else(|| too_large(format!("block align for {} channels", channels)))?;
        let sample_rate = buffer.sample_rate();
        let byte_rate = sample_rate
            .checked_mul(u32::from(block_align))
            .ok_or_else(|| too_large(format!("byte rate for {} Hz x {} ch", sample_rate, channels)))?;
        let data_len = buffer
            .len()
            .checked_mul(usize::from(block_align))
            .and_then(|len| u32::try_from(len).ok())
            .ok_or_else(|| too_large(format!("{} frames of PCM16 data", buffer.len())))?;
        let riff_len = data_len
            .checked_add(WAV_HEADER_LEN as u32 - 8)
            .ok_or_else(|| too_large(format!("RIFF chunk of {} data bytes", data_len)))?;

        Ok(Self {
            channels,
            sample_rate,
            byte_rate,
            block_align,
            data_len,
            riff_len,
        })
    }

    fn write(&self, out: &mut Vec<u8>) {
        out.extend_from_slice(b"RIFF");
        out.extend_from_slice(&self.riff_len.to_le_bytes());
        out.extend_from_slice(b"WAVE");

        out.extend_from_slice(b"fmt ");
        out.extend_from_slice(&FMT_CHUNK_LEN.to_le_bytes());
        out.extend_from_slice(&PCM_FORMAT.to_le_bytes());
        out.extend_from_slice(&self.channels.to_le_bytes());
        out.extend_from_slice(&self.sample_rate.to_le_bytes());
        out.extend_from_slice(&self.byte_rate.to_le_bytes());
        out.extend_from_slice(&self.block_align.to_le_bytes());
        out.extend_from_slice(&BITS_PER_SAMPLE.to_le_bytes());

        out.extend_from_slice(b"data");
        out.extend_from_slice(&self.data_len.to_le_bytes());
    }
}

fn too_large(what: String) -> WaveditError {
    WaveditError::UnsupportedFormat {
        format: format!("{} exceeds the PCM16 WAV header limits", what),
    }
}

/// Encode a buffer and write it to `path`
pub fn export_wav(buffer: &SampleBuffer, path: &Path) -> Result<Vec<u8>> {
    let bytes = WavEncoder::encode(buffer)?;
    fs::write(path, &bytes)?;
    Ok(bytes)
}

// ============================================================================
// Import
// ============================================================================

/// Decode a WAV file from disk
///
/// # Errors
/// * `Io` - If the file cannot be opened
/// * `InvalidAudio` - If the data is not a readable WAV stream
/// * `UnsupportedFormat` - For integer bit depths other than 8/16/24/32
pub fn import_wav(path: &Path) -> Result<SampleBuffer> {
    let file = fs::File::open(path)?;
    read_wav(std::io::BufReader::new(file))
}

/// Decode a WAV stream into a `SampleBuffer` at its native sample rate
pub fn read_wav<R: Read>(reader: R) -> Result<SampleBuffer> {
    let reader = WavReader::new(reader).map_err(|e| WaveditError::InvalidAudio {
        reason: format!("Failed to parse WAV header: {}", e),
        source: Some(Box::new(e)),
    })?;

    let spec = reader.spec();
    let channels = spec.channels as usize;
    if channels == 0 {
        return Err(WaveditError::InvalidAudio {
            reason: "WAV declares zero channels".to_string(),
            source: None,
        });
    }

    let interleaved = read_samples_as_f32(reader, spec.bits_per_sample, spec.sample_format)?;
    debug!(
        "wav: decoded {} sample(s), {} ch, {} Hz",
        interleaved.len(),
        channels,
        spec.sample_rate
    );

    SampleBuffer::from_interleaved(&interleaved, channels, spec.sample_rate)
}

/// Read samples from a WAV reader and convert to f32
fn read_samples_as_f32<R: Read>(
    mut reader: WavReader<R>,
    bits_per_sample: u16,
    sample_format: SampleFormat,
) -> Result<Vec<f32>> {
    let scale = match (sample_format, bits_per_sample) {
        (SampleFormat::Float, _) => {
            return reader
                .samples::<f32>()
                .collect::<std::result::Result<Vec<f32>, _>>()
                .map_err(|e| invalid_samples(bits_per_sample, e));
        }
        (SampleFormat::Int, 8) => 128.0,
        (SampleFormat::Int, 16) => 32768.0,
        (SampleFormat::Int, 24) => 8388608.0,
        (SampleFormat::Int, 32) => 2147483648.0,
        (SampleFormat::Int, bits) => {
            return Err(WaveditError::UnsupportedFormat {
                format: format!("{}-bit integer audio", bits),
            });
        }
    };

    reader
        .samples::<i32>()
        .map(|s| s.map(|v| v as f32 / scale))
        .collect::<std::result::Result<Vec<f32>, _>>()
        .map_err(|e| invalid_samples(bits_per_sample, e))
}

fn invalid_samples(bits: u16, e: hound::Error) -> WaveditError {
    WaveditError::InvalidAudio {
        reason: format!("Failed to read {}-bit samples: {}", bits, e),
        source: Some(Box::new(e)),
    }
}

// ============================================================================
// Tests
// ============================================================================
