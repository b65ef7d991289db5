//! Wavedit - Audio Buffer Editing Engine
//!
//! Wavedit edits already-decoded multi-channel PCM audio:
//! sample-accurate slicing and concatenation, range gain and linear fades,
//! peak normalization, an ordered clip timeline, and PCM16 WAV export.
//!
//! # Architecture
//!
//! - `engine::buffer` / `engine::ops`: the sample container and pure transforms
//! - `engine::timeline`: ordered clips, each owning its buffer
//! - `engine::session`: selection-driven edit operations over the timeline
//! - `engine::wav`: canonical RIFF/WAVE encoder
//!
//! The engine is synchronous and performs no I/O of its own; the `cli`
//! module and `engine::wav` import helpers stand in for the decoder and
//! download collaborators.

pub mod cli;
pub mod config;
pub mod engine;
pub mod error;

pub use config::EngineConfig;
pub use error::{Result, WaveditError};
