//! Audio Editing Engine
//!
//! In-memory model for editing decoded PCM audio:
//! - Sample buffers and the stateless operations over them
//! - The ordered clip timeline
//! - The edit session tying both together
//! - PCM16 WAV encoding

pub mod buffer;
pub mod ops;
pub mod session;
pub mod timeline;
pub mod wav;

pub use buffer::{db_to_linear, linear_to_db, peak_db, SampleBuffer};
pub use ops::{
    apply_fade_range, apply_fade_range_in_place, apply_gain_range, apply_gain_range_in_place,
    concat, peak_abs, slice, FadeKind,
};
pub use session::{ClipSummary, EditOutcome, EditSession, Selection, SessionSnapshot};
pub use timeline::{Clip, ClipId, ClipTimeline, MoveDirection};
pub use wav::{export_wav, import_wav, read_wav, WavEncoder};
