//! Edit Session
//!
//! Owns the clip timeline, the composite buffer derived from it, the
//! current selection and the external playhead. Every mutating operation
//! computes its complete result first and only then swaps it in, so a
//! no-op or a failure leaves the session exactly as it was.
//!
//! Benign guard conditions (no selection, split at a boundary, deleting
//! everything, normalizing silence) report `EditOutcome::Unchanged`.

use log::{debug, trace};
use serde::{Deserialize, Serialize};

use crate::config::EngineConfig;
use crate::engine::buffer::SampleBuffer;
use crate::engine::ops::{self, FadeKind};
use crate::engine::timeline::{Clip, ClipId, ClipTimeline, MoveDirection};
use crate::engine::wav::WavEncoder;
use crate::error::{Result, WaveditError};

// ============================================================================
// Selection
// ============================================================================

/// A time range on the composite buffer, in seconds
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Selection {
    pub start: f64,
    pub end: f64,
}

impl Selection {
    /// Create a selection
    ///
    /// # Errors
    /// `InvalidSelection` if either bound is not finite or `end < start`.
    pub fn new(start: f64, end: f64) -> Result<Self> {
        if !start.is_finite() || !end.is_finite() || end < start {
            return Err(WaveditError::InvalidSelection { start, end });
        }
        Ok(Self { start, end })
    }

    pub fn duration_secs(&self) -> f64 {
        self.end - self.start
    }
}

// ============================================================================
// Outcome / Snapshot
// ============================================================================

/// Whether an edit changed the session
#[must_use]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditOutcome {
    /// New clip list and composite buffer were adopted
    Applied,
    /// A guard fired; the session is untouched
    Unchanged,
}

impl EditOutcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, EditOutcome::Applied)
    }
}

/// Read-only description of one clip, for waveform/clip-list renderers
#[derive(Debug, Clone, Serialize)]
pub struct ClipSummary {
    pub id: ClipId,
    pub label: String,
    pub duration_secs: f64,
}

/// Read-only view of the whole session
#[derive(Debug, Clone, Serialize)]
pub struct SessionSnapshot {
    pub duration_secs: f64,
    pub sample_rate: u32,
    pub channels: usize,
    pub selection: Option<Selection>,
    pub playhead_secs: f64,
    pub clips: Vec<ClipSummary>,
}

// ============================================================================
// Edit Session
// ============================================================================

/// Editing state for one loaded piece of audio
///
/// The composite buffer is always equal to the concatenation of the clip
/// buffers in timeline order.
///
/// # Example
/// ```
/// use wavedit::engine::{EditSession, SampleBuffer};
///
/// let buffer = SampleBuffer::from_channels(vec![vec![0.25; 8000]], 8000).unwrap();
/// let mut session = EditSession::new(buffer, "voice memo");
///
/// session.set_selection(0.25, 0.75).unwrap();
/// assert!(session.trim_to_selection().unwrap().is_applied());
/// assert!((session.duration_secs() - 0.5).abs() < 1e-9);
/// ```
#[derive(Debug, Clone)]
pub struct EditSession {
    config: EngineConfig,
    base_label: String,
    label_counter: u32,
    timeline: ClipTimeline,
    composite: SampleBuffer,
    selection: Option<Selection>,
    playhead_secs: f64,
}

impl EditSession {
    /// Seed a session from a decoded buffer using the default configuration
    pub fn new(buffer: SampleBuffer, label: impl Into<String>) -> Self {
        Self::build(buffer, label.into(), EngineConfig::default())
    }

    /// Seed a session with an explicit configuration
    ///
    /// # Errors
    /// `Config` if the configuration fails validation.
    pub fn with_config(
        buffer: SampleBuffer,
        label: impl Into<String>,
        config: EngineConfig,
    ) -> Result<Self> {
        config.validate()?;
        Ok(Self::build(buffer, label.into(), config))
    }

    fn build(buffer: SampleBuffer, label: String, config: EngineConfig) -> Self {
        let label = if label.trim().is_empty() {
            config.clip_label.clone()
        } else {
            label
        };

        debug!(
            "session: loaded '{}' ({} ch, {} Hz, {:.3}s)",
            label,
            buffer.channels(),
            buffer.sample_rate(),
            buffer.duration_secs()
        );

        let composite = buffer.clone();
        Self {
            config,
            base_label: label.clone(),
            label_counter: 0,
            timeline: ClipTimeline::new(Clip::new(buffer, label)),
            composite,
            selection: None,
            playhead_secs: 0.0,
        }
    }

    // ------------------------------------------------------------------------
    // Read-only state
    // ------------------------------------------------------------------------

    /// The current composite buffer
    pub fn composite(&self) -> &SampleBuffer {
        &self.composite
    }

    pub fn timeline(&self) -> &ClipTimeline {
        &self.timeline
    }

    pub fn clips(&self) -> &[Clip] {
        self.timeline.clips()
    }

    pub fn duration_secs(&self) -> f64 {
        self.composite.duration_secs()
    }

    pub fn selection(&self) -> Option<Selection> {
        self.selection
    }

    pub fn playhead_secs(&self) -> f64 {
        self.playhead_secs
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Build a serializable view of the session for renderers
    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            duration_secs: self.duration_secs(),
            sample_rate: self.composite.sample_rate(),
            channels: self.composite.channels(),
            selection: self.selection,
            playhead_secs: self.playhead_secs,
            clips: self
                .clips()
                .iter()
                .map(|c| ClipSummary {
                    id: c.id(),
                    label: c.label().to_string(),
                    duration_secs: c.duration_secs(),
                })
                .collect(),
        }
    }

    // ------------------------------------------------------------------------
    // Selection / playhead
    // ------------------------------------------------------------------------

    /// Set the selection, clamped to the current duration
    ///
    /// # Errors
    /// `InvalidSelection` if a bound is not finite or `end < start`.
    pub fn set_selection(&mut self, start: f64, end: f64) -> Result<()> {
        let selection = Selection::new(start, end)?;
        let duration = self.duration_secs();
        self.selection = Some(Selection {
            start: selection.start.clamp(0.0, duration),
            end: selection.end.clamp(0.0, duration),
        });
        Ok(())
    }

    pub fn clear_selection(&mut self) {
        self.selection = None;
    }

    /// Record the external playback position used by `split_at_cursor`
    pub fn set_playhead(&mut self, secs: f64) {
        self.playhead_secs = if secs.is_finite() { secs.max(0.0) } else { 0.0 };
    }

    /// The selection, if it covers at least one sample of the composite
    ///
    /// Point selections and selections left past the end of a shortened
    /// buffer resolve to an empty sample range and count as no selection.
    fn selected_samples(&self) -> Option<Selection> {
        let sel = self.selection?;
        if ops::sample_range(&self.composite, sel.start, sel.end).is_empty() {
            return None;
        }
        Some(sel)
    }

    /// The active range: the selection, or the whole buffer
    fn active_range(&self) -> (f64, f64) {
        match self.selection {
            Some(sel) => (sel.start, sel.end),
            None => (0.0, self.duration_secs()),
        }
    }

    // ------------------------------------------------------------------------
    // Edit operations
    // ------------------------------------------------------------------------

    /// Keep only the selected range, as a single clip
    pub fn trim_to_selection(&mut self) -> Result<EditOutcome> {
        let Some(sel) = self.selected_samples() else {
            trace!("trim: no selected samples");
            return Ok(EditOutcome::Unchanged);
        };

        let trimmed = ops::slice(&self.composite, sel.start, sel.end);
        self.adopt_single(trimmed, "trim")
    }

    /// Remove the selected range, keeping the audio on either side
    ///
    /// Refused when the selection covers the whole buffer.
    pub fn delete_selection(&mut self) -> Result<EditOutcome> {
        let Some(sel) = self.selected_samples() else {
            trace!("delete: no selected samples");
            return Ok(EditOutcome::Unchanged);
        };

        let duration = self.duration_secs();
        if sel.start <= 0.0 && sel.end >= duration {
            debug!("delete: selection covers the whole buffer, ignoring");
            return Ok(EditOutcome::Unchanged);
        }

        let mut parts = Vec::with_capacity(2);
        if sel.start > 0.0 {
            parts.push(ops::slice(&self.composite, 0.0, sel.start));
        }
        if sel.end < duration {
            parts.push(ops::slice(&self.composite, sel.end, duration));
        }

        self.adopt_parts(parts, "delete")
    }

    /// Split at the selection start, or at the playhead when nothing is selected
    pub fn split_at_cursor(&mut self) -> Result<EditOutcome> {
        let point = self
            .selection
            .map(|sel| sel.start)
            .unwrap_or(self.playhead_secs);
        self.split_at(point)
    }

    /// Split the composite into two clips at `point` seconds
    ///
    /// A no-op at or beyond either end of the buffer.
    pub fn split_at(&mut self, point: f64) -> Result<EditOutcome> {
        let duration = self.duration_secs();
        if !(point > 0.0 && point < duration) {
            trace!("split: point {:.6}s outside (0, {:.6})", point, duration);
            return Ok(EditOutcome::Unchanged);
        }

        let parts = vec![
            ops::slice(&self.composite, 0.0, point),
            ops::slice(&self.composite, point, duration),
        ];
        self.adopt_parts(parts, "split")
    }

    /// Gain that `normalize` would apply, or None over silence
    pub fn normalize_gain(&self) -> Option<f32> {
        let (start, end) = self.active_range();
        let peak = ops::peak_abs(&self.composite, start, end);
        if peak == 0.0 {
            return None;
        }
        Some(((1.0 / peak) * self.config.normalize_headroom).min(self.config.max_normalize_gain))
    }

    /// Scale the active range so its peak sits just below full scale
    ///
    /// The gain is capped at `max_normalize_gain`. Collapses the clip list
    /// to a single clip.
    pub fn normalize(&mut self) -> Result<EditOutcome> {
        let Some(gain) = self.normalize_gain() else {
            debug!("normalize: range is silent");
            return Ok(EditOutcome::Unchanged);
        };

        let (start, end) = self.active_range();
        debug!("normalize: gain {:.4} over {:.3}s..{:.3}s", gain, start, end);
        let normalized = ops::apply_gain_range(self.composite.clone(), start, end, gain);
        self.adopt_single(normalized, "normalize")
    }

    /// Apply a linear fade over the active range
    ///
    /// Collapses the clip list to a single clip.
    pub fn apply_fade(&mut self, kind: FadeKind) -> Result<EditOutcome> {
        let (start, end) = self.active_range();
        let faded = ops::apply_fade_range(self.composite.clone(), start, end, kind);
        self.adopt_single(faded, "fade")
    }

    /// Swap a clip with its neighbour and rebuild the composite
    pub fn move_clip(&mut self, id: ClipId, direction: MoveDirection) -> Result<EditOutcome> {
        let Some((idx, target)) = self.timeline.swap_targets(id, direction) else {
            return Ok(EditOutcome::Unchanged);
        };

        let mut order: Vec<&SampleBuffer> = self.clips().iter().map(|c| c.buffer()).collect();
        order.swap(idx, target);
        let composite = ops::concat(order)?;

        if !self.timeline.reorder(id, direction) {
            return Ok(EditOutcome::Unchanged);
        }
        self.composite = composite;
        debug!("move: clip {} {:?}", id, direction);
        Ok(EditOutcome::Applied)
    }

    /// Remove a clip and rebuild the composite
    ///
    /// The last remaining clip is never removed.
    pub fn delete_clip(&mut self, id: ClipId) -> Result<EditOutcome> {
        if self.timeline.len() <= 1 || self.timeline.position(id).is_none() {
            trace!("delete_clip: nothing to remove for {}", id);
            return Ok(EditOutcome::Unchanged);
        }

        let composite = ops::concat(
            self.clips()
                .iter()
                .filter(|c| c.id() != id)
                .map(|c| c.buffer()),
        )?;

        if !self.timeline.remove(id) {
            return Ok(EditOutcome::Unchanged);
        }
        self.composite = composite;
        debug!(
            "delete_clip: removed {}, {} clip(s) left",
            id,
            self.timeline.len()
        );
        Ok(EditOutcome::Applied)
    }

    /// The buffer `export_range` encodes: the selection, or everything
    pub fn export_buffer(&self) -> SampleBuffer {
        let (start, end) = self.active_range();
        ops::slice(&self.composite, start, end)
    }

    /// Encode the selection (or the whole buffer) as a PCM16 WAV file
    ///
    /// # Errors
    /// `UnsupportedFormat` if the audio does not fit a RIFF header.
    pub fn export_range(&self) -> Result<Vec<u8>> {
        WavEncoder::encode(&self.export_buffer())
    }

    // ------------------------------------------------------------------------
    // State adoption
    // ------------------------------------------------------------------------

    fn next_label(&mut self) -> String {
        self.label_counter += 1;
        format!("{} {}", self.base_label, self.label_counter)
    }

    fn adopt_single(&mut self, buffer: SampleBuffer, op: &str) -> Result<EditOutcome> {
        self.adopt_parts(vec![buffer], op)
    }

    /// Wrap each part in a new clip, rebuild, then swap both in together
    fn adopt_parts(&mut self, parts: Vec<SampleBuffer>, op: &str) -> Result<EditOutcome> {
        let counter = self.label_counter;
        let clips: Vec<Clip> = parts
            .into_iter()
            .map(|buffer| Clip::new(buffer, self.next_label()))
            .collect();

        let adopted = ClipTimeline::from_clips(clips)
            .and_then(|timeline| timeline.rebuild().map(|composite| (timeline, composite)));

        match adopted {
            Ok((timeline, composite)) => {
                self.timeline = timeline;
                self.composite = composite;
                debug!(
                    "{}: {:.3}s across {} clip(s)",
                    op,
                    self.duration_secs(),
                    self.timeline.len()
                );
                Ok(EditOutcome::Applied)
            }
            Err(e) => {
                self.label_counter = counter;
                Err(e)
            }
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
