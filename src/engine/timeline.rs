//! Clip Timeline
//!
//! An ordered, never-empty sequence of clips. Playback and export order is
//! sequence order, and the composite buffer is always derived from it via
//! [`ClipTimeline::rebuild`].

use std::fmt;

use log::trace;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::engine::buffer::SampleBuffer;
use crate::engine::ops;
use crate::error::{Result, WaveditError};

/// Opaque clip identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ClipId(Uuid);

impl ClipId {
    /// Generate a fresh random id
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ClipId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ClipId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Which neighbour a clip swaps with when moved
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MoveDirection {
    /// Towards the start of the timeline
    Up,
    /// Towards the end of the timeline
    Down,
}

/// A labelled segment of audio that exclusively owns its buffer
#[derive(Debug, Clone)]
pub struct Clip {
    id: ClipId,
    label: String,
    buffer: SampleBuffer,
}

impl Clip {
    /// Wrap a buffer in a new clip with a fresh id
    pub fn new(buffer: SampleBuffer, label: impl Into<String>) -> Self {
        Self {
            id: ClipId::new(),
            label: label.into(),
            buffer,
        }
    }

    pub fn id(&self) -> ClipId {
        self.id
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn buffer(&self) -> &SampleBuffer {
        &self.buffer
    }

    pub fn duration_secs(&self) -> f64 {
        self.buffer.duration_secs()
    }
}

/// Ordered clip sequence with at least one clip
#[derive(Debug, Clone)]
pub struct ClipTimeline {
    clips: Vec<Clip>,
}

impl ClipTimeline {
    /// Create a timeline holding a single clip
    pub fn new(clip: Clip) -> Self {
        Self { clips: vec![clip] }
    }

    /// Create a timeline from an ordered list of clips
    ///
    /// # Errors
    /// `InvalidInput` if `clips` is empty.
    pub fn from_clips(clips: Vec<Clip>) -> Result<Self> {
        if clips.is_empty() {
            return Err(WaveditError::invalid_input(
                "timeline requires at least one clip",
            ));
        }
        Ok(Self { clips })
    }

    pub fn clips(&self) -> &[Clip] {
        &self.clips
    }

    pub fn len(&self) -> usize {
        self.clips.len()
    }

    /// True when the timeline holds no clips
    pub fn is_empty(&self) -> bool {
        self.clips.is_empty()
    }

    /// Index of the clip with the given id
    pub fn position(&self, id: ClipId) -> Option<usize> {
        self.clips.iter().position(|c| c.id == id)
    }

    /// Look up a clip by id
    pub fn get(&self, id: ClipId) -> Result<&Clip> {
        self.clips
            .iter()
            .find(|c| c.id == id)
            .ok_or_else(|| WaveditError::ClipNotFound { id: id.to_string() })
    }

    /// Concatenate all clip buffers in order
    ///
    /// This is the only way the composite buffer is produced.
    pub fn rebuild(&self) -> Result<SampleBuffer> {
        ops::concat(self.clips.iter().map(|c| &c.buffer))
    }

    /// Indices of a clip and the neighbour it would swap with
    ///
    /// None if the clip is unknown or already at that end of the timeline.
    pub fn swap_targets(&self, id: ClipId, direction: MoveDirection) -> Option<(usize, usize)> {
        let Some(idx) = self.position(id) else {
            trace!("reorder: unknown clip {}", id);
            return None;
        };

        match direction {
            MoveDirection::Up if idx > 0 => Some((idx, idx - 1)),
            MoveDirection::Down if idx + 1 < self.clips.len() => Some((idx, idx + 1)),
            _ => {
                trace!("reorder: clip {} already at boundary", id);
                None
            }
        }
    }

    /// Swap a clip with its neighbour in `direction`
    ///
    /// Returns false (and leaves the order untouched) if the clip is
    /// unknown or already at that end of the timeline.
    pub fn reorder(&mut self, id: ClipId, direction: MoveDirection) -> bool {
        match self.swap_targets(id, direction) {
            Some((idx, target)) => {
                self.clips.swap(idx, target);
                true
            }
            None => false,
        }
    }

    /// Remove a clip unless it is the only one left
    pub fn remove(&mut self, id: ClipId) -> bool {
        if self.clips.len() <= 1 {
            trace!("remove: refusing to remove the last clip");
            return false;
        }

        match self.position(id) {
            Some(idx) => {
                self.clips.remove(idx);
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn clip(value: f32, length: usize) -> Clip {
        let buffer = SampleBuffer::from_channels(vec![vec![value; length]], 10).unwrap();
        Clip::new(buffer, format!("clip {}", value))
    }

    fn three_clip_timeline() -> (ClipTimeline, [ClipId; 3]) {
        let clips = vec![clip(0.1, 2), clip(0.2, 3), clip(0.3, 1)];
        let ids = [clips[0].id(), clips[1].id(), clips[2].id()];
        (ClipTimeline::from_clips(clips).unwrap(), ids)
    }

    #[test]
    fn test_from_clips_rejects_empty() {
        assert!(ClipTimeline::from_clips(Vec::new()).is_err());
    }

    #[test]
    fn test_clip_ids_are_unique() {
        let a = clip(0.0, 1);
        let b = clip(0.0, 1);
        assert_ne!(a.id(), b.id());
    }

    #[test]
    fn test_rebuild_concatenates_in_order() {
        let (timeline, _) = three_clip_timeline();
        let composite = timeline.rebuild().unwrap();
        assert_eq!(composite.channel(0), &[0.1, 0.1, 0.2, 0.2, 0.2, 0.3]);
    }

    #[test]
    fn test_reorder_swaps_neighbours() {
        let (mut timeline, ids) = three_clip_timeline();
        assert!(timeline.reorder(ids[2], MoveDirection::Up));
        assert_eq!(timeline.position(ids[2]), Some(1));
        assert_eq!(timeline.position(ids[1]), Some(2));

        assert!(timeline.reorder(ids[0], MoveDirection::Down));
        assert_eq!(timeline.position(ids[0]), Some(1));
    }

    #[test]
    fn test_reorder_boundaries_are_noops() {
        let (mut timeline, ids) = three_clip_timeline();
        assert!(!timeline.reorder(ids[0], MoveDirection::Up));
        assert!(!timeline.reorder(ids[2], MoveDirection::Down));
        assert!(!timeline.reorder(ClipId::new(), MoveDirection::Down));
        assert_eq!(timeline.position(ids[0]), Some(0));
        assert_eq!(timeline.position(ids[2]), Some(2));
    }

    #[test]
    fn test_swap_targets() {
        let (timeline, ids) = three_clip_timeline();
        assert_eq!(timeline.swap_targets(ids[1], MoveDirection::Up), Some((1, 0)));
        assert_eq!(timeline.swap_targets(ids[1], MoveDirection::Down), Some((1, 2)));
        assert_eq!(timeline.swap_targets(ids[0], MoveDirection::Up), None);
        assert_eq!(timeline.swap_targets(ids[2], MoveDirection::Down), None);
    }

    #[test]
    fn test_remove_keeps_last_clip() {
        let (mut timeline, ids) = three_clip_timeline();
        assert!(timeline.remove(ids[1]));
        assert!(timeline.remove(ids[0]));
        assert!(!timeline.remove(ids[2]));
        assert_eq!(timeline.len(), 1);
        assert!(!timeline.is_empty());
    }

    #[test]
    fn test_get_unknown_clip() {
        let (timeline, ids) = three_clip_timeline();
        assert_eq!(timeline.get(ids[1]).unwrap().label(), "clip 0.2");
        match timeline.get(ClipId::new()) {
            Err(WaveditError::ClipNotFound { .. }) => {}
            other => panic!("Expected ClipNotFound, got {:?}", other),
        }
    }
}
