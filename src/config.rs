//! Engine configuration
//!
//! Tunables for the edit session, loadable from a JSON file. The defaults
//! reproduce the stock normalize behaviour (0.98 headroom, 10x cap).

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Result, WaveditError};

/// Default peak target multiplier for normalize
pub const DEFAULT_NORMALIZE_HEADROOM: f32 = 0.98;

/// Default hard cap on normalize gain
pub const DEFAULT_MAX_NORMALIZE_GAIN: f32 = 10.0;

/// Default clip label when the decoder supplies none
pub const DEFAULT_CLIP_LABEL: &str = "Clip";

/// Edit session configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Multiplier applied to `1 / peak` when normalizing
    pub normalize_headroom: f32,
    /// Upper bound on the normalize gain
    pub max_normalize_gain: f32,
    /// Base label for clips
    pub clip_label: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            normalize_headroom: DEFAULT_NORMALIZE_HEADROOM,
            max_normalize_gain: DEFAULT_MAX_NORMALIZE_GAIN,
            clip_label: DEFAULT_CLIP_LABEL.to_string(),
        }
    }
}

impl EngineConfig {
    /// Load and validate a configuration from a JSON file
    ///
    /// Missing fields fall back to their defaults.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        let config: EngineConfig = serde_json::from_str(&text)?;
        config.validate()?;
        Ok(config)
    }

    /// Check that all tunables are in range
    pub fn validate(&self) -> Result<()> {
        if !self.normalize_headroom.is_finite()
            || self.normalize_headroom <= 0.0
            || self.normalize_headroom > 1.0
        {
            return Err(WaveditError::Config {
                reason: format!(
                    "normalize_headroom must be in (0, 1], got {}",
                    self.normalize_headroom
                ),
            });
        }

        if !self.max_normalize_gain.is_finite() || self.max_normalize_gain < 1.0 {
            return Err(WaveditError::Config {
                reason: format!(
                    "max_normalize_gain must be >= 1, got {}",
                    self.max_normalize_gain
                ),
            });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = EngineConfig::default();
        assert_eq!(config.normalize_headroom, 0.98);
        assert_eq!(config.max_normalize_gain, 10.0);
        assert_eq!(config.clip_label, "Clip");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: EngineConfig = serde_json::from_str(r#"{"max_normalize_gain": 4.0}"#).unwrap();
        assert_eq!(config.max_normalize_gain, 4.0);
        assert_eq!(config.normalize_headroom, DEFAULT_NORMALIZE_HEADROOM);
    }

    #[test]
    fn test_validate_rejects_bad_headroom() {
        let config = EngineConfig {
            normalize_headroom: 1.5,
            ..Default::default()
        };
        let err = config.validate().unwrap_err();
        assert_eq!(err.error_code(), "CONFIG_ERROR");
    }

    #[test]
    fn test_validate_rejects_small_cap() {
        let config = EngineConfig {
            max_normalize_gain: 0.5,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_from_json_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"clip_label": "Take", "normalize_headroom": 0.9}}"#).unwrap();

        let config = EngineConfig::from_json_file(file.path()).unwrap();
        assert_eq!(config.clip_label, "Take");
        assert_eq!(config.normalize_headroom, 0.9);
    }

    #[test]
    fn test_from_json_file_invalid() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"normalize_headroom": -1.0}}"#).unwrap();
        assert!(EngineConfig::from_json_file(file.path()).is_err());
    }
}
