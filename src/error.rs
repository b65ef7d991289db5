//! Error handling for Wavedit
//!
//! Benign edit guards are reported as `EditOutcome::Unchanged`, never as
//! errors. The variants here cover API misuse, bad configuration and I/O.

use thiserror::Error;

/// Result type alias for Wavedit operations
pub type Result<T> = std::result::Result<T, WaveditError>;

/// Main error type for Wavedit operations
#[derive(Error, Debug)]
pub enum WaveditError {
    // Structural Errors
    #[error("Invalid input: {reason}")]
    InvalidInput { reason: String },

    #[error("Invalid selection: start={start}, end={end}")]
    InvalidSelection { start: f64, end: f64 },

    #[error("Clip not found: {id}")]
    ClipNotFound { id: String },

    // Audio Errors
    #[error("Invalid audio file: {reason}")]
    InvalidAudio {
        reason: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("Unsupported audio format: {format}")]
    UnsupportedFormat { format: String },

    // Configuration Errors
    #[error("Invalid configuration: {reason}")]
    Config { reason: String },

    // I/O Errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    // Serialization Errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl WaveditError {
    /// Shorthand for an `InvalidInput` error
    pub fn invalid_input(reason: impl Into<String>) -> Self {
        WaveditError::InvalidInput {
            reason: reason.into(),
        }
    }

    /// Get the error code for this error type
    pub fn error_code(&self) -> &'static str {
        match self {
            WaveditError::InvalidInput { .. } => "INVALID_INPUT",
            WaveditError::InvalidSelection { .. } => "INVALID_SELECTION",
            WaveditError::ClipNotFound { .. } => "CLIP_NOT_FOUND",
            WaveditError::InvalidAudio { .. } => "INVALID_AUDIO",
            WaveditError::UnsupportedFormat { .. } => "UNSUPPORTED_FORMAT",
            WaveditError::Config { .. } => "CONFIG_ERROR",
            WaveditError::Io(_) => "IO_ERROR",
            WaveditError::Serialization(_) => "SERIALIZATION_ERROR",
        }
    }

    /// Check if the caller can retry with different input
    ///
    /// `InvalidInput` is a programming error in the caller and is not
    /// considered recoverable.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            WaveditError::InvalidSelection { .. }
                | WaveditError::ClipNotFound { .. }
                | WaveditError::InvalidAudio { .. }
                | WaveditError::UnsupportedFormat { .. }
                | WaveditError::Config { .. }
        )
    }
}
