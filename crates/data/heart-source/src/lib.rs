//! # Heart Source
//!
//! Where readings come from, and how they become samples.
//!
//! ```text
//! MockSource ──┐
//!              ├─▶ BiometricSource ──▶ SampleStream ──▶ BiometricSample
//! ReplaySource ┘    next_reading()     rolling history
//! ```

pub mod mock;
pub mod replay;
pub mod stream;

pub use mock::MockSource;
pub use replay::ReplaySource;
pub use stream::SampleStream;

use serde::{Deserialize, Serialize};

/// Result type for source operations
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Replay file not found: {0}")]
    NotFound(String),

    #[error("Replay file has no readings: {0}")]
    EmptyReplay(String),

    #[error("Unsupported source: {0}")]
    UnsupportedSource(String),
}

/// One reading as a source reports it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reading {
    pub bpm: u32,
    /// Wall-clock time the reading was taken (RFC 3339)
    pub timestamp: String,
    pub source: String,
    pub device_id: u32,
    /// Recorded time for replayed data
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_timestamp: Option<String>,
}

/// Anything that can produce heart-rate readings
pub trait BiometricSource {
    /// Short name for logs
    fn kind(&self) -> &'static str;

    fn next_reading(&mut self) -> Result<Reading>;
}

impl<S: BiometricSource + ?Sized> BiometricSource for Box<S> {
    fn kind(&self) -> &'static str {
        (**self).kind()
    }

    fn next_reading(&mut self) -> Result<Reading> {
        (**self).next_reading()
    }
}
