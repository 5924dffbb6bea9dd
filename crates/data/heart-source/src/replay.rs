//! Replay source - recorded readings from a JSON export
//!
//! The export is a JSON array stored newest-first:
//!
//! ```json
//! [{"bpm": 61, "timestamp": "2026-02-11T10:30:00Z", "source": "Watch"}, ...]
//! ```
//!
//! Entries are replayed oldest-first and wrap around when exhausted.

use crate::{BiometricSource, Error, Reading, Result};
use chrono::Utc;
use serde::Deserialize;
use std::path::Path;
use tracing::info;

const DEFAULT_LABEL: &str = "Recorded Watch";

#[derive(Debug, Clone, Deserialize)]
struct ReplayEntry {
    bpm: u32,
    timestamp: String,
    #[serde(default)]
    source: Option<String>,
}

pub struct ReplaySource {
    entries: Vec<ReplayEntry>,
    index: usize,
}

impl ReplaySource {
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(Error::NotFound(path.display().to_string()));
        }
        let content = std::fs::read_to_string(path)?;
        let source = Self::from_json(&content)
            .map_err(|e| match e {
                Error::EmptyReplay(_) => Error::EmptyReplay(path.display().to_string()),
                other => other,
            })?;
        info!(path = %path.display(), records = source.len(), "loaded replay data");
        Ok(source)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let mut entries: Vec<ReplayEntry> = serde_json::from_str(json)?;
        if entries.is_empty() {
            return Err(Error::EmptyReplay("<inline>".to_string()));
        }
        entries.reverse();
        Ok(Self { entries, index: 0 })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl BiometricSource for ReplaySource {
    fn kind(&self) -> &'static str {
        "file"
    }

    fn next_reading(&mut self) -> Result<Reading> {
        let entry = &self.entries[self.index % self.entries.len()];
        self.index += 1;
        Ok(Reading {
            bpm: entry.bpm,
            timestamp: Utc::now().to_rfc3339(),
            source: entry.source.clone().unwrap_or_else(|| DEFAULT_LABEL.to_string()),
            device_id: 1,
            original_timestamp: Some(entry.timestamp.clone()),
        })
    }
}
