//! Biometric Sample - one reading plus the context it was taken in
//!
//! A sample is built by the caller per generation request and never
//! mutated afterwards. History is chronological, most-recent-last.

use serde::{Deserialize, Serialize};

/// One heart-rate reading with its rolling history and counters
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BiometricSample {
    /// Current reading in beats per minute (0 = no signal)
    pub value: u32,

    /// ISO-8601 timestamp; may be empty, see [`BiometricSample::with_current_time`]
    #[serde(default)]
    pub timestamp: String,

    /// Human-readable device label
    #[serde(default)]
    pub source_label: String,

    /// Numeric device identifier
    #[serde(default = "default_device_id")]
    pub device_id: u32,

    /// Total readings recorded so far, supplied by the caller
    #[serde(default = "default_cumulative_count")]
    pub cumulative_count: u64,

    /// Prior readings, oldest first. Negative entries are treated as absent.
    #[serde(default)]
    pub history: Vec<i64>,

    /// Reference to an external transaction that carried this reading
    #[serde(default)]
    pub transaction_reference: Option<String>,
}

fn default_device_id() -> u32 {
    1
}

fn default_cumulative_count() -> u64 {
    1
}

impl BiometricSample {
    /// Create a sample with empty history and default labels
    pub fn new(value: u32, cumulative_count: u64) -> Self {
        Self {
            value,
            timestamp: String::new(),
            source_label: String::new(),
            device_id: default_device_id(),
            cumulative_count,
            history: Vec::new(),
            transaction_reference: None,
        }
    }

    /// Parse a sample from JSON, enforcing the input contract
    pub fn from_json(json: &str) -> crate::Result<Self> {
        let sample: Self = serde_json::from_str(json)?;
        if sample.cumulative_count == 0 {
            return Err(crate::Error::InvalidSample(
                "cumulative_count must be at least 1".into(),
            ));
        }
        Ok(sample)
    }

    pub fn with_timestamp(mut self, timestamp: impl Into<String>) -> Self {
        self.timestamp = timestamp.into();
        self
    }

    pub fn with_source(mut self, label: impl Into<String>, device_id: u32) -> Self {
        self.source_label = label.into();
        self.device_id = device_id;
        self
    }

    pub fn with_history(mut self, history: Vec<i64>) -> Self {
        self.history = history;
        self
    }

    pub fn with_transaction(mut self, reference: impl Into<String>) -> Self {
        self.transaction_reference = Some(reference.into());
        self
    }

    /// Substitute the current UTC time when no timestamp was supplied.
    ///
    /// This is the caller's job, never the generator's: generation is a
    /// pure function of the sample.
    pub fn with_current_time(mut self) -> Self {
        if self.timestamp.is_empty() {
            self.timestamp = chrono::Utc::now().to_rfc3339();
        }
        self
    }

    /// Valid history readings, oldest first (negative entries dropped)
    pub fn readings(&self) -> Vec<u32> {
        self.history
            .iter()
            .filter(|v| **v >= 0)
            .map(|v| (*v).min(u32::MAX as i64) as u32)
            .collect()
    }

    /// The last `n` valid readings
    pub fn recent_readings(&self, n: usize) -> Vec<u32> {
        let readings = self.readings();
        let start = readings.len().saturating_sub(n);
        readings[start..].to_vec()
    }

    /// History entries that carry no signal: zero or negative
    pub fn gap_count(&self) -> usize {
        self.history.iter().filter(|v| **v <= 0).count()
    }

    /// First `n` characters of the timestamp
    pub fn timestamp_prefix(&self, n: usize) -> String {
        self.timestamp.chars().take(n).collect()
    }

    /// First `n` characters of the source label
    pub fn source_prefix(&self, n: usize) -> String {
        self.source_label.chars().take(n).collect()
    }

    pub fn transaction(&self) -> &str {
        self.transaction_reference.as_deref().unwrap_or("")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_readings_drop_negative_entries() {
        let sample = BiometricSample::new(70, 3).with_history(vec![70, -1, 0, 72]);

        assert_eq!(sample.readings(), vec![70, 0, 72]);
        assert_eq!(sample.gap_count(), 2);
    }

    #[test]
    fn test_recent_readings_window() {
        let sample = BiometricSample::new(70, 3).with_history(vec![1, 2, 3, 4, 5]);

        assert_eq!(sample.recent_readings(2), vec![4, 5]);
        assert_eq!(sample.recent_readings(10), vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_prefixes_count_characters() {
        let sample = BiometricSample::new(70, 1)
            .with_source("Chris\u{2019}s Apple\u{a0}Watch", 1)
            .with_timestamp("2026-02-11T10:30:00+00:00");

        assert_eq!(sample.source_prefix(10), "Chris\u{2019}s Ap");
        assert_eq!(sample.timestamp_prefix(16), "2026-02-11T10:30");
    }

    #[test]
    fn test_current_time_only_fills_empty() {
        let fixed = BiometricSample::new(70, 1)
            .with_timestamp("2026-02-11T10:30:00Z")
            .with_current_time();
        assert_eq!(fixed.timestamp, "2026-02-11T10:30:00Z");

        let filled = BiometricSample::new(70, 1).with_current_time();
        assert!(filled.timestamp.len() > 19);
    }

    #[test]
    fn test_deserialize_with_defaults() {
        let sample: BiometricSample = serde_json::from_str(r#"{"value": 55}"#).unwrap();

        assert_eq!(sample.value, 55);
        assert_eq!(sample.cumulative_count, 1);
        assert_eq!(sample.device_id, 1);
        assert!(sample.history.is_empty());
        assert!(sample.transaction_reference.is_none());
    }

    #[test]
    fn test_from_json_rejects_zero_count() {
        let err = BiometricSample::from_json(r#"{"value": 55, "cumulative_count": 0}"#);
        assert!(matches!(err, Err(crate::Error::InvalidSample(_))));

        let ok = BiometricSample::from_json(r#"{"value": 55, "history": [60, 61]}"#).unwrap();
        assert_eq!(ok.history, vec![60, 61]);
    }
}
