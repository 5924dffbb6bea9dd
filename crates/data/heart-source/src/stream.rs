//! Sample Stream - turns single readings into generator-ready samples
//!
//! Keeps the last 100 readings and the running count. Each sample carries
//! the newest 50 history entries, the current reading included.

use crate::{BiometricSource, Reading, Result};
use heart_core::BiometricSample;
use std::collections::VecDeque;
use tracing::debug;

pub const HISTORY_CAPACITY: usize = 100;
pub const SAMPLE_HISTORY: usize = 50;

pub struct SampleStream<S> {
    source: S,
    history: VecDeque<i64>,
    cumulative: u64,
    transaction: Option<String>,
}

impl<S: BiometricSource> SampleStream<S> {
    pub fn new(source: S) -> Self {
        Self::resume(source, 0)
    }

    /// Continue counting from an earlier run
    pub fn resume(source: S, cumulative: u64) -> Self {
        Self {
            source,
            history: VecDeque::with_capacity(HISTORY_CAPACITY),
            cumulative,
            transaction: None,
        }
    }

    pub fn cumulative(&self) -> u64 {
        self.cumulative
    }

    pub fn history(&self) -> Vec<i64> {
        self.history.iter().copied().collect()
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Reference attached to the next samples (e.g. a ledger receipt)
    pub fn set_transaction(&mut self, reference: Option<String>) {
        self.transaction = reference;
    }

    /// Record a reading without producing a sample
    pub fn record(&mut self, reading: &Reading) {
        if self.history.len() == HISTORY_CAPACITY {
            self.history.pop_front();
        }
        self.history.push_back(reading.bpm as i64);
        self.cumulative += 1;
    }

    /// Pull the next reading and assemble its sample
    pub fn next_sample(&mut self) -> Result<BiometricSample> {
        let reading = self.source.next_reading()?;
        self.record(&reading);

        let skip = self.history.len().saturating_sub(SAMPLE_HISTORY);
        let recent: Vec<i64> = self.history.iter().skip(skip).copied().collect();

        let mut sample = BiometricSample::new(reading.bpm, self.cumulative)
            .with_timestamp(reading.timestamp)
            .with_source(reading.source, reading.device_id)
            .with_history(recent)
            .with_current_time();
        if let Some(reference) = &self.transaction {
            sample = sample.with_transaction(reference.clone());
        }

        debug!(
            source = self.source.kind(),
            bpm = sample.value,
            count = sample.cumulative_count,
            "sample assembled"
        );
        Ok(sample)
    }
}
