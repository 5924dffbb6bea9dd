//! Mock source - plausible wrist-sensor readings by time of day

use crate::{BiometricSource, Reading, Result};
use chrono::{Timelike, Utc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Readings between device switches
const SWITCH_EVERY: u64 = 50;
/// Chance of a daytime stress spike
const SPIKE_CHANCE: f64 = 0.1;

pub struct MockSource {
    rng: StdRng,
    device_id: u32,
    counter: u64,
}

impl MockSource {
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_entropy())
    }

    /// Reproducible sequence, for tests and demos
    pub fn seeded(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }

    fn with_rng(rng: StdRng) -> Self {
        Self {
            rng,
            device_id: 1,
            counter: 0,
        }
    }

    pub fn device_id(&self) -> u32 {
        self.device_id
    }

    /// BPM for a given UTC hour: sleep, waking, work (with spikes), evening, late
    pub fn bpm_for_hour(&mut self, hour: u32) -> u32 {
        match hour {
            0..=5 => self.rng.gen_range(55..=68),
            6..=8 => self.rng.gen_range(65..=80),
            9..=16 => {
                if self.rng.gen_bool(SPIKE_CHANCE) {
                    self.rng.gen_range(100..=120)
                } else {
                    self.rng.gen_range(70..=95)
                }
            }
            17..=21 => self.rng.gen_range(65..=85),
            _ => self.rng.gen_range(60..=75),
        }
    }

    /// Build a reading as if taken at `hour`
    pub fn reading_at(&mut self, hour: u32, timestamp: String) -> Reading {
        self.counter += 1;
        if self.counter % SWITCH_EVERY == 0 {
            self.device_id = if self.device_id == 1 { 2 } else { 1 };
        }
        Reading {
            bpm: self.bpm_for_hour(hour),
            timestamp,
            source: format!("Mock Watch {}", self.device_id),
            device_id: self.device_id,
            original_timestamp: None,
        }
    }
}

impl Default for MockSource {
    fn default() -> Self {
        Self::new()
    }
}

impl BiometricSource for MockSource {
    fn kind(&self) -> &'static str {
        "mock"
    }

    fn next_reading(&mut self) -> Result<Reading> {
        let now = Utc::now();
        Ok(self.reading_at(now.hour(), now.to_rfc3339()))
    }
}
