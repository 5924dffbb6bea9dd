//! Classification - the discrete physiological state of a sample
//!
//! States form a closed set. Every renderer and palette lookup keys off
//! [`HeartState`], so adding a state means touching both.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Discrete heart state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HeartState {
    Resting,
    Baseline,
    Active,
    Elevated,
    Anomalous,
    Gap,
}

impl HeartState {
    pub const ALL: [HeartState; 6] = [
        Self::Resting,
        Self::Baseline,
        Self::Active,
        Self::Elevated,
        Self::Anomalous,
        Self::Gap,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Resting => "resting",
            Self::Baseline => "baseline",
            Self::Active => "active",
            Self::Elevated => "elevated",
            Self::Anomalous => "anomalous",
            Self::Gap => "gap",
        }
    }
}

impl fmt::Display for HeartState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HeartState {
    type Err = crate::Error;

    fn from_str(s: &str) -> crate::Result<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|state| state.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| crate::Error::UnknownState(s.to_string()))
    }
}

/// Six-bucket time-of-day table, plus `Unknown` for gaps
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimePeriod {
    Night,
    Dawn,
    Morning,
    Midday,
    Evening,
    Dusk,
    Unknown,
}

impl TimePeriod {
    /// Bucket an hour of day (0-23)
    ///
    /// ```text
    /// 00-04 night | 05-06 dawn | 07-11 morning | 12-14 midday
    /// 15-18 evening | 19-21 dusk | 22-23 night
    /// ```
    pub fn from_hour(hour: u32) -> Self {
        match hour {
            0..=4 | 22..=23 => Self::Night,
            5..=6 => Self::Dawn,
            7..=11 => Self::Morning,
            12..=14 => Self::Midday,
            15..=18 => Self::Evening,
            19..=21 => Self::Dusk,
            _ => Self::Midday,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Night => "night",
            Self::Dawn => "dawn",
            Self::Morning => "morning",
            Self::Midday => "midday",
            Self::Evening => "evening",
            Self::Dusk => "dusk",
            Self::Unknown => "unknown",
        }
    }
}

impl fmt::Display for TimePeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Derived, read-only view of a sample
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Classification {
    pub state: HeartState,
    /// Bracket-specific normalization in [0, 1]
    pub intensity: f64,
    pub is_anomalous: bool,
    /// Value sits in the mechanical pacing band
    pub is_instrument_driven: bool,
    /// RMS of consecutive differences over recent history
    pub variability: f64,
    pub time_period: TimePeriod,
    pub value: u32,
    /// |value - recent average|, 0 when history is too short
    pub deviation: f64,
}

impl Classification {
    /// The fixed classification for a zero reading
    pub fn gap() -> Self {
        Self {
            state: HeartState::Gap,
            intensity: 0.0,
            is_anomalous: false,
            is_instrument_driven: false,
            variability: 0.0,
            time_period: TimePeriod::Unknown,
            value: 0,
            deviation: 0.0,
        }
    }

    pub fn is_gap(&self) -> bool {
        self.state == HeartState::Gap
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_roundtrip_names() {
        for state in HeartState::ALL {
            assert_eq!(state.as_str().parse::<HeartState>().unwrap(), state);
        }
        assert_eq!("ELEVATED".parse::<HeartState>().unwrap(), HeartState::Elevated);
        assert!("panicked".parse::<HeartState>().is_err());
    }

    #[test]
    fn test_time_period_buckets() {
        assert_eq!(TimePeriod::from_hour(0), TimePeriod::Night);
        assert_eq!(TimePeriod::from_hour(4), TimePeriod::Night);
        assert_eq!(TimePeriod::from_hour(5), TimePeriod::Dawn);
        assert_eq!(TimePeriod::from_hour(7), TimePeriod::Morning);
        assert_eq!(TimePeriod::from_hour(12), TimePeriod::Midday);
        assert_eq!(TimePeriod::from_hour(15), TimePeriod::Evening);
        assert_eq!(TimePeriod::from_hour(19), TimePeriod::Dusk);
        assert_eq!(TimePeriod::from_hour(22), TimePeriod::Night);
        assert_eq!(TimePeriod::from_hour(99), TimePeriod::Midday);
    }

    #[test]
    fn test_serde_lowercase() {
        let json = serde_json::to_string(&HeartState::Anomalous).unwrap();
        assert_eq!(json, "\"anomalous\"");
    }

    #[test]
    fn test_gap_classification() {
        let gap = Classification::gap();
        assert!(gap.is_gap());
        assert_eq!(gap.intensity, 0.0);
        assert_eq!(gap.time_period, TimePeriod::Unknown);
    }
}
