//! State Classifier - (value, history, timestamp) to a discrete state
//!
//! Pure and total: malformed timestamps fall back to midday, short or
//! empty history simply disables anomaly detection and variability.
//!
//! Priority: anomalous > elevated (>100) > active (>90) > baseline (>=60) > resting.

use heart_config::ArtConfig;
use heart_core::{BiometricSample, Classification, HeartState, TimePeriod};

/// Classify a sample under the given configuration
pub fn classify_sample(sample: &BiometricSample, config: &ArtConfig) -> Classification {
    classify(sample.value, &sample.history, &sample.timestamp, config)
}

/// Classify a raw reading
pub fn classify(value: u32, history: &[i64], timestamp: &str, config: &ArtConfig) -> Classification {
    if value == 0 {
        return Classification::gap();
    }

    let readings: Vec<f64> = history
        .iter()
        .filter(|v| **v >= 0)
        .map(|v| *v as f64)
        .collect();
    let bpm = value as f64;

    let mut is_anomalous = false;
    let mut deviation = 0.0;
    if readings.len() >= config.anomaly_min_history {
        let recent = tail(&readings, config.anomaly_window);
        let recent_avg = recent.iter().sum::<f64>() / recent.len() as f64;
        deviation = (bpm - recent_avg).abs();
        is_anomalous = deviation > config.anomaly_threshold;
    }

    let (state, intensity) = if is_anomalous {
        let span = (config.anomaly_threshold * 2.0).max(1.0);
        (HeartState::Anomalous, (deviation / span).min(1.0))
    } else if value > 100 {
        (HeartState::Elevated, ((bpm - 100.0) / 60.0).min(1.0))
    } else if value > 90 {
        (HeartState::Active, (bpm - 90.0) / 10.0)
    } else if value >= 60 {
        (HeartState::Baseline, 0.3 + 0.4 * (bpm - 60.0) / 30.0)
    } else {
        (HeartState::Resting, (1.0 - bpm / 60.0).max(0.1))
    };

    Classification {
        state,
        intensity,
        is_anomalous,
        is_instrument_driven: config.instrument_band.contains(value),
        variability: variability(&readings, config.variability_window),
        time_period: time_period(timestamp),
        value,
        deviation,
    }
}

/// RMS of consecutive absolute differences over the last `window` readings
///
/// Zero when fewer than three readings exist.
pub fn variability(readings: &[f64], window: usize) -> f64 {
    if readings.len() < 3 {
        return 0.0;
    }
    let recent = tail(readings, window);
    if recent.len() < 2 {
        return 0.0;
    }
    let sum_sq: f64 = recent.windows(2).map(|w| (w[1] - w[0]).powi(2)).sum();
    (sum_sq / (recent.len() - 1) as f64).sqrt()
}

/// Time-of-day bucket from the hour at characters 11..13 of an ISO-8601 string
pub fn time_period(timestamp: &str) -> TimePeriod {
    match parse_hour(timestamp) {
        Some(hour) => TimePeriod::from_hour(hour),
        None => {
            tracing::debug!("Malformed timestamp {:?}, using midday bucket", timestamp);
            TimePeriod::Midday
        }
    }
}

fn parse_hour(timestamp: &str) -> Option<u32> {
    let chars: Vec<char> = timestamp.chars().collect();
    if chars.len() <= 13 {
        return None;
    }
    let hour: String = chars[11..13].iter().collect();
    hour.parse::<u32>().ok().filter(|h| *h < 24)
}

/// Fraction of the last `instrument_window` readings inside the pacing band
pub fn instrument_ratio(history: &[i64], config: &ArtConfig) -> f64 {
    let readings: Vec<i64> = history.iter().copied().filter(|v| *v >= 0).collect();
    if readings.is_empty() {
        return 0.0;
    }
    let recent = tail(&readings, config.instrument_window);
    let driven = recent
        .iter()
        .filter(|v| u32::try_from(**v).map_or(false, |v| config.instrument_band.contains(v)))
        .count();
    driven as f64 / recent.len() as f64
}

fn tail<T>(items: &[T], n: usize) -> &[T] {
    &items[items.len().saturating_sub(n)..]
}

#[cfg(test)]
mod tests {
    use super::*;

    const TS: &str = "2026-02-11T10:30:00+00:00";

    fn state_of(value: u32) -> HeartState {
        classify(value, &[], TS, &ArtConfig::default()).state
    }

    #[test]
    fn test_state_boundaries() {
        assert_eq!(state_of(101), HeartState::Elevated);
        assert_eq!(state_of(100), HeartState::Active);
        assert_eq!(state_of(91), HeartState::Active);
        assert_eq!(state_of(90), HeartState::Baseline);
        assert_eq!(state_of(60), HeartState::Baseline);
        assert_eq!(state_of(59), HeartState::Resting);
        assert_eq!(state_of(0), HeartState::Gap);
    }

    #[test]
    fn test_zero_is_gap_regardless_of_history() {
        let history = [70, 72, 68, 74, 71, 73, 69, 72, 70, 71];
        let c = classify(0, &history, TS, &ArtConfig::default());

        assert_eq!(c, Classification::gap());
    }

    #[test]
    fn test_anomaly_overrides_elevated() {
        let history = [70, 72, 68, 74, 71, 73, 69, 72, 70, 71];
        let c = classify(160, &history, TS, &ArtConfig::default());

        assert_eq!(c.state, HeartState::Anomalous);
        assert!(c.is_anomalous);
        assert!((c.deviation - 89.0).abs() < 1e-9);
        assert_eq!(c.intensity, 1.0);
    }

    #[test]
    fn test_anomaly_needs_five_entries() {
        let c = classify(160, &[70, 70, 70, 70], TS, &ArtConfig::default());
        assert_eq!(c.state, HeartState::Elevated);
        assert!(!c.is_anomalous);
    }

    #[test]
    fn test_anomaly_threshold_is_strict() {
        let history = [70; 10];
        let at = classify(95, &history, TS, &ArtConfig::default());
        let over = classify(96, &history, TS, &ArtConfig::default());

        assert!(!at.is_anomalous);
        assert!(over.is_anomalous);
    }

    #[test]
    fn test_anomaly_uses_last_ten_entries() {
        let mut history = vec![200i64; 20];
        history.extend([70; 10]);
        let c = classify(72, &history, TS, &ArtConfig::default());
        assert!(!c.is_anomalous);
    }

    #[test]
    fn test_instrument_band() {
        let config = ArtConfig::default();
        for v in 58..=62 {
            assert!(classify(v, &[], TS, &config).is_instrument_driven, "{v}");
        }
        assert!(!classify(57, &[], TS, &config).is_instrument_driven);
        assert!(!classify(63, &[], TS, &config).is_instrument_driven);
    }

    #[test]
    fn test_variability_rms() {
        assert_eq!(variability(&[70.0, 72.0], 20), 0.0);

        // diffs 2, 4 -> sqrt((4 + 16) / 2)
        let v = variability(&[70.0, 72.0, 68.0], 20);
        assert!((v - 10f64.sqrt()).abs() < 1e-12);

        let flat = variability(&[60.0; 30], 20);
        assert_eq!(flat, 0.0);
    }

    #[test]
    fn test_variability_uses_recent_window() {
        let mut readings = vec![0.0, 100.0, 0.0, 100.0];
        readings.extend([70.0; 20]);
        assert_eq!(variability(&readings, 20), 0.0);
    }

    #[test]
    fn test_intensity_bounds_and_monotonic() {
        let config = ArtConfig::default();
        let mut prev_by_state: Vec<(HeartState, f64)> = Vec::new();
        for v in 1..=250u32 {
            let c = classify(v, &[], TS, &config);
            assert!((0.0..=1.0).contains(&c.intensity), "{v}: {}", c.intensity);
            if let Some((state, prev)) = prev_by_state.last() {
                if *state == c.state {
                    match c.state {
                        HeartState::Resting => assert!(c.intensity <= *prev),
                        _ => assert!(c.intensity >= *prev),
                    }
                }
            }
            prev_by_state.push((c.state, c.intensity));
        }
        assert_eq!(classify(200, &[], TS, &config).intensity, 1.0);
        assert_eq!(classify(59, &[], TS, &config).intensity, 0.1);
    }

    #[test]
    fn test_time_period_from_timestamp() {
        assert_eq!(time_period("2026-02-11T03:00:00Z"), TimePeriod::Night);
        assert_eq!(time_period("2026-02-11T06:00:00Z"), TimePeriod::Dawn);
        assert_eq!(time_period(TS), TimePeriod::Morning);
        assert_eq!(time_period("2026-02-11T13:00:00Z"), TimePeriod::Midday);
        assert_eq!(time_period("2026-02-11T16:00:00Z"), TimePeriod::Evening);
        assert_eq!(time_period("2026-02-11T20:00:00Z"), TimePeriod::Dusk);
        assert_eq!(time_period("2026-02-11T23:59:00Z"), TimePeriod::Night);
    }

    #[test]
    fn test_malformed_timestamp_falls_back() {
        assert_eq!(time_period(""), TimePeriod::Midday);
        assert_eq!(time_period("2026-02-11"), TimePeriod::Midday);
        assert_eq!(time_period("2026-02-11Txx:00:00"), TimePeriod::Midday);
        assert_eq!(time_period("2026-02-11T99:00:00"), TimePeriod::Midday);
    }

    #[test]
    fn test_negative_history_treated_as_absent() {
        let history = [70, -5, 72, -1, 68, 74, 71];
        let c = classify(72, &history, TS, &ArtConfig::default());
        let clean = classify(72, &[70, 72, 68, 74, 71], TS, &ArtConfig::default());
        assert_eq!(c, clean);
    }

    #[test]
    fn test_instrument_ratio() {
        let config = ArtConfig::default();
        assert_eq!(instrument_ratio(&[], &config), 0.0);
        assert_eq!(instrument_ratio(&[60, 61, 80, 90], &config), 0.5);

        let mut long = vec![60i64; 50];
        long.extend([80; 50]);
        assert_eq!(instrument_ratio(&long, &config), 0.0);
    }

    #[test]
    fn test_repeatable() {
        let config = ArtConfig::default();
        let history = [70, 72, 68, 74, 71];
        assert_eq!(
            classify(88, &history, TS, &config),
            classify(88, &history, TS, &config)
        );
    }
}
