//! # Heart Config
//!
//! Every tunable number the generator uses, with documented defaults.
//!
//! The anomaly threshold (25 BPM) and the pacing band (58-62 BPM) carry no
//! stated derivation, so they live here instead of being baked into the
//! classifier. Changing any value changes output bytes: the determinism
//! contract is "same sample + same config = same artifact".
//!
//! ```yaml
//! anomaly_threshold: 25.0
//! instrument_band: { low: 58, high: 62 }
//! particle_cap: 2000
//! canvas: { width: 1200, height: 1200, center_x: 600, center_y: 570 }
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Result type for heart-config operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while loading or validating configuration
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    YamlError(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Invalid instrument band: low {low} > high {high}")]
    InvalidBand { low: u32, high: u32 },

    #[error("Invalid cap {name}: {reason}")]
    InvalidCap { name: &'static str, reason: String },

    #[error("Invalid canvas: {0}")]
    InvalidCanvas(String),
}

/// Inclusive BPM band associated with mechanical pacing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InstrumentBand {
    pub low: u32,
    pub high: u32,
}

impl InstrumentBand {
    pub fn contains(&self, value: u32) -> bool {
        (self.low..=self.high).contains(&value)
    }
}

impl Default for InstrumentBand {
    fn default() -> Self {
        Self { low: 58, high: 62 }
    }
}

/// Document geometry
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Canvas {
    pub width: u32,
    pub height: u32,
    /// Silhouette center, slightly above the geometric middle
    pub center_x: f64,
    pub center_y: f64,
}

impl Default for Canvas {
    fn default() -> Self {
        Self {
            width: 1200,
            height: 1200,
            center_x: 600.0,
            center_y: 570.0,
        }
    }
}

/// Generator configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArtConfig {
    /// |value - recent mean| above this flags an anomaly
    pub anomaly_threshold: f64,
    /// History entries required before anomaly detection runs
    pub anomaly_min_history: usize,
    /// Entries averaged for the anomaly baseline
    pub anomaly_window: usize,
    pub instrument_band: InstrumentBand,
    /// Entries used for the variability RMS
    pub variability_window: usize,
    /// Entries scanned for the instrument-driven ratio
    pub instrument_window: usize,
    /// Entries drawn as vessel waveforms
    pub vessel_window: usize,

    /// Density layer particle bounds
    pub particle_cap: usize,
    pub particle_floor: usize,
    /// Background micro-dot bounds
    pub background_cell_cap: usize,
    pub background_cell_floor: usize,
    pub spark_cap: usize,
    pub void_cap: usize,

    /// Upper bound on silhouette control-point wobble factor
    pub max_wobble: f64,

    pub canvas: Canvas,
}

impl Default for ArtConfig {
    fn default() -> Self {
        Self {
            anomaly_threshold: 25.0,
            anomaly_min_history: 5,
            anomaly_window: 10,
            instrument_band: InstrumentBand::default(),
            variability_window: 20,
            instrument_window: 50,
            vessel_window: 50,
            particle_cap: 2000,
            particle_floor: 30,
            background_cell_cap: 200,
            background_cell_floor: 20,
            spark_cap: 12,
            void_cap: 5,
            max_wobble: 2.5,
            canvas: Canvas::default(),
        }
    }
}

impl ArtConfig {
    /// Default location (~/.config/heartart/config.yaml)
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("heartart")
            .join("config.yaml")
    }

    /// Load from a YAML or JSON file, chosen by extension
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;

        let config: Self = match path.extension().and_then(|e| e.to_str()) {
            Some("json") => serde_json::from_str(&content)?,
            _ => serde_yaml::from_str(&content)?,
        };

        config.validate()?;
        tracing::debug!("Loaded art config from {}", path.display());
        Ok(config)
    }

    /// Load from the default location, falling back to defaults when absent
    pub fn load_or_default() -> Result<Self> {
        let path = Self::default_path();
        if path.exists() {
            Self::load(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Save as YAML
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, serde_yaml::to_string(self)?)?;
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        let band = self.instrument_band;
        if band.low > band.high {
            return Err(Error::InvalidBand {
                low: band.low,
                high: band.high,
            });
        }

        let caps = [
            ("particle_cap", self.particle_floor, self.particle_cap),
            ("background_cell_cap", self.background_cell_floor, self.background_cell_cap),
        ];
        for (name, floor, cap) in caps {
            if cap == 0 {
                return Err(Error::InvalidCap { name, reason: "must be positive".into() });
            }
            if floor > cap {
                return Err(Error::InvalidCap {
                    name,
                    reason: format!("floor {} exceeds cap {}", floor, cap),
                });
            }
        }
        if self.spark_cap == 0 || self.void_cap == 0 {
            return Err(Error::InvalidCap {
                name: "spark_cap/void_cap",
                reason: "must be positive".into(),
            });
        }
        if self.anomaly_window == 0 || self.instrument_window == 0 || self.vessel_window == 0 {
            return Err(Error::InvalidCap {
                name: "history windows",
                reason: "must be positive".into(),
            });
        }
        if self.max_wobble.is_nan()
            || self.max_wobble < 0.0
            || self.anomaly_threshold.is_nan()
            || self.anomaly_threshold < 0.0
        {
            return Err(Error::InvalidCap {
                name: "max_wobble/anomaly_threshold",
                reason: "must be non-negative".into(),
            });
        }

        let canvas = self.canvas;
        if canvas.width == 0 || canvas.height == 0 {
            return Err(Error::InvalidCanvas("width and height must be positive".into()));
        }
        if canvas.center_x < 0.0
            || canvas.center_y < 0.0
            || canvas.center_x > canvas.width as f64
            || canvas.center_y > canvas.height as f64
        {
            return Err(Error::InvalidCanvas("center must lie inside the canvas".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("heartart_config_{}_{}", std::process::id(), name))
    }

    #[test]
    fn test_defaults_are_valid() {
        let config = ArtConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.anomaly_threshold, 25.0);
        assert_eq!(config.particle_cap, 2000);
    }

    #[test]
    fn test_instrument_band_inclusive() {
        let band = InstrumentBand::default();
        for v in 58..=62 {
            assert!(band.contains(v));
        }
        assert!(!band.contains(57));
        assert!(!band.contains(63));
    }

    #[test]
    fn test_partial_yaml_fills_defaults() {
        let config: ArtConfig = serde_yaml::from_str("particle_cap: 500\n").unwrap();
        assert_eq!(config.particle_cap, 500);
        assert_eq!(config.spark_cap, 12);
        assert_eq!(config.canvas, Canvas::default());
    }

    #[test]
    fn test_validate_rejects_inverted_band() {
        let config = ArtConfig {
            instrument_band: InstrumentBand { low: 70, high: 60 },
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(Error::InvalidBand { .. })));
    }

    #[test]
    fn test_validate_rejects_floor_above_cap() {
        let config = ArtConfig {
            particle_floor: 50,
            particle_cap: 10,
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(Error::InvalidCap { .. })));
    }

    #[test]
    fn test_save_and_load_yaml() {
        let path = temp_path("roundtrip.yaml");
        let config = ArtConfig {
            anomaly_threshold: 30.0,
            ..Default::default()
        };
        config.save(&path).unwrap();

        let loaded = ArtConfig::load(&path).unwrap();
        assert_eq!(loaded, config);
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_load_json() {
        let path = temp_path("config.json");
        std::fs::write(&path, r#"{"void_cap": 3}"#).unwrap();

        let loaded = ArtConfig::load(&path).unwrap();
        assert_eq!(loaded.void_cap, 3);
        let _ = std::fs::remove_file(&path);
    }
}
