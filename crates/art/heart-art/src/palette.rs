//! Palette Table - fixed colors per heart state
//!
//! Warm organic reds for tissue, cold blues for the pacing device.
//! Pure lookup: no randomness, nothing mutable.

use heart_core::HeartState;

/// Colors for one state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    /// Radial background gradient stops (center, edge)
    pub background: [&'static str; 2],
    pub silhouette: &'static str,
    pub silhouette_fill: &'static str,
    pub vessels: [&'static str; 3],
    pub instrument: &'static str,
    pub instrument_accent: &'static str,
    pub waveform: &'static str,
    pub glow: &'static str,
    pub circuit: &'static str,
    pub pulse: &'static str,
    pub particles: [&'static str; 4],
}

const RESTING: Palette = Palette {
    background: ["#0a0005", "#150008"],
    silhouette: "#8B0000",
    silhouette_fill: "rgba(139, 0, 0, 0.04)",
    vessels: ["#8B0000", "#A0153E", "#6B0020"],
    instrument: "#4A90D9",
    instrument_accent: "#2563EB",
    waveform: "#DC143C",
    glow: "#8B0000",
    circuit: "#4A90D9",
    pulse: "#FF4444",
    particles: ["#8B0000", "#6B0020", "#A0153E", "#4A0010"],
};

const BASELINE: Palette = Palette {
    background: ["#0a0008", "#12000a"],
    silhouette: "#CC2936",
    silhouette_fill: "rgba(204, 41, 54, 0.05)",
    vessels: ["#CC2936", "#E84855", "#B91C1C"],
    instrument: "#60A5FA",
    instrument_accent: "#3B82F6",
    waveform: "#EF4444",
    glow: "#CC2936",
    circuit: "#60A5FA",
    pulse: "#FF6B6B",
    particles: ["#CC2936", "#B91C1C", "#E84855", "#991B1B"],
};

const ACTIVE: Palette = Palette {
    background: ["#0d000a", "#1a000e"],
    silhouette: "#EF4444",
    silhouette_fill: "rgba(239, 68, 68, 0.06)",
    vessels: ["#EF4444", "#F97316", "#DC2626"],
    instrument: "#93C5FD",
    instrument_accent: "#60A5FA",
    waveform: "#F59E0B",
    glow: "#EF4444",
    circuit: "#93C5FD",
    pulse: "#FBBF24",
    particles: ["#EF4444", "#DC2626", "#F97316", "#B91C1C"],
};

const ELEVATED: Palette = Palette {
    background: ["#120005", "#1f0008"],
    silhouette: "#FF6B6B",
    silhouette_fill: "rgba(255, 107, 107, 0.08)",
    vessels: ["#FF6B6B", "#FF8C00", "#FF4500"],
    instrument: "#BFDBFE",
    instrument_accent: "#93C5FD",
    waveform: "#FFD700",
    glow: "#FF6B6B",
    circuit: "#BFDBFE",
    pulse: "#FFD700",
    particles: ["#FF6B6B", "#FF4500", "#FF8C00", "#CC2936"],
};

const ANOMALOUS: Palette = Palette {
    background: ["#0a0000", "#150005"],
    silhouette: "#FF0044",
    silhouette_fill: "rgba(255, 0, 68, 0.10)",
    vessels: ["#FF0044", "#FF0000", "#CC0033"],
    instrument: "#F0F0FF",
    instrument_accent: "#E0E0FF",
    waveform: "#FF0044",
    glow: "#FF0044",
    circuit: "#F0F0FF",
    pulse: "#FF0044",
    particles: ["#FF0044", "#CC0033", "#FF0000", "#990022"],
};

const GAP: Palette = Palette {
    background: ["#050002", "#080004"],
    silhouette: "#330015",
    silhouette_fill: "rgba(51, 0, 21, 0.02)",
    vessels: ["#330015", "#220010", "#110008"],
    instrument: "#1a1a3a",
    instrument_accent: "#111128",
    waveform: "#220010",
    glow: "#110008",
    circuit: "#1a1a3a",
    pulse: "#330015",
    particles: ["#220010", "#110008", "#0a0005", "#050002"],
};

/// Palette used for any state name the table does not know
pub const DEFAULT_PALETTE: Palette = BASELINE;

impl Palette {
    pub fn lookup(state: HeartState) -> Palette {
        match state {
            HeartState::Resting => RESTING,
            HeartState::Baseline => BASELINE,
            HeartState::Active => ACTIVE,
            HeartState::Elevated => ELEVATED,
            HeartState::Anomalous => ANOMALOUS,
            HeartState::Gap => GAP,
        }
    }

    /// Lookup by name, falling back to [`DEFAULT_PALETTE`]
    pub fn lookup_name(name: &str) -> Palette {
        name.parse::<HeartState>()
            .map(Self::lookup)
            .unwrap_or(DEFAULT_PALETTE)
    }
}
