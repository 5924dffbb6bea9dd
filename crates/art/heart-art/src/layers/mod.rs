//! Layer Renderers - one SVG fragment per visual layer
//!
//! Every renderer reads the same [`RenderContext`] and advances the single
//! [`SequenceState`] owned by the pass. Because draws are shared, the call
//! order is part of the output format and lives in [`PIPELINE`]:
//!
//! ```text
//!  0 metadata        L1 structured <metadata>          (no draws)
//!  1 defs            filters + gradient                (no draws)
//!  2 background      micro-dots, count ~ cumulative
//!  3 silhouette      bezier heart, wobble ~ variability (L5)
//!  4 circuitry       pacing device + traces, ratio bits (L6)
//!  5 vessels         history as perpendicular offsets  (no draws)
//!  6 density         particles carrying the payload    (L2)
//!  7 sparks          only when anomalous
//!  8 voids           only when history has gaps
//!  9 waveform        EKG strip driven by value
//! 10 band            metadata text strip               (no draws)
//! 11 watermark       opacity-0 mark                    (L3, no draws)
//! ```
//!
//! Renderers never fail. Empty or length-1 history degrades to flat output.

pub mod background;
pub mod band;
pub mod circuitry;
pub mod defs;
pub mod density;
pub mod metadata;
pub mod silhouette;
pub mod sparks;
pub mod vessels;
pub mod voids;
pub mod watermark;
pub mod waveform;

use crate::palette::Palette;
use crate::rng::SequenceState;
use crate::stego::SteganographicPayload;
use heart_config::ArtConfig;
use heart_core::{BiometricSample, Classification};

/// Everything a renderer may read
#[derive(Debug, Clone, Copy)]
pub struct RenderContext<'a> {
    pub sample: &'a BiometricSample,
    pub classification: &'a Classification,
    pub palette: &'a Palette,
    pub config: &'a ArtConfig,
    pub payload: &'a SteganographicPayload,
    /// Fraction of recent readings inside the pacing band
    pub instrument_ratio: f64,
}

impl RenderContext<'_> {
    pub fn cx(&self) -> f64 {
        self.config.canvas.center_x
    }

    pub fn cy(&self) -> f64 {
        self.config.canvas.center_y
    }

    pub fn width(&self) -> f64 {
        self.config.canvas.width as f64
    }

    pub fn height(&self) -> f64 {
        self.config.canvas.height as f64
    }
}

/// A single visual layer
pub trait LayerRenderer {
    /// Stable layer name, used for logs and group ids
    fn id(&self) -> &'static str;

    /// Produce the fragment; empty string when the layer does not apply
    fn render(&self, ctx: &RenderContext<'_>, rng: &mut SequenceState) -> String;
}

/// Fixed render order for one generation pass
pub const PIPELINE: &[&dyn LayerRenderer] = &[
    &metadata::MetadataBlock,
    &defs::Definitions,
    &background::Background,
    &silhouette::Silhouette,
    &circuitry::Circuitry,
    &vessels::VesselWaveforms,
    &density::DensityField,
    &sparks::AnomalySparks,
    &voids::GapVoids,
    &waveform::Waveform,
    &band::MetadataBand,
    &watermark::Watermark,
];

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;
    use crate::classify::{classify_sample, instrument_ratio};

    /// Owned inputs so tests can borrow a RenderContext from them
    pub struct Fixture {
        pub sample: BiometricSample,
        pub classification: Classification,
        pub palette: Palette,
        pub config: ArtConfig,
        pub payload: SteganographicPayload,
    }

    impl Fixture {
        pub fn new(sample: BiometricSample) -> Self {
            let config = ArtConfig::default();
            let classification = classify_sample(&sample, &config);
            Self {
                palette: Palette::lookup(classification.state),
                payload: SteganographicPayload::encode(b"fixture"),
                sample,
                classification,
                config,
            }
        }

        pub fn ctx(&self) -> RenderContext<'_> {
            RenderContext {
                sample: &self.sample,
                classification: &self.classification,
                palette: &self.palette,
                config: &self.config,
                payload: &self.payload,
                instrument_ratio: instrument_ratio(&self.sample.history, &self.config),
            }
        }
    }

    pub fn calm_history() -> Vec<i64> {
        vec![70, 72, 68, 74, 71, 73, 69, 72, 70, 71]
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::Fixture;
    use super::*;

    #[test]
    fn test_pipeline_ids_unique_and_ordered() {
        let ids: Vec<&str> = PIPELINE.iter().map(|l| l.id()).collect();
        assert_eq!(ids.first(), Some(&"metadata"));
        assert_eq!(ids.last(), Some(&"watermark"));
        let mut sorted = ids.clone();
        sorted.sort();
        sorted.dedup();
        assert_eq!(sorted.len(), ids.len());
    }

    #[test]
    fn test_every_layer_survives_degenerate_history() {
        for history in [vec![], vec![72], vec![0], vec![-3, -1]] {
            for value in [0u32, 55, 60, 95, 180] {
                let fixture = Fixture::new(BiometricSample::new(value, 1).with_history(history.clone()));
                let mut rng = SequenceState::new("degenerate");
                for layer in PIPELINE {
                    let _ = layer.render(&fixture.ctx(), &mut rng);
                }
            }
        }
    }
}
