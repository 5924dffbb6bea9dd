//! Art Generator - one sample in, one deterministic SVG document out
//!
//! ```text
//! sample ──classify──> classification ──> palette
//!    │                       │
//!    └── seed(count, state, value, ts[..16]) ──> SequenceState
//!    └── payload json ──> SteganographicPayload
//!
//! PIPELINE (fixed order, shared SequenceState) ──> fragments ──> <svg>
//! ```
//!
//! Identical samples always produce byte-identical markup. Each call owns
//! its sequence state, so independent calls may run on any thread.

use crate::classify::{classify_sample, instrument_ratio};
use crate::layers::metadata::sample_hash;
use crate::layers::{RenderContext, PIPELINE};
use crate::palette::Palette;
use crate::rng::{composite_seed, SequenceState};
use crate::stego::{SteganographicPayload, STEGO_FORMAT_VERSION};
use crate::Result;
use heart_config::ArtConfig;
use heart_core::{escape_xml, ArtifactDescriptor, BiometricSample, Classification};
use serde::Serialize;
use sha2::{Digest, Sha256};
use tracing::{debug, info, warn};

/// Characters of the timestamp folded into the seed (minute resolution)
const SEED_TIMESTAMP_CHARS: usize = 16;
const PAYLOAD_TIMESTAMP_CHARS: usize = 19;
const PAYLOAD_SOURCE_CHARS: usize = 10;

/// Compact record hidden in the particle field; field order is part of
/// the format
#[derive(Debug, Serialize)]
struct PayloadRecord<'a> {
    bpm: u32,
    ts: String,
    src: String,
    beats: u64,
    hrv: f64,
    state: &'a str,
    pacer: bool,
}

impl<'a> PayloadRecord<'a> {
    fn new(sample: &BiometricSample, classification: &'a Classification) -> Self {
        Self {
            bpm: sample.value,
            ts: sample.timestamp_prefix(PAYLOAD_TIMESTAMP_CHARS),
            src: sample.source_prefix(PAYLOAD_SOURCE_CHARS),
            beats: sample.cumulative_count,
            hrv: (classification.variability * 100.0).round() / 100.0,
            state: classification.state.as_str(),
            pacer: classification.is_instrument_driven,
        }
    }
}

/// 16 hex chars over (count, state, value)
pub fn content_hash(count: u64, state: &str, value: u32) -> String {
    let digest = Sha256::digest(format!("{}:{}:{}", count, state, value).as_bytes());
    hex::encode(digest)[..16].to_string()
}

pub fn artifact_filename(count: u64, state: &str, hash: &str) -> String {
    format!("human-{}-{}-{}.svg", count, state, hash)
}

/// Generator bound to one validated configuration
#[derive(Debug, Clone, Default)]
pub struct ArtGenerator {
    config: ArtConfig,
}

impl ArtGenerator {
    pub fn new(config: ArtConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &ArtConfig {
        &self.config
    }

    /// Serialized payload for a sample; empty if serialization fails
    pub fn payload_json(sample: &BiometricSample, classification: &Classification) -> String {
        match serde_json::to_string(&PayloadRecord::new(sample, classification)) {
            Ok(json) => json,
            Err(e) => {
                warn!(error = %e, "payload serialization failed, embedding marker only");
                String::new()
            }
        }
    }

    /// Render one artifact. Never fails: degenerate input degrades the art.
    pub fn generate(&self, sample: &BiometricSample) -> ArtifactDescriptor {
        let config = &self.config;
        let classification = classify_sample(sample, config);
        let state = classification.state.as_str();
        let palette = Palette::lookup(classification.state);

        let seed = composite_seed(
            sample.cumulative_count,
            state,
            sample.value,
            &sample.timestamp_prefix(SEED_TIMESTAMP_CHARS),
        );
        let mut rng = SequenceState::new(&seed);
        let ratio = instrument_ratio(&sample.history, config);
        let payload = SteganographicPayload::encode(Self::payload_json(sample, &classification).as_bytes());

        let ctx = RenderContext {
            sample,
            classification: &classification,
            palette: &palette,
            config,
            payload: &payload,
            instrument_ratio: ratio,
        };

        let mut fragments = Vec::with_capacity(PIPELINE.len() + 2);
        fragments.push(Self::open_tag(&ctx));
        for layer in PIPELINE {
            let fragment = layer.render(&ctx, &mut rng);
            if fragment.is_empty() {
                debug!(layer = layer.id(), "layer skipped");
                continue;
            }
            fragments.push(fragment);
        }
        fragments.push("</svg>".to_string());
        let markup = fragments.join("\n");

        let hash = content_hash(sample.cumulative_count, state, sample.value);
        let filename = artifact_filename(sample.cumulative_count, state, &hash);

        info!(
            state,
            value = sample.value,
            count = sample.cumulative_count,
            draws = rng.draws(),
            bytes = markup.len(),
            filename = %filename,
            "artifact generated"
        );

        ArtifactDescriptor {
            markup,
            content_hash: hash,
            filename,
            state: state.to_string(),
        }
    }

    fn open_tag(ctx: &RenderContext<'_>) -> String {
        let sample = ctx.sample;
        let c = ctx.classification;
        let (w, h) = (ctx.config.canvas.width, ctx.config.canvas.height);
        format!(
            concat!(
                r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 {w} {h}" width="{w}" height="{h}" "#,
                r#"data-heart-version="1.0" data-heart-bpm="{bpm}" data-heart-state="{state}" "#,
                r#"data-heart-beats="{beats}" data-heart-source="{source}" data-heart-device="{device}" "#,
                r#"data-heart-timestamp="{ts}" data-heart-bpm-hash="{hash}" data-heart-pacer="{pacer}" "#,
                r#"data-heart-hrv="{hrv:.2}" data-heart-pacer-ratio="{ratio:.4}" data-heart-time-period="{period}" data-heart-stego-version="{stego}">"#
            ),
            w = w,
            h = h,
            bpm = sample.value,
            state = c.state,
            beats = sample.cumulative_count,
            source = escape_xml(&sample.source_label),
            device = sample.device_id,
            ts = escape_xml(&sample.timestamp),
            hash = sample_hash(sample),
            pacer = c.is_instrument_driven,
            hrv = c.variability,
            ratio = ctx.instrument_ratio,
            period = c.time_period,
            stego = STEGO_FORMAT_VERSION,
        )
    }
}

/// Render with the default configuration
pub fn generate(sample: &BiometricSample) -> ArtifactDescriptor {
    ArtGenerator::default().generate(sample)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::signature::decode_instrument_signature;
    use crate::stego::{decode, decode_outcome};

    const TS: &str = "2026-02-11T10:30:00+00:00";

    fn calm(value: u32, count: u64) -> BiometricSample {
        BiometricSample::new(value, count)
            .with_timestamp(TS)
            .with_source("Apple Watch", 1)
            .with_history(vec![70, 72, 68, 74, 71, 73, 69, 72, 70, 71])
    }

    #[test]
    fn test_generation_is_deterministic() {
        let sample = calm(72, 500);
        let a = generate(&sample);
        let b = generate(&sample);
        assert_eq!(a, b);
        assert_eq!(a.content_hash.len(), 16);
        assert_eq!(a.filename, format!("human-500-baseline-{}.svg", a.content_hash));
    }

    #[test]
    fn test_inputs_change_output() {
        let base = generate(&calm(72, 500)).markup;
        assert_ne!(base, generate(&calm(73, 500)).markup);
        assert_ne!(base, generate(&calm(72, 501)).markup);
        assert_ne!(base, generate(&calm(72, 500).with_timestamp("2026-02-11T10:31:00+00:00")).markup);
    }

    #[test]
    fn test_resting_end_to_end() {
        let artifact = generate(&BiometricSample::new(55, 10));
        assert_eq!(artifact.state, "resting");
        assert!(artifact.markup.starts_with("<svg "));
        assert!(artifact.markup.ends_with("</svg>"));
        assert!(artifact.markup.contains(r#"<g id="heart-outline""#));
        assert!(artifact.markup.contains(r#"data-heart-pacer="false""#));
        assert!(!artifact.markup.contains("anomaly-sparks"));
        assert!(!artifact.markup.contains("data-gap-voids"));
    }

    #[test]
    fn test_work_bounded_by_particle_cap() {
        let artifact = generate(&calm(72, 10_000_000));
        let particles = artifact
            .markup
            .split(r#"<g id="beat-accumulation""#)
            .nth(1)
            .and_then(|rest| rest.split("</g>").next())
            .map(|field| field.matches("<circle").count())
            .unwrap();
        assert_eq!(particles, 2000);
    }

    #[test]
    fn test_payload_recovered_from_markup() {
        let sample = calm(72, 500);
        let artifact = generate(&sample);
        let bytes = decode(&artifact.markup).unwrap();
        let record: serde_json::Value = serde_json::from_slice(&bytes).unwrap();

        assert_eq!(record["bpm"], 72);
        assert_eq!(record["ts"], "2026-02-11T10:30:00");
        assert_eq!(record["src"], "Apple Watc");
        assert_eq!(record["beats"], 500);
        assert_eq!(record["state"], "baseline");
        assert_eq!(record["pacer"], false);

        let outcome = decode_outcome(&artifact.markup);
        assert!(outcome.success);
        assert!(outcome.text.starts_with(r#"{"bpm":72,"ts":"#));
    }

    #[test]
    fn test_small_field_truncates_payload() {
        // 30 particles cannot hold the record, so the JSON comes back cut short
        let artifact = generate(&BiometricSample::new(72, 1).with_timestamp(TS));
        let outcome = decode_outcome(&artifact.markup);
        assert!(outcome.success);
        assert_eq!(outcome.byte_count, 28);
    }

    #[test]
    fn test_anomaly_renders_sparks() {
        let artifact = generate(&calm(160, 100_000));
        assert_eq!(artifact.state, "anomalous");
        assert!(artifact.markup.contains(r#"<g id="anomaly-sparks""#));
    }

    #[test]
    fn test_gap_flatlines() {
        let artifact = generate(&BiometricSample::new(0, 10).with_history(vec![70, 0, 72]));
        assert_eq!(artifact.state, "gap");
        assert!(artifact.markup.contains(r#"data-flatline="true""#));
        assert!(artifact.markup.contains(r#"<g id="data-gap-voids""#));
    }

    #[test]
    fn test_pacing_signature_survives_generation() {
        let sample = BiometricSample::new(60, 190_950)
            .with_timestamp(TS)
            .with_history(vec![60; 50]);
        let artifact = generate(&sample);
        let signature = decode_instrument_signature(&artifact.markup).unwrap();
        assert_eq!(signature.value, 127);
        assert!(artifact.markup.contains(r#"data-heart-pacer="true""#));
    }

    #[test]
    fn test_invalid_config_rejected() {
        let mut config = ArtConfig::default();
        config.particle_cap = 0;
        assert!(ArtGenerator::new(config).is_err());
    }
}
