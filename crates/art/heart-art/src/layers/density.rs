//! L2 - particle field inside the silhouette, carrying the payload
//!
//! Particle count tracks the cumulative reading count between a floor and
//! a hard cap. The first `payload.len()` particles are routed through the
//! codec and tagged with their byte index; if the payload is longer than
//! the particle count the tail is dropped and the decoder reports the
//! shorter sequence.

use super::{LayerRenderer, RenderContext};
use crate::layers::silhouette::CLIP_ID;
use crate::rng::SequenceState;
use crate::stego::{apply, format_coord, magic_label, STEGO_ENCODING, STEGO_FORMAT_VERSION, STEGO_INDEX_ATTR};
use std::f64::consts::TAU;
use tracing::debug;

/// Cumulative count at which the field reaches full density
const SATURATION: f64 = 50_000.0;

pub struct DensityField;

impl DensityField {
    pub fn particle_count(cumulative: u64, floor: usize, cap: usize) -> usize {
        let count = usize::try_from(cumulative).unwrap_or(usize::MAX);
        count.max(floor).min(cap)
    }

    pub fn density(cumulative: u64) -> f64 {
        (cumulative as f64 / SATURATION).min(1.0)
    }
}

impl LayerRenderer for DensityField {
    fn id(&self) -> &'static str {
        "beat-accumulation"
    }

    fn render(&self, ctx: &RenderContext<'_>, rng: &mut SequenceState) -> String {
        let cumulative = ctx.sample.cumulative_count;
        let count = Self::particle_count(cumulative, ctx.config.particle_floor, ctx.config.particle_cap);
        let density = Self::density(cumulative);
        let payload = ctx.payload;
        let (cx, cy) = (ctx.cx(), ctx.cy());

        if payload.len() > count {
            debug!(
                payload = payload.len(),
                particles = count,
                "payload truncated to particle count"
            );
        }

        let mut parts = Vec::with_capacity(count + 2);
        parts.push(format!(
            r#"<g id="beat-accumulation" clip-path="url(#{})" data-stego-count="{}" data-stego-encoding="{}" data-stego-magic="{}" data-stego-version="{}">"#,
            CLIP_ID,
            payload.len().min(count),
            STEGO_ENCODING,
            magic_label(),
            STEGO_FORMAT_VERSION
        ));

        for i in 0..count {
            let angle = rng.draw() * TAU;
            let rx = rng.draw() * 120.0;
            let ry = rng.draw() * 150.0;
            let base_x = cx + angle.cos() * rx;
            let base_y = cy + angle.sin() * ry - 20.0;

            let entry = payload.get(i);
            let (x, y) = apply(base_x, base_y, entry);
            let marker = entry
                .map(|e| format!(r#" {}="{}""#, STEGO_INDEX_ATTR, e.index))
                .unwrap_or_default();

            let r = 0.4 + rng.draw() * (1.2 + density * 0.8);
            let color = ctx.palette.particles[rng.pick(ctx.palette.particles.len())];
            let opacity = 0.03 + rng.draw() * (0.08 + density * 0.06);
            parts.push(format!(
                r#"  <circle cx="{}" cy="{}" r="{:.2}" fill="{}" opacity="{:.3}"{}/>"#,
                format_coord(x),
                format_coord(y),
                r,
                color,
                opacity,
                marker
            ));
        }

        parts.push("</g>".to_string());
        parts.join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layers::fixtures::Fixture;
    use crate::stego::{decode, decode_raw, DecodeError, SteganographicPayload, STEGO_MAGIC};
    use heart_core::BiometricSample;

    #[test]
    fn test_particle_count_bounds() {
        assert_eq!(DensityField::particle_count(1, 30, 2000), 30);
        assert_eq!(DensityField::particle_count(500, 30, 2000), 500);
        assert_eq!(DensityField::particle_count(10_000_000, 30, 2000), 2000);
        assert_eq!(DensityField::density(25_000), 0.5);
        assert_eq!(DensityField::density(1_000_000), 1.0);
    }

    #[test]
    fn test_field_round_trips_payload() {
        let mut fixture = Fixture::new(BiometricSample::new(72, 500));
        fixture.payload = SteganographicPayload::encode(br#"{"bpm":72}"#);
        let svg = DensityField.render(&fixture.ctx(), &mut SequenceState::new("field"));

        assert_eq!(svg.matches("<circle").count(), 500);
        assert_eq!(svg.matches("data-s=").count(), 12);
        assert_eq!(decode(&svg).unwrap(), br#"{"bpm":72}"#.to_vec());
    }

    #[test]
    fn test_truncated_payload_is_deterministic() {
        let mut fixture = Fixture::new(BiometricSample::new(72, 1));
        fixture.config.particle_floor = 4;
        fixture.payload = SteganographicPayload::encode(b"longer than four");

        let a = DensityField.render(&fixture.ctx(), &mut SequenceState::new("t"));
        let b = DensityField.render(&fixture.ctx(), &mut SequenceState::new("t"));
        assert_eq!(a, b);
        assert!(a.contains(r#"data-stego-count="4""#));
        assert!(a.contains(r#"data-stego-magic="0xCAFE""#));

        let raw = decode_raw(&a).unwrap();
        assert_eq!(&raw[..2], &STEGO_MAGIC);
        assert_eq!(&raw[2..], b"lo");
    }

    #[test]
    fn test_payload_longer_than_field_without_magic_fails() {
        let mut fixture = Fixture::new(BiometricSample::new(72, 1));
        fixture.config.particle_floor = 1;
        fixture.payload = SteganographicPayload::encode(b"x");
        let svg = DensityField.render(&fixture.ctx(), &mut SequenceState::new("t"));
        assert!(matches!(decode(&svg), Err(DecodeError::BadMagic { .. })));
    }
}
