//! L6 - pacing device, lead wires and circuit traces
//!
//! The instrument ratio (share of recent readings in the pacing band) is
//! quantized to 7 bits. Trace element `i` sits at
//! `origin + i * TRACE_SPACING + bit_i * TRACE_BIT_SHIFT`, so the spacing
//! between neighbours carries the bits. Randomness only touches y, size
//! and rotation, which keeps the x positions decodable.

use super::{LayerRenderer, RenderContext};
use crate::rng::SequenceState;

pub const TRACE_BITS: usize = 7;
pub const TRACE_SPACING: f64 = 12.0;
pub const TRACE_BIT_SHIFT: f64 = 0.5;

/// Device body offset from the silhouette center
pub const DEVICE_OFFSET: (f64, f64) = (-95.0, -115.0);
pub const DEVICE_SIZE: (f64, f64) = (28.0, 22.0);

/// Quantize a ratio in [0, 1] to the 7-bit trace value
pub fn quantize_ratio(ratio: f64) -> u8 {
    (ratio.clamp(0.0, 1.0) * 127.0) as u8
}

pub fn ratio_bits(value: u8) -> String {
    format!("{:07b}", value.min(127))
}

pub struct Circuitry;

impl LayerRenderer for Circuitry {
    fn id(&self) -> &'static str {
        "pacemaker-circuit"
    }

    fn render(&self, ctx: &RenderContext<'_>, rng: &mut SequenceState) -> String {
        let palette = ctx.palette;
        let (cx, cy) = (ctx.cx(), ctx.cy());
        let driven = ctx.classification.is_instrument_driven;
        let circuit_opacity = if driven { 0.6 } else { 0.3 };
        let glow = if driven { r#" filter="url(#glow)""# } else { "" };

        let (dev_x, dev_y) = (cx + DEVICE_OFFSET.0, cy + DEVICE_OFFSET.1);
        let (dev_w, dev_h) = DEVICE_SIZE;
        let lead_x = dev_x + dev_w / 2.0;
        let lead_y = dev_y + dev_h;

        let value = quantize_ratio(ctx.instrument_ratio);
        let bits = ratio_bits(value);
        let origin = cx - 80.0;

        let mut parts = vec![format!(
            r#"<g id="pacemaker-circuit" opacity="{}" data-trace-origin="{:.2}" data-trace-spacing="{}">"#,
            circuit_opacity, origin, TRACE_SPACING
        )];
        parts.push(format!(
            r#"  <rect x="{}" y="{}" width="{}" height="{}" rx="3" fill="none" stroke="{}" stroke-width="1.2"{}/>"#,
            dev_x, dev_y, dev_w, dev_h, palette.instrument, glow
        ));
        for i in 0..3 {
            let lx = dev_x + 6.0 + i as f64 * 8.0;
            parts.push(format!(
                r#"  <line x1="{}" y1="{}" x2="{}" y2="{}" stroke="{}" stroke-width="0.6" opacity="0.5"/>"#,
                lx,
                dev_y + 6.0,
                lx,
                dev_y + 16.0,
                palette.instrument_accent
            ));
        }

        // leads into both ventricles
        parts.push(format!(
            r#"  <path d="M {},{} C {},{} {},{} {},{}" fill="none" stroke="{}" stroke-width="0.8" stroke-dasharray="4,3"{}/>"#,
            lead_x, lead_y, cx - 60.0, cy - 40.0, cx - 30.0, cy + 20.0, cx - 10.0, cy + 80.0,
            palette.instrument, glow
        ));
        parts.push(format!(
            r#"  <path d="M {},{} C {},{} {},{} {},{}" fill="none" stroke="{}" stroke-width="0.6" stroke-dasharray="3,4" opacity="0.6"/>"#,
            lead_x, lead_y, cx - 40.0, cy - 20.0, cx + 10.0, cy + 40.0, cx + 30.0, cy + 100.0,
            palette.instrument_accent
        ));

        for (i, bit) in bits.chars().enumerate() {
            let shift = if bit == '1' { TRACE_BIT_SHIFT } else { 0.0 };
            let tx = origin + i as f64 * TRACE_SPACING + shift;
            let ty = cy - 100.0 + rng.draw() * 160.0;
            let size = 2.0 + rng.draw() * 3.0;
            let angle = rng.draw() * 45.0;
            parts.push(format!(
                r#"  <rect x="{:.2}" y="{:.1}" width="{:.1}" height="{:.1}" fill="none" stroke="{}" stroke-width="0.4" opacity="0.25" data-trace="{}" transform="rotate({:.0},{:.1},{:.1})"/>"#,
                tx, ty, size, size, palette.circuit, i, angle, tx, ty
            ));
        }

        let nodes = 8 + (rng.draw() * 6.0) as usize;
        for _ in 0..nodes {
            let nx = cx + rng.centered() * 200.0;
            let ny = cy + rng.centered() * 250.0;
            let nr = 1.0 + rng.draw() * 2.0;
            parts.push(format!(
                r#"  <circle cx="{:.1}" cy="{:.1}" r="{:.1}" fill="none" stroke="{}" stroke-width="0.3" opacity="0.2"/>"#,
                nx, ny, nr, palette.circuit
            ));
            if rng.draw() > 0.5 {
                let lx = nx + rng.centered() * 40.0;
                let ly = ny + rng.centered() * 40.0;
                parts.push(format!(
                    r#"  <line x1="{:.1}" y1="{:.1}" x2="{:.1}" y2="{:.1}" stroke="{}" stroke-width="0.2" opacity="0.15"/>"#,
                    nx, ny, lx, ly, palette.circuit
                ));
            }
        }

        parts.push("</g>".to_string());
        parts.push(format!(
            "<!-- L6: pacing ratio in circuit element spacing. ratio={:.4} bits={} -->",
            ctx.instrument_ratio, bits
        ));
        parts.join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layers::fixtures::Fixture;
    use heart_core::BiometricSample;

    #[test]
    fn test_quantize_ratio() {
        assert_eq!(quantize_ratio(0.0), 0);
        assert_eq!(quantize_ratio(0.5), 63);
        assert_eq!(quantize_ratio(1.0), 127);
        assert_eq!(quantize_ratio(3.0), 127);
        assert_eq!(ratio_bits(5), "0000101");
    }

    #[test]
    fn test_traces_tagged_in_order() {
        let fixture = Fixture::new(BiometricSample::new(60, 10).with_history(vec![60, 60, 80, 80]));
        let svg = Circuitry.render(&fixture.ctx(), &mut SequenceState::new("c"));

        for i in 0..TRACE_BITS {
            assert!(svg.contains(&format!(r#"data-trace="{}""#, i)));
        }
        assert!(svg.contains("bits=0111111"));
        assert!(svg.contains(r#"filter="url(#glow)""#));
    }

    #[test]
    fn test_not_driven_has_no_glow() {
        let fixture = Fixture::new(BiometricSample::new(80, 10));
        let svg = Circuitry.render(&fixture.ctx(), &mut SequenceState::new("c"));
        assert!(svg.contains(r#"opacity="0.3""#));
        assert!(!svg.contains(r#"stroke-width="1.2" filter"#));
    }
}
