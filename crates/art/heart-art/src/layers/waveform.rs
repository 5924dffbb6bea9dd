//! EKG strip along the bottom of the canvas
//!
//! Every tenth group of segments carries a QRS-like spike scaled by the
//! reading. A zero reading flatlines and takes no draws.

use super::{LayerRenderer, RenderContext};
use crate::rng::SequenceState;

pub const SEGMENTS: usize = 50;
const MARGIN: f64 = 60.0;
const BASELINE_OFFSET: f64 = 140.0;

pub struct Waveform;

impl Waveform {
    fn in_beat(i: usize) -> bool {
        (4..=6).contains(&(i % 10))
    }

    /// Polyline points for the strip
    pub fn points(value: u32, start_x: f64, end_x: f64, y: f64, rng: &mut SequenceState) -> Vec<(f64, f64)> {
        let step = (end_x - start_x) / SEGMENTS as f64;
        let scale = (value as f64 / 100.0).min(1.0);

        (0..=SEGMENTS)
            .map(|i| {
                let x = start_x + i as f64 * step;
                if value == 0 {
                    (x, y)
                } else if Self::in_beat(i) {
                    let spike = (25.0 + rng.draw() * 35.0) * scale;
                    let direction = if i % 10 == 5 { -1.0 } else { 1.0 };
                    (x, y + direction * spike)
                } else {
                    (x, y + rng.centered() * 3.0)
                }
            })
            .collect()
    }
}

impl LayerRenderer for Waveform {
    fn id(&self) -> &'static str {
        "ekg-waveform"
    }

    fn render(&self, ctx: &RenderContext<'_>, rng: &mut SequenceState) -> String {
        let palette = ctx.palette;
        let c = ctx.classification;
        let (start_x, end_x) = (MARGIN, ctx.width() - MARGIN);
        let y = ctx.height() - BASELINE_OFFSET;

        let points = Self::points(c.value, start_x, end_x, y, rng)
            .iter()
            .map(|(x, y)| format!("{:.1},{:.1}", x, y))
            .collect::<Vec<_>>()
            .join(" ");

        let mut parts = vec![
            format!(r#"<g id="ekg-waveform" data-flatline="{}">"#, c.value == 0),
            format!(
                r#"  <line x1="{}" y1="{}" x2="{}" y2="{}" stroke="{}" stroke-width="0.3" opacity="0.1"/>"#,
                start_x, y, end_x, y, palette.waveform
            ),
            format!(
                r#"  <polyline points="{}" fill="none" stroke="{}" stroke-width="1.2" opacity="0.7" filter="url(#glow)"/>"#,
                points, palette.waveform
            ),
        ];

        // pacing spikes just ahead of each beat
        if c.is_instrument_driven {
            let step = (end_x - start_x) / SEGMENTS as f64;
            for i in (0..=SEGMENTS).filter(|i| i % 10 == 3) {
                let sx = start_x + i as f64 * step;
                parts.push(format!(
                    r#"  <line x1="{:.1}" y1="{}" x2="{:.1}" y2="{}" stroke="{}" stroke-width="1" opacity="0.5"/>"#,
                    sx,
                    y - 15.0,
                    sx,
                    y + 5.0,
                    palette.instrument
                ));
            }
        }

        parts.push("</g>".to_string());
        parts.join("\n")
    }
}
