//! Vessel waveforms: recent readings drawn directly as geometry
//!
//! Each vessel is a polyline from start to end whose perpendicular offset
//! at step `i` is `(reading_i - 72) / 80 * 8`. Fewer than two readings
//! leave the vessels as straight lines.

use super::{LayerRenderer, RenderContext};
use crate::rng::SequenceState;

/// (start, end) offsets from the silhouette center
const VESSELS: [((f64, f64), (f64, f64)); 3] = [
    ((0.0, -140.0), (60.0, -190.0)),
    ((-110.0, -130.0), (-140.0, -170.0)),
    ((100.0, -125.0), (130.0, -165.0)),
];

/// Perpendicular offset for one reading, centered on 72 BPM
pub fn amplitude(reading: u32) -> f64 {
    (reading as f64 - 72.0) / 80.0 * 8.0
}

fn polyline(start: (f64, f64), end: (f64, f64), readings: &[u32]) -> String {
    let (dx, dy) = (end.0 - start.0, end.1 - start.1);
    let length = (dx * dx + dy * dy).sqrt().max(1.0);
    let (px, py) = (-dy / length, dx / length);

    if readings.len() < 2 {
        return format!("{:.1},{:.1} {:.1},{:.1}", start.0, start.1, end.0, end.1);
    }

    let steps = (readings.len() - 1) as f64;
    readings
        .iter()
        .enumerate()
        .map(|(i, reading)| {
            let t = i as f64 / steps;
            let a = amplitude(*reading);
            let x = start.0 + dx * t + px * a;
            let y = start.1 + dy * t + py * a;
            format!("{:.1},{:.1}", x, y)
        })
        .collect::<Vec<_>>()
        .join(" ")
}

pub struct VesselWaveforms;

impl LayerRenderer for VesselWaveforms {
    fn id(&self) -> &'static str {
        "vessel-waveforms"
    }

    fn render(&self, ctx: &RenderContext<'_>, _rng: &mut SequenceState) -> String {
        let readings = ctx.sample.recent_readings(ctx.config.vessel_window);
        let (cx, cy) = (ctx.cx(), ctx.cy());
        let opacity = if readings.len() < 2 { 0.15 } else { 0.4 };

        let mut parts = vec![format!(
            r#"<g id="vessel-waveforms" data-points="{}">"#,
            readings.len()
        )];
        for ((start, end), color) in VESSELS.iter().zip(ctx.palette.vessels) {
            let start = (cx + start.0, cy + start.1);
            let end = (cx + end.0, cy + end.1);
            parts.push(format!(
                r#"  <polyline points="{}" fill="none" stroke="{}" stroke-width="1.2" opacity="{}" filter="url(#glow)"/>"#,
                polyline(start, end, &readings),
                color,
                opacity
            ));
        }
        parts.push("</g>".to_string());
        parts.join("\n")
    }
}
