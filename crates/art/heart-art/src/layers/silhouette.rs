//! L5 - anatomical heart from a fixed cubic template
//!
//! Each control point is nudged by `(draw - 0.5) * wobble * 8`, where
//! `wobble = variability / 20` clamped to `max_wobble`. Larger beat-to-beat
//! variability visibly roughens the outline.

use super::{LayerRenderer, RenderContext};
use crate::rng::SequenceState;

/// Half-extent multipliers for the silhouette
pub const HEART_WIDTH: f64 = 280.0;
pub const HEART_HEIGHT: f64 = 340.0;

/// Clip path id other layers use to stay inside the heart
pub const CLIP_ID: &str = "heartClip";

const START: (f64, f64) = (0.0, -0.42);

// aortic arch, right atrium, right ventricle, apex, left ventricle, left atrium, return
const SEGMENTS: [[(f64, f64); 3]; 7] = [
    [(0.08, -0.50), (0.22, -0.48), (0.30, -0.36)],
    [(0.40, -0.22), (0.48, -0.06), (0.44, 0.08)],
    [(0.38, 0.22), (0.22, 0.36), (0.04, 0.48)],
    [(-0.02, 0.50), (-0.04, 0.49), (-0.04, 0.48)],
    [(-0.22, 0.36), (-0.38, 0.22), (-0.44, 0.08)],
    [(-0.48, -0.06), (-0.40, -0.22), (-0.30, -0.36)],
    [(-0.22, -0.48), (-0.08, -0.50), (0.0, -0.42)],
];

/// Pulmonary branches and aortic extension (unperturbed)
const BRANCHES: [[(f64, f64); 4]; 3] = [
    [(-0.15, -0.44), (-0.20, -0.55), (-0.30, -0.58), (-0.38, -0.52)],
    [(0.15, -0.44), (0.20, -0.55), (0.30, -0.58), (0.38, -0.52)],
    [(0.0, -0.42), (0.05, -0.56), (0.12, -0.62), (0.08, -0.58)],
];

pub struct Silhouette;

impl Silhouette {
    /// Wobble factor for a given variability
    pub fn wobble(variability: f64, max_wobble: f64) -> f64 {
        (variability / 20.0).clamp(0.0, max_wobble)
    }

    /// Closed outline path; consumes one draw per wobbled coordinate
    pub fn outline_path(cx: f64, cy: f64, wobble: f64, rng: &mut SequenceState) -> String {
        let mut w = || (rng.draw() - 0.5) * wobble * 8.0;
        let mut path = format!(
            "M {:.1},{:.1}",
            cx + START.0 * HEART_WIDTH,
            cy + START.1 * HEART_HEIGHT + w()
        );
        for segment in SEGMENTS {
            path.push_str(" C");
            for (fx, fy) in segment {
                let x = cx + fx * HEART_WIDTH + w();
                let y = cy + fy * HEART_HEIGHT + w();
                path.push_str(&format!(" {:.1},{:.1}", x, y));
            }
        }
        path.push_str(" Z");
        path
    }

    fn branch_path(cx: f64, cy: f64, points: &[(f64, f64); 4]) -> String {
        let p: Vec<String> = points
            .iter()
            .map(|(fx, fy)| format!("{:.1},{:.1}", cx + fx * HEART_WIDTH, cy + fy * HEART_HEIGHT))
            .collect();
        format!("M {} C {} {} {}", p[0], p[1], p[2], p[3])
    }
}

impl LayerRenderer for Silhouette {
    fn id(&self) -> &'static str {
        "heart-outline"
    }

    fn render(&self, ctx: &RenderContext<'_>, rng: &mut SequenceState) -> String {
        let c = ctx.classification;
        let palette = ctx.palette;
        let (cx, cy) = (ctx.cx(), ctx.cy());

        let wobble = Self::wobble(c.variability, ctx.config.max_wobble);
        let path = Self::outline_path(cx, cy, wobble, rng);

        let stroke_width = 1.0 + (c.value as f64 / 120.0) * 1.5;
        let opacity = if c.is_gap() { 0.15 } else { 0.7 };
        let vessel_opacity = opacity * 0.5;

        let mut parts = vec![format!(
            r#"<g id="heart-outline" data-wobble="{:.4}">"#,
            wobble
        )];
        parts.push(format!(
            r#"  <path d="{}" fill="{}" stroke="none" filter="url(#hugeGlow)" opacity="{:.3}"/>"#,
            path,
            palette.silhouette_fill,
            opacity * 0.15
        ));
        parts.push(format!(
            r#"  <path d="{}" fill="{}" stroke="{}" stroke-width="{:.1}" opacity="{:.2}" filter="url(#glow)"/>"#,
            path, palette.silhouette_fill, palette.silhouette, stroke_width, opacity
        ));
        parts.push(format!(
            r#"  <path d="{}" fill="none" stroke="{}" stroke-width="0.4" opacity="{:.2}"/>"#,
            path,
            palette.silhouette,
            opacity * 0.35
        ));
        for (points, color) in BRANCHES.iter().zip(palette.vessels) {
            parts.push(format!(
                r#"  <path d="{}" fill="none" stroke="{}" stroke-width="1.5" opacity="{:.2}" filter="url(#glow)"/>"#,
                Self::branch_path(cx, cy, points),
                color,
                vessel_opacity
            ));
        }
        parts.push(format!(
            r#"  <clipPath id="{}"><path d="{}"/></clipPath>"#,
            CLIP_ID, path
        ));
        parts.push("</g>".to_string());

        parts.join("\n")
    }
}
