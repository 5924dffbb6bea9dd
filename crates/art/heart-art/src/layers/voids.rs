//! Dark feathered holes inside the heart where history has gaps

use super::silhouette::CLIP_ID;
use super::{LayerRenderer, RenderContext};
use crate::rng::SequenceState;

pub struct GapVoids;

impl GapVoids {
    /// One void per 10% of missing entries, at least one
    pub fn void_count(gaps: usize, total: usize, cap: usize) -> usize {
        let ratio = gaps as f64 / total.max(1) as f64;
        ((ratio * 10.0) as usize).max(1).min(cap)
    }
}

impl LayerRenderer for GapVoids {
    fn id(&self) -> &'static str {
        "data-gap-voids"
    }

    fn render(&self, ctx: &RenderContext<'_>, rng: &mut SequenceState) -> String {
        let gaps = ctx.sample.gap_count();
        if gaps == 0 {
            return String::new();
        }

        let count = Self::void_count(gaps, ctx.sample.history.len(), ctx.config.void_cap);
        let (cx, cy) = (ctx.cx(), ctx.cy());

        let mut parts = vec![format!(
            r#"<g id="data-gap-voids" clip-path="url(#{})" data-gaps="{}">"#,
            CLIP_ID, gaps
        )];
        for _ in 0..count {
            let x = cx + rng.centered() * 200.0;
            let y = cy + rng.centered() * 250.0;
            let w = 30.0 + rng.draw() * 60.0;
            let h = 30.0 + rng.draw() * 60.0;
            let opacity = 0.3 + rng.draw() * 0.4;
            parts.push(format!(
                r##"  <rect x="{:.0}" y="{:.0}" width="{:.0}" height="{:.0}" rx="8" fill="#000000" opacity="{:.2}" filter="url(#bigGlow)"/>"##,
                x, y, w, h, opacity
            ));
        }
        parts.push("</g>".to_string());
        parts.join("\n")
    }
}
