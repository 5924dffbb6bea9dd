//! Background field: dark gradient plus micro-dots whose count follows
//! the cumulative reading count (bounded both ways)

use super::{LayerRenderer, RenderContext};
use crate::rng::SequenceState;

pub struct Background;

impl Background {
    pub fn cell_count(cumulative: u64, floor: usize, cap: usize) -> usize {
        let scaled = usize::try_from(cumulative / 5).unwrap_or(usize::MAX);
        scaled.clamp(floor.min(cap), cap)
    }
}

impl LayerRenderer for Background {
    fn id(&self) -> &'static str {
        "background"
    }

    fn render(&self, ctx: &RenderContext<'_>, rng: &mut SequenceState) -> String {
        let (w, h) = (ctx.width(), ctx.height());
        let count = Self::cell_count(
            ctx.sample.cumulative_count,
            ctx.config.background_cell_floor,
            ctx.config.background_cell_cap,
        );

        let mut parts = Vec::with_capacity(count + 1);
        parts.push(format!(
            r#"<rect width="{}" height="{}" fill="url(#bgGrad)"/>"#,
            ctx.config.canvas.width, ctx.config.canvas.height
        ));

        for _ in 0..count {
            let x = rng.draw() * w;
            let y = rng.draw() * h;
            let r = 0.5 + rng.draw() * 1.5;
            let opacity = 0.02 + rng.draw() * 0.04;
            parts.push(format!(
                r#"<circle cx="{:.1}" cy="{:.1}" r="{:.1}" fill="{}" opacity="{:.3}" filter="url(#bloodCell)"/>"#,
                x, y, r, ctx.palette.glow, opacity
            ));
        }

        parts.join("\n")
    }
}
