//! Shared `<defs>`: glow filters and the background gradient

use super::{LayerRenderer, RenderContext};
use crate::rng::SequenceState;

pub struct Definitions;

impl LayerRenderer for Definitions {
    fn id(&self) -> &'static str {
        "defs"
    }

    fn render(&self, ctx: &RenderContext<'_>, _rng: &mut SequenceState) -> String {
        let [inner, outer] = ctx.palette.background;
        format!(
            r#"<defs>
  <filter id="glow"><feGaussianBlur stdDeviation="3" result="b"/>
    <feMerge><feMergeNode in="b"/><feMergeNode in="SourceGraphic"/></feMerge></filter>
  <filter id="bigGlow"><feGaussianBlur stdDeviation="12" result="b"/>
    <feMerge><feMergeNode in="b"/><feMergeNode in="SourceGraphic"/></feMerge></filter>
  <filter id="hugeGlow"><feGaussianBlur stdDeviation="35" result="b"/>
    <feMerge><feMergeNode in="b"/><feMergeNode in="SourceGraphic"/></feMerge></filter>
  <filter id="bloodCell"><feGaussianBlur stdDeviation="1.5"/></filter>
  <radialGradient id="bgGrad" cx="50%" cy="48%">
    <stop offset="0%" stop-color="{inner}"/>
    <stop offset="100%" stop-color="{outer}"/>
  </radialGradient>
</defs>"#
        )
    }
}
