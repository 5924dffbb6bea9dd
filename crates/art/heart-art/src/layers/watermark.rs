//! L3 - invisible stroked word at the center of the heart
//!
//! Rendered at opacity 0 so it never shows, but survives in the markup of
//! every artifact.

use super::{LayerRenderer, RenderContext};
use crate::rng::SequenceState;

pub const WATERMARK_WORD: &str = "HEARTBEAT";
pub const WATERMARK_TEXT: &str = "heartbeat.was.here";
const LETTER_ADVANCE: f64 = 22.0;
const STROKE: &str = "#CC2936";

/// Stroke paths on a 18x40 cell
const GLYPHS: [(char, &str); 6] = [
    ('H', "M0,0 L0,40 M0,20 L16,20 M16,0 L16,40"),
    ('E', "M16,0 L0,0 L0,20 L12,20 M0,20 L0,40 L16,40"),
    ('A', "M0,40 L9,0 L18,40 M4,22 L14,22"),
    ('R', "M0,40 L0,0 L12,0 Q18,0 18,10 Q18,20 12,20 L0,20 M10,20 L18,40"),
    ('T', "M0,0 L18,0 M9,0 L9,40"),
    ('B', "M0,0 L0,40 L12,40 Q18,40 18,30 Q18,20 10,20 L0,20 M0,0 L10,0 Q16,0 16,10 Q16,20 10,20"),
];

fn glyph(letter: char) -> Option<&'static str> {
    GLYPHS.iter().find(|(c, _)| *c == letter).map(|(_, path)| *path)
}

pub struct Watermark;

impl LayerRenderer for Watermark {
    fn id(&self) -> &'static str {
        "watermark"
    }

    fn render(&self, ctx: &RenderContext<'_>, _rng: &mut SequenceState) -> String {
        let mut parts = vec![format!(
            r#"<g id="watermark" transform="translate({},{}) scale(0.35)" opacity="0" aria-hidden="true">"#,
            ctx.cx() - 90.0,
            ctx.cy()
        )];

        for (i, letter) in WATERMARK_WORD.chars().enumerate() {
            if let Some(path) = glyph(letter) {
                parts.push(format!(
                    r#"  <path d="{}" fill="none" stroke="{}" stroke-width="2" transform="translate({},0)" data-letter="{}"/>"#,
                    path,
                    STROKE,
                    i as f64 * LETTER_ADVANCE,
                    letter
                ));
            }
        }
        parts.push(format!(
            r#"  <text x="0" y="60" fill="{}" font-size="6" font-family="monospace" opacity="0">{}</text>"#,
            STROKE, WATERMARK_TEXT
        ));
        parts.push("</g>".to_string());
        parts.join("\n")
    }
}
