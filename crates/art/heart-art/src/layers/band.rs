//! Bottom text strip with the human-readable reading

use super::{LayerRenderer, RenderContext};
use crate::rng::SequenceState;
use heart_core::{escape_xml, group_thousands};

const FONT: &str = "'Courier New',monospace";
const TAGLINE: &str = "Each beat is recorded. None is repeated.";

pub struct MetadataBand;

impl MetadataBand {
    /// Main caption, e.g. `HUMAN #190,950 | PACER | 60 BPM | Watch`
    pub fn caption(ctx: &RenderContext<'_>) -> String {
        format!(
            "HUMAN #{} | {} | {} BPM | {}",
            group_thousands(ctx.sample.cumulative_count),
            ctx.classification.state.as_str().to_uppercase(),
            ctx.sample.value,
            escape_xml(&ctx.sample.source_label)
        )
    }
}

impl LayerRenderer for MetadataBand {
    fn id(&self) -> &'static str {
        "metadata-band"
    }

    fn render(&self, ctx: &RenderContext<'_>, _rng: &mut SequenceState) -> String {
        let palette = ctx.palette;
        let width = ctx.width();
        let y = ctx.height() - 60.0;
        let band = ctx.config.instrument_band;

        [
            r#"<g id="metadata-band">"#.to_string(),
            format!(
                r#"  <rect x="0" y="{}" width="{}" height="50" fill="rgba(0,0,0,0.6)"/>"#,
                y - 15.0,
                width
            ),
            format!(
                r#"  <line x1="60" y1="{}" x2="{}" y2="{}" stroke="{}" stroke-width="0.5" opacity="0.4"/>"#,
                y - 15.0,
                width - 60.0,
                y - 15.0,
                palette.silhouette
            ),
            format!(
                r#"  <text x="80" y="{}" fill="{}" font-family="{}" font-size="11" opacity="0.8">{}</text>"#,
                y + 5.0,
                palette.silhouette,
                FONT,
                Self::caption(ctx)
            ),
            format!(
                r#"  <text x="80" y="{}" fill="{}" font-family="{}" font-size="9" opacity="0.4">{}</text>"#,
                y + 22.0,
                palette.pulse,
                FONT,
                TAGLINE
            ),
            format!(
                r#"  <text x="{}" y="{}" fill="{}" font-family="{}" font-size="9" opacity="0.5" text-anchor="end">PACER BAND {}-{} | {}</text>"#,
                width - 80.0,
                y + 5.0,
                palette.instrument,
                FONT,
                band.low,
                band.high,
                ctx.classification.time_period.as_str().to_uppercase()
            ),
            "</g>".to_string(),
        ]
        .join("\n")
    }
}
