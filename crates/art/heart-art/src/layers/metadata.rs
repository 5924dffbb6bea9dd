//! L1 - structured `<metadata>` block, readable without parsing the art

use super::{LayerRenderer, RenderContext};
use crate::rng::SequenceState;
use crate::stego::{magic_label, STEGO_ENCODING, STEGO_FORMAT_VERSION};
use heart_core::{escape_xml, BiometricSample};
use sha2::{Digest, Sha256};

pub const SCHEMA_NAMESPACE: &str = "urn:heartart:schema:human:v1";

/// 32 hex chars over (count, value, timestamp)
pub fn sample_hash(sample: &BiometricSample) -> String {
    let digest = Sha256::digest(
        format!("{}:{}:{}", sample.cumulative_count, sample.value, sample.timestamp).as_bytes(),
    );
    hex::encode(digest)[..32].to_string()
}

pub struct MetadataBlock;

impl LayerRenderer for MetadataBlock {
    fn id(&self) -> &'static str {
        "metadata"
    }

    fn render(&self, ctx: &RenderContext<'_>, _rng: &mut SequenceState) -> String {
        let sample = ctx.sample;
        let c = ctx.classification;
        let band = ctx.config.instrument_band;

        format!(
            r#"<metadata>
  <human xmlns="{ns}">
    <version>1.0</version>
    <heartbeat count="{count}" bpm="{bpm}" state="{state}" intensity="{intensity:.3}"/>
    <classification anomalous="{anomalous}" instrument-driven="{driven}" time-period="{period}"/>
    <instrument band="{low}-{high}" ratio="{ratio:.4}"/>
    <source device="{source}" device_id="{device}"/>
    <timestamp>{timestamp}</timestamp>
    <transaction>{tx}</transaction>
    <hrv value="{hrv:.2}"/>
    <hash>{hash}</hash>
    <stego version="{stego_version}" encoding="{encoding}" magic="{magic}" carrier="circle[data-s]"/>
    <note>Generated from a biometric reading. Hidden layers: metadata, coordinate payload,
      watermark, data attributes, variability wobble, pacing ratio spacing.</note>
  </human>
</metadata>"#,
            ns = SCHEMA_NAMESPACE,
            count = sample.cumulative_count,
            bpm = sample.value,
            state = c.state,
            intensity = c.intensity,
            anomalous = c.is_anomalous,
            driven = c.is_instrument_driven,
            period = c.time_period,
            low = band.low,
            high = band.high,
            ratio = ctx.instrument_ratio,
            source = escape_xml(&sample.source_label),
            device = sample.device_id,
            timestamp = escape_xml(&sample.timestamp),
            tx = escape_xml(sample.transaction()),
            hrv = c.variability,
            hash = sample_hash(sample),
            stego_version = STEGO_FORMAT_VERSION,
            encoding = STEGO_ENCODING,
            magic = magic_label(),
        )
    }
}
