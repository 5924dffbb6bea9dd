//! Instrument Signature - reads the pacing ratio back out of the
//! circuit trace spacing
//!
//! Independent of the payload codec: works on any artifact that carries a
//! `pacemaker-circuit` group, even one whose particle field was stripped.

use crate::layers::circuitry::{TRACE_BITS, TRACE_BIT_SHIFT, TRACE_SPACING};
use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

lazy_static! {
    static ref TRACE_ORIGIN: Regex =
        Regex::new(r#"data-trace-origin="(-?[0-9]+(?:\.[0-9]+)?)""#).unwrap();
    static ref TRACE_RECT: Regex =
        Regex::new(r#"<rect([^>]*?)\sdata-trace="(\d+)"([^>]*?)/?>"#).unwrap();
    static ref X_ATTR: Regex = Regex::new(r#"(?:^|\s)x="(-?[0-9]+(?:\.[0-9]+)?)""#).unwrap();
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SignatureError {
    #[error("No trace origin in markup")]
    NoOrigin,

    #[error("Trace element {0} missing")]
    MissingTrace(usize),

    #[error("Trace element {index} off grid (offset {offset})")]
    OffGrid { index: usize, offset: String },
}

/// Decoded 7-bit pacing ratio
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InstrumentSignature {
    pub value: u8,
    pub bits: String,
    /// `value / 127`, the ratio at 7-bit resolution
    pub ratio: f64,
}

pub fn decode_instrument_signature(markup: &str) -> Result<InstrumentSignature, SignatureError> {
    let origin = TRACE_ORIGIN
        .captures(markup)
        .and_then(|c| c[1].parse::<f64>().ok())
        .ok_or(SignatureError::NoOrigin)?;

    let mut traces = BTreeMap::new();
    for caps in TRACE_RECT.captures_iter(markup) {
        let Ok(index) = caps[2].parse::<usize>() else {
            continue;
        };
        let attrs = format!("{} {}", &caps[1], &caps[3]);
        if let Some(x) = X_ATTR.captures(&attrs).and_then(|c| c[1].parse::<f64>().ok()) {
            traces.entry(index).or_insert(x);
        }
    }

    let mut bits = String::with_capacity(TRACE_BITS);
    for i in 0..TRACE_BITS {
        let x = traces.get(&i).ok_or(SignatureError::MissingTrace(i))?;
        let offset = x - origin - i as f64 * TRACE_SPACING;
        match (offset / TRACE_BIT_SHIFT).round() as i64 {
            0 => bits.push('0'),
            1 => bits.push('1'),
            _ => {
                return Err(SignatureError::OffGrid {
                    index: i,
                    offset: format!("{:.2}", offset),
                })
            }
        }
    }

    let value = u8::from_str_radix(&bits, 2).unwrap_or(0);
    Ok(InstrumentSignature {
        value,
        ratio: value as f64 / 127.0,
        bits,
    })
}
