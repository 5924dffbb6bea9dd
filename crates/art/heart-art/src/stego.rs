//! Steganographic Codec - bytes hidden in coordinate decimals
//!
//! Format v1 (changing anything here breaks old artifacts, bump the version):
//!
//! ```text
//! payload  = 0xCA 0xFE || data
//! byte i   -> (high nibble, low nibble)
//! x        = trunc(base_x, 2) + high / 10000
//! y        = trunc(base_y, 2) + low  / 10000
//! emitted  = <circle cx="x" cy="y" ... data-s="i"/>   with 4 decimals
//! ```
//!
//! The integer part and first two decimals stay free for visual jitter.
//! Decoding reads only the emitted markup, never encoder state.

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Two-byte marker that opens every payload
pub const STEGO_MAGIC: [u8; 2] = [0xCA, 0xFE];

/// Embedded in artifact metadata; bump when the scheme changes
pub const STEGO_FORMAT_VERSION: u32 = 1;

/// Decimal digits carried by an encoded coordinate
pub const STEGO_PRECISION: usize = 4;

/// Attribute marking a particle as a payload carrier
pub const STEGO_INDEX_ATTR: &str = "data-s";

pub const STEGO_ENCODING: &str = "nibble-pair";

/// Highest byte index a decoder accepts; anything above is not an artifact
pub const STEGO_MAX_INDEX: usize = 4_095;

lazy_static! {
    static ref INDEXED_CIRCLE: Regex =
        Regex::new(r#"<circle([^>]*?)\sdata-s="(\d+)"([^>]*?)/?>"#).unwrap();
    static ref CX_ATTR: Regex = Regex::new(r#"(?:^|\s)cx="(-?[0-9]+(?:\.[0-9]+)?)""#).unwrap();
    static ref CY_ATTR: Regex = Regex::new(r#"(?:^|\s)cy="(-?[0-9]+(?:\.[0-9]+)?)""#).unwrap();
}

/// Why a decode attempt failed
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DecodeError {
    #[error("No indexed elements")]
    NoIndexedElements,

    #[error("Bad magic: {found}")]
    BadMagic { found: String },

    #[error("Missing indices: highest index {highest}, only {found} indexed elements")]
    MissingIndices { highest: usize, found: usize },

    #[error("Index {index} out of range (max {max})")]
    IndexOutOfRange { index: String, max: usize },
}

/// One payload byte split for embedding
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StegoEntry {
    pub index: usize,
    pub high: u8,
    pub low: u8,
}

impl StegoEntry {
    pub fn byte(&self) -> u8 {
        (self.high << 4) | self.low
    }
}

/// Magic-prefixed payload, one entry per byte
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SteganographicPayload {
    entries: Vec<StegoEntry>,
}

impl SteganographicPayload {
    /// Prefix the magic and split every byte into nibbles
    ///
    /// Bytes past `STEGO_MAX_INDEX` are encoded but no decoder will read them.
    pub fn encode(data: &[u8]) -> Self {
        let entries = STEGO_MAGIC
            .iter()
            .chain(data.iter())
            .enumerate()
            .map(|(index, byte)| StegoEntry {
                index,
                high: (byte >> 4) & 0x0F,
                low: byte & 0x0F,
            })
            .collect();
        Self { entries }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&StegoEntry> {
        self.entries.get(index)
    }

    pub fn entries(&self) -> &[StegoEntry] {
        &self.entries
    }

    /// Reassemble the full byte string, magic included
    pub fn bytes(&self) -> Vec<u8> {
        self.entries.iter().map(StegoEntry::byte).collect()
    }
}

/// Route a coordinate pair through the codec
///
/// With an entry, both coordinates are truncated to two decimals and the
/// nibbles land in the third and fourth. Without one, they are rounded to
/// four decimals unchanged.
pub fn apply(base_x: f64, base_y: f64, entry: Option<&StegoEntry>) -> (f64, f64) {
    match entry {
        Some(entry) => (embed(base_x, entry.high), embed(base_y, entry.low)),
        None => (round4(base_x), round4(base_y)),
    }
}

/// Magic marker as written in markup attributes, e.g. `0xCAFE`
pub fn magic_label() -> String {
    format!("0x{}", hex::encode_upper(STEGO_MAGIC))
}

/// Render a coordinate at codec precision
pub fn format_coord(v: f64) -> String {
    format!("{:.*}", STEGO_PRECISION, v)
}

fn embed(base: f64, nibble: u8) -> f64 {
    let sign = if base < 0.0 { -1.0 } else { 1.0 };
    let hundredths = (base.abs() * 100.0).trunc();
    sign * (hundredths * 100.0 + (nibble & 0x0F) as f64) / 10_000.0
}

fn round4(v: f64) -> f64 {
    (v * 10_000.0).round() / 10_000.0
}

/// Recover the nibble from a coordinate: its 3rd and 4th decimals, clamped
fn extract(coord: f64) -> u8 {
    let units = (coord.abs() * 10_000.0).round() as i64;
    (units % 100).clamp(0, 15) as u8
}

/// Every indexed element in the markup as index -> byte (first occurrence wins)
///
/// Rejects any index above `STEGO_MAX_INDEX`, so later work stays bounded.
fn scan(markup: &str) -> Result<BTreeMap<usize, u8>, DecodeError> {
    let mut indexed = BTreeMap::new();
    for caps in INDEXED_CIRCLE.captures_iter(markup) {
        let attrs = format!("{} {}", &caps[1], &caps[3]);
        let index = match caps[2].parse::<usize>() {
            Ok(index) if index <= STEGO_MAX_INDEX => index,
            _ => {
                return Err(DecodeError::IndexOutOfRange {
                    index: caps[2].to_string(),
                    max: STEGO_MAX_INDEX,
                })
            }
        };
        let cx = CX_ATTR.captures(&attrs).and_then(|c| c[1].parse::<f64>().ok());
        let cy = CY_ATTR.captures(&attrs).and_then(|c| c[1].parse::<f64>().ok());
        if let (Some(cx), Some(cy)) = (cx, cy) {
            indexed
                .entry(index)
                .or_insert((extract(cx) << 4) | extract(cy));
        }
    }
    Ok(indexed)
}

fn check_magic(raw: &[u8]) -> Result<(), DecodeError> {
    if raw.len() < 2 || raw[..2] != STEGO_MAGIC {
        let found = raw.iter().take(2).map(|b| format!("{:02x}", b)).collect();
        return Err(DecodeError::BadMagic { found });
    }
    Ok(())
}

/// Decode the full byte string, magic included
///
/// Fails when any index below the highest one is missing.
pub fn decode_raw(markup: &str) -> Result<Vec<u8>, DecodeError> {
    let indexed = scan(markup)?;
    let highest = *indexed.keys().next_back().ok_or(DecodeError::NoIndexedElements)?;
    if highest >= indexed.len() {
        return Err(DecodeError::MissingIndices {
            highest,
            found: indexed.len(),
        });
    }
    let raw: Vec<u8> = indexed.into_values().collect();
    check_magic(&raw)?;
    Ok(raw)
}

/// Decode the data bytes that follow the magic
pub fn decode(markup: &str) -> Result<Vec<u8>, DecodeError> {
    decode_raw(markup).map(|raw| raw[STEGO_MAGIC.len()..].to_vec())
}

/// Decode with missing indices filled by zero bytes
pub fn decode_lenient(markup: &str) -> Result<Vec<u8>, DecodeError> {
    let indexed = scan(markup)?;
    let highest = *indexed.keys().next_back().ok_or(DecodeError::NoIndexedElements)?;
    let raw: Vec<u8> = (0..=highest)
        .map(|i| indexed.get(&i).copied().unwrap_or(0))
        .collect();
    check_magic(&raw)?;
    Ok(raw[STEGO_MAGIC.len()..].to_vec())
}

/// Serializable result of the decoder entry point
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecodeOutcome {
    pub success: bool,
    pub bytes: Vec<u8>,
    /// Payload as UTF-8, invalid sequences replaced
    pub text: String,
    pub byte_count: usize,
    pub error: Option<String>,
}

impl From<Result<Vec<u8>, DecodeError>> for DecodeOutcome {
    fn from(result: Result<Vec<u8>, DecodeError>) -> Self {
        match result {
            Ok(bytes) => Self {
                success: true,
                text: String::from_utf8_lossy(&bytes).into_owned(),
                byte_count: bytes.len(),
                bytes,
                error: None,
            },
            Err(e) => Self {
                success: false,
                bytes: Vec::new(),
                text: String::new(),
                byte_count: 0,
                error: Some(e.to_string()),
            },
        }
    }
}

/// Decode and report; never fails, never panics
pub fn decode_outcome(markup: &str) -> DecodeOutcome {
    DecodeOutcome::from(decode(markup))
}
