//! Heart Art - deterministic SVG artifacts from biometric samples
//!
//! Every artifact carries its source data several ways at once:
//!
//! - L1 structured `<metadata>` block
//! - L2 payload hidden in particle coordinate decimals ([`stego`])
//! - L3 invisible watermark
//! - L4 `data-heart-*` attributes on the root element
//! - L5 outline roughness proportional to variability
//! - L6 pacing ratio in circuit trace spacing ([`signature`])
//!
//! ```rust,ignore
//! use heart_art::ArtGenerator;
//! use heart_core::BiometricSample;
//!
//! let sample = BiometricSample::new(72, 500).with_timestamp("2026-02-11T10:30:00+00:00");
//! let artifact = ArtGenerator::default().generate(&sample);
//! let payload = heart_art::stego::decode(&artifact.markup)?;
//! ```

pub mod classify;
pub mod generator;
pub mod layers;
pub mod palette;
pub mod rng;
pub mod signature;
pub mod stego;

pub use classify::{classify, classify_sample, instrument_ratio};
pub use generator::{artifact_filename, content_hash, generate, ArtGenerator};
pub use palette::Palette;
pub use rng::SequenceState;
pub use signature::{decode_instrument_signature, InstrumentSignature, SignatureError};
pub use stego::{decode, decode_lenient, decode_outcome, DecodeError, DecodeOutcome, SteganographicPayload};

/// Art error types
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(#[from] heart_config::Error),

    #[error("Decode error: {0}")]
    Decode(#[from] DecodeError),

    #[error("Signature error: {0}")]
    Signature(#[from] SignatureError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
