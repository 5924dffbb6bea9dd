//! # Heart Core
//!
//! Foundation types shared across the heart art workspace.
//!
//! ```text
//! BiometricSample ──▶ Classification ──▶ (renderers) ──▶ ArtifactDescriptor
//!     input              derived                             output
//! ```
//!
//! Nothing here does I/O. Samples are plain records built by the caller.

pub mod artifact;
pub mod classification;
pub mod markup;
pub mod sample;

pub use artifact::ArtifactDescriptor;
pub use classification::{Classification, HeartState, TimePeriod};
pub use markup::{escape_xml, group_thousands};
pub use sample::BiometricSample;

/// Result type for heart-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in heart-core
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Unknown heart state: {0}")]
    UnknownState(String),

    #[error("Invalid sample: {0}")]
    InvalidSample(String),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}
