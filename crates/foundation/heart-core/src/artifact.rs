//! Artifact Descriptor - what one generation pass hands back

use serde::{Deserialize, Serialize};

/// The generated document plus its identifiers
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtifactDescriptor {
    /// Complete SVG document
    pub markup: String,
    /// 16 hex chars over (count, state, value)
    pub content_hash: String,
    /// `human-{count}-{state}-{hash}.svg`
    pub filename: String,
    pub state: String,
}

impl ArtifactDescriptor {
    pub fn byte_len(&self) -> usize {
        self.markup.len()
    }
}
