//! TOML-backed settings for text joining, snippets and segmentation.
//!
//! ```toml
//! [join]
//! skip_space_before = [",", ".", "'s"]
//! skip_space_after = ["(", ""]
//!
//! [snippet]
//! max_sentences = 32
//!
//! [segmenting]
//! keep_newlines = false
//! ```
//!
//! Every table and key is optional.

use std::fs;
use std::path::Path;

use layered_overlay::JoinRules;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{OverlayResult, SegmentingFactory, SnippetConfig};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OverlayConfig {
    pub join: JoinRules,
    pub snippet: SnippetConfig,
    pub segmenting: SegmentingFactory,
}

impl OverlayConfig {
    pub fn from_toml_str(content: &str) -> OverlayResult<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Load from a TOML file. A missing file yields the defaults.
    pub fn load(path: &Path) -> OverlayResult<Self> {
        if !path.exists() {
            debug!(path = %path.display(), "no config file, using defaults");
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }
}
