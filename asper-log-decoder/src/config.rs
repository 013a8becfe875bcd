//! Decoder configuration types
//!
//! The decoder has very few knobs: which archive entries count as logger
//! exports, and whether raw text is sanitized before the section search.

use serde::{Deserialize, Serialize};

/// Configuration for the decoder library
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecoderConfig {
    /// Archive entries are decoded only if their name ends in `.{entry_extension}`
    /// (compared case-insensitively)
    #[serde(default = "default_entry_extension")]
    pub entry_extension: String,

    /// Strip non-printable characters from archive entries before decoding.
    /// Standalone files are always sanitized.
    #[serde(default)]
    pub strip_non_printable: bool,
}

fn default_entry_extension() -> String {
    "txt".to_string()
}

impl Default for DecoderConfig {
    fn default() -> Self {
        Self {
            entry_extension: default_entry_extension(),
            strip_non_printable: false,
        }
    }
}

impl DecoderConfig {
    /// Create a new decoder configuration with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method: set the archive entry extension (without the dot)
    pub fn with_entry_extension(mut self, extension: impl Into<String>) -> Self {
        self.entry_extension = extension.into();
        self
    }

    /// Builder method: enable sanitizing of archive entries
    pub fn with_strip_non_printable(mut self, enabled: bool) -> Self {
        self.strip_non_printable = enabled;
        self
    }

    /// Check if an archive entry should be decoded
    pub fn should_decode_entry(&self, name: &str) -> bool {
        let suffix = format!(".{}", self.entry_extension.to_lowercase());
        name.to_lowercase().ends_with(&suffix)
    }
}
