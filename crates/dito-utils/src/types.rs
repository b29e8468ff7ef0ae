//! Shared value types passed between the crawler, packer and CLI.

use std::fmt;

/// A single text file discovered under the analysed project root.
///
/// `path` is relative to the project root and always uses `/` separators,
/// so packed prompts look the same on every platform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    /// Relative path identifier
    pub path: String,
    /// Full UTF-8 body of the file
    pub content: String,
}

impl SourceFile {
    /// Create a new source file.
    #[must_use]
    pub fn new(path: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            content: content.into(),
        }
    }

    /// Length of the content in characters (not bytes).
    #[must_use]
    pub fn char_count(&self) -> usize {
        self.content.chars().count()
    }
}

/// Where an effective configuration value came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    /// Command-line flag
    Cli,
    /// `.ditorc.json` in the analysed project
    Config,
    /// Built-in default
    Default,
}

impl fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Cli => write!(f, "cli"),
            Self::Config => write!(f, "config"),
            Self::Default => write!(f, "default"),
        }
    }
}
