//! Context assembly for dito's model requests.
//!
//! [`ProjectCrawler`] discovers the project's source files and
//! [`ContextPacker`] packs them, in order, into a single prompt body that
//! stays within a character budget.

mod crawler;
mod packer;

pub use crawler::{BINARY_EXTENSIONS, MAX_FILE_BYTES, ProjectCrawler};
pub use packer::{
    ContextPacker, DEFAULT_MAX_CHARS, OMISSION_MARKER, SAFETY_MARGIN, TRUNCATION_MARKER, pack,
};

/// A packed prompt context ready to be sent to the model.
#[derive(Debug, Clone)]
pub struct PackedContext {
    /// The assembled header and file blocks.
    pub content: String,
    /// BLAKE3 hash of the content.
    pub blake3_hash: String,
    /// How the budget was spent.
    pub usage: PackUsage,
}

impl PackedContext {
    #[must_use]
    pub fn content(&self) -> &str {
        &self.content
    }

    #[must_use]
    pub fn hash(&self) -> &str {
        &self.blake3_hash
    }

    #[must_use]
    pub const fn usage(&self) -> &PackUsage {
        &self.usage
    }
}

/// Budget accounting for one packing pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PackUsage {
    /// Character budget the pass was given.
    pub budget: usize,
    /// Characters in the packed content, markers included.
    pub chars_used: usize,
    /// Files that contributed a block, whole or truncated.
    pub files_included: usize,
    /// Included files whose content was cut short.
    pub files_truncated: usize,
    /// Files dropped behind the omission marker.
    pub files_omitted: usize,
}

impl PackUsage {
    /// Whether any file was truncated or omitted.
    #[must_use]
    pub const fn is_lossy(&self) -> bool {
        self.files_truncated > 0 || self.files_omitted > 0
    }
}
