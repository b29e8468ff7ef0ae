//! Greedy, order-preserving context packer.
//!
//! Files are visited in the order given. Each one becomes a block made of a
//! `File: <path>` line followed by the content inside a triple-backtick fence.
//!
//! A block that fits is emitted whole. A block whose wrapper fits but whose
//! content does not is truncated to the remaining budget minus
//! [`SAFETY_MARGIN`] and tagged with [`TRUNCATION_MARKER`]. As soon as a
//! wrapper alone no longer fits, or the budget is used up, packing stops and
//! [`OMISSION_MARKER`] stands in for every remaining file; later files are not
//! tried individually even if they would fit.
//!
//! The header names every file while the path list stays within a quarter of
//! the budget; past that the list ends with `... and N more`.
//!
//! All lengths are counted in `char`s.

use blake3::Hasher;
use dito_utils::types::SourceFile;
use tracing::debug;

use crate::{PackUsage, PackedContext};

/// Default character budget for the packed context.
pub const DEFAULT_MAX_CHARS: usize = 30_000;

/// Characters held back when truncating a file.
pub const SAFETY_MARGIN: usize = 100;

/// Appended to a file's kept prefix when its content was cut short.
pub const TRUNCATION_MARKER: &str = "\n... [truncated to fit context budget]";

/// Appended once in place of every file that did not fit.
pub const OMISSION_MARKER: &str = "\n[... remaining files omitted to fit context budget ...]\n";

const FENCE_CLOSE: &str = "\n```\n\n";

/// The header's path list may use at most `budget / HEADER_LIST_SHARE` chars.
const HEADER_LIST_SHARE: usize = 4;

/// Pack `files` into a single prompt body of at most roughly `budget` characters.
///
/// The result never exceeds `budget + SAFETY_MARGIN` characters.
#[must_use]
pub fn pack(files: &[SourceFile], budget: usize) -> String {
    ContextPacker::new(budget).pack(files).content
}

/// Packs source files under a fixed character budget.
#[derive(Debug, Clone, Copy)]
pub struct ContextPacker {
    budget: usize,
}

impl Default for ContextPacker {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_CHARS)
    }
}

impl ContextPacker {
    #[must_use]
    pub const fn new(budget: usize) -> Self {
        Self { budget }
    }

    #[must_use]
    pub const fn budget(&self) -> usize {
        self.budget
    }

    /// Pack `files` and report how the budget was spent.
    #[must_use]
    pub fn pack(&self, files: &[SourceFile]) -> PackedContext {
        let mut content = render_header(files, self.budget);
        let mut used = content.chars().count();
        let mut usage = PackUsage {
            budget: self.budget,
            chars_used: 0,
            files_included: 0,
            files_truncated: 0,
            files_omitted: 0,
        };

        for (index, file) in files.iter().enumerate() {
            let remaining = self.budget.saturating_sub(used);
            let opener = format!("File: {}\n```\n", file.path);
            let overhead = opener.chars().count() + FENCE_CLOSE.len();

            if remaining == 0 || overhead > remaining {
                usage.files_omitted = files.len() - index;
                debug!(
                    path = %file.path,
                    omitted = usage.files_omitted,
                    "Context budget exhausted, omitting remaining files"
                );
                content.push_str(OMISSION_MARKER);
                used += OMISSION_MARKER.len();
                break;
            }

            content.push_str(&opener);
            let file_chars = file.char_count();
            if overhead + file_chars <= remaining {
                content.push_str(&file.content);
                used += overhead + file_chars;
            } else {
                let keep = remaining
                    .saturating_sub(overhead)
                    .saturating_sub(SAFETY_MARGIN);
                content.extend(file.content.chars().take(keep));
                content.push_str(TRUNCATION_MARKER);
                used += overhead + keep + TRUNCATION_MARKER.len();
                usage.files_truncated += 1;
                debug!(
                    path = %file.path,
                    kept = keep,
                    total = file_chars,
                    "Truncated file to fit context budget"
                );
            }
            content.push_str(FENCE_CLOSE);
            usage.files_included += 1;
        }

        usage.chars_used = used;

        let mut hasher = Hasher::new();
        hasher.update(content.as_bytes());
        let blake3_hash = hasher.finalize().to_hex().to_string();

        PackedContext {
            content,
            blake3_hash,
            usage,
        }
    }
}

/// Header with the file count and as many leading paths as the list share allows.
fn render_header(files: &[SourceFile], budget: usize) -> String {
    let total = files.len();
    let limit = budget / HEADER_LIST_SHARE;
    if total == 0 {
        return "Here is the codebase (0 files):\n\n".to_string();
    }

    let full_chars: usize =
        files.iter().map(|f| f.path.chars().count()).sum::<usize>() + 2 * (total - 1);
    if full_chars <= limit {
        let paths: Vec<&str> = files.iter().map(|f| f.path.as_str()).collect();
        return format!(
            "Here is the codebase ({total} files: {}):\n\n",
            paths.join(", ")
        );
    }

    let mut list = String::new();
    let mut list_chars = 0;
    let mut listed = 0;
    for (index, file) in files.iter().enumerate() {
        let separator = if index == 0 { 0 } else { 2 };
        let entry = separator + file.path.chars().count();
        let tail = more_tail(total - index - 1).chars().count();
        if list_chars + entry + tail > limit {
            break;
        }
        if index > 0 {
            list.push_str(", ");
        }
        list.push_str(&file.path);
        list_chars += entry;
        listed += 1;
    }

    if listed == 0 {
        return format!("Here is the codebase ({total} files):\n\n");
    }
    format!(
        "Here is the codebase ({total} files: {list}{}):\n\n",
        more_tail(total - listed)
    )
}

fn more_tail(unlisted: usize) -> String {
    if unlisted == 0 {
        String::new()
    } else {
        format!(", ... and {unlisted} more")
    }
}
