//! Recovery of structured artifacts from free-text model responses.
//!
//! [`split`] separates a response into the report (always the full text) and
//! an optional generated test script. [`extract_critical_issues`] pulls the
//! numbered critical issues out of a report so that [`render_fix_prompts`]
//! can turn them into copy-paste prompts.
//!
//! Nothing in this crate fails: unrecognized input degrades to an absent
//! script or an empty issue list.

mod fences;
mod fixes;
mod scrub;
mod splitter;

pub use dito_prompt_template::{TESTS_BEGIN, TESTS_END};
pub use fences::{FencedBlock, fenced_blocks};
pub use fixes::{CriticalIssue, extract_critical_issues, render_fix_prompts};
pub use scrub::{DISALLOWED_MODULES, scrub_disallowed_imports};
pub use splitter::{ExtractionResult, NETWORK_CALL_TOKENS, split};
