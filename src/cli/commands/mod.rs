//! Command implementations for `dito analyze` and `dito debug`

mod analyze;
mod common;
mod debug;

pub use analyze::{AnalyzeOutcome, analyze_project, execute_analyze_command};
pub use debug::{debug_file, execute_debug_command};
