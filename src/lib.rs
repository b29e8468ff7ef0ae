//! dito - AI-powered vibe coding auditor and attack-vector test generator
//!
//! dito crawls a project, packs its source files into a single prompt under a
//! character budget, asks a language model for a graded audit, and splits the
//! answer into a Markdown report and a runnable attack-vector test script.
//!
//! # Quick Start (CLI)
//!
//! ```bash
//! export GROQ_API_KEY=...
//! dito analyze ./my-app
//! dito debug ./my-app/server.js "TypeError: undefined is not a function"
//!
//! # offline, with a canned answer
//! MOCK_AI=1 dito analyze ./my-app
//! ```
//!
//! # Library
//!
//! The pipeline stages live in member crates and are re-exported here:
//!
//! - [`ProjectCrawler`] and [`ContextPacker`] / [`pack`] build the prompt context
//! - [`LlmBackend`] submits it ([`MockBackend`] for offline use)
//! - [`split`] separates report and test script
//! - [`ArtifactManager`] writes the results atomically

pub mod artifact;
pub mod cli;

pub use artifact::{
    ArtifactManager, ArtifactSet, ArtifactStoreResult, ArtifactType, FIXES_FILE_NAME,
    REPORT_FILE_NAME, TESTS_FILE_NAME,
};
pub use cli::{AnalyzeOutcome, analyze_project, debug_file};

pub use dito_config::{CliArgs, Config, LlmSettings};
pub use dito_extraction::{
    CriticalIssue, ExtractionResult, TESTS_BEGIN, TESTS_END, extract_critical_issues,
    render_fix_prompts, split,
};
pub use dito_llm::{LlmBackend, LlmError, LlmInvocation, LlmResult, Message, MockBackend};
pub use dito_packet::{ContextPacker, PackUsage, PackedContext, ProjectCrawler, pack};
pub use dito_prompt_template::Strictness;
pub use dito_utils::error::{ConfigError, DitoError, UserFriendlyError};
pub use dito_utils::exit_codes::ExitCode;
pub use dito_utils::types::SourceFile;
