//! Audit artifacts written into the analysed project.

use camino::{Utf8Path, Utf8PathBuf};
use dito_extraction::ExtractionResult;
use dito_utils::atomic_write::write_file_atomic;
use dito_utils::error::DitoError;
use tracing::debug;

/// Full model answer, always written.
pub const REPORT_FILE_NAME: &str = "dito-report.md";

/// Extracted attack-vector test script, written when one was found.
pub const TESTS_FILE_NAME: &str = "dito_generated_tests.js";

/// Copy-paste fix prompts, written when the report lists critical issues.
pub const FIXES_FILE_NAME: &str = "dito-fixes.md";

/// Kinds of artifact a run can produce
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtifactType {
    Report,
    TestScript,
    FixPrompts,
}

impl ArtifactType {
    #[must_use]
    pub const fn file_name(self) -> &'static str {
        match self {
            Self::Report => REPORT_FILE_NAME,
            Self::TestScript => TESTS_FILE_NAME,
            Self::FixPrompts => FIXES_FILE_NAME,
        }
    }
}

/// Where one artifact landed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactStoreResult {
    pub artifact_type: ArtifactType,
    pub path: Utf8PathBuf,
    pub chars: usize,
}

/// Everything written for one analysis
#[derive(Debug, Clone, Default)]
pub struct ArtifactSet {
    pub report: Option<ArtifactStoreResult>,
    pub test_script: Option<ArtifactStoreResult>,
    pub fix_prompts: Option<ArtifactStoreResult>,
}

/// Writes artifacts atomically into a project directory
#[derive(Debug, Clone)]
pub struct ArtifactManager {
    base_path: Utf8PathBuf,
}

impl ArtifactManager {
    pub fn new(base_path: impl Into<Utf8PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
        }
    }

    pub fn base_path(&self) -> &Utf8Path {
        &self.base_path
    }

    #[must_use]
    pub fn path_for(&self, artifact_type: ArtifactType) -> Utf8PathBuf {
        self.base_path.join(artifact_type.file_name())
    }

    /// Store one artifact, replacing any previous version.
    pub fn store(
        &self,
        artifact_type: ArtifactType,
        content: &str,
    ) -> Result<ArtifactStoreResult, DitoError> {
        let path = self.path_for(artifact_type);
        write_file_atomic(&path, content).map_err(|e| DitoError::ArtifactWriteFailed {
            path: path.to_string(),
            reason: format!("{e:#}"),
        })?;

        debug!(path = %path, chars = content.chars().count(), "Artifact written");
        Ok(ArtifactStoreResult {
            artifact_type,
            path,
            chars: content.chars().count(),
        })
    }

    /// Persist the split response plus optional fix prompts.
    ///
    /// The report is always written. The test script and fix prompts are
    /// written only when present; stale copies from earlier runs are left alone.
    pub fn store_analysis(
        &self,
        extraction: &ExtractionResult,
        fix_prompts: Option<&str>,
    ) -> Result<ArtifactSet, DitoError> {
        let report = self.store(ArtifactType::Report, &extraction.report)?;

        let test_script = extraction
            .test_script
            .as_deref()
            .map(|script| self.store(ArtifactType::TestScript, script))
            .transpose()?;

        let fix_prompts = fix_prompts
            .map(|doc| self.store(ArtifactType::FixPrompts, doc))
            .transpose()?;

        Ok(ArtifactSet {
            report: Some(report),
            test_script,
            fix_prompts,
        })
    }
}
