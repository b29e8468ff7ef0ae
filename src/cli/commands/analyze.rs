//! `dito analyze`: crawl, pack, submit, split, persist

use anyhow::Result;
use std::path::Path;
use std::time::Instant;
use tracing::{info, warn};

use dito_config::{CliArgs, Config};
use dito_extraction::{extract_critical_issues, render_fix_prompts, split};
use dito_llm::LlmBackend;
use dito_packet::{ContextPacker, PackUsage, ProjectCrawler};
use dito_prompt_template::{Strictness, build_audit_prompt};
use dito_utils::error::DitoError;
use dito_utils::logging::log_stage_complete;

use super::common::{build_invocation, print_effective_config, resolve_path, to_utf8};
use crate::artifact::{ArtifactManager, ArtifactSet};

/// What one analysis produced
#[derive(Debug, Clone, Default)]
pub struct AnalyzeOutcome {
    /// Source files found by the crawler; zero means nothing was submitted
    pub files_found: usize,
    pub usage: Option<PackUsage>,
    pub critical_issues: usize,
    pub artifacts: ArtifactSet,
}

/// Run the full audit pipeline for `directory` against `backend`.
///
/// Progress lines go to stdout. An empty project is not an error: the outcome
/// reports zero files and nothing is written.
pub async fn analyze_project(
    directory: &Path,
    config: &Config,
    backend: &dyn LlmBackend,
) -> Result<AnalyzeOutcome, DitoError> {
    let root = to_utf8(directory.to_path_buf())?;

    let stage = Instant::now();
    let files = ProjectCrawler::new(root.clone())
        .with_ignore_patterns(&config.ignore)
        .crawl()
        .map_err(|e| DitoError::Crawl {
            root: root.to_string(),
            reason: format!("{e:#}"),
        })?;
    log_stage_complete("crawl", stage.elapsed().as_millis());

    if files.is_empty() {
        println!("✗ No matching files found to analyze.");
        return Ok(AnalyzeOutcome::default());
    }
    println!("✓ Found {} files.", files.len());

    let stage = Instant::now();
    let packed = ContextPacker::new(config.max_chars).pack(&files);
    let usage = *packed.usage();
    if usage.is_lossy() {
        warn!(
            budget = usage.budget,
            files_truncated = usage.files_truncated,
            files_omitted = usage.files_omitted,
            "Project exceeds the context budget; the model will see a partial view"
        );
    }
    info!(
        chars = usage.chars_used,
        files = usage.files_included,
        hash = %packed.hash(),
        "Packed project context"
    );
    log_stage_complete("pack", stage.elapsed().as_millis());

    let instructions = build_audit_prompt(config.strictness);
    let invocation = build_invocation(config, &instructions, packed.content());

    println!(
        "… Consulting {} ({})...",
        backend.provider_name(),
        config.llm.model
    );
    let stage = Instant::now();
    let result = backend.invoke(invocation).await?;
    log_stage_complete("submit", stage.elapsed().as_millis());
    println!("✓ Analysis complete!");

    let extraction = split(&result.raw_response);
    let issues = extract_critical_issues(&extraction.report);
    let fix_prompts = render_fix_prompts(&issues);

    let stage = Instant::now();
    let artifacts = ArtifactManager::new(root).store_analysis(&extraction, fix_prompts.as_deref())?;
    log_stage_complete("persist", stage.elapsed().as_millis());

    Ok(AnalyzeOutcome {
        files_found: files.len(),
        usage: Some(usage),
        critical_issues: issues.len(),
        artifacts,
    })
}

/// Entry point for `dito analyze <directory>`.
pub async fn execute_analyze_command(
    directory: &Path,
    cli_args: &CliArgs,
    verbose: bool,
) -> Result<()> {
    let target = resolve_path(directory);
    if !target.is_dir() {
        return Err(DitoError::FileNotFound {
            path: format!("{} (not a directory)", target.display()),
        }
        .into());
    }

    let config = Config::discover_from(&target, cli_args).map_err(DitoError::from)?;

    println!("\n🔮 DITO: Initializing Vibe Check on {}", target.display());
    if config.strictness != Strictness::Standard {
        println!("   Mode: {}", config.strictness);
    }
    println!();
    if verbose {
        print_effective_config(&config);
    }

    let backend = dito_llm::from_config(&config.llm).map_err(DitoError::from)?;
    let outcome = analyze_project(&target, &config, backend.as_ref()).await?;

    if outcome.files_found > 0 {
        print_summary(&outcome);
    }
    Ok(())
}

fn print_summary(outcome: &AnalyzeOutcome) {
    if let Some(report) = &outcome.artifacts.report {
        println!("✓ Report generated: {}", report.path);
    }
    match &outcome.artifacts.test_script {
        Some(script) => {
            println!("✓ Test Suite generated: {}", script.path);
            println!("\nTo run tests: node {}", script.path);
        }
        None => {
            warn!("No test script found in the model response");
            println!("⚠ Could not extract test code automatically. Please check the report manually.");
        }
    }
    match &outcome.artifacts.fix_prompts {
        Some(fixes) => println!(
            "✓ Generated fix prompts for {} critical issues: {}",
            outcome.critical_issues, fixes.path
        ),
        None => println!("✓ No critical issues found to generate fixes for."),
    }

    if let Some(usage) = outcome.usage.filter(PackUsage::is_lossy) {
        println!(
            "\nNote: {} of {} files fit the {}-character budget ({} truncated). \
             Raise --max-chars to send more.",
            usage.files_included,
            outcome.files_found,
            usage.budget,
            usage.files_truncated
        );
    }

    println!("\n✨ Dito Vibe Check Complete! ✨");
}

#[cfg(test)]
mod tests {
    use super::*;
    use dito_llm::{MOCK_RESPONSE, MockBackend};
    use tempfile::TempDir;

    fn project() -> anyhow::Result<TempDir> {
        let temp = TempDir::new()?;
        std::fs::write(
            temp.path().join("server.js"),
            "app.get('/users', (req, res) => db.query('SELECT * FROM users WHERE id=' + req.query.id));\n",
        )?;
        std::fs::create_dir(temp.path().join("node_modules"))?;
        std::fs::write(temp.path().join("node_modules/dep.js"), "ignored")?;
        Ok(temp)
    }

    #[tokio::test]
    async fn test_analyze_writes_all_artifacts_from_mock() -> anyhow::Result<()> {
        let temp = project()?;
        let config = Config::default();

        let outcome = analyze_project(temp.path(), &config, &MockBackend::canned()).await?;

        assert_eq!(outcome.files_found, 1);
        assert_eq!(outcome.critical_issues, 1);
        let report = std::fs::read_to_string(temp.path().join("dito-report.md"))?;
        assert_eq!(report, MOCK_RESPONSE);
        let script = std::fs::read_to_string(temp.path().join("dito_generated_tests.js"))?;
        assert!(script.contains("fetch("));
        assert!(!script.contains("---BEGIN"));
        let fixes = std::fs::read_to_string(temp.path().join("dito-fixes.md"))?;
        assert!(fixes.contains("SQL Injection"));
        Ok(())
    }

    #[tokio::test]
    async fn test_analyze_without_script_or_issues() -> anyhow::Result<()> {
        let temp = project()?;
        let backend = MockBackend::with_response("# Report\n\nGrade: A\n\nAll good.");

        let outcome = analyze_project(temp.path(), &Config::default(), &backend).await?;

        assert!(outcome.artifacts.test_script.is_none());
        assert!(outcome.artifacts.fix_prompts.is_none());
        assert!(temp.path().join("dito-report.md").exists());
        assert!(!temp.path().join("dito_generated_tests.js").exists());
        Ok(())
    }

    #[tokio::test]
    async fn test_analyze_empty_project_writes_nothing() -> anyhow::Result<()> {
        let temp = TempDir::new()?;

        let outcome =
            analyze_project(temp.path(), &Config::default(), &MockBackend::canned()).await?;

        assert_eq!(outcome.files_found, 0);
        assert!(outcome.artifacts.report.is_none());
        assert!(!temp.path().join("dito-report.md").exists());
        Ok(())
    }

    #[tokio::test]
    async fn test_rerun_ignores_previous_artifacts() -> anyhow::Result<()> {
        let temp = project()?;
        let config = Config::default();

        analyze_project(temp.path(), &config, &MockBackend::canned()).await?;
        let outcome = analyze_project(temp.path(), &config, &MockBackend::canned()).await?;

        assert_eq!(outcome.files_found, 1);
        Ok(())
    }

    #[tokio::test]
    async fn test_small_budget_marks_usage_lossy() -> anyhow::Result<()> {
        let temp = project()?;
        let config = Config {
            max_chars: 60,
            ..Config::default()
        };

        let outcome = analyze_project(temp.path(), &config, &MockBackend::canned()).await?;
        assert!(outcome.usage.is_some_and(|u| u.is_lossy()));
        Ok(())
    }
}
