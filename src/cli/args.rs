//! CLI argument definitions and parsing structures

use clap::{CommandFactory, Parser, Subcommand};
use std::path::PathBuf;

/// dito - AI-powered vibe coding auditor and attack-vector test generator
#[derive(Parser, Debug)]
#[command(name = "dito")]
#[command(about = "AI-powered vibe coding auditor and attack-vector test generator")]
#[command(long_about = r#"
dito packs a project's source files into a single prompt, asks a language model
for a graded audit, and writes the results next to your code:

  dito-report.md            the full audit report
  dito_generated_tests.js   an attack-vector test script (when one was produced)
  dito-fixes.md             copy-paste fix prompts for each critical issue

EXAMPLES:
  # Audit the current project
  dito analyze .

  # Audit with a smaller context budget and a harsher grader
  dito analyze ./my-app --max-chars 15000 --strictness strict

  # Ask for help with a single file
  dito debug src/server.js "TypeError: cannot read properties of undefined"

  # Try it without a provider
  MOCK_AI=1 dito analyze ./my-app

CONFIGURATION:
  Configuration is loaded with precedence: CLI flags > .ditorc.json > defaults
  .ditorc.json is read from the analysed directory
  The API key is read from the environment variable named by 'apiKeyEnv'
  (default GROQ_API_KEY)
"#)]
#[command(version)]
pub struct Cli {
    /// Character budget for the packed project context
    #[arg(long, global = true)]
    pub max_chars: Option<usize>,

    /// Model to request from the provider
    #[arg(long, global = true)]
    pub model: Option<String>,

    /// Grading strictness: chill, standard or strict
    #[arg(long, global = true)]
    pub strictness: Option<String>,

    /// Model request timeout in seconds
    #[arg(long, global = true)]
    pub timeout_secs: Option<u64>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Audit a project directory and write report, tests and fix prompts
    Analyze {
        /// Project directory to analyse
        directory: PathBuf,
    },

    /// Ask the model to find and fix a bug in one file
    Debug {
        /// File to debug
        file: PathBuf,

        /// Error message or description of the bug
        hint: Option<String>,
    },
}

impl Cli {
    /// Overrides for the configuration layer.
    #[must_use]
    pub fn config_overrides(&self) -> crate::CliArgs {
        crate::CliArgs {
            max_chars: self.max_chars,
            model: self.model.clone(),
            strictness: self.strictness.clone(),
            timeout_secs: self.timeout_secs,
        }
    }
}

/// Build the clap command (used for help output and tests).
#[must_use]
pub fn build_cli() -> clap::Command {
    Cli::command()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_definition_is_valid() {
        build_cli().debug_assert();
    }

    #[test]
    fn test_parse_analyze_with_global_flags() {
        let cli = Cli::try_parse_from([
            "dito",
            "analyze",
            "./app",
            "--max-chars",
            "5000",
            "--strictness",
            "strict",
            "-v",
        ])
        .unwrap();

        assert_eq!(
            cli.command,
            Some(Commands::Analyze {
                directory: PathBuf::from("./app")
            })
        );
        assert!(cli.verbose);

        let overrides = cli.config_overrides();
        assert_eq!(overrides.max_chars, Some(5000));
        assert_eq!(overrides.strictness.as_deref(), Some("strict"));
        assert!(overrides.model.is_none());
    }

    #[test]
    fn test_parse_debug_with_optional_hint() {
        let cli = Cli::try_parse_from(["dito", "debug", "index.js"]).unwrap();
        assert_eq!(
            cli.command,
            Some(Commands::Debug {
                file: PathBuf::from("index.js"),
                hint: None
            })
        );

        let cli = Cli::try_parse_from(["dito", "--model", "m", "debug", "index.js", "boom"]).unwrap();
        assert_eq!(
            cli.command,
            Some(Commands::Debug {
                file: PathBuf::from("index.js"),
                hint: Some("boom".to_string())
            })
        );
        assert_eq!(cli.model.as_deref(), Some("m"));
    }

    #[test]
    fn test_no_subcommand_parses() {
        let cli = Cli::try_parse_from(["dito"]).unwrap();
        assert!(cli.command.is_none());
    }

    #[test]
    fn test_non_numeric_budget_is_rejected() {
        assert!(Cli::try_parse_from(["dito", "analyze", ".", "--max-chars", "lots"]).is_err());
    }
}
