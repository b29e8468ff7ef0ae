//! CLI flag wiring and end-to-end runs of the `dito` binary
//!
//! Binary runs use `MOCK_AI=1`, so no provider or API key is needed.

use anyhow::Result;
use assert_cmd::assert::OutputAssertExt;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use std::process::{Command, Stdio};
use tempfile::TempDir;

fn dito_cmd() -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("dito"));
    cmd.env("MOCK_AI", "1");
    cmd.env_remove("RUST_LOG");
    cmd.stdin(Stdio::null());
    cmd
}

fn sample_project() -> Result<TempDir> {
    let temp = TempDir::new()?;
    fs::write(
        temp.path().join("server.js"),
        "const express = require('express');\nconst app = express();\n",
    )?;
    fs::create_dir(temp.path().join("routes"))?;
    fs::write(
        temp.path().join("routes/users.js"),
        "router.get('/users', (req, res) => res.send(req.query.name));\n",
    )?;
    fs::create_dir(temp.path().join("node_modules"))?;
    fs::write(temp.path().join("node_modules/lib.js"), "module.exports = 1;\n")?;
    Ok(temp)
}

fn read(dir: &Path, name: &str) -> Result<String> {
    Ok(fs::read_to_string(dir.join(name))?)
}

#[test]
fn test_all_global_flags_defined() {
    let cli = dito::cli::build_cli();
    let names: Vec<_> = cli.get_arguments().filter_map(|arg| arg.get_long()).collect();

    for flag in ["max-chars", "model", "strictness", "timeout-secs", "verbose"] {
        assert!(names.contains(&flag), "Global flag --{flag} is not defined");
    }
}

#[test]
fn test_subcommands_defined() {
    let cli = dito::cli::build_cli();
    let names: Vec<_> = cli.get_subcommands().map(|c| c.get_name()).collect();
    assert!(names.contains(&"analyze"));
    assert!(names.contains(&"debug"));
}

#[test]
fn test_version_output() {
    dito_cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("dito"));
}

#[test]
fn test_no_subcommand_prints_help() {
    dito_cmd()
        .assert()
        .success()
        .stdout(predicate::str::contains("Usage"))
        .stdout(predicate::str::contains("analyze"));
}

#[test]
fn test_analyze_mock_writes_artifacts() -> Result<()> {
    let project = sample_project()?;

    dito_cmd()
        .arg("analyze")
        .arg(project.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Found 2 files"))
        .stdout(predicate::str::contains("dito-report.md"))
        .stdout(predicate::str::contains("Vibe Check Complete"));

    let report = read(project.path(), "dito-report.md")?;
    assert!(report.starts_with("# MOCK Groq Report"));
    assert!(report.contains("---BEGIN DITO TESTS---"));

    let script = read(project.path(), "dito_generated_tests.js")?;
    assert!(script.contains("fetch("));
    assert!(!script.contains("```"));

    let fixes = read(project.path(), "dito-fixes.md")?;
    assert!(fixes.contains("## Fix #1: SQL Injection"));
    Ok(())
}

#[test]
fn test_analyze_verbose_prints_effective_config() -> Result<()> {
    let project = sample_project()?;
    fs::write(project.path().join(".ditorc.json"), r#"{"strictness": "chill"}"#)?;

    dito_cmd()
        .args(["analyze", "--verbose", "--max-chars", "9000"])
        .arg(project.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Mode: chill"))
        .stdout(predicate::str::contains("maxChars = 9000 [cli]"))
        .stdout(predicate::str::contains("strictness = chill [config]"))
        .stdout(predicate::str::contains("model = llama-3.3-70b-versatile [default]"));
    Ok(())
}

#[test]
fn test_analyze_empty_project_succeeds_without_artifacts() -> Result<()> {
    let project = TempDir::new()?;

    dito_cmd()
        .arg("analyze")
        .arg(project.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("No matching files found"));

    assert!(!project.path().join("dito-report.md").exists());
    Ok(())
}

#[test]
fn test_invalid_strictness_exits_2() -> Result<()> {
    let project = sample_project()?;

    dito_cmd()
        .args(["analyze", "--strictness", "brutal"])
        .arg(project.path())
        .assert()
        .code(2)
        .stderr(predicate::str::contains("strictness"));
    Ok(())
}

#[test]
fn test_invalid_config_value_exits_2() -> Result<()> {
    let project = sample_project()?;
    fs::write(project.path().join(".ditorc.json"), r#"{"maxChars": 0}"#)?;

    dito_cmd()
        .arg("analyze")
        .arg(project.path())
        .assert()
        .code(2)
        .stderr(predicate::str::contains("maxChars"));
    Ok(())
}

#[test]
fn test_malformed_config_falls_back_to_defaults() -> Result<()> {
    let project = sample_project()?;
    fs::write(project.path().join(".ditorc.json"), "{ nope")?;

    dito_cmd()
        .arg("analyze")
        .arg(project.path())
        .assert()
        .success();
    assert!(project.path().join("dito-report.md").exists());
    Ok(())
}

#[test]
fn test_missing_directory_exits_2() {
    dito_cmd()
        .args(["analyze", "/definitely/not/a/dito/project"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("not found"));
}

#[test]
fn test_missing_api_key_exits_2() -> Result<()> {
    let project = sample_project()?;

    let mut cmd = dito_cmd();
    cmd.env_remove("MOCK_AI").env_remove("GROQ_API_KEY");
    cmd.arg("analyze")
        .arg(project.path())
        .assert()
        .code(2)
        .stderr(predicate::str::contains("GROQ_API_KEY"));

    assert!(!project.path().join("dito-report.md").exists());
    Ok(())
}

#[test]
fn test_debug_mock_prints_answer() -> Result<()> {
    let project = sample_project()?;

    dito_cmd()
        .args(["debug"])
        .arg(project.path().join("server.js"))
        .arg("TypeError: app is not a function")
        .assert()
        .success()
        .stdout(predicate::str::contains("DITO DEBUGGER"))
        .stdout(predicate::str::contains("Hint: \"TypeError: app is not a function\""))
        .stdout(predicate::str::contains("# MOCK Groq Report"));
    Ok(())
}

#[test]
fn test_debug_missing_file_exits_2() {
    dito_cmd()
        .args(["debug", "/definitely/not/here.js"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("File not found"));
}
