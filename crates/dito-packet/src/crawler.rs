//! Project file discovery.

use anyhow::{Context, Result, bail};
use camino::{Utf8Path, Utf8PathBuf};
use dito_selectors::IgnoreRules;
use dito_utils::types::SourceFile;
use std::fs;
use tracing::{debug, warn};
use walkdir::WalkDir;

/// Files larger than this are never read.
pub const MAX_FILE_BYTES: u64 = 1024 * 1024;

/// Extensions treated as binary and skipped (compared case-insensitively).
pub const BINARY_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif", "ico", "pdf", "zip"];

/// Walks a project directory and collects its text files.
///
/// Paths are reported relative to the root, `/`-separated, sorted.
/// The always-ignored entries cannot be re-included by a `!` rule in the
/// project's `.gitignore` or the configured ignore list.
#[derive(Debug, Clone)]
pub struct ProjectCrawler {
    root: Utf8PathBuf,
    extra_ignore: Vec<String>,
    max_file_bytes: u64,
}

impl ProjectCrawler {
    #[must_use]
    pub fn new(root: impl Into<Utf8PathBuf>) -> Self {
        Self {
            root: root.into(),
            extra_ignore: Vec::new(),
            max_file_bytes: MAX_FILE_BYTES,
        }
    }

    /// Additional gitignore-style patterns, applied after the project's `.gitignore`.
    #[must_use]
    pub fn with_ignore_patterns(mut self, patterns: &[String]) -> Self {
        self.extra_ignore.extend(patterns.iter().cloned());
        self
    }

    #[must_use]
    pub const fn with_max_file_bytes(mut self, max_file_bytes: u64) -> Self {
        self.max_file_bytes = max_file_bytes;
        self
    }

    #[must_use]
    pub fn root(&self) -> &Utf8Path {
        &self.root
    }

    /// Collect every readable, non-ignored text file under the root.
    pub fn crawl(&self) -> Result<Vec<SourceFile>> {
        let metadata = fs::metadata(&self.root)
            .with_context(|| format!("Failed to read directory: {}", self.root))?;
        if !metadata.is_dir() {
            bail!("Not a directory: {}", self.root);
        }

        let always = IgnoreRules::always();
        let project = self.project_rules()?;
        let root = self.root.as_std_path();

        let walker = WalkDir::new(root)
            .follow_links(false)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|entry| {
                if entry.depth() == 0 {
                    return true;
                }
                let Some(rel) = relative_path(root, entry.path()) else {
                    return false;
                };
                let is_dir = entry.file_type().is_dir();
                !(always.is_ignored(&rel, is_dir) || project.is_ignored(&rel, is_dir))
            });

        let mut files = Vec::new();
        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    warn!(error = %e, "Skipping unreadable entry");
                    continue;
                }
            };
            if !entry.file_type().is_file() {
                continue;
            }

            let Some(rel) = relative_path(root, entry.path()) else {
                debug!(path = %entry.path().display(), "Skipping non-UTF-8 path");
                continue;
            };

            if has_binary_extension(&rel) {
                debug!(path = %rel, "Skipping binary file");
                continue;
            }

            let size = match entry.metadata() {
                Ok(meta) => meta.len(),
                Err(e) => {
                    warn!(path = %rel, error = %e, "Skipping file without metadata");
                    continue;
                }
            };
            if size > self.max_file_bytes {
                debug!(path = %rel, size, "Skipping large file");
                continue;
            }

            match fs::read_to_string(entry.path()) {
                Ok(content) => files.push(SourceFile::new(rel, content)),
                Err(e) => warn!(path = %rel, error = %e, "Error reading file"),
            }
        }

        files.sort_by(|a, b| a.path.cmp(&b.path));
        debug!(root = %self.root, count = files.len(), "Crawl complete");
        Ok(files)
    }

    /// Rules from the root `.gitignore` followed by the configured patterns.
    fn project_rules(&self) -> Result<IgnoreRules> {
        let mut builder = IgnoreRules::builder();

        let gitignore = self.root.join(".gitignore");
        if gitignore.is_file() {
            let contents = fs::read_to_string(&gitignore)
                .with_context(|| format!("Failed to read {gitignore}"))?;
            for line in builder.add_gitignore(&contents) {
                warn!(pattern = %line, "Ignoring invalid .gitignore pattern");
            }
        }

        for pattern in &self.extra_ignore {
            builder
                .add_line(pattern)
                .with_context(|| format!("Invalid ignore pattern: {pattern}"))?;
        }

        builder.build().context("Failed to compile ignore rules")
    }
}

fn relative_path(root: &std::path::Path, path: &std::path::Path) -> Option<String> {
    let rel = path.strip_prefix(root).ok()?;
    let rel = Utf8Path::from_path(rel)?;
    let parts: Vec<&str> = rel.components().map(|c| c.as_str()).collect();
    Some(parts.join("/"))
}

fn has_binary_extension(rel: &str) -> bool {
    Utf8Path::new(rel)
        .extension()
        .map(str::to_ascii_lowercase)
        .is_some_and(|ext| BINARY_EXTENSIONS.contains(&ext.as_str()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn project() -> Result<(TempDir, Utf8PathBuf)> {
        let temp = TempDir::new()?;
        let root = Utf8PathBuf::try_from(temp.path().to_path_buf())?;
        Ok((temp, root))
    }

    fn write(root: &Utf8Path, rel: &str, content: &str) -> Result<()> {
        let path = root.join(rel);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, content)?;
        Ok(())
    }

    fn paths(files: &[SourceFile]) -> Vec<&str> {
        files.iter().map(|f| f.path.as_str()).collect()
    }

    #[test]
    fn test_crawl_respects_gitignore_and_defaults() -> Result<()> {
        let (_temp, root) = project()?;
        write(&root, "index.js", "console.log('hi')")?;
        write(&root, "src/app.js", "export default 1")?;
        write(&root, "ignored.txt", "nope")?;
        write(&root, "secrets/key.txt", "hunter2")?;
        write(&root, "node_modules/pkg/index.js", "module.exports = {}")?;
        write(&root, "package-lock.json", "{}")?;
        write(&root, ".gitignore", "ignored.txt\nsecrets/\n")?;

        let files = ProjectCrawler::new(root.clone()).crawl()?;

        assert_eq!(paths(&files), vec![".gitignore", "index.js", "src/app.js"]);
        Ok(())
    }

    #[test]
    fn test_crawl_skips_binary_and_large_files() -> Result<()> {
        let (_temp, root) = project()?;
        write(&root, "logo.PNG", "not really a png")?;
        write(&root, "big.js", &"x".repeat(64))?;
        write(&root, "small.js", "x")?;

        let files = ProjectCrawler::new(root.clone())
            .with_max_file_bytes(32)
            .crawl()?;

        assert_eq!(paths(&files), vec!["small.js"]);
        Ok(())
    }

    #[test]
    fn test_crawl_skips_non_utf8_files() -> Result<()> {
        let (_temp, root) = project()?;
        fs::write(root.join("blob.bin"), [0xff, 0xfe, 0x00, 0x80])?;
        write(&root, "ok.js", "1")?;

        let files = ProjectCrawler::new(root.clone()).crawl()?;
        assert_eq!(paths(&files), vec!["ok.js"]);
        Ok(())
    }

    #[test]
    fn test_extra_patterns_and_previous_artifacts_are_ignored() -> Result<()> {
        let (_temp, root) = project()?;
        write(&root, "app.js", "1")?;
        write(&root, "fixtures/data.json", "{}")?;
        write(&root, "dito-report.md", "# old report")?;
        write(&root, "dito_generated_tests.js", "fetch('/')")?;

        let files = ProjectCrawler::new(root.clone())
            .with_ignore_patterns(&["fixtures/".to_string()])
            .crawl()?;

        assert_eq!(paths(&files), vec!["app.js"]);
        Ok(())
    }

    #[test]
    fn test_gitignore_negation_cannot_reinclude_always_ignored() -> Result<()> {
        let (_temp, root) = project()?;
        write(&root, ".env", "SECRET=1")?;
        write(&root, ".gitignore", "!.env\n")?;

        let files = ProjectCrawler::new(root.clone()).crawl()?;
        assert_eq!(paths(&files), vec![".gitignore"]);
        Ok(())
    }

    #[test]
    fn test_crawl_missing_directory_fails() -> Result<()> {
        let (_temp, root) = project()?;
        let err = ProjectCrawler::new(root.join("missing")).crawl().unwrap_err();
        assert!(err.to_string().contains("Failed to read directory"));
        Ok(())
    }
}
