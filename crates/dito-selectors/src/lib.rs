//! gitignore-style path filtering for the project crawler.
//!
//! Patterns follow `.gitignore` rules closely enough for real projects:
//!
//! - blank lines and `#` comments are skipped
//! - `!pattern` re-includes a path; the last matching rule wins
//! - a trailing `/` restricts the rule to directories
//! - a leading or inner `/` anchors the rule to the project root; otherwise
//!   it matches at any depth
//! - a path is ignored when any of its parent directories is ignored
//!
//! Each rule is compiled to a [`globset::Glob`] with `literal_separator`
//! enabled, so `*` never crosses a `/`.

use dito_utils::error::ConfigError;
use globset::{GlobBuilder, GlobSet, GlobSetBuilder};

/// Paths that are never sent to the model.
///
/// Dependency trees, VCS metadata, lockfiles, build output, environment files
/// and dito's own artifacts (so a re-run never audits its previous report).
pub const ALWAYS_IGNORE_PATTERNS: &[&str] = &[
    "node_modules",
    ".git",
    "package-lock.json",
    "yarn.lock",
    "dist",
    "build",
    ".env",
    "dito-report.md",
    "dito_generated_tests.js",
    "dito-fixes.md",
];

#[derive(Debug, Clone)]
struct Rule {
    negated: bool,
    dir_only: bool,
}

/// Compiled ignore rules.
#[derive(Debug, Clone)]
pub struct IgnoreRules {
    set: GlobSet,
    rules: Vec<Rule>,
}

impl IgnoreRules {
    /// Start an empty rule set.
    #[must_use]
    pub fn builder() -> IgnoreRulesBuilder {
        IgnoreRulesBuilder::new()
    }

    /// Rules containing only [`ALWAYS_IGNORE_PATTERNS`].
    #[must_use]
    pub fn always() -> Self {
        let mut builder = Self::builder();
        for pattern in ALWAYS_IGNORE_PATTERNS {
            // Built-in patterns are plain names and always compile.
            let _ = builder.add_line(pattern);
        }
        builder.build().unwrap_or_else(|_| Self::empty())
    }

    fn empty() -> Self {
        Self {
            set: GlobSet::empty(),
            rules: Vec::new(),
        }
    }

    /// Number of compiled rules.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Whether no rules were compiled.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Check a `/`-separated path relative to the project root.
    ///
    /// Every ancestor directory is checked first; once a directory is
    /// ignored nothing beneath it can be re-included, as in git.
    #[must_use]
    pub fn is_ignored(&self, rel_path: &str, is_dir: bool) -> bool {
        let rel_path = rel_path.trim_start_matches("./").trim_matches('/');
        if rel_path.is_empty() || self.rules.is_empty() {
            return false;
        }

        for (idx, _) in rel_path.match_indices('/') {
            if self.matches_self(&rel_path[..idx], true) {
                return true;
            }
        }

        self.matches_self(rel_path, is_dir)
    }

    fn matches_self(&self, candidate: &str, is_dir: bool) -> bool {
        let last = self
            .set
            .matches(candidate)
            .into_iter()
            .filter(|&idx| is_dir || !self.rules[idx].dir_only)
            .max();

        match last {
            Some(idx) => !self.rules[idx].negated,
            None => false,
        }
    }
}

/// Incremental builder for [`IgnoreRules`]; rule order is significant.
#[derive(Debug)]
pub struct IgnoreRulesBuilder {
    set: GlobSetBuilder,
    rules: Vec<Rule>,
}

impl IgnoreRulesBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self {
            set: GlobSetBuilder::new(),
            rules: Vec::new(),
        }
    }

    /// Add one `.gitignore` line. Blank lines and comments are accepted and ignored.
    ///
    /// # Errors
    ///
    /// Returns the glob error when the pattern cannot be compiled.
    pub fn add_line(&mut self, line: &str) -> Result<&mut Self, globset::Error> {
        let Some((glob, rule)) = translate(line) else {
            return Ok(self);
        };

        let compiled = GlobBuilder::new(&glob).literal_separator(true).build()?;
        self.set.add(compiled);
        self.rules.push(rule);
        Ok(self)
    }

    /// Add the contents of a `.gitignore` file, returning the lines that failed to compile.
    pub fn add_gitignore(&mut self, contents: &str) -> Vec<String> {
        let mut rejected = Vec::new();
        for line in contents.lines() {
            if self.add_line(line).is_err() {
                rejected.push(line.to_string());
            }
        }
        rejected
    }

    /// Compile the rules.
    ///
    /// # Errors
    ///
    /// Returns the glob error when the combined set cannot be built.
    pub fn build(self) -> Result<IgnoreRules, globset::Error> {
        Ok(IgnoreRules {
            set: self.set.build()?,
            rules: self.rules,
        })
    }
}

impl Default for IgnoreRulesBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Turn one gitignore line into a glob plus its flags.
fn translate(line: &str) -> Option<(String, Rule)> {
    let line = line.trim_end();
    if line.is_empty() || line.starts_with('#') {
        return None;
    }

    let (negated, body) = match line.strip_prefix('!') {
        Some(rest) => (true, rest),
        None => (false, line.strip_prefix('\\').unwrap_or(line)),
    };

    let (dir_only, body) = match body.strip_suffix('/') {
        Some(rest) => (true, rest),
        None => (false, body),
    };

    let anchored = body.contains('/');
    let body = body.trim_start_matches('/');
    if body.is_empty() {
        return None;
    }

    let glob = if anchored || body.starts_with("**/") {
        body.to_string()
    } else {
        format!("**/{body}")
    };

    Some((glob, Rule { negated, dir_only }))
}

/// Validate user-supplied ignore patterns (the `ignore` config key).
///
/// # Errors
///
/// Returns `ConfigError::InvalidValue` naming the first pattern that does not compile.
pub fn validate_patterns(patterns: &[String]) -> Result<(), ConfigError> {
    let mut builder = IgnoreRules::builder();
    for pattern in patterns {
        builder
            .add_line(pattern)
            .map_err(|e| ConfigError::InvalidValue {
                key: "ignore".to_string(),
                value: format!("Invalid pattern '{pattern}': {e}"),
            })?;
    }
    Ok(())
}
