//! Removal of third-party HTTP client imports from generated scripts.
//!
//! Generated scripts must run with nothing but the runtime's global `fetch`.

use once_cell::sync::Lazy;
use regex::Regex;

/// Modules a generated script may not import.
pub const DISALLOWED_MODULES: &[&str] = &["axios", "node-fetch"];

/// `import x from 'm'`, `import { x } from "m"`, `import 'm'` and `require('m')`
/// for any module in [`DISALLOWED_MODULES`].
static DISALLOWED_IMPORT: Lazy<Regex> = Lazy::new(|| {
    let modules = DISALLOWED_MODULES
        .iter()
        .map(|m| regex::escape(m))
        .collect::<Vec<_>>()
        .join("|");
    let quoted = format!(r#"['"`](?:{modules})['"`]"#);
    Regex::new(&format!(
        r"\bimport\b.*\bfrom\s*{quoted}|\bimport\s*{quoted}|\brequire\s*\(\s*{quoted}\s*\)"
    ))
    .expect("disallowed-import pattern is valid")
});

/// An `import` line that does not name its module yet (`import {`, `import a,`).
static OPEN_IMPORT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"^\s*import\b[^'"`;]*$"#).expect("open-import pattern is valid")
});

/// The `from '<module>'` clause that ends an import statement.
static FROM_MODULE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"\bfrom\s*['"`]([^'"`]+)['"`]"#).expect("from-clause pattern is valid")
});

/// Delete every import or require of a disallowed module.
///
/// An `import` statement spread over several lines is removed as a whole,
/// from its opening line through its `from '<module>'` line. Other lines,
/// including their original line endings, are kept as they are.
#[must_use]
pub fn scrub_disallowed_imports(script: &str) -> String {
    let mut out = String::with_capacity(script.len());
    let mut pending: Vec<&str> = Vec::new();

    for line in script.split_inclusive('\n') {
        if !pending.is_empty() {
            pending.push(line);
            if let Some(caps) = FROM_MODULE.captures(line) {
                if DISALLOWED_MODULES.contains(&&caps[1]) {
                    pending.clear();
                } else {
                    out.extend(pending.drain(..));
                }
            } else if line.contains(';') {
                out.extend(pending.drain(..));
            }
            continue;
        }

        if DISALLOWED_IMPORT.is_match(line) {
            continue;
        }
        if OPEN_IMPORT.is_match(line.trim_end()) {
            pending.push(line);
            continue;
        }
        out.push_str(line);
    }

    out.extend(pending);
    out
}
