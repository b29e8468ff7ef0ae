//! Split a model response into the report and the generated test script.
//!
//! Strategies, first hit wins:
//!
//! 1. The text between the first [`TESTS_BEGIN`] and the first [`TESTS_END`]
//!    after it, with a wrapping code fence and disallowed imports removed.
//! 2. The last fenced `javascript`/`js` block that makes a network call.
//!
//! The report is always the response, untouched.

use tracing::debug;

use crate::fences::fenced_blocks;
use crate::scrub::scrub_disallowed_imports;
use crate::{TESTS_BEGIN, TESTS_END};

/// Call-site tokens that mark a fenced block as a network test script.
pub const NETWORK_CALL_TOKENS: &[&str] = &["fetch(", "axios(", "axios."];

const SCRIPT_LANGS: &[&str] = &["javascript", "js"];

/// Report plus optional test script recovered from one response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractionResult {
    /// The full response, verbatim.
    pub report: String,
    /// The generated test script, if one could be found.
    pub test_script: Option<String>,
}

/// Split `response` into report and test script. Never fails.
#[must_use]
pub fn split(response: &str) -> ExtractionResult {
    let test_script = match delimited_script(response) {
        Some(script) => {
            debug!(chars = script.len(), "Extracted test script from delimiters");
            Some(script)
        }
        None => {
            let fenced = last_network_block(response);
            if fenced.is_some() {
                debug!("Extracted test script from fenced block");
            }
            fenced
        }
    };

    ExtractionResult {
        report: response.to_string(),
        test_script,
    }
}

fn delimited_script(response: &str) -> Option<String> {
    let start = response.find(TESTS_BEGIN)? + TESTS_BEGIN.len();
    let rest = &response[start..];
    let end = rest.find(TESTS_END)?;

    let inner = strip_fence_wrapper(rest[..end].trim());
    let script = scrub_disallowed_imports(inner);
    let script = script.trim();

    (!script.is_empty()).then(|| script.to_string())
}

/// Drop a leading fence opener and a trailing fence, each if present.
///
/// The trailing fence may stand on its own line or end the last line of code.
/// A one-line `` ```lang code``` `` keeps only `code`.
fn strip_fence_wrapper(text: &str) -> &str {
    let mut text = text;

    if let Some(info) = text.strip_prefix("```") {
        text = match info.find('\n') {
            Some(newline) => &info[newline + 1..],
            None => info
                .trim_start_matches('`')
                .split_once(char::is_whitespace)
                .map_or("", |(_, code)| code.trim_start()),
        };
    }

    if let Some(code) = text.trim_end().strip_suffix("```") {
        text = code.trim_end();
    }

    text
}

fn last_network_block(response: &str) -> Option<String> {
    let mut last = None;

    for block in fenced_blocks(response) {
        let is_script = SCRIPT_LANGS.iter().any(|lang| block.is_lang(lang));
        let calls_network = NETWORK_CALL_TOKENS
            .iter()
            .any(|token| block.body.contains(token));
        if is_script && calls_network {
            last = Some(block.body);
        }
    }

    last.map(|body| body.trim().to_string())
        .filter(|body| !body.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_delimited_script() {
        let result = split("noise ---BEGIN DITO TESTS---\nconsole.log('hi')\n---END DITO TESTS--- trailing");
        assert_eq!(result.test_script.as_deref(), Some("console.log('hi')"));
    }

    #[test]
    fn test_report_is_verbatim() {
        let response = "  # Report\n\n---BEGIN DITO TESTS---\nfetch('/')\n---END DITO TESTS---\n";
        assert_eq!(split(response).report, response);
    }

    #[test]
    fn test_delimited_strips_wrapping_fence() {
        let response = "---BEGIN DITO TESTS---\n```javascript\nawait fetch(BASE_URL);\n```\n---END DITO TESTS---";
        assert_eq!(
            split(response).test_script.as_deref(),
            Some("await fetch(BASE_URL);")
        );
    }

    #[test]
    fn test_delimited_strips_each_fence_side_independently() {
        let opener_only = "---BEGIN DITO TESTS---\n```js\nrun();\n---END DITO TESTS---";
        assert_eq!(split(opener_only).test_script.as_deref(), Some("run();"));

        let closer_only = "---BEGIN DITO TESTS---\nrun();\n```\n---END DITO TESTS---";
        assert_eq!(split(closer_only).test_script.as_deref(), Some("run();"));
    }

    #[test]
    fn test_delimited_strips_closing_fence_on_last_code_line() {
        let response = "---BEGIN DITO TESTS---\n```javascript\nfetch('/a');```\n---END DITO TESTS---";
        assert_eq!(split(response).test_script.as_deref(), Some("fetch('/a');"));

        let one_line = "---BEGIN DITO TESTS---```js fetch('/b');```---END DITO TESTS---";
        assert_eq!(split(one_line).test_script.as_deref(), Some("fetch('/b');"));
    }

    #[test]
    fn test_delimited_scrubs_multi_line_import() {
        let response = "---BEGIN DITO TESTS---\nimport {\n  get\n} from 'axios';\nawait fetch('/');\n---END DITO TESTS---";
        assert_eq!(split(response).test_script.as_deref(), Some("await fetch('/');"));
    }

    #[test]
    fn test_delimited_scrubs_disallowed_imports() {
        let response = "---BEGIN DITO TESTS---\n\
                        const axios = require('axios');\n\
                        import fetch from 'node-fetch';\n\
                        await fetch('/api');\n\
                        ---END DITO TESTS---";
        assert_eq!(split(response).test_script.as_deref(), Some("await fetch('/api');"));
    }

    #[test]
    fn test_end_before_begin_is_not_a_pair() {
        let response = "---END DITO TESTS--- ---BEGIN DITO TESTS--- no end";
        assert_eq!(split(response).test_script, None);
    }

    #[test]
    fn test_empty_delimited_block_falls_back_to_fences() {
        let response = "---BEGIN DITO TESTS---\n```\n```\n---END DITO TESTS---\n\n```js\nfetch('/z')\n```";
        assert_eq!(split(response).test_script.as_deref(), Some("fetch('/z')"));
    }

    #[test]
    fn test_fenced_fallback_last_wins() {
        let response = "```javascript\nrequire('axios'); fetch('/x')\n```\n\n```javascript\nfetch('/y')\n```";
        assert_eq!(split(response).test_script.as_deref(), Some("fetch('/y')"));
    }

    #[test]
    fn test_fenced_fallback_is_not_scrubbed() {
        let response = "```js\nconst axios = require('axios');\naxios.get('/');\n```";
        assert_eq!(
            split(response).test_script.as_deref(),
            Some("const axios = require('axios');\naxios.get('/');")
        );
    }

    #[test]
    fn test_fenced_fallback_accepts_mid_line_and_single_line_fences() {
        let mid_line = "Here is the suite: ```javascript\nfetch('/a')\n```";
        assert_eq!(split(mid_line).test_script.as_deref(), Some("fetch('/a')"));

        let single_line = "```javascript fetch('/a')```";
        assert_eq!(split(single_line).test_script.as_deref(), Some("fetch('/a')"));
    }

    #[test]
    fn test_fenced_fallback_requires_tag_and_network_token() {
        let response = "```python\nrequests.get(fetch('/'))\n```\n```js\nconsole.log('no network')\n```\n```\nfetch('/untagged')\n```";
        assert_eq!(split(response).test_script, None);
    }

    #[test]
    fn test_delimiters_take_priority_over_fences() {
        let response = "```js\nfetch('/fenced')\n```\n---BEGIN DITO TESTS---\nfetch('/delimited')\n---END DITO TESTS---";
        assert_eq!(split(response).test_script.as_deref(), Some("fetch('/delimited')"));
    }

    #[test]
    fn test_empty_and_unrecognized_responses() {
        assert_eq!(
            split(""),
            ExtractionResult {
                report: String::new(),
                test_script: None
            }
        );
        assert_eq!(split("just prose").test_script, None);
    }
}
