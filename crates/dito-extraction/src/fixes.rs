//! Copy-paste fix prompts built from a report's critical issues.

use once_cell::sync::Lazy;
use regex::Regex;

static CRITICAL_HEADING: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)critical issues").expect("heading pattern is valid"));

/// Where the critical-issues section ends: the next heading or the improvements list.
static SECTION_END: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)##|\*\*improvements:").expect("section-end pattern is valid"));

static NUMBERED_ITEM: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\n\s*\d+\.\s+").expect("numbered-item pattern is valid"));

static BOLD_TITLE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?s)\*\*(.*?)\*\*:?\s*(.*)").expect("bold-title pattern is valid")
});

/// One numbered entry of a report's "Critical Issues" section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CriticalIssue {
    pub title: String,
    pub description: String,
}

/// Numbered `**Title**: description` items under the first "Critical Issues" mention.
///
/// The description is the first non-empty line after the title, without a
/// leading bullet. Items lacking a title or a description are skipped.
#[must_use]
pub fn extract_critical_issues(report: &str) -> Vec<CriticalIssue> {
    let Some(heading) = CRITICAL_HEADING.find(report) else {
        return Vec::new();
    };

    let after = &report[heading.end()..];
    let section = match SECTION_END.find(after) {
        Some(end) => &after[..end.start()],
        None => after,
    };

    NUMBERED_ITEM
        .split(section)
        .skip(1)
        .filter_map(parse_item)
        .collect()
}

fn parse_item(item: &str) -> Option<CriticalIssue> {
    let caps = BOLD_TITLE.captures(item)?;
    let title = caps.get(1)?.as_str().trim().trim_end_matches(':').trim();
    let description = caps
        .get(2)?
        .as_str()
        .lines()
        .map(|line| line.trim().trim_start_matches(['-', '*']).trim())
        .find(|line| !line.is_empty())?;

    if title.is_empty() {
        return None;
    }

    Some(CriticalIssue {
        title: title.to_string(),
        description: description.to_string(),
    })
}

/// Markdown document with one copy-paste prompt per issue; `None` when there are none.
#[must_use]
pub fn render_fix_prompts(issues: &[CriticalIssue]) -> Option<String> {
    if issues.is_empty() {
        return None;
    }

    let mut out = String::from("# 🛠️ Dito Fix Prompts\n\n");
    out.push_str(
        "Use these prompts with any AI assistant to fix the issues found in your code.\n\n",
    );
    out.push_str("---\n\n");

    for (index, issue) in issues.iter().enumerate() {
        out.push_str(&format!("## Fix #{}: {}\n\n", index + 1, issue.title));
        out.push_str(&format!("**Issue**: {}\n\n", issue.description));
        out.push_str("### 📋 Copy & Paste Prompt:\n```\n");
        out.push_str("Act as a Senior Security Engineer. I have a code issue in my project.\n\n");
        out.push_str(&format!("ISSUE: {} - {}\n\n", issue.title, issue.description));
        out.push_str(
            "TASK: Analyze the relevant files in my project and rewrite the code to fix this issue. \
             Make the fix secure and efficient.\n",
        );
        out.push_str("```\n\n---\n\n");
    }

    Some(out)
}
