//! Property-based tests for the packer and splitter invariants
//!
//! Case counts can be raised locally via environment variables:
//!
//! - `PROPTEST_CASES`: number of cases per property (default: 64)
//! - `PROPTEST_MAX_SHRINK_ITERS`: max shrinking iterations on failure (default: 1000)
//!
//! ```bash
//! PROPTEST_CASES=512 cargo test --test property_based_tests
//! ```

use proptest::prelude::*;
use std::env;

use dito::{ContextPacker, SourceFile, TESTS_BEGIN, TESTS_END, pack, split};
use dito_packet::SAFETY_MARGIN;

const DEFAULT_PROPTEST_CASES: u32 = 64;
const DEFAULT_MAX_SHRINK_ITERS: u32 = 1000;

/// ProptestConfig honouring `PROPTEST_CASES` and `PROPTEST_MAX_SHRINK_ITERS`.
fn proptest_config(max_cases: Option<u32>) -> ProptestConfig {
    let env_cases = env::var("PROPTEST_CASES")
        .ok()
        .and_then(|s| s.parse::<u32>().ok())
        .unwrap_or(DEFAULT_PROPTEST_CASES);

    let env_shrink_iters = env::var("PROPTEST_MAX_SHRINK_ITERS")
        .ok()
        .and_then(|s| s.parse::<u32>().ok())
        .unwrap_or(DEFAULT_MAX_SHRINK_ITERS);

    let cases = match max_cases {
        Some(max) => env_cases.min(max),
        None => env_cases,
    };

    ProptestConfig {
        cases,
        max_shrink_iters: env_shrink_iters,
        max_shrink_time: 30000,
        ..ProptestConfig::default()
    }
}

/// Distinct paths (indexed so order can be checked) with mixed-width content.
fn arb_files() -> impl Strategy<Value = Vec<SourceFile>> {
    prop::collection::vec(
        ("[a-z]{1,12}", "[a-zA-Z0-9 ;(){}=é🦀\n]{0,400}"),
        0..12,
    )
    .prop_map(|entries| {
        entries
            .into_iter()
            .enumerate()
            .map(|(i, (stem, content))| SourceFile::new(format!("f{i:02}_{stem}.js"), content))
            .collect()
    })
}

/// Property: output never exceeds `budget + SAFETY_MARGIN` chars
#[test]
fn prop_pack_respects_budget() {
    proptest!(proptest_config(None), |(files in arb_files(), budget in 0usize..3000)| {
        let out = pack(&files, budget);
        let limit = budget + SAFETY_MARGIN;
        prop_assert!(
            out.chars().count() <= limit,
            "{} chars exceeds limit {}",
            out.chars().count(),
            limit
        );
    });
}

/// Property: included files appear once each, in input order
#[test]
fn prop_pack_preserves_order_without_splitting() {
    proptest!(proptest_config(None), |(files in arb_files(), budget in 0usize..5000)| {
        let out = pack(&files, budget);

        let mut last_pos = 0;
        for file in &files {
            let marker = format!("File: {}\n", file.path);
            let count = out.matches(&marker).count();
            prop_assert!(count <= 1, "{} appears {} times", file.path, count);
            if let Some(pos) = out.find(&marker) {
                prop_assert!(pos >= last_pos, "{} out of order", file.path);
                last_pos = pos;
            }
        }
    });
}

/// Property: usage accounting matches the produced text
#[test]
fn prop_usage_matches_content() {
    proptest!(proptest_config(None), |(files in arb_files(), budget in 0usize..5000)| {
        let packed = ContextPacker::new(budget).pack(&files);
        let usage = packed.usage();

        prop_assert_eq!(usage.chars_used, packed.content().chars().count());
        prop_assert_eq!(usage.files_included + usage.files_omitted, files.len());
        prop_assert!(usage.files_truncated <= usage.files_included);
    });
}

/// Property: the report is always the response, byte for byte
#[test]
fn prop_split_report_is_identity() {
    proptest!(proptest_config(None), |(response in "(?s).{0,600}")| {
        prop_assert_eq!(split(&response).report, response);
    });
}

/// Property: a delimited block wins over any fenced candidate
#[test]
fn prop_delimiters_take_priority() {
    proptest!(
        proptest_config(None),
        |(script in "[a-z]{1,10}\\(\\);", prose in "[a-zA-Z .]{0,80}")| {
            let response = format!(
                "{prose}\n```javascript\nfetch('/fenced')\n```\n{TESTS_BEGIN}\n{script}\n{TESTS_END}\n{prose}"
            );
            prop_assert_eq!(split(&response).test_script, Some(script));
        }
    );
}

/// Property: without delimiters the last qualifying fenced block is returned
#[test]
fn prop_fenced_fallback_last_wins() {
    proptest!(
        proptest_config(None),
        |(paths in prop::collection::vec("[a-z]{1,8}", 1..6), prose in "[a-zA-Z .]{0,40}")| {
            let mut response = String::new();
            for path in &paths {
                response.push_str(&format!("{prose}\n```js\nfetch('/{path}')\n```\n"));
            }
            response.push_str("```javascript\nconsole.log('not a network call')\n```\n");

            let expected = format!("fetch('/{}')", paths[paths.len() - 1]);
            prop_assert_eq!(split(&response).test_script, Some(expected));
        }
    );
}
