//! Prompt text for dito's model requests.
//!
//! The audit prompt is assembled from three parts: the analysis instructions,
//! the test-generation instructions (which ask for the script between
//! [`TESTS_BEGIN`] and [`TESTS_END`]) and an optional strictness note.

/// Opening delimiter of the generated test script.
pub const TESTS_BEGIN: &str = "---BEGIN DITO TESTS---";

/// Closing delimiter of the generated test script.
pub const TESTS_END: &str = "---END DITO TESTS---";

/// System message sent with every request.
pub const SYSTEM_PROMPT: &str = "You are an expert Senior Software Engineer and Security Researcher. \
You audit code for vibe coding pitfalls.";

/// Instructions for the audit report.
pub const ANALYSIS_PROMPT: &str = r###"
Analyze the provided codebase for the following critical issues. Be thorough and precise.

1. **Security Vulnerabilities**:
    - SQL/NoSQL/JSON injection?
    - XSS?
    - **CSRF**: Are state-changing operations protected?
    - **Unrestricted File Uploads**: Are file types and sizes validated?
    - **Database Security**: Are connection strings exposed or credentials hardcoded?
    - **Data Leaks**: Is personally identifiable information logged or exposed?
2. **Secret Leaks**: Hardcoded API keys, tokens or passwords (look for "sk-", "ghp_", "password", "db_pass", "JWT_SECRET").
3. **Performance**: Loop inefficiencies, memory leaks, N+1 queries.
4. **Code Quality**: Tangled control flow, naming, file structure, missing documentation.
5. **Logic Bugs**: Obvious runtime errors.
6. **Edge Cases**: Null, empty or malformed inputs.
7. **Operational Maturity**:
    - **Error Logging**: Is error handling consistent?
    - **Stack Trace Exposure**: Do 500 responses leak internal paths or stacks?
    - **Rate Limiting**: Is there protection against brute force or DoS?
8. **Testing Strategy**:
    - Unit, integration and end-to-end coverage, regression tests.
    - Staging environments and test accounts.
    - A sensible test pyramid, tests wired into CI.

Return the report as Markdown:
- Start with a "Grade" (A-F).
- Summarize the findings.
- Under a "## Critical Issues" heading, number each security or crashing bug as
  `1. **Short title**: description`.
- Under a "## Improvements" heading, list style and optimization suggestions.
- For every critical issue, include a "Recommended Fix" code block.
"###;

/// Instructions for the attack-vector test script.
pub const TEST_GENERATION_PROMPT: &str = r###"
Based on the codebase provided, generate an 'Attack Vector' test script.

Search the codebase for **actual URL endpoints**, API routes (such as /api/*) and front-end fetch or axios calls, and use those real URLs.
- If there are no local API routes, **do not guess**: target the page routes (/) and the input forms found in the markup.
- State in a comment at the top of the script whether endpoints were found or front-end routes are targeted.

Cover, against the identified endpoints or form fields:
- **SQL Injection** payloads.
- **XSS** payloads for inputs and URL parameters.
- **CSRF**: state-changing requests (POST/PUT/DELETE) without tokens.
- **Secret Checks**: whether paths such as /.env or /config are publicly readable.
- **DoS / payload size**: oversized bodies for POST routes and uploads.
- **Malformed Data**: malformed JSON and headers.
- **Error Handling**: trigger a 500 and check for stack traces or internal paths.
- **Rate Limiting**: 10 rapid requests, expecting a 429.

A test **PASSES** when the server handles the attack gracefully (a 4xx, a clean error message, or 429 for rate limiting).
A test **FAILS** when the server crashes (ECONNREFUSED/500), reflects an XSS payload raw, reveals secrets or leaks stack traces.

Output format:
- Plain JavaScript using only the global fetch API, runnable as `node dito_generated_tests.js`.
- No external dependencies (no node-fetch, no axios).
- Log 'PASS' or 'FAIL' for each test case.
- Wait 1s between requests, except when testing rate limiting.
- Use `const BASE_URL = process.env.BASE_URL || "http://localhost:3000";`.
- Place the script after the report between a line containing exactly ---BEGIN DITO TESTS--- and a line containing exactly ---END DITO TESTS---, without markdown fences.
"###;

/// How harshly the audit should grade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Strictness {
    /// Lenient grading for hackathon-grade projects
    Chill,
    #[default]
    Standard,
    /// Enterprise-grade scrutiny
    Strict,
}

impl Strictness {
    /// Parse a strictness level name.
    ///
    /// # Errors
    ///
    /// Returns an error message if the level is not recognized.
    pub fn parse(s: &str) -> Result<Self, String> {
        match s.trim().to_lowercase().as_str() {
            "chill" => Ok(Self::Chill),
            "standard" => Ok(Self::Standard),
            "strict" => Ok(Self::Strict),
            _ => Err(format!(
                "Unknown strictness '{s}'. Available levels: chill, standard, strict"
            )),
        }
    }

    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Chill => "chill",
            Self::Standard => "standard",
            Self::Strict => "strict",
        }
    }

    /// Note appended to the audit prompt, if any.
    #[must_use]
    pub const fn grading_note(&self) -> Option<&'static str> {
        match self {
            Self::Chill => Some("(Note: Be lenient with the grading. This is a hackathon project.)"),
            Self::Standard => None,
            Self::Strict => {
                Some("(Note: Be extremely strict. This is mission-critical enterprise code.)")
            }
        }
    }
}

impl std::fmt::Display for Strictness {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Instruction prompt for `dito analyze`.
#[must_use]
pub fn build_audit_prompt(strictness: Strictness) -> String {
    let mut prompt = format!("{ANALYSIS_PROMPT}\n\n{TEST_GENERATION_PROMPT}");
    if let Some(note) = strictness.grading_note() {
        prompt.push_str("\n\n");
        prompt.push_str(note);
    }
    prompt
}

/// Instruction prompt for `dito debug`, optionally quoting the user's error message.
#[must_use]
pub fn build_debug_prompt(hint: Option<&str>) -> String {
    let mut prompt = String::from("Act as a Senior Software Debugger. I have a bug in the following file.\n");
    if let Some(hint) = hint.map(str::trim).filter(|h| !h.is_empty()) {
        prompt.push_str(&format!("User Check/Error Message: \"{hint}\"\n"));
    }
    prompt.push_str(
        "\nAnalyze the code deeply. Explain the bug clearly and provide the FIXED code within a code block.\n",
    );
    prompt
}

/// Join an instruction prompt and the packed project context into the user message.
#[must_use]
pub fn compose_user_message(instructions: &str, context: &str) -> String {
    format!("{instructions}\n\n{context}")
}
