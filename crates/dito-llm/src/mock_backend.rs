//! Offline backend returning a fixed answer

use async_trait::async_trait;
use tracing::warn;

use crate::LlmError;
use crate::types::{LlmBackend, LlmInvocation, LlmResult};

const MOCK_PROVIDER: &str = "mock";
const MOCK_MODEL: &str = "mock-model";

/// Canned audit answer: a graded report with one critical issue and a
/// delimited test script that calls `fetch`.
pub const MOCK_RESPONSE: &str = "# MOCK Groq Report

## Grade: F

## Critical Issues
1. **SQL Injection**: User input is concatenated into a raw SQL query.
   Use parameterized queries instead.

## Improvements
- Add input validation on every route.

---BEGIN DITO TESTS---
```javascript
// Attack vector: SQL injection through the login form
async function run() {
  const res = await fetch('http://localhost:3000/login', {
    method: 'POST',
    headers: { 'Content-Type': 'application/json' },
    body: JSON.stringify({ username: \"' OR 1=1 --\", password: 'x' }),
  });
  console.log(res.status === 200 ? 'VULNERABLE' : 'SAFE');
}

run();
```
---END DITO TESTS---
";

/// Backend that never touches the network.
#[derive(Debug, Clone)]
pub struct MockBackend {
    response: String,
}

impl MockBackend {
    #[must_use]
    pub fn canned() -> Self {
        Self::with_response(MOCK_RESPONSE)
    }

    #[must_use]
    pub fn with_response(response: impl Into<String>) -> Self {
        Self {
            response: response.into(),
        }
    }
}

impl Default for MockBackend {
    fn default() -> Self {
        Self::canned()
    }
}

#[async_trait]
impl LlmBackend for MockBackend {
    async fn invoke(&self, inv: LlmInvocation) -> Result<LlmResult, LlmError> {
        warn!(prompt_chars = inv.prompt_chars(), "Using MOCK AI response");
        let model = if inv.model.is_empty() {
            MOCK_MODEL.to_string()
        } else {
            inv.model
        };
        Ok(LlmResult::new(self.response.clone(), MOCK_PROVIDER, model))
    }

    fn provider_name(&self) -> &str {
        MOCK_PROVIDER
    }
}
