//! Exit codes for the dito CLI.
//!
//! | Code | Constant | Description |
//! |------|----------|-------------|
//! | 0 | `SUCCESS` | Operation completed successfully |
//! | 1 | `INTERNAL` | General/internal failure |
//! | 2 | `CLI_ARGS` | Invalid CLI arguments or configuration |
//! | 10 | `LLM_TIMEOUT` | Model request timed out |
//! | 70 | `LLM_FAILURE` | Model provider failed |

/// Type-safe process exit code.
///
/// Use [`as_i32()`](Self::as_i32) to get the numeric value for
/// `std::process::exit()`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExitCode(i32);

impl ExitCode {
    /// Success - operation completed successfully
    pub const SUCCESS: ExitCode = ExitCode(0);

    /// Internal error - general failure
    pub const INTERNAL: ExitCode = ExitCode(1);

    /// CLI arguments error - invalid arguments or configuration values
    pub const CLI_ARGS: ExitCode = ExitCode(2);

    /// Model request exceeded its timeout
    pub const LLM_TIMEOUT: ExitCode = ExitCode(10);

    /// Model provider failure (auth, quota, outage, transport)
    pub const LLM_FAILURE: ExitCode = ExitCode(70);

    /// Get the numeric exit code value.
    #[must_use]
    pub const fn as_i32(self) -> i32 {
        self.0
    }
}

impl From<i32> for ExitCode {
    fn from(code: i32) -> Self {
        ExitCode(code)
    }
}
