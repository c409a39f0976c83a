//! Terminal helpers for petfood filter tools
//!
//! Provides shared CLI functionality:
//! - Status messages
//! - Match and purity formatting
//! - Process exit codes

#![warn(missing_docs)]

pub mod output;

/// Process exit codes
pub mod exit_codes {
    use crate::output::Status;
    use std::fmt::Display;

    /// Command completed
    pub const SUCCESS: i32 = 0;
    /// Command ran but found nothing to report
    pub const NO_MATCHES: i32 = 1;
    /// Input could not be read or parsed
    pub const FAILURE: i32 = 2;

    /// Exit code for a command outcome, reporting any error on stderr
    pub fn from_result<E: Display>(result: Result<i32, E>) -> i32 {
        match result {
            Ok(code) => code,
            Err(e) => {
                Status::error(&format!("{:#}", e));
                FAILURE
            }
        }
    }

}
