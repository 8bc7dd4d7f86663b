//! CLI error types for structured error handling.
//!
//! This module provides typed errors that map to specific exit codes,
//! enabling consistent error handling across the CLI.

use std::fmt;

use costfloor_core::CostFloorError;

use crate::constants::exit_codes;

/// CLI-specific errors with associated exit codes.
#[derive(Debug)]
pub enum CliError {
    /// No cost factor satisfies the duration policy
    PolicyUnattainable { message: String, hint: String },

    /// Invalid user input or configuration
    InvalidInput(String),

    /// Password did not match
    Mismatch,
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::PolicyUnattainable { message, hint } => write!(f, "{}\n{}", message, hint),
            CliError::InvalidInput(message) => write!(f, "{}", message),
            CliError::Mismatch => write!(f, "Password does not match hash"),
        }
    }
}

impl std::error::Error for CliError {}

impl CliError {
    pub fn invalid_input(message: impl Into<String>) -> Self {
        CliError::InvalidInput(message.into())
    }

    /// Get the exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::PolicyUnattainable { .. } => exit_codes::POLICY_UNATTAINABLE,
            CliError::InvalidInput(_) => exit_codes::INVALID_INPUT,
            CliError::Mismatch => exit_codes::MISMATCH,
        }
    }

    /// Print error message to stderr and exit with appropriate code.
    pub fn exit(&self) -> ! {
        eprintln!("Error: {}", self);
        std::process::exit(self.exit_code())
    }
}

impl From<CostFloorError> for CliError {
    fn from(err: CostFloorError) -> Self {
        match err {
            CostFloorError::MinDurationTooHigh { .. } => CliError::PolicyUnattainable {
                message: err.to_string(),
                hint: "Lower min_duration_ms or raise max_cost.".to_string(),
            },
            other => CliError::InvalidInput(other.to_string()),
        }
    }
}

/// Lift a core error into a [`CliError`] when it has a dedicated exit code.
pub fn classify(err: CostFloorError) -> anyhow::Error {
    match err {
        CostFloorError::Primitive(_) => anyhow::Error::new(err),
        other => anyhow::Error::new(CliError::from(other)),
    }
}
