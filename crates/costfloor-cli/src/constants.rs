//! Constants used throughout the CLI.

/// Exit codes for the CLI.
///
/// These follow common Unix conventions:
/// - 0: Success
/// - 1: General error (used by anyhow for unhandled errors)
/// - 2: Misuse of shell command (reserved by shells)
/// - 3+: Application-specific errors
pub mod exit_codes {
    /// The minimum duration cannot be met by any allowed cost factor.
    pub const POLICY_UNATTAINABLE: i32 = 3;

    /// Invalid user input, arguments, or configuration.
    pub const INVALID_INPUT: i32 = 4;

    /// The password did not match the hash.
    pub const MISMATCH: i32 = 5;
}

/// Environment variable holding the password for `hash` and `verify`.
pub const PASSWORD_ENV: &str = "COSTFLOOR_PASSWORD";

/// Environment variable holding the log filter.
pub const LOG_ENV: &str = "COSTFLOOR_LOG";

/// Directory name under the XDG config home.
pub const APP_DIR: &str = "costfloor";
