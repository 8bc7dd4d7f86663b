//! Error types for costfloor core operations.
//!
//! The core distinguishes an unattainable timing policy from failures of the
//! underlying hash primitive. A password that does not match its hash is not
//! an error; see [`crate::Validation`].

use thiserror::Error;

/// Result type alias for costfloor operations.
pub type Result<T> = std::result::Result<T, CostFloorError>;

/// Core error type for costfloor operations.
#[derive(Debug, Error)]
pub enum CostFloorError {
    /// No cost factor up to `max_cost` hashes slowly enough.
    ///
    /// Raised at calibration and when runtime escalation runs off the top of
    /// the range. Retrying without lowering the policy will fail again.
    #[error(
        "Minimum hash duration of {min_duration_ms}ms is unattainable (maximum cost factor {max_cost})"
    )]
    MinDurationTooHigh { min_duration_ms: u64, max_cost: u32 },

    /// The hash primitive itself failed
    #[error("Hash primitive error: {0}")]
    Primitive(String),

    /// Invalid construction parameters
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl CostFloorError {
    /// Whether this error means the duration policy cannot be met.
    pub fn is_min_duration_too_high(&self) -> bool {
        matches!(self, CostFloorError::MinDurationTooHigh { .. })
    }
}

impl From<bcrypt::BcryptError> for CostFloorError {
    fn from(err: bcrypt::BcryptError) -> Self {
        CostFloorError::Primitive(err.to_string())
    }
}

impl From<argon2::password_hash::Error> for CostFloorError {
    fn from(err: argon2::password_hash::Error) -> Self {
        CostFloorError::Primitive(err.to_string())
    }
}

impl From<argon2::Error> for CostFloorError {
    fn from(err: argon2::Error) -> Self {
        CostFloorError::Primitive(err.to_string())
    }
}
