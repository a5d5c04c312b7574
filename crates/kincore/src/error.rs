//! Error types shared by the kinematics and odometry crates

use thiserror::Error;

/// Errors raised by solver construction and kinematic solves.
///
/// Both variants indicate a caller programming error rather than a runtime
/// condition. They are detected before any numeric work begins and are fatal
/// to the call; no partial result is produced and no retry applies.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum KinematicsError {
    #[error("invalid drivetrain configuration: {reason}")]
    InvalidConfiguration { reason: String },

    #[error("dimension mismatch: expected {expected} entries, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },
}

impl KinematicsError {
    /// Shorthand for an `InvalidConfiguration` with a formatted reason.
    pub fn invalid_configuration(reason: impl Into<String>) -> Self {
        KinematicsError::InvalidConfiguration {
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, KinematicsError>;
