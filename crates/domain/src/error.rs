//! Common error types used across the workspace.
//!
//! Each layer defines its own typed errors and converts into
//! [`AutowaterError`] at port boundaries.

/// Base error shared by every crate in the workspace.
#[derive(Debug, thiserror::Error)]
pub enum AutowaterError {
    /// Input rejected by a domain invariant.
    #[error("validation error")]
    Validation(#[from] ValidationError),

    /// An adapter (bus, mail, …) failed to perform IO.
    #[error("transport error")]
    Transport(#[source] Box<dyn std::error::Error + Send + Sync>),
}

/// Domain invariant violations.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ValidationError {
    /// The reservoir bounds do not describe a non-empty interval.
    #[error("reservoir minimum {min} must be below maximum {max}")]
    EmptyRange { min: u32, max: u32 },

    /// The initial water level lies outside the reservoir bounds.
    #[error("water level {level} outside reservoir bounds [{min}, {max}]")]
    LevelOutOfRange { level: u32, min: u32, max: u32 },

    /// A schedule entry is not a valid `HH:MM` wall-clock time.
    #[error("invalid time of day {0:?}, expected HH:MM")]
    InvalidTime(String),

    /// A schedule was configured without any fire time.
    #[error("schedule must contain at least one time")]
    EmptySchedule,
}
