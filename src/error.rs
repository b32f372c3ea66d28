use std::time::Duration;

use thiserror::Error;

use crate::view::status::ViewStatus;

pub type CompareResult<T> = Result<T, CompareError>;

#[derive(Debug, Error)]
pub enum CompareError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Payload(#[from] PayloadError),

    #[error(transparent)]
    View(#[from] ViewError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// User-correctable problems with the current selection.
///
/// The `Display` text is what the user sees in the notification.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Please select a comparison quote.")]
    NoCandidateSelected,

    #[error("Please select a different quote for comparison.")]
    SameAsSubject,
}

/// Errors produced while fetching a comparison payload from the backend.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    /// The backend rejected the call. Carries the user-facing message.
    #[error("{0}")]
    Backend(String),

    #[error("Comparison request timed out after {0:?}")]
    Timeout(Duration),

    #[error("Comparison request was cancelled")]
    Cancelled,
}

/// Errors related to decoding or validating a comparison payload.
#[derive(Debug, Error)]
pub enum PayloadError {
    #[error("Failed to decode comparison payload")]
    Json(#[from] serde_json::Error),

    #[error("Duplicate section key in section order: '{0}'")]
    DuplicateSectionKey(String),
}

/// Errors related to the comparison view lifecycle.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ViewError {
    #[error("Cannot {action} while the view is {from}")]
    InvalidTransition {
        from: ViewStatus,
        action: &'static str,
    },

    #[error("A comparison fetch is already in flight")]
    FetchInFlight,
}

/// Errors related to loading the comparator configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid time zone: '{0}'")]
    InvalidTimeZone(String),

    #[error("Invalid duration")]
    InvalidDuration(#[from] humantime::DurationError),

    #[error("Invalid configuration value: {0}")]
    InvalidValue(String),
}
