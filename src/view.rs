//! Async state machine behind the comparison view.
//!
//! [`ComparisonController`] owns the view state and performs every
//! transition. [`ViewDriver`] wraps it in a tokio event loop for hosts that
//! prefer to push [`UserEvent`]s over a channel.

pub mod controller;
pub mod driver;
pub mod fetch;
pub mod model;
pub mod signal;
pub mod status;
pub mod subject;

pub use controller::ComparisonController;
pub use driver::{UserEvent, ViewDriver};
pub use fetch::{
    ComparisonFetcher, ErrorBody, FetchCompletion, FetchFailure, PendingFetch, SessionId,
};
pub use model::ComparisonView;
pub use signal::{NoopSink, Notification, NotificationSink, Severity, ViewSignal};
pub use status::ViewStatus;
pub use subject::{SUBJECT_FIELDS, SubjectLookup, SubjectSummary};
