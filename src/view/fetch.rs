use std::{fmt, future::Future, sync::Arc, time::Duration};

use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::{
    error::FetchError,
    payload::ComparisonPayload,
    record::RecordId,
};

// ================================================================================================
// Backend Capabilities
// ================================================================================================

/// Structured error body returned by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ErrorBody {
    pub message: String,
}

/// A failed backend call.
///
/// `body` is set when the backend answered with a structured error; its
/// message takes precedence over the generic transport message.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FetchFailure {
    pub message: String,
    #[serde(default)]
    pub body: Option<ErrorBody>,
}

impl FetchFailure {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            body: None,
        }
    }

    pub fn with_body(message: impl Into<String>, body_message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            body: Some(ErrorBody {
                message: body_message.into(),
            }),
        }
    }

    /// The message to show the user.
    pub fn user_message(&self) -> &str {
        self.body
            .as_ref()
            .map(|b| b.message.as_str())
            .unwrap_or(&self.message)
    }
}

impl fmt::Display for FetchFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.user_message())
    }
}

impl From<FetchFailure> for FetchError {
    fn from(failure: FetchFailure) -> Self {
        FetchError::Backend(failure.user_message().to_string())
    }
}

/// Backend capability producing the comparison of two records.
pub trait ComparisonFetcher: Send + Sync + 'static {
    fn fetch_comparison(
        &self,
        subject: &RecordId,
        candidate: &RecordId,
    ) -> impl Future<Output = Result<ComparisonPayload, FetchFailure>> + Send;
}

// ================================================================================================
// Fetch Session
// ================================================================================================

/// Identifies one comparison attempt. A completion only applies when its
/// session is still the active one.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
pub struct SessionId(pub u64);
crate::impl_from_primitive!(SessionId, u64);

impl SessionId {
    pub(crate) fn next(self) -> Self {
        Self(self.0.wrapping_add(1))
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A fetch the controller has committed to but not yet awaited.
///
/// Produced by [`super::controller::ComparisonController::begin_compare`]. It
/// owns everything it needs so it can be awaited inline or spawned onto a
/// runtime.
#[derive(Debug)]
pub struct PendingFetch<F> {
    session: SessionId,
    subject: RecordId,
    candidate: RecordId,
    cancel: CancellationToken,
    fetcher: Arc<F>,
    timeout: Duration,
}

impl<F: ComparisonFetcher> PendingFetch<F> {
    pub(crate) fn new(
        session: SessionId,
        subject: RecordId,
        candidate: RecordId,
        cancel: CancellationToken,
        fetcher: Arc<F>,
        timeout: Duration,
    ) -> Self {
        Self {
            session,
            subject,
            candidate,
            cancel,
            fetcher,
            timeout,
        }
    }

    pub fn session(&self) -> SessionId {
        self.session
    }

    /// Awaits the backend, bounded by the timeout and the session's
    /// cancellation token.
    #[tracing::instrument(
        skip(self),
        fields(session = %self.session, subject = %self.subject, candidate = %self.candidate)
    )]
    pub async fn run(self) -> FetchCompletion {
        let Self {
            session,
            subject,
            candidate,
            cancel,
            fetcher,
            timeout,
        } = self;

        info!("Fetching comparison");
        let fetch = tokio::time::timeout(timeout, fetcher.fetch_comparison(&subject, &candidate));

        let outcome = tokio::select! {
            biased;
            _ = cancel.cancelled() => Err(FetchError::Cancelled),
            res = fetch => match res {
                Ok(Ok(payload)) => Ok(payload),
                Ok(Err(failure)) => Err(FetchError::from(failure)),
                Err(_) => Err(FetchError::Timeout(timeout)),
            },
        };

        if let Err(e) = &outcome {
            warn!(error = %e, "Comparison fetch failed");
        }

        FetchCompletion { session, outcome }
    }
}

/// Result of a [`PendingFetch`], tagged with the session it belongs to.
#[derive(Debug, Clone, PartialEq)]
pub struct FetchCompletion {
    pub(crate) session: SessionId,
    pub(crate) outcome: Result<ComparisonPayload, FetchError>,
}

impl FetchCompletion {
    pub fn session(&self) -> SessionId {
        self.session
    }

    pub fn outcome(&self) -> &Result<ComparisonPayload, FetchError> {
        &self.outcome
    }
}
