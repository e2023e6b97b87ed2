//! Collaborator contracts for external data sources.
//!
//! The screening engine consumes two collaborators: a primary provider that
//! returns full snapshots (and the batch-level index value), and a secondary
//! scrape source that answers the ADR question and lists directors. Both are
//! object-safe traits returning boxed futures so orchestration can hold them
//! as `Arc<dyn _>` and tests can substitute deterministic doubles.
//!
//! Degradation rules: scrape failures never surface as errors — an ADR check
//! that fails is `Undetermined` and a directors fetch that fails is an empty
//! list. Only the snapshot fetch reports failure, and from the engine's
//! perspective "not found" and "source down" both mean "no snapshot".

use std::fmt::{Display, Formatter};
use std::future::Future;
use std::pin::Pin;

use crate::domain::{AdrVerdict, StockSnapshot, Ticker};

/// Source-level error classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceErrorKind {
    NotFound,
    Unavailable,
    InvalidRequest,
    Internal,
}

/// Structured source error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceError {
    kind: SourceErrorKind,
    message: String,
    retryable: bool,
}

impl SourceError {
    pub fn not_found(message: impl Into<String>) -> Self {
        Self {
            kind: SourceErrorKind::NotFound,
            message: message.into(),
            retryable: false,
        }
    }

    pub fn unavailable(message: impl Into<String>) -> Self {
        Self {
            kind: SourceErrorKind::Unavailable,
            message: message.into(),
            retryable: true,
        }
    }

    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self {
            kind: SourceErrorKind::InvalidRequest,
            message: message.into(),
            retryable: false,
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self {
            kind: SourceErrorKind::Internal,
            message: message.into(),
            retryable: false,
        }
    }

    pub const fn kind(&self) -> SourceErrorKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub const fn retryable(&self) -> bool {
        self.retryable
    }

    pub const fn code(&self) -> &'static str {
        match self.kind {
            SourceErrorKind::NotFound => "source.not_found",
            SourceErrorKind::Unavailable => "source.unavailable",
            SourceErrorKind::InvalidRequest => "source.invalid_request",
            SourceErrorKind::Internal => "source.internal",
        }
    }
}

impl Display for SourceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.message, self.code())
    }
}

impl std::error::Error for SourceError {}

/// Primary provider of full stock snapshots.
pub trait SnapshotSource: Send + Sync {
    /// Fetch the snapshot for one ticker.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError`] when the provider has no data for the ticker
    /// or cannot be reached. The engine treats both as "no snapshot".
    fn fetch_snapshot<'a>(
        &'a self,
        ticker: &'a Ticker,
    ) -> Pin<Box<dyn Future<Output = Result<StockSnapshot, SourceError>> + Send + 'a>>;

    /// Fetch the current volatility-index value, once per batch.
    ///
    /// Errors degrade to `None`.
    fn fetch_index_value<'a>(&'a self) -> Pin<Box<dyn Future<Output = Option<f64>> + Send + 'a>>;
}

/// Secondary scrape source for ADR status and directors.
pub trait ScrapeSource: Send + Sync {
    /// Determine whether the ticker is an ADR. Failures degrade to
    /// [`AdrVerdict::Undetermined`].
    fn check_adr<'a>(
        &'a self,
        ticker: &'a Ticker,
    ) -> Pin<Box<dyn Future<Output = AdrVerdict> + Send + 'a>>;

    /// Fetch up to `max` director names/titles. Failures degrade to an
    /// empty list.
    fn fetch_directors<'a>(
        &'a self,
        ticker: &'a Ticker,
        max: usize,
    ) -> Pin<Box<dyn Future<Output = Vec<String>> + Send + 'a>>;
}
