//! Parse error types.

use pageflow_page::{BoxError, PageKind, ProduceError};
use pageflow_resolver::ResolveError;
use thiserror::Error;

/// Errors that can occur while parsing pages.
#[derive(Debug, Error)]
pub enum ParseError {
  /// The parser was misconfigured by its caller.
  #[error("invalid argument: {message}")]
  InvalidArgument { message: String },

  /// The producer set is structurally invalid. No producer was run.
  #[error(transparent)]
  Resolve(#[from] ResolveError),

  /// A producer failed. `source` is the producer's own error.
  #[error("producer for {kind} failed: {source}")]
  Producer {
    kind: PageKind,
    #[source]
    source: BoxError,
  },

  /// A producer panicked.
  #[error("producer for {kind} panicked")]
  Panicked { kind: PageKind },

  /// A producer returned a page of a different kind than it declared.
  #[error("producer for {expected} returned a page of kind {actual}")]
  KindMismatch { expected: PageKind, actual: PageKind },

  /// A kind was published twice.
  #[error("page {kind} was already published")]
  DuplicatePage { kind: PageKind },

  /// Producers whose dependencies were never published.
  ///
  /// Only reachable with a resolver that returns an incomplete order.
  #[error("producers never became ready: {pending:?}")]
  Stalled { pending: Vec<PageKind> },

  /// Parsing was cancelled.
  #[error("parse cancelled")]
  Cancelled,

  /// A background parse was requested outside a Tokio runtime.
  #[error("no Tokio runtime: {message}")]
  NoRuntime { message: String },

  /// A spawned producer task could not be joined.
  #[error("task join error: {message}")]
  Join { message: String },

  /// The dedicated blocking thread pool could not be created.
  #[error("failed to build blocking thread pool: {0}")]
  ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

impl ParseError {
  pub fn invalid_argument(message: impl Into<String>) -> Self {
    Self::InvalidArgument {
      message: message.into(),
    }
  }

  /// Map a producer's error for the producer of `kind`.
  pub(crate) fn from_produce(kind: PageKind, error: ProduceError) -> Self {
    match error {
      ProduceError::Cancelled => Self::Cancelled,
      ProduceError::Failed(source) => Self::Producer { kind, source },
      other => Self::Producer {
        kind,
        source: Box::new(other),
      },
    }
  }

  pub fn is_cancelled(&self) -> bool {
    matches!(self, Self::Cancelled)
  }
}
