//! Producer error types.

use thiserror::Error;

use crate::kind::PageKind;

/// Boxed error returned by producer implementations.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors a producer can return.
#[derive(Debug, Error)]
pub enum ProduceError {
  /// The producer observed the cancellation token and stopped.
  #[error("production cancelled")]
  Cancelled,

  /// A page the producer needs is not in its context.
  #[error("dependency page {kind} is not available")]
  MissingInput { kind: PageKind },

  /// A page in the context has a different concrete type than expected.
  #[error("dependency page {kind} has an unexpected type")]
  InputMismatch { kind: PageKind },

  /// Any other failure. The wrapped error is handed to the caller unchanged.
  #[error("{0}")]
  Failed(#[source] BoxError),
}

impl ProduceError {
  /// Wrap an arbitrary error.
  pub fn failed(error: impl Into<BoxError>) -> Self {
    Self::Failed(error.into())
  }
}
