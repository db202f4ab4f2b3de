use pageflow_page::PageKind;
use thiserror::Error;

/// Errors that can occur while ordering producers.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveError {
  /// Two producers declare the same kind.
  #[error("duplicate producer for {kind}")]
  DuplicateProducer { kind: PageKind },

  /// A producer depends on a kind no producer yields.
  #[error("missing dependency {kind} required by {required_by}")]
  MissingDependency {
    kind: PageKind,
    required_by: PageKind,
  },

  /// A dependency path re-entered a producer already on the path.
  #[error("circular dependency at {kind}")]
  Cycle { kind: PageKind },
}

impl ResolveError {
  /// The kind the error is about.
  pub fn kind(&self) -> &PageKind {
    match self {
      Self::DuplicateProducer { kind } => kind,
      Self::MissingDependency { kind, .. } => kind,
      Self::Cycle { kind } => kind,
    }
  }
}
