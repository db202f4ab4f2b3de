use pageflow_page::PageKind;
use pageflow_parser::ParseError;
use thiserror::Error;

/// Errors from the page lookup facade.
#[derive(Debug, Error)]
pub enum ConfigError {
  #[error("config is already initialized")]
  AlreadyInitialized,

  #[error("config is not initialized")]
  NotInitialized,

  #[error("page {kind} was not produced by parser {parser}")]
  NotFound { kind: PageKind, parser: String },

  /// The page stored under `kind` is not of the requested type.
  #[error("page {kind} is not a {expected}")]
  TypeMismatch {
    kind: PageKind,
    expected: &'static str,
  },

  #[error("failed to parse pages: {0}")]
  Parse(#[from] ParseError),
}
