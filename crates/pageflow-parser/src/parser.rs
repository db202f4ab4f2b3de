use async_trait::async_trait;
use pageflow_page::PageRef;
use tokio_util::sync::CancellationToken;

use crate::error::ParseError;
use crate::progress::ProgressSink;

/// A source of pages.
///
/// Every parser offers the same operation in several call shapes: blocking
/// ([`PageParser::parse`]), awaitable ([`PageParser::parse_async`]) and
/// progress-reporting ([`PageParser::parse_with_progress`]). The callback
/// shape is [`crate::spawn_parse`], which works for any parser.
#[async_trait]
pub trait PageParser: Send + Sync {
  /// Short name used in progress messages and logs.
  fn name(&self) -> &str;

  /// Parse all pages, blocking the calling thread.
  fn parse(&self) -> Result<Vec<PageRef>, ParseError>;

  /// Parse all pages.
  ///
  /// Fails with [`ParseError::Cancelled`] without doing any work if `cancel`
  /// is already cancelled.
  async fn parse_async(&self, cancel: &CancellationToken) -> Result<Vec<PageRef>, ParseError>;

  /// Parse all pages, reporting progress as work completes.
  ///
  /// The default implementation reports nothing.
  async fn parse_with_progress(
    &self,
    progress: &dyn ProgressSink,
    cancel: &CancellationToken,
  ) -> Result<Vec<PageRef>, ParseError> {
    let _ = progress;
    self.parse_async(cancel).await
  }
}
