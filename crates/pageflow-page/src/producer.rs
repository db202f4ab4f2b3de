use std::sync::Arc;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use crate::context::Context;
use crate::error::ProduceError;
use crate::kind::PageKind;
use crate::page::PageRef;

/// Shared handle to a producer.
pub type ProducerRef = Arc<dyn Producer>;

/// A unit of work that yields exactly one page of a declared kind.
///
/// The context handed to a producer contains every kind listed in
/// [`Producer::dependencies`], fully published. A producer must not read
/// kinds it did not declare.
#[async_trait]
pub trait Producer: Send + Sync {
  /// The kind of page this producer yields.
  fn kind(&self) -> PageKind;

  /// Kinds that must be published before this producer runs.
  fn dependencies(&self) -> &[PageKind];

  /// Build the page synchronously.
  fn produce(&self, context: &Context) -> Result<PageRef, ProduceError>;

  /// Build the page asynchronously.
  ///
  /// Cancellation is advisory: implementations doing real async work should
  /// watch `cancel` and return [`ProduceError::Cancelled`].
  async fn produce_async(
    &self,
    context: &Context,
    cancel: &CancellationToken,
  ) -> Result<PageRef, ProduceError> {
    if cancel.is_cancelled() {
      return Err(ProduceError::Cancelled);
    }
    self.produce(context)
  }
}
