use std::collections::HashMap;
use std::sync::Arc;

use pageflow_page::{PageKind, PageRef, TypedPage};
use pageflow_parser::{NoProgress, PageParser, ProgressSink};
use tokio_util::sync::CancellationToken;
use tracing::info;

use crate::error::ConfigError;

/// Pages produced by a single parser run, looked up by kind.
///
/// A config is initialized exactly once, with any of the parser's call
/// shapes. It stays uninitialized if that run fails.
pub struct Config {
  parser: Arc<dyn PageParser>,
  pages: Option<HashMap<PageKind, PageRef>>,
}

impl Config {
  pub fn new(parser: Arc<dyn PageParser>) -> Self {
    Self {
      parser,
      pages: None,
    }
  }

  pub fn is_initialized(&self) -> bool {
    self.pages.is_some()
  }

  /// Parse pages on the calling thread.
  pub fn initialize(&mut self) -> Result<(), ConfigError> {
    self.ensure_uninitialized()?;
    let pages = self.parser.parse()?;
    self.install(pages);
    Ok(())
  }

  pub async fn initialize_async(&mut self, cancel: &CancellationToken) -> Result<(), ConfigError> {
    self.initialize_with_progress(&NoProgress, cancel).await
  }

  pub async fn initialize_with_progress(
    &mut self,
    progress: &dyn ProgressSink,
    cancel: &CancellationToken,
  ) -> Result<(), ConfigError> {
    self.ensure_uninitialized()?;
    let pages = self.parser.parse_with_progress(progress, cancel).await?;
    self.install(pages);
    Ok(())
  }

  /// Look up the page of type `T`.
  pub fn page<T: TypedPage>(&self) -> Result<&T, ConfigError> {
    let page = self.get(&T::KIND)?;
    page
      .downcast_ref::<T>()
      .ok_or_else(|| ConfigError::TypeMismatch {
        kind: T::KIND,
        expected: std::any::type_name::<T>(),
      })
  }

  pub fn get(&self, kind: &PageKind) -> Result<&PageRef, ConfigError> {
    let pages = self.pages.as_ref().ok_or(ConfigError::NotInitialized)?;
    pages.get(kind).ok_or_else(|| ConfigError::NotFound {
      kind: kind.clone(),
      parser: self.parser.name().to_string(),
    })
  }

  /// Kinds available for lookup. Empty until initialized.
  pub fn kinds(&self) -> impl Iterator<Item = &PageKind> {
    self.pages.iter().flat_map(|pages| pages.keys())
  }

  fn ensure_uninitialized(&self) -> Result<(), ConfigError> {
    if self.is_initialized() {
      return Err(ConfigError::AlreadyInitialized);
    }
    Ok(())
  }

  fn install(&mut self, pages: Vec<PageRef>) {
    // A later page of the same kind replaces an earlier one.
    let pages: HashMap<PageKind, PageRef> =
      pages.into_iter().map(|page| (page.kind(), page)).collect();

    info!(
      parser = self.parser.name(),
      pages = pages.len(),
      "config_initialized"
    );
    self.pages = Some(pages);
  }
}
