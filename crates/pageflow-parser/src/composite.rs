use std::sync::Arc;

use async_trait::async_trait;
use futures::future::try_join_all;
use pageflow_page::PageRef;
use tokio_util::sync::CancellationToken;

use crate::error::ParseError;
use crate::parser::PageParser;
use crate::progress::{ParseProgress, ProgressSink};

/// Concatenates the output of independent parsers.
///
/// No dependency reasoning happens across parsers; output is always in
/// parser order.
pub struct CompositeParser {
  parsers: Vec<Arc<dyn PageParser>>,
}

impl CompositeParser {
  pub fn new(parsers: Vec<Arc<dyn PageParser>>) -> Self {
    Self { parsers }
  }

  pub fn parsers(&self) -> &[Arc<dyn PageParser>] {
    &self.parsers
  }
}

#[async_trait]
impl PageParser for CompositeParser {
  fn name(&self) -> &str {
    "composite"
  }

  fn parse(&self) -> Result<Vec<PageRef>, ParseError> {
    let mut pages = Vec::new();
    for parser in &self.parsers {
      pages.extend(parser.parse()?);
    }
    Ok(pages)
  }

  async fn parse_async(&self, cancel: &CancellationToken) -> Result<Vec<PageRef>, ParseError> {
    if cancel.is_cancelled() {
      return Err(ParseError::Cancelled);
    }

    match self.parsers.as_slice() {
      [] => Ok(Vec::new()),
      [parser] => parser.parse_async(cancel).await,
      parsers => {
        let results = try_join_all(parsers.iter().map(|parser| parser.parse_async(cancel))).await?;
        Ok(results.into_iter().flatten().collect())
      }
    }
  }

  async fn parse_with_progress(
    &self,
    progress: &dyn ProgressSink,
    cancel: &CancellationToken,
  ) -> Result<Vec<PageRef>, ParseError> {
    if cancel.is_cancelled() {
      return Err(ParseError::Cancelled);
    }

    let total = self.parsers.len();
    let mut pages = Vec::new();
    for (index, parser) in self.parsers.iter().enumerate() {
      pages.extend(parser.parse_async(cancel).await?);

      let done = index + 1;
      progress.report(ParseProgress::new(
        done,
        total,
        format!("Composite: parsed [{}] ({done}/{total})", parser.name()),
      ));
    }
    Ok(pages)
  }
}
