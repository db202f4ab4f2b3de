use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use async_trait::async_trait;
use futures::FutureExt;
use pageflow_page::{Context, PageRef, Producer, ProducerRef};
use pageflow_resolver::{DependencyResolver, Resolver};
use rayon::prelude::*;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, instrument, warn};

use crate::config::ParserConfig;
use crate::error::ParseError;
use crate::parser::PageParser;
use crate::progress::{NoProgress, ProgressSink};
use crate::schedule::{Level, LevelSchedule};

/// Runs producers in dependency levels.
///
/// Producers are ordered by the resolver, then executed level by level: every
/// producer whose dependencies are published runs concurrently with the rest
/// of its level, and the next level starts only after the whole level has
/// joined. Pages are published into a shared [`Context`] as they complete.
///
/// A run is all-or-nothing. The first failure aborts the run and no partial
/// output is returned.
#[derive(Clone)]
pub struct DependencyAwareParser {
  producers: Arc<[ProducerRef]>,
  resolver: Arc<dyn Resolver>,
  config: ParserConfig,
  pool: Option<Arc<rayon::ThreadPool>>,
}

impl DependencyAwareParser {
  /// Create a parser with the default configuration.
  pub fn new(producers: Vec<ProducerRef>, resolver: impl Resolver + 'static) -> Self {
    Self {
      producers: producers.into(),
      resolver: Arc::new(resolver),
      config: ParserConfig::default(),
      pool: None,
    }
  }

  pub fn builder() -> DependencyAwareParserBuilder {
    DependencyAwareParserBuilder::default()
  }

  pub fn producers(&self) -> &[ProducerRef] {
    &self.producers
  }

  pub fn config(&self) -> &ParserConfig {
    &self.config
  }

  /// Order the producers without running them.
  pub fn resolve(&self) -> Result<Vec<ProducerRef>, ParseError> {
    Ok(self.resolver.resolve(&self.producers)?)
  }

  #[instrument(
    name = "dependency_parse",
    skip(self),
    fields(producers = self.producers.len())
  )]
  fn execute_blocking(&self) -> Result<Vec<PageRef>, ParseError> {
    let run_id = uuid::Uuid::new_v4().to_string();
    info!(run_id = %run_id, mode = "blocking", "parse_started");

    let result = self.run_blocking(&run_id);
    log_outcome(&run_id, &result);
    result
  }

  #[instrument(
    name = "dependency_parse_async",
    skip(self, progress, cancel),
    fields(producers = self.producers.len())
  )]
  async fn execute(
    &self,
    progress: &dyn ProgressSink,
    cancel: &CancellationToken,
  ) -> Result<Vec<PageRef>, ParseError> {
    let run_id = uuid::Uuid::new_v4().to_string();
    info!(run_id = %run_id, mode = "async", "parse_started");

    let result = self.run_async(&run_id, progress, cancel).await;
    log_outcome(&run_id, &result);
    result
  }

  fn run_blocking(&self, run_id: &str) -> Result<Vec<PageRef>, ParseError> {
    let order = self.resolve()?;
    let mut schedule = LevelSchedule::new(run_id.to_string(), order);

    while let Some(level) = schedule.next_level() {
      let context = schedule.context();
      let pages = if level.len() == 1 && self.config.inline_single_levels {
        let (node, producer) = &level[0];
        vec![(*node, produce_blocking(producer, &context)?)]
      } else {
        self.fan_out_blocking(&level, &context)?
      };

      for (node, page) in pages {
        schedule.commit(node, page, &NoProgress)?;
      }
    }

    schedule.finish()
  }

  fn fan_out_blocking(
    &self,
    level: &Level,
    context: &Context,
  ) -> Result<Vec<(usize, PageRef)>, ParseError> {
    let run = || {
      level
        .par_iter()
        .map(|(node, producer)| produce_blocking(producer, context).map(|page| (*node, page)))
        .collect::<Result<Vec<_>, ParseError>>()
    };

    match &self.pool {
      Some(pool) => pool.install(run),
      None => run(),
    }
  }

  async fn run_async(
    &self,
    run_id: &str,
    progress: &dyn ProgressSink,
    cancel: &CancellationToken,
  ) -> Result<Vec<PageRef>, ParseError> {
    if cancel.is_cancelled() {
      return Err(ParseError::Cancelled);
    }

    let order = self.resolve()?;
    let mut schedule = LevelSchedule::new(run_id.to_string(), order);

    loop {
      if cancel.is_cancelled() {
        return Err(ParseError::Cancelled);
      }

      let Some(level) = schedule.next_level() else {
        break;
      };
      let context = schedule.context();

      if level.len() == 1 && self.config.inline_single_levels {
        let (node, producer) = &level[0];
        let page = produce_async(producer.clone(), context, cancel.clone()).await?;
        schedule.commit(*node, page, progress)?;
        continue;
      }

      let mut tasks = JoinSet::new();
      for (node, producer) in level {
        let context = context.clone();
        let cancel = cancel.clone();
        tasks.spawn(async move { (node, produce_async(producer, context, cancel).await) });
      }

      // Dropping `tasks` on an early return aborts the rest of the level.
      let mut cancelled = false;
      while let Some(joined) = tasks.join_next().await {
        let (node, result) = joined.map_err(|e| ParseError::Join {
          message: e.to_string(),
        })?;

        match result {
          Ok(page) => schedule.commit(node, page, progress)?,
          Err(ParseError::Cancelled) => cancelled = true,
          Err(e) => return Err(e),
        }
      }

      if cancelled {
        return Err(ParseError::Cancelled);
      }
    }

    schedule.finish()
  }
}

#[async_trait]
impl PageParser for DependencyAwareParser {
  fn name(&self) -> &str {
    "dependency-aware"
  }

  fn parse(&self) -> Result<Vec<PageRef>, ParseError> {
    self.execute_blocking()
  }

  async fn parse_async(&self, cancel: &CancellationToken) -> Result<Vec<PageRef>, ParseError> {
    self.execute(&NoProgress, cancel).await
  }

  async fn parse_with_progress(
    &self,
    progress: &dyn ProgressSink,
    cancel: &CancellationToken,
  ) -> Result<Vec<PageRef>, ParseError> {
    self.execute(progress, cancel).await
  }
}

/// Builder for [`DependencyAwareParser`].
#[derive(Default)]
pub struct DependencyAwareParserBuilder {
  producers: Option<Vec<ProducerRef>>,
  resolver: Option<Arc<dyn Resolver>>,
  config: ParserConfig,
}

impl DependencyAwareParserBuilder {
  /// Add a collection of producers. May be called more than once.
  pub fn producers(mut self, producers: impl IntoIterator<Item = ProducerRef>) -> Self {
    self
      .producers
      .get_or_insert_with(Vec::new)
      .extend(producers);
    self
  }

  pub fn producer(mut self, producer: impl Producer + 'static) -> Self {
    self
      .producers
      .get_or_insert_with(Vec::new)
      .push(Arc::new(producer));
    self
  }

  /// Defaults to [`DependencyResolver`].
  pub fn resolver(mut self, resolver: impl Resolver + 'static) -> Self {
    self.resolver = Some(Arc::new(resolver));
    self
  }

  pub fn config(mut self, config: ParserConfig) -> Self {
    self.config = config;
    self
  }

  pub fn build(self) -> Result<DependencyAwareParser, ParseError> {
    let producers = self
      .producers
      .ok_or_else(|| ParseError::invalid_argument("no producers supplied"))?;

    let pool = match self.config.blocking_threads {
      None => None,
      Some(0) => {
        return Err(ParseError::invalid_argument(
          "blocking_threads must be greater than zero",
        ));
      }
      Some(threads) => Some(Arc::new(
        rayon::ThreadPoolBuilder::new()
          .num_threads(threads)
          .thread_name(|index| format!("pageflow-blocking-{index}"))
          .build()?,
      )),
    };

    Ok(DependencyAwareParser {
      producers: producers.into(),
      resolver: self
        .resolver
        .unwrap_or_else(|| Arc::new(DependencyResolver::new())),
      config: self.config,
      pool,
    })
  }
}

fn produce_blocking(producer: &ProducerRef, context: &Context) -> Result<PageRef, ParseError> {
  let kind = producer.kind();
  match panic::catch_unwind(AssertUnwindSafe(|| producer.produce(context))) {
    Ok(result) => result.map_err(|e| ParseError::from_produce(kind, e)),
    Err(_) => Err(ParseError::Panicked { kind }),
  }
}

async fn produce_async(
  producer: ProducerRef,
  context: Context,
  cancel: CancellationToken,
) -> Result<PageRef, ParseError> {
  let kind = producer.kind();
  match AssertUnwindSafe(producer.produce_async(&context, &cancel))
    .catch_unwind()
    .await
  {
    Ok(result) => result.map_err(|e| ParseError::from_produce(kind, e)),
    Err(_) => Err(ParseError::Panicked { kind }),
  }
}

fn log_outcome(run_id: &str, result: &Result<Vec<PageRef>, ParseError>) {
  match result {
    Ok(pages) => {
      info!(run_id = %run_id, pages = pages.len(), "parse_completed");
    }
    Err(ParseError::Cancelled) => {
      warn!(run_id = %run_id, "parse_cancelled");
    }
    Err(e) => {
      error!(run_id = %run_id, error = %e, "parse_failed");
    }
  }
}
