//! Level bookkeeping shared by every call shape.
//!
//! A level is the set of not-yet-run producers whose dependencies are all
//! published. Levels are taken from a ready queue that is refilled as pages
//! are committed, so finishing one producer can unlock producers at
//! different depths.

use std::collections::VecDeque;

use pageflow_page::{Context, PageKind, PageRef, ProducerRef};
use pageflow_resolver::DependencyGraph;
use tracing::debug;

use crate::error::ParseError;
use crate::progress::{ParseProgress, ProgressSink};

/// Producers of one level, with their node index.
pub(crate) type Level = Vec<(usize, ProducerRef)>;

pub(crate) struct LevelSchedule {
  run_id: String,
  order: Vec<ProducerRef>,
  graph: DependencyGraph,
  /// Unpublished dependencies per node.
  remaining: Vec<usize>,
  ready: VecDeque<usize>,
  context: Context,
  output: Vec<PageRef>,
  levels: usize,
}

impl LevelSchedule {
  pub(crate) fn new(run_id: String, order: Vec<ProducerRef>) -> Self {
    let graph = DependencyGraph::new(&order);
    let remaining = (0..graph.len()).map(|node| graph.in_degree(node)).collect();
    let ready = graph.roots().iter().copied().collect();

    Self {
      run_id,
      context: Context::with_capacity(order.len()),
      output: Vec::with_capacity(order.len()),
      order,
      graph,
      remaining,
      ready,
      levels: 0,
    }
  }

  /// Drain the ready queue into the next level.
  pub(crate) fn next_level(&mut self) -> Option<Level> {
    if self.ready.is_empty() {
      return None;
    }

    let level: Level = self
      .ready
      .drain(..)
      .map(|node| (node, self.order[node].clone()))
      .collect();
    self.levels += 1;

    debug!(
      run_id = %self.run_id,
      level = self.levels,
      producers = ?level.iter().map(|(node, _)| self.graph.kind(*node)).collect::<Vec<_>>(),
      join_points = level
        .iter()
        .filter(|(node, _)| self.graph.is_join_point(*node))
        .count(),
      "level_started"
    );

    Some(level)
  }

  /// Snapshot of everything published so far.
  pub(crate) fn context(&self) -> Context {
    self.context.clone()
  }

  /// Publish the page produced by `node`, unlock its dependents and report
  /// progress.
  pub(crate) fn commit(
    &mut self,
    node: usize,
    page: PageRef,
    progress: &dyn ProgressSink,
  ) -> Result<(), ParseError> {
    let expected = self.graph.kind(node);
    let actual = page.kind();
    if &actual != expected {
      return Err(ParseError::KindMismatch {
        expected: expected.clone(),
        actual,
      });
    }

    self
      .context
      .publish(page.clone())
      .map_err(|kind| ParseError::DuplicatePage { kind })?;
    self.output.push(page);

    for &dependent in self.graph.dependents(node) {
      self.remaining[dependent] -= 1;
      if self.remaining[dependent] == 0 {
        self.ready.push_back(dependent);
      }
    }

    let completed = self.output.len();
    let total = self.order.len();
    debug!(
      run_id = %self.run_id,
      kind = %expected,
      completed,
      total,
      "page_published"
    );
    progress.report(ParseProgress::page(expected, completed, total));

    Ok(())
  }

  /// Return the published pages in commit order.
  pub(crate) fn finish(self) -> Result<Vec<PageRef>, ParseError> {
    if self.output.len() < self.order.len() {
      let pending: Vec<PageKind> = (0..self.order.len())
        .filter(|&node| self.remaining[node] > 0)
        .map(|node| self.graph.kind(node).clone())
        .collect();
      return Err(ParseError::Stalled { pending });
    }
    Ok(self.output)
  }
}
