use std::collections::{HashMap, HashSet};

use pageflow_page::{PageKind, ProducerRef};
use tracing::debug;

use crate::error::ResolveError;

/// Orders producers so that dependencies come first.
pub trait Resolver: Send + Sync {
  /// Return every producer in an order that satisfies all declared
  /// dependencies, or the structural error that prevents one.
  fn resolve(&self, producers: &[ProducerRef]) -> Result<Vec<ProducerRef>, ResolveError>;
}

/// Depth-first resolver.
///
/// Producers are visited in input order and each one's dependencies are
/// emitted before it, so producers with no ordering constraint between them
/// keep their input order.
#[derive(Debug, Default, Clone, Copy)]
pub struct DependencyResolver;

impl DependencyResolver {
  pub fn new() -> Self {
    Self
  }
}

impl Resolver for DependencyResolver {
  fn resolve(&self, producers: &[ProducerRef]) -> Result<Vec<ProducerRef>, ResolveError> {
    let mut by_kind: HashMap<PageKind, &ProducerRef> = HashMap::with_capacity(producers.len());
    for producer in producers {
      let kind = producer.kind();
      if by_kind.contains_key(&kind) {
        return Err(ResolveError::DuplicateProducer { kind });
      }
      by_kind.insert(kind, producer);
    }

    let mut order = Vec::with_capacity(producers.len());
    let mut visited = HashSet::with_capacity(producers.len());
    let mut on_stack = HashSet::new();

    for producer in producers {
      visit(producer, &by_kind, &mut visited, &mut on_stack, &mut order)?;
    }

    debug!(
      order = ?order.iter().map(|p| p.kind()).collect::<Vec<_>>(),
      "producers resolved"
    );

    Ok(order)
  }
}

fn visit(
  producer: &ProducerRef,
  by_kind: &HashMap<PageKind, &ProducerRef>,
  visited: &mut HashSet<PageKind>,
  on_stack: &mut HashSet<PageKind>,
  order: &mut Vec<ProducerRef>,
) -> Result<(), ResolveError> {
  let kind = producer.kind();
  if visited.contains(&kind) {
    return Ok(());
  }

  // Re-entering a node that is still on the current path is a cycle.
  if !on_stack.insert(kind.clone()) {
    return Err(ResolveError::Cycle { kind });
  }

  for dependency in producer.dependencies() {
    let owner = by_kind
      .get(dependency)
      .ok_or_else(|| ResolveError::MissingDependency {
        kind: dependency.clone(),
        required_by: kind.clone(),
      })?;
    visit(owner, by_kind, visited, on_stack, order)?;
  }

  on_stack.remove(&kind);
  visited.insert(kind);
  order.push(producer.clone());
  Ok(())
}
