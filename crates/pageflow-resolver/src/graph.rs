use std::collections::{HashMap, HashSet};

use pageflow_page::{PageKind, ProducerRef};

/// Index over a resolved order for scheduling.
///
/// Nodes are positions in the order the graph was built from.
#[derive(Debug, Clone)]
pub struct DependencyGraph {
  /// Kind produced by each node.
  kinds: Vec<PageKind>,
  /// Downstream nodes: node -> nodes that depend on it, in order position.
  dependents: Vec<Vec<usize>>,
  /// Number of distinct kinds each node depends on.
  in_degree: Vec<usize>,
  /// Nodes with no dependencies.
  roots: Vec<usize>,
  /// Nodes with more than one dependency.
  join_points: HashSet<usize>,
}

impl DependencyGraph {
  /// Build the graph for a resolved order.
  ///
  /// A dependency on a kind absent from `order` still counts toward the
  /// node's in-degree, so that node can never become ready.
  pub fn new(order: &[ProducerRef]) -> Self {
    let kinds: Vec<PageKind> = order.iter().map(|p| p.kind()).collect();
    let index: HashMap<&PageKind, usize> = kinds.iter().enumerate().map(|(i, k)| (k, i)).collect();

    let mut dependents = vec![Vec::new(); order.len()];
    let mut in_degree = Vec::with_capacity(order.len());

    for (node, producer) in order.iter().enumerate() {
      let distinct: HashSet<&PageKind> = producer.dependencies().iter().collect();
      in_degree.push(distinct.len());

      // Nodes are visited in order, so every dependents list stays sorted.
      for dependency in distinct {
        if let Some(&upstream) = index.get(dependency) {
          dependents[upstream].push(node);
        }
      }
    }

    let roots = (0..order.len()).filter(|&n| in_degree[n] == 0).collect();
    let join_points = (0..order.len()).filter(|&n| in_degree[n] > 1).collect();

    Self {
      kinds,
      dependents,
      in_degree,
      roots,
      join_points,
    }
  }

  pub fn len(&self) -> usize {
    self.kinds.len()
  }

  pub fn is_empty(&self) -> bool {
    self.kinds.is_empty()
  }

  /// Kind produced by a node.
  pub fn kind(&self, node: usize) -> &PageKind {
    &self.kinds[node]
  }

  /// Nodes with no dependencies, in order position.
  pub fn roots(&self) -> &[usize] {
    &self.roots
  }

  /// Nodes that depend on `node`.
  pub fn dependents(&self, node: usize) -> &[usize] {
    &self.dependents[node]
  }

  /// Number of distinct kinds `node` depends on.
  pub fn in_degree(&self, node: usize) -> usize {
    self.in_degree[node]
  }

  /// Check if a node waits on more than one dependency.
  pub fn is_join_point(&self, node: usize) -> bool {
    self.join_points.contains(&node)
  }
}
