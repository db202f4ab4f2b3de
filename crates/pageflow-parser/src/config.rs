use serde::{Deserialize, Serialize};

/// Tuning for [`crate::DependencyAwareParser`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParserConfig {
  /// Run a level with a single producer directly instead of through the
  /// fan-out machinery.
  pub inline_single_levels: bool,
  /// Worker threads for the blocking call shape. `None` uses rayon's global
  /// pool.
  #[serde(skip_serializing_if = "Option::is_none")]
  pub blocking_threads: Option<usize>,
}

impl Default for ParserConfig {
  fn default() -> Self {
    Self {
      inline_single_levels: true,
      blocking_threads: None,
    }
  }
}
