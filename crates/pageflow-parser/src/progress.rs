//! Progress reporting.
//!
//! Progress is reported once per completed producer, in completion order.
//! Sinks are called from the task driving the parse (a Tokio worker for the
//! async shapes), never concurrently for the same parse. A sink that touches
//! state shared with other threads must synchronize it itself.

use pageflow_page::PageKind;
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;

/// A single progress update.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParseProgress {
  /// Fraction complete, in `[0.0, 1.0]`.
  pub progress: f32,
  /// Human-readable status.
  pub message: String,
  pub completed: usize,
  pub total: usize,
}

impl ParseProgress {
  pub fn new(completed: usize, total: usize, message: impl Into<String>) -> Self {
    let progress = if total == 0 {
      1.0
    } else {
      completed as f32 / total as f32
    };
    Self {
      progress,
      message: message.into(),
      completed,
      total,
    }
  }

  /// Progress after the page of `kind` was published.
  pub(crate) fn page(kind: &PageKind, completed: usize, total: usize) -> Self {
    Self::new(
      completed,
      total,
      format!("Parsed page {kind} ({completed}/{total})"),
    )
  }

  pub fn is_complete(&self) -> bool {
    self.completed >= self.total
  }
}

/// Receives progress updates.
pub trait ProgressSink: Send + Sync {
  fn report(&self, progress: ParseProgress);
}

impl<F> ProgressSink for F
where
  F: Fn(ParseProgress) + Send + Sync,
{
  fn report(&self, progress: ParseProgress) {
    self(progress)
  }
}

/// A sink that discards all updates.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoProgress;

impl ProgressSink for NoProgress {
  fn report(&self, _progress: ParseProgress) {}
}

/// A sink that forwards updates to an unbounded channel.
///
/// Updates are never dropped while the receiver is alive. Send errors after
/// the receiver is gone are ignored.
#[derive(Debug, Clone)]
pub struct ChannelProgress {
  sender: mpsc::UnboundedSender<ParseProgress>,
}

impl ChannelProgress {
  pub fn new(sender: mpsc::UnboundedSender<ParseProgress>) -> Self {
    Self { sender }
  }

  /// Create a sink and the receiver it feeds.
  pub fn channel() -> (Self, mpsc::UnboundedReceiver<ParseProgress>) {
    let (sender, receiver) = mpsc::unbounded_channel();
    (Self::new(sender), receiver)
  }
}

impl ProgressSink for ChannelProgress {
  fn report(&self, progress: ParseProgress) {
    let _ = self.sender.send(progress);
  }
}
