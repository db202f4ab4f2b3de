use std::sync::Arc;

use pageflow_page::PageRef;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::error::ParseError;
use crate::parser::PageParser;
use crate::progress::ProgressSink;

/// Start a progress-reporting parse without waiting for it.
///
/// The parse runs as a task on the current Tokio runtime. `progress` is
/// called zero or more times, then `on_parsed` exactly once with the outcome.
/// Both run on a runtime worker.
///
/// Outside a runtime nothing is spawned: `on_parsed` receives
/// [`ParseError::NoRuntime`] on the calling thread and `None` is returned.
/// The returned handle can be awaited, but does not need to be.
pub fn spawn_parse<P, S, F>(
  parser: Arc<P>,
  progress: S,
  on_parsed: F,
  cancel: CancellationToken,
) -> Option<JoinHandle<()>>
where
  P: PageParser + ?Sized + 'static,
  S: ProgressSink + 'static,
  F: FnOnce(Result<Vec<PageRef>, ParseError>) + Send + 'static,
{
  let handle = match Handle::try_current() {
    Ok(handle) => handle,
    Err(e) => {
      on_parsed(Err(ParseError::NoRuntime {
        message: e.to_string(),
      }));
      return None;
    }
  };

  Some(handle.spawn(async move {
    let result = parser.parse_with_progress(&progress, &cancel).await;
    on_parsed(result);
  }))
}
