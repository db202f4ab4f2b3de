//! Fake producers shared by the parser integration tests.

#![allow(dead_code)]

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::{Duration, Instant};

use async_trait::async_trait;
use pageflow_page::{Context, Page, PageKind, PageRef, ProduceError, Producer, ProducerRef};
use tokio::sync::Barrier;
use tokio_util::sync::CancellationToken;

/// Upper bound for any wait in a test producer.
pub const WAIT_LIMIT: Duration = Duration::from_secs(5);

/// Page produced by [`TestProducer`]. Records which kinds were in the
/// context when it was produced.
#[derive(Debug)]
pub struct TestPage {
  pub kind: PageKind,
  pub seen: Vec<PageKind>,
}

impl Page for TestPage {
  fn kind(&self) -> PageKind {
    self.kind.clone()
  }
}

#[derive(Debug, thiserror::Error)]
#[error("{0}")]
pub struct TestFailure(pub &'static str);

/// Blocking rendezvous: every party waits until all have arrived.
#[derive(Debug)]
pub struct Rendezvous {
  parties: usize,
  arrived: AtomicUsize,
}

impl Rendezvous {
  pub fn new(parties: usize) -> Arc<Self> {
    Arc::new(Self {
      parties,
      arrived: AtomicUsize::new(0),
    })
  }

  /// Returns false if the other parties did not arrive in time.
  pub fn wait(&self) -> bool {
    self.arrived.fetch_add(1, Ordering::SeqCst);
    let deadline = Instant::now() + WAIT_LIMIT;
    while self.arrived.load(Ordering::SeqCst) < self.parties {
      if Instant::now() > deadline {
        return false;
      }
      std::thread::sleep(Duration::from_millis(1));
    }
    true
  }
}

pub enum Behavior {
  Succeed,
  Fail(&'static str),
  Panic,
  /// Return a page of another kind.
  WrongKind(&'static str),
  /// Report cancellation without waiting for the token.
  ReportCancelled,
  /// Wait on a blocking rendezvous before producing.
  Rendezvous(Arc<Rendezvous>),
  /// Wait on an async barrier before producing.
  Barrier(Arc<Barrier>),
  /// Wait until the token is cancelled, then report cancellation.
  WaitForCancel,
  /// Cancel the given token, then succeed anyway.
  Cancel(CancellationToken),
  /// Succeed without ever looking at the token.
  IgnoreCancel,
}

pub struct TestProducer {
  kind: PageKind,
  dependencies: Vec<PageKind>,
  behavior: Behavior,
  calls: Arc<AtomicUsize>,
}

impl TestProducer {
  pub fn new(kind: &'static str) -> Self {
    Self {
      kind: PageKind::new(kind),
      dependencies: Vec::new(),
      behavior: Behavior::Succeed,
      calls: Arc::new(AtomicUsize::new(0)),
    }
  }

  pub fn after(mut self, dependencies: &[&'static str]) -> Self {
    self.dependencies = dependencies.iter().copied().map(PageKind::new).collect();
    self
  }

  pub fn with(mut self, behavior: Behavior) -> Self {
    self.behavior = behavior;
    self
  }

  /// Invocation counter, shared with the producer.
  pub fn calls(&self) -> Arc<AtomicUsize> {
    self.calls.clone()
  }

  pub fn into_ref(self) -> ProducerRef {
    Arc::new(self)
  }

  fn page(&self, context: &Context) -> PageRef {
    let mut seen: Vec<PageKind> = context.kinds().cloned().collect();
    seen.sort();
    Arc::new(TestPage {
      kind: self.kind.clone(),
      seen,
    })
  }

  fn check_inputs(&self, context: &Context) -> Result<(), ProduceError> {
    for dependency in &self.dependencies {
      if !context.contains(dependency) {
        return Err(ProduceError::MissingInput {
          kind: dependency.clone(),
        });
      }
    }
    Ok(())
  }
}

#[async_trait]
impl Producer for TestProducer {
  fn kind(&self) -> PageKind {
    self.kind.clone()
  }

  fn dependencies(&self) -> &[PageKind] {
    &self.dependencies
  }

  fn produce(&self, context: &Context) -> Result<PageRef, ProduceError> {
    self.calls.fetch_add(1, Ordering::SeqCst);
    self.check_inputs(context)?;

    match &self.behavior {
      Behavior::Fail(message) => Err(ProduceError::failed(TestFailure(*message))),
      Behavior::Panic => panic!("producer {} exploded", self.kind),
      Behavior::WrongKind(kind) => Ok(Arc::new(TestPage {
        kind: PageKind::new(*kind),
        seen: Vec::new(),
      })),
      Behavior::ReportCancelled | Behavior::WaitForCancel => Err(ProduceError::Cancelled),
      Behavior::Rendezvous(rendezvous) => {
        if rendezvous.wait() {
          Ok(self.page(context))
        } else {
          Err(ProduceError::failed(TestFailure("rendezvous timed out")))
        }
      }
      Behavior::Cancel(token) => {
        token.cancel();
        Ok(self.page(context))
      }
      Behavior::Succeed | Behavior::Barrier(_) | Behavior::IgnoreCancel => Ok(self.page(context)),
    }
  }

  async fn produce_async(
    &self,
    context: &Context,
    cancel: &CancellationToken,
  ) -> Result<PageRef, ProduceError> {
    match &self.behavior {
      Behavior::Barrier(barrier) => {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.check_inputs(context)?;
        tokio::time::timeout(WAIT_LIMIT, barrier.wait())
          .await
          .map_err(|_| ProduceError::failed(TestFailure("barrier timed out")))?;
        Ok(self.page(context))
      }
      Behavior::WaitForCancel => {
        self.calls.fetch_add(1, Ordering::SeqCst);
        tokio::time::timeout(WAIT_LIMIT, cancel.cancelled())
          .await
          .map_err(|_| ProduceError::failed(TestFailure("never cancelled")))?;
        Err(ProduceError::Cancelled)
      }
      Behavior::Cancel(_) | Behavior::IgnoreCancel => self.produce(context),
      _ => {
        if cancel.is_cancelled() {
          return Err(ProduceError::Cancelled);
        }
        self.produce(context)
      }
    }
  }
}

/// Kind names of `pages`, in output order.
pub fn kinds(pages: &[PageRef]) -> Vec<String> {
  pages.iter().map(|page| page.kind().to_string()).collect()
}

pub fn position(pages: &[PageRef], kind: &str) -> usize {
  pages
    .iter()
    .position(|page| page.kind().name() == kind)
    .unwrap_or_else(|| panic!("no page of kind {kind}"))
}

/// Kinds visible to the producer of `kind` when it ran.
pub fn seen_by(pages: &[PageRef], kind: &str) -> Vec<String> {
  let page = &pages[position(pages, kind)];
  let page = page
    .downcast_ref::<TestPage>()
    .unwrap_or_else(|| panic!("page {kind} is not a TestPage"));
  page.seen.iter().map(|kind| kind.to_string()).collect()
}

pub fn count(calls: &AtomicUsize) -> usize {
  calls.load(Ordering::SeqCst)
}
