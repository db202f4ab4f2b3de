//! Read-only view of already-produced pages.

use std::collections::HashMap;
use std::sync::Arc;

use crate::error::ProduceError;
use crate::kind::PageKind;
use crate::page::{PageRef, TypedPage};

/// Append-only mapping from kind to page.
///
/// Cloning is cheap: clones share the underlying map. [`Context::publish`]
/// copies the map first if any clone is still alive, so a snapshot handed to
/// a running producer never changes under it.
#[derive(Debug, Clone, Default)]
pub struct Context {
  pages: Arc<HashMap<PageKind, PageRef>>,
}

impl Context {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn with_capacity(capacity: usize) -> Self {
    Self {
      pages: Arc::new(HashMap::with_capacity(capacity)),
    }
  }

  /// Get a page by kind.
  pub fn get(&self, kind: &PageKind) -> Option<&PageRef> {
    self.pages.get(kind)
  }

  pub fn contains(&self, kind: &PageKind) -> bool {
    self.pages.contains_key(kind)
  }

  /// Get a page by its static kind, downcast to its concrete type.
  ///
  /// Returns `None` if the kind is absent or holds a different type.
  pub fn page<T: TypedPage>(&self) -> Option<&T> {
    self.pages.get(&T::KIND)?.downcast_ref::<T>()
  }

  /// Like [`Context::page`], but with an error suitable for returning from a
  /// producer.
  pub fn require<T: TypedPage>(&self) -> Result<&T, ProduceError> {
    let page = self
      .pages
      .get(&T::KIND)
      .ok_or(ProduceError::MissingInput { kind: T::KIND })?;
    page
      .downcast_ref::<T>()
      .ok_or(ProduceError::InputMismatch { kind: T::KIND })
  }

  pub fn len(&self) -> usize {
    self.pages.len()
  }

  pub fn is_empty(&self) -> bool {
    self.pages.is_empty()
  }

  /// Kinds currently published, in no particular order.
  pub fn kinds(&self) -> impl Iterator<Item = &PageKind> {
    self.pages.keys()
  }

  /// Publish a page under its own kind.
  ///
  /// Keys are never overwritten: if the kind is already present the context
  /// is left untouched and the rejected kind is returned.
  pub fn publish(&mut self, page: PageRef) -> Result<(), PageKind> {
    let kind = page.kind();
    if self.pages.contains_key(&kind) {
      return Err(kind);
    }
    Arc::make_mut(&mut self.pages).insert(kind, page);
    Ok(())
  }
}

impl FromIterator<PageRef> for Context {
  /// Collect pages into a context. Later pages of an already-present kind are
  /// dropped.
  fn from_iter<I: IntoIterator<Item = PageRef>>(iter: I) -> Self {
    let mut context = Context::new();
    for page in iter {
      let _ = context.publish(page);
    }
    context
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::page::Page;

  #[derive(Debug)]
  struct Settings {
    max_players: u32,
  }

  impl Page for Settings {
    fn kind(&self) -> PageKind {
      Self::KIND
    }
  }

  impl TypedPage for Settings {
    const KIND: PageKind = PageKind::new("Settings");
  }

  /// Pretends to be a `Settings` page but is a different type.
  #[derive(Debug)]
  struct Impostor;

  impl Page for Impostor {
    fn kind(&self) -> PageKind {
      Settings::KIND
    }
  }

  #[test]
  fn test_publish_and_lookup() {
    let mut context = Context::new();
    context
      .publish(Arc::new(Settings { max_players: 4 }))
      .unwrap();

    assert!(context.contains(&Settings::KIND));
    assert_eq!(context.len(), 1);
    assert_eq!(context.page::<Settings>().unwrap().max_players, 4);
    assert_eq!(context.require::<Settings>().unwrap().max_players, 4);
  }

  #[test]
  fn test_publish_never_overwrites() {
    let mut context = Context::new();
    context
      .publish(Arc::new(Settings { max_players: 4 }))
      .unwrap();

    let rejected = context.publish(Arc::new(Settings { max_players: 8 }));
    assert_eq!(rejected, Err(Settings::KIND));
    assert_eq!(context.page::<Settings>().unwrap().max_players, 4);
  }

  #[test]
  fn test_snapshot_is_not_affected_by_later_publish() {
    let mut context = Context::new();
    let snapshot = context.clone();

    context
      .publish(Arc::new(Settings { max_players: 2 }))
      .unwrap();

    assert!(snapshot.is_empty());
    assert_eq!(context.len(), 1);
  }

  #[test]
  fn test_require_reports_missing_and_mismatched_pages() {
    let empty = Context::new();
    assert!(matches!(
      empty.require::<Settings>(),
      Err(ProduceError::MissingInput { kind }) if kind == Settings::KIND
    ));

    let impostor: Context = [Arc::new(Impostor) as PageRef].into_iter().collect();
    assert!(impostor.page::<Settings>().is_none());
    assert!(matches!(
      impostor.require::<Settings>(),
      Err(ProduceError::InputMismatch { kind }) if kind == Settings::KIND
    ));
  }
}
