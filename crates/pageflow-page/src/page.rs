use std::any::Any;
use std::fmt;
use std::sync::Arc;

use crate::kind::PageKind;

/// Shared handle to a produced page.
pub type PageRef = Arc<dyn Page>;

/// Upcast helper so a `dyn Page` can be downcast to its concrete type.
pub trait AsAny {
  fn as_any(&self) -> &dyn Any;
}

impl<T: Any + Send + Sync> AsAny for T {
  fn as_any(&self) -> &dyn Any {
    self
  }
}

/// An immutable unit of parsed configuration.
pub trait Page: AsAny + Send + Sync + fmt::Debug + 'static {
  /// The kind this page is published under.
  fn kind(&self) -> PageKind;
}

/// A page type with a kind known at compile time.
///
/// Implementors usually return `Self::KIND` from [`Page::kind`].
pub trait TypedPage: Page + Sized {
  const KIND: PageKind;
}

impl dyn Page {
  /// Downcast to the concrete page type.
  pub fn downcast_ref<T: Page>(&self) -> Option<&T> {
    <dyn Page as AsAny>::as_any(self).downcast_ref::<T>()
  }

  pub fn is<T: Page>(&self) -> bool {
    self.downcast_ref::<T>().is_some()
  }
}
