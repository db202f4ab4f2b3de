//! Pageflow Page
//!
//! This crate contains the data model shared by every pageflow crate:
//! - [`PageKind`] identifies the concrete shape of a page and is the only key
//!   used for dependency references and page lookup.
//! - [`Page`] is an immutable unit of parsed configuration, shared as [`PageRef`].
//! - [`Context`] is the append-only kind -> page map a producer reads its
//!   dependencies from.
//! - [`Producer`] declares the kind it produces, the kinds it depends on, and
//!   how to build its page in blocking and async form.

mod context;
mod error;
mod kind;
mod page;
mod producer;

pub use context::Context;
pub use error::{BoxError, ProduceError};
pub use kind::PageKind;
pub use page::{AsAny, Page, PageRef, TypedPage};
pub use producer::{Producer, ProducerRef};
