//! Pageflow Resolver
//!
//! Turns an unordered set of producers into a linear order in which every
//! producer comes after the producers of the kinds it depends on.
//!
//! Structural problems (duplicate kinds, missing dependencies, cycles) are
//! detected here, before any producer runs.

mod error;
mod graph;
mod resolver;

pub use error::ResolveError;
pub use graph::DependencyGraph;
pub use resolver::{DependencyResolver, Resolver};
