//! Pageflow Parser
//!
//! This crate runs page producers in dependency order. Producers are
//! resolved into a topological order, grouped into levels of producers whose
//! dependencies are all published, and each level runs concurrently.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                        PageParser                           │
//! │  - parse() / parse_async() / parse_with_progress()          │
//! │  - spawn_parse() for callback delivery                      │
//! └─────────────────────────────────────────────────────────────┘
//!                               │
//!                               ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │                  DependencyAwareParser                      │
//! │  - Resolver → topological order                             │
//! │  - rayon fan-out (blocking) / JoinSet fan-out (async)       │
//! └─────────────────────────────────────────────────────────────┘
//!                               │
//!                               ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      LevelSchedule                          │
//! │  - ready queue, remaining dependency counts                 │
//! │  - publishes pages into the shared Context                  │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Usage
//!
//! ```ignore
//! use pageflow_parser::{DependencyAwareParser, PageParser};
//! use tokio_util::sync::CancellationToken;
//!
//! let parser = DependencyAwareParser::builder()
//!     .producer(SettingsProducer::new(path))
//!     .producer(BalanceProducer)
//!     .build()?;
//!
//! let pages = parser.parse_async(&CancellationToken::new()).await?;
//! ```

mod callback;
mod composite;
mod config;
mod dependency;
mod error;
mod parser;
mod progress;
mod schedule;

pub use callback::spawn_parse;
pub use composite::CompositeParser;
pub use config::ParserConfig;
pub use dependency::{DependencyAwareParser, DependencyAwareParserBuilder};
pub use error::ParseError;
pub use parser::PageParser;
pub use progress::{ChannelProgress, NoProgress, ParseProgress, ProgressSink};
