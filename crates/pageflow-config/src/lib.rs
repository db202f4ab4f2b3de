//! Page lookup for pageflow.
//!
//! [`Config`] runs a [`pageflow_parser::PageParser`] once and serves the
//! resulting pages by kind.

mod config;
mod error;

pub use config::Config;
pub use error::ConfigError;
