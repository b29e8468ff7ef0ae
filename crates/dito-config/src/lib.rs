//! Configuration management for dito
//!
//! Settings come from three layers with precedence CLI > `.ditorc.json` >
//! built-in defaults. The config file is a single JSON object read from the
//! root of the analysed directory and shallow-merged over the defaults.

mod discovery;
mod model;
mod sources;
mod validation;

pub use dito_utils::types::ConfigSource;
pub use model::*;
