pub mod config;
pub mod dates;
pub mod error;
pub mod filters;
pub mod graph;
pub mod ingest;
pub mod interfaces;

pub use crate::config::Config;
pub use crate::error::{Result, RssGraphError};
pub use crate::graph::GraphStore;
pub use crate::interfaces::facts::FactSink;
