#![forbid(unsafe_code)]
//! linkrank-core library.
//!
//! # Conventions
//!
//! - **Errors**: typed `thiserror` enums for graph and config failures;
//!   `anyhow::Result` only where files are read.
//! - **Logging**: Use `tracing` macros (`info!`, `warn!`, `error!`, `debug!`, `trace!`).

pub mod config;
pub mod error;
pub mod graph;

pub use config::RankConfig;
pub use error::GraphError;
pub use graph::{GraphStore, Node, NodeId};
