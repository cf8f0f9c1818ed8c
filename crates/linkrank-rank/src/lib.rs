#![forbid(unsafe_code)]
//! linkrank-rank library.
//!
//! - [`metrics::pagerank`]: the fixed-iteration engine.
//! - [`analytics`]: ranking and link-flow tables derived from a result.
//! - [`session`]: an owned graph that recomputes after every mutation.
//!
//! # Conventions
//!
//! - **Errors**: `thiserror` enums; the engine itself is infallible.
//! - **Logging**: Use `tracing` macros (`info!`, `warn!`, `error!`, `debug!`, `trace!`).

pub mod analytics;
pub mod metrics;
pub mod session;

pub use metrics::pagerank::{PageRankResult, pagerank};
pub use session::{Session, SessionError};
