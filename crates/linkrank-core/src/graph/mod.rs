//! Page/link graph model.
//!
//! # Overview
//!
//! [`GraphStore`] owns the pages (nodes) and links (directed edges) of a
//! single session graph and enforces its structural invariants:
//!
//! - every link endpoint refers to a page currently in the store;
//! - at most one link exists per `(source, target)` pair;
//! - removing a page removes every link touching it in the same call.
//!
//! The store performs no numeric work. Ranks held on [`Node`] are written
//! back by the caller after a compute pass (see `linkrank-rank`).
//!
//! ## Typical Usage
//!
//! ```rust
//! use linkrank_core::graph::GraphStore;
//!
//! let mut store = GraphStore::new();
//! let a = store.add_node();
//! let b = store.add_node();
//! store.add_edge(a, b).expect("both pages exist");
//!
//! assert_eq!(store.outbound_targets(a), vec![b]);
//! assert_eq!(store.inbound_count(b), 1);
//! ```

pub mod node;
pub mod store;

pub use node::{Node, NodeId};
pub use store::GraphStore;
