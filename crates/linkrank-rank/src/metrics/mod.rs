//! Rank metrics over a [`GraphStore`](linkrank_core::GraphStore).
//!
//! # Usage
//!
//! ```rust
//! use linkrank_core::{GraphStore, RankConfig};
//! use linkrank_rank::metrics::pagerank::pagerank;
//!
//! let mut store = GraphStore::new();
//! let a = store.add_node();
//! let b = store.add_node();
//! store.add_edge(a, b).expect("both pages exist");
//!
//! let result = pagerank(&store, &RankConfig::default());
//! assert!(result.rank_of(b) > result.rank_of(a));
//! assert!(result.contribution_of(a, b) > 0.0);
//! ```

pub mod pagerank;
