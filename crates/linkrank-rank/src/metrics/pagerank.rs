//! Fixed-iteration PageRank with per-link rank-flow capture.
//!
//! # Overview
//!
//! PageRank scores a page by the rank flowing into it from the pages that
//! link to it. Pages that many well-ranked pages point at end up on top.
//!
//! # Algorithm
//!
//! Power iteration, run for exactly `iterations` rounds:
//!
//! ```text
//! PR'(v) = (1 - d) / N
//!        + d * Σ PR(u) / out_degree(u)     for each link u → v
//!        + d * Σ PR(w) / N                 for each dangling page w
//! ```
//!
//! where `d` is the damping factor. A dangling page (no outbound links)
//! spreads its rank over **every** page, itself included, so no mass leaks.
//! There is no convergence test: the loop count is the only stop condition.
//!
//! After the loop the ranks are divided by their sum so they total 1.
//!
//! # Rank flow
//!
//! During the final round the amount sent along each `(source, target)`
//! pair is recorded. Two properties of those values are observable:
//!
//! - Flow values are captured **before** the final normalization, so they
//!   are in pre-normalization units while ranks are post-normalization.
//! - A dangling page records its share against every page in the graph,
//!   not only against real links. Edge-oriented views simply never look
//!   those pairs up.
//!
//! # Output
//!
//! Returns a [`PageRankResult`] with per-page ranks, per-pair flow, and the
//! pre-normalization rank mass.

use std::collections::{BTreeMap, HashMap};

use linkrank_core::{GraphStore, NodeId, RankConfig};
use tracing::{debug, instrument};

// ---------------------------------------------------------------------------
// Result types
// ---------------------------------------------------------------------------

/// Result of a PageRank computation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PageRankResult {
    /// Normalized rank per page, ordered by id.
    pub ranks: BTreeMap<NodeId, f64>,
    /// Rank flow per `(source, target)` pair from the final iteration.
    pub contributions: HashMap<(NodeId, NodeId), f64>,
    /// Damping factor the ranks were computed with.
    pub damping: f64,
    /// Number of iterations performed (always the configured count).
    pub iterations: usize,
    /// Sum of ranks before the final normalization. 1 up to rounding for
    /// any non-empty graph; 0 for an empty one.
    pub mass: f64,
}

impl PageRankResult {
    /// Normalized rank of `id`, or `None` if the page was not in the graph.
    #[must_use]
    pub fn rank_of(&self, id: NodeId) -> Option<f64> {
        self.ranks.get(&id).copied()
    }

    /// Rank flow recorded for `source → target`; 0 when nothing was recorded.
    #[must_use]
    pub fn contribution_of(&self, source: NodeId, target: NodeId) -> f64 {
        self.contributions
            .get(&(source, target))
            .copied()
            .unwrap_or(0.0)
    }

    /// Sum of the normalized ranks.
    #[must_use]
    pub fn total_rank(&self) -> f64 {
        self.ranks.values().sum()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ranks.is_empty()
    }
}

// ---------------------------------------------------------------------------
// PageRank
// ---------------------------------------------------------------------------

/// Compute PageRank from scratch over the whole store.
///
/// Pure with respect to `store`: ranks are returned, not written back. An
/// empty store yields an empty result without doing any work.
///
/// # Arguments
///
/// * `store`: the page/link graph.
/// * `config`: damping factor and exact iteration count.
#[must_use]
#[allow(clippy::cast_precision_loss)]
#[instrument(
    level = "debug",
    skip_all,
    fields(pages = store.node_count(), links = store.edge_count(), damping = config.damping, iterations = config.iterations)
)]
pub fn pagerank(store: &GraphStore, config: &RankConfig) -> PageRankResult {
    let ids = store.node_ids();
    let n = ids.len();

    if n == 0 {
        return PageRankResult {
            damping: config.damping,
            iterations: config.iterations,
            ..PageRankResult::default()
        };
    }

    let outbound = outbound_positions(store, &ids);
    let dangling: Vec<usize> = (0..n).filter(|&u| outbound[u].is_empty()).collect();
    let d = config.damping;
    let n_f64 = n as f64;
    let teleport = (1.0 - d) / n_f64;

    // Initialize ranks uniformly.
    let mut ranks = vec![1.0 / n_f64; n];
    let mut next = vec![0.0_f64; n];
    let mut contributions = HashMap::new();

    for round in 0..config.iterations {
        let last = round + 1 == config.iterations;

        // Dangling pages spread over every page, itself included, so their
        // combined share folds into the per-page base.
        let dangling_mass: f64 = dangling.iter().map(|&u| ranks[u]).sum();
        next.fill(d.mul_add(dangling_mass / n_f64, teleport));

        for (u, targets) in outbound.iter().enumerate() {
            if targets.is_empty() {
                continue;
            }
            let share = d * ranks[u] / targets.len() as f64;
            for &v in targets {
                next[v] += share;
                if last {
                    contributions.insert((ids[u], ids[v]), share);
                }
            }
        }

        if last {
            for &u in &dangling {
                let share = d * ranks[u] / n_f64;
                for &v in &ids {
                    contributions.insert((ids[u], v), share);
                }
            }
        }

        std::mem::swap(&mut ranks, &mut next);
    }

    let mass: f64 = ranks.iter().sum();
    if mass > 0.0 {
        for r in &mut ranks {
            *r /= mass;
        }
    }

    debug!(mass, recorded = contributions.len(), "pagerank computed");

    PageRankResult {
        ranks: ids.into_iter().zip(ranks).collect(),
        contributions,
        damping: d,
        iterations: config.iterations,
        mass,
    }
}

// ---------------------------------------------------------------------------
// Internal helpers
// ---------------------------------------------------------------------------

/// Outbound targets of each page as positions into `ids`.
fn outbound_positions(store: &GraphStore, ids: &[NodeId]) -> Vec<Vec<usize>> {
    let position: HashMap<NodeId, usize> = ids.iter().enumerate().map(|(i, &id)| (id, i)).collect();

    ids.iter()
        .map(|&id| {
            store
                .outbound_targets(id)
                .into_iter()
                .filter_map(|t| position.get(&t).copied())
                .collect()
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
