//! Ranking and link-flow tables derived from a [`PageRankResult`].
//!
//! # Ranking table
//!
//! One row per page, highest rank first. Ties keep ascending id order.
//!
//! # Link table
//!
//! One row per **existing** link, strongest flow first. Links with equal
//! flow keep ascending `(source, target)` id order, not the order they were
//! added in. Dangling fan-out pairs recorded by the engine have no link and
//! never appear here.
//!
//! Each link is bucketed against the strongest link in the table:
//!
//! | tier   | importance                |
//! |--------|---------------------------|
//! | High   | `>= 0.7 * max`            |
//! | Medium | `>= 0.3 * max`            |
//! | Low    | below that                |
//!
//! `share_of_target` divides the link's flow by the target's rank. Flow is
//! in pre-normalization units and rank is normalized, so the percentages of
//! a page's inbound links need not add up to exactly 100.

use std::cmp::Ordering;

use linkrank_core::{GraphStore, NodeId};
use serde::Serialize;

use crate::metrics::pagerank::PageRankResult;

/// Fraction of the strongest link at or above which a link is [`ImportanceTier::High`].
pub const HIGH_TIER_RATIO: f64 = 0.7;
/// Fraction of the strongest link at or above which a link is [`ImportanceTier::Medium`].
pub const MEDIUM_TIER_RATIO: f64 = 0.3;

// ---------------------------------------------------------------------------
// Ranking table
// ---------------------------------------------------------------------------

/// One page in the ranking table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankRow {
    /// 1-based position; 1 is the highest-ranked page.
    pub position: usize,
    pub page: NodeId,
    pub rank: f64,
    pub inbound: usize,
    pub outbound: usize,
}

/// Build the ranking table for every page in `store`.
///
/// Pages missing from `result` (a stale result) rank as 0.
#[must_use]
pub fn ranking_table(store: &GraphStore, result: &PageRankResult) -> Vec<RankRow> {
    let mut pages: Vec<(NodeId, f64)> = store
        .node_ids()
        .into_iter()
        .map(|id| (id, result.rank_of(id).unwrap_or(0.0)))
        .collect();

    // Stable sort: equal ranks stay in id order.
    pages.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal));

    pages
        .into_iter()
        .enumerate()
        .map(|(i, (page, rank))| RankRow {
            position: i + 1,
            page,
            rank,
            inbound: store.inbound_count(page),
            outbound: store.outbound_count(page),
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Link table
// ---------------------------------------------------------------------------

/// Importance bucket of a link relative to the strongest link.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ImportanceTier {
    High,
    Medium,
    Low,
}

impl ImportanceTier {
    /// Bucket `importance` against `max`.
    ///
    /// With `max == 0` every link is `High`, since `0 >= 0.7 * 0`.
    #[must_use]
    pub const fn classify(importance: f64, max: f64) -> Self {
        if importance >= max * HIGH_TIER_RATIO {
            Self::High
        } else if importance >= max * MEDIUM_TIER_RATIO {
            Self::Medium
        } else {
            Self::Low
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
        }
    }
}

/// One link in the link table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LinkRow {
    pub source: NodeId,
    pub target: NodeId,
    /// Rank flow recorded for this link in the final iteration.
    pub importance: f64,
    pub tier: ImportanceTier,
    /// `importance / rank(target) * 100`; `None` when the target has no rank.
    pub share_of_target: Option<f64>,
}

/// Build the link table for every link in `store`.
#[must_use]
pub fn link_table(store: &GraphStore, result: &PageRankResult) -> Vec<LinkRow> {
    let mut links: Vec<(NodeId, NodeId, f64)> = store
        .edges()
        .into_iter()
        .map(|(s, t)| (s, t, result.contribution_of(s, t)))
        .collect();

    links.sort_by(|a, b| b.2.partial_cmp(&a.2).unwrap_or(Ordering::Equal));

    let max = links.iter().map(|l| l.2).fold(0.0_f64, f64::max);

    links
        .into_iter()
        .map(|(source, target, importance)| LinkRow {
            source,
            target,
            importance,
            tier: ImportanceTier::classify(importance, max),
            share_of_target: share_of(importance, result.rank_of(target)),
        })
        .collect()
}

fn share_of(importance: f64, target_rank: Option<f64>) -> Option<f64> {
    target_rank
        .filter(|&r| r > 0.0)
        .map(|r| importance / r * 100.0)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
