//! Graph Store: page identity, link identity, and referential integrity.
//!
//! # Ordering
//!
//! Every query that returns a sequence is ordered by [`NodeId`]. Ids are
//! allocated monotonically, so this is also creation order.
//!
//! # Self-loops
//!
//! The store accepts `source == target`. Callers that want to forbid
//! self-links must check before calling [`GraphStore::add_edge`].

use std::collections::BTreeMap;

use petgraph::Direction;
use petgraph::stable_graph::{NodeIndex, StableDiGraph};
use tracing::{debug, instrument};

use super::node::{Node, NodeId};
use crate::error::GraphError;

// ---------------------------------------------------------------------------
// GraphStore
// ---------------------------------------------------------------------------

/// Owned page/link graph.
///
/// Backed by a [`StableDiGraph`] so node indices survive removals, plus an
/// id index mapping [`NodeId`] to petgraph `NodeIndex`.
#[derive(Debug, Clone)]
pub struct GraphStore {
    graph: StableDiGraph<Node, ()>,
    index: BTreeMap<NodeId, NodeIndex>,
    next_id: NodeId,
}

impl Default for GraphStore {
    fn default() -> Self {
        Self::new()
    }
}

impl GraphStore {
    /// Create an empty store whose first page will be [`NodeId::FIRST`].
    #[must_use]
    pub fn new() -> Self {
        Self {
            graph: StableDiGraph::new(),
            index: BTreeMap::new(),
            next_id: NodeId::FIRST,
        }
    }

    // -----------------------------------------------------------------------
    // Mutation
    // -----------------------------------------------------------------------

    /// Allocate the next id and insert a page.
    ///
    /// The page's rank starts at `1 / max(1, n)` where `n` is the page count
    /// before insertion. It is a placeholder until the next compute pass.
    ///
    /// # Panics
    ///
    /// Panics when the id space is exhausted, i.e. when `u32::MAX - 1` ids
    /// have been handed out since the last reset.
    #[allow(clippy::cast_precision_loss)]
    pub fn add_node(&mut self) -> NodeId {
        let id = self.next_id;
        let Some(next) = id.next() else {
            panic!("page id space exhausted after {id}; reset the store to start over");
        };
        self.next_id = next;

        let rank = 1.0 / self.graph.node_count().max(1) as f64;
        let idx = self.graph.add_node(Node { id, rank });
        self.index.insert(id, idx);

        debug!(%id, "page added");
        id
    }

    /// Remove a page and every link touching it.
    ///
    /// Returns `false` (and changes nothing) if the page does not exist.
    pub fn remove_node(&mut self, id: NodeId) -> bool {
        let Some(idx) = self.index.remove(&id) else {
            return false;
        };

        // StableGraph drops incident edges as part of node removal, so no
        // link can be observed pointing at a missing page.
        self.graph.remove_node(idx);
        debug!(%id, "page removed");
        true
    }

    /// Insert the link `source -> target`.
    ///
    /// # Errors
    ///
    /// - [`GraphError::InvalidReference`] if either endpoint is missing.
    /// - [`GraphError::DuplicateEdge`] if the pair already exists. The store
    ///   is left unchanged; duplicates are always reported, never merged.
    #[instrument(level = "debug", skip(self))]
    pub fn add_edge(&mut self, source: NodeId, target: NodeId) -> Result<(), GraphError> {
        let from = self.resolve(source, source, target)?;
        let to = self.resolve(target, source, target)?;

        if self.graph.find_edge(from, to).is_some() {
            return Err(GraphError::DuplicateEdge {
                from: source,
                to: target,
            });
        }

        self.graph.add_edge(from, to, ());
        debug!("link added");
        Ok(())
    }

    /// Remove the link `source -> target`. Returns `false` if absent.
    pub fn remove_edge(&mut self, source: NodeId, target: NodeId) -> bool {
        let (Some(&from), Some(&to)) = (self.index.get(&source), self.index.get(&target)) else {
            return false;
        };

        match self.graph.find_edge(from, to) {
            Some(edge) => {
                self.graph.remove_edge(edge);
                debug!(%source, %target, "link removed");
                true
            }
            None => false,
        }
    }

    /// Drop every page and link and restart id allocation at
    /// [`NodeId::FIRST`].
    pub fn reset(&mut self) {
        self.graph.clear();
        self.index.clear();
        self.next_id = NodeId::FIRST;
        debug!("graph reset");
    }

    /// Write computed ranks back onto the pages. Ids not in the store are
    /// ignored; identities are never touched.
    pub fn apply_ranks(&mut self, ranks: impl IntoIterator<Item = (NodeId, f64)>) {
        for (id, rank) in ranks {
            if let Some(node) = self
                .index
                .get(&id)
                .and_then(|&idx| self.graph.node_weight_mut(idx))
            {
                node.rank = rank;
            }
        }
    }

    // -----------------------------------------------------------------------
    // Queries
    // -----------------------------------------------------------------------

    #[must_use]
    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    #[must_use]
    pub fn contains_node(&self, id: NodeId) -> bool {
        self.index.contains_key(&id)
    }

    #[must_use]
    pub fn contains_edge(&self, source: NodeId, target: NodeId) -> bool {
        match (self.index.get(&source), self.index.get(&target)) {
            (Some(&from), Some(&to)) => self.graph.find_edge(from, to).is_some(),
            _ => false,
        }
    }

    /// Page ids in ascending (creation) order.
    #[must_use]
    pub fn node_ids(&self) -> Vec<NodeId> {
        self.index.keys().copied().collect()
    }

    /// Pages in ascending id order.
    pub fn nodes(&self) -> impl Iterator<Item = &Node> + '_ {
        self.index
            .values()
            .filter_map(|&idx| self.graph.node_weight(idx))
    }

    /// All links as `(source, target)`, ordered by source then target.
    #[must_use]
    pub fn edges(&self) -> Vec<(NodeId, NodeId)> {
        self.index
            .keys()
            .flat_map(|&source| {
                self.outbound_targets(source)
                    .into_iter()
                    .map(move |target| (source, target))
            })
            .collect()
    }

    /// Targets of `id`'s outbound links, ascending. Empty for unknown ids.
    #[must_use]
    pub fn outbound_targets(&self, id: NodeId) -> Vec<NodeId> {
        let mut targets = self.neighbor_ids(id, Direction::Outgoing);
        targets.sort_unstable();
        targets
    }

    /// Number of links pointing at `id`.
    #[must_use]
    pub fn inbound_count(&self, id: NodeId) -> usize {
        self.degree(id, Direction::Incoming)
    }

    /// Number of links leaving `id`.
    #[must_use]
    pub fn outbound_count(&self, id: NodeId) -> usize {
        self.degree(id, Direction::Outgoing)
    }

    /// Stored rank of `id` (placeholder or last written-back value).
    #[must_use]
    pub fn rank_of(&self, id: NodeId) -> Option<f64> {
        self.index
            .get(&id)
            .and_then(|&idx| self.graph.node_weight(idx))
            .map(|node| node.rank)
    }

    // -----------------------------------------------------------------------
    // Internal helpers
    // -----------------------------------------------------------------------

    fn resolve(&self, id: NodeId, from: NodeId, to: NodeId) -> Result<NodeIndex, GraphError> {
        self.index
            .get(&id)
            .copied()
            .ok_or(GraphError::InvalidReference {
                from,
                to,
                missing: id,
            })
    }

    fn neighbor_ids(&self, id: NodeId, dir: Direction) -> Vec<NodeId> {
        let Some(&idx) = self.index.get(&id) else {
            return Vec::new();
        };
        self.graph
            .neighbors_directed(idx, dir)
            .filter_map(|n| self.graph.node_weight(n).map(|node| node.id))
            .collect()
    }

    fn degree(&self, id: NodeId, dir: Direction) -> usize {
        self.index
            .get(&id)
            .map_or(0, |&idx| self.graph.neighbors_directed(idx, dir).count())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
