//! An owned graph that recomputes PageRank after every mutation.
//!
//! # Overview
//!
//! [`Session`] is the contract a front end programs against: mutate, and
//! the ranks are already current. Each mutation runs a full recompute over
//! the whole graph and writes the ranks back onto the pages. Nothing is
//! updated incrementally.
//!
//! Self-links are refused here, before the store is touched. The store
//! itself would accept them.

use linkrank_core::config::ConfigError;
use linkrank_core::{GraphError, GraphStore, NodeId, RankConfig};
use tracing::{debug, info, instrument};

use crate::analytics::{self, LinkRow, RankRow};
use crate::metrics::pagerank::{PageRankResult, pagerank};

/// Links of the starter graph: six pages, five links.
pub const DEMO_LINKS: [(u32, u32); 5] = [(1, 2), (3, 2), (4, 2), (3, 6), (2, 5)];
/// Page count of the starter graph.
pub const DEMO_PAGES: usize = 6;

/// Errors surfaced by [`Session`] mutations.
#[derive(Debug, Clone, Copy, PartialEq, thiserror::Error)]
pub enum SessionError {
    /// A page may not link to itself.
    #[error("page {0} cannot link to itself")]
    SelfLink(NodeId),
    #[error(transparent)]
    Graph(#[from] GraphError),
    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl SessionError {
    /// Stable code identifier for machine parsing.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::SelfLink(_) => "E2003",
            Self::Graph(err) => err.code(),
            Self::Config(_) => "E1002",
        }
    }
}

/// A page graph plus the parameters and result of its latest compute pass.
#[derive(Debug, Clone)]
pub struct Session {
    store: GraphStore,
    config: RankConfig,
    baseline: RankConfig,
    result: PageRankResult,
}

impl Default for Session {
    fn default() -> Self {
        Self::with_config(RankConfig::default())
    }
}

impl Session {
    /// Start an empty session. `config` is also what [`Session::reset`]
    /// restores.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Config`] if `config` fails
    /// [`RankConfig::validate`], the same check the setters apply.
    pub fn new(config: RankConfig) -> Result<Self, SessionError> {
        config.validate()?;
        Ok(Self::with_config(config))
    }

    fn with_config(config: RankConfig) -> Self {
        let store = GraphStore::new();
        let result = pagerank(&store, &config);
        Self {
            store,
            config,
            baseline: config,
            result,
        }
    }

    // -----------------------------------------------------------------------
    // Mutation
    // -----------------------------------------------------------------------

    /// Add a page and recompute.
    pub fn add_page(&mut self) -> NodeId {
        let id = self.store.add_node();
        self.recompute();
        id
    }

    /// Remove a page (and its links) and recompute. Returns `false` if the
    /// page did not exist, in which case nothing is recomputed.
    pub fn remove_page(&mut self, id: NodeId) -> bool {
        let removed = self.store.remove_node(id);
        if removed {
            self.recompute();
        }
        removed
    }

    /// Link `source → target` and recompute.
    ///
    /// # Errors
    ///
    /// - [`SessionError::Graph`] for a missing page or an existing link.
    /// - [`SessionError::SelfLink`] when `source == target` and the page
    ///   exists. A missing page is reported first.
    ///
    /// The graph and ranks are unchanged on error.
    pub fn link(&mut self, source: NodeId, target: NodeId) -> Result<(), SessionError> {
        if source == target && self.store.contains_node(source) {
            return Err(SessionError::SelfLink(source));
        }
        self.store.add_edge(source, target)?;
        self.recompute();
        Ok(())
    }

    /// Remove the link `source → target` and recompute. Returns `false` if
    /// there was no such link.
    pub fn unlink(&mut self, source: NodeId, target: NodeId) -> bool {
        let removed = self.store.remove_edge(source, target);
        if removed {
            self.recompute();
        }
        removed
    }

    /// Clear the graph, restart ids at 1, and restore the baseline
    /// parameters.
    pub fn reset(&mut self) {
        self.store.reset();
        self.config = self.baseline;
        self.recompute();
        info!("session reset");
    }

    /// Change the damping factor and recompute.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Config`] if `damping` is outside `[0, 1]`.
    pub fn set_damping(&mut self, damping: f64) -> Result<(), SessionError> {
        self.set_config(RankConfig {
            damping,
            ..self.config
        })
    }

    /// Change the iteration count and recompute.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Config`] if `iterations` exceeds the cap.
    pub fn set_iterations(&mut self, iterations: usize) -> Result<(), SessionError> {
        self.set_config(RankConfig {
            iterations,
            ..self.config
        })
    }

    /// Build the starter graph on top of whatever is already present.
    ///
    /// Intended for an empty session, where it yields pages 1–6 and links
    /// `1→2, 3→2, 4→2, 3→6, 2→5`.
    ///
    /// # Errors
    ///
    /// Propagates link errors when the session was not empty and the demo
    /// ids do not line up with existing pages.
    pub fn seed_demo(&mut self) -> Result<(), SessionError> {
        for _ in 0..DEMO_PAGES {
            self.add_page();
        }
        for (s, t) in DEMO_LINKS {
            self.link(NodeId::new(s), NodeId::new(t))?;
        }
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Read access
    // -----------------------------------------------------------------------

    #[must_use]
    pub const fn store(&self) -> &GraphStore {
        &self.store
    }

    #[must_use]
    pub const fn config(&self) -> &RankConfig {
        &self.config
    }

    /// Result of the latest compute pass. Always current with the store.
    #[must_use]
    pub const fn result(&self) -> &PageRankResult {
        &self.result
    }

    #[must_use]
    pub fn rank_of(&self, id: NodeId) -> Option<f64> {
        self.result.rank_of(id)
    }

    #[must_use]
    pub fn contribution_of(&self, source: NodeId, target: NodeId) -> f64 {
        self.result.contribution_of(source, target)
    }

    #[must_use]
    pub fn ranking(&self) -> Vec<RankRow> {
        analytics::ranking_table(&self.store, &self.result)
    }

    #[must_use]
    pub fn links(&self) -> Vec<LinkRow> {
        analytics::link_table(&self.store, &self.result)
    }

    // -----------------------------------------------------------------------
    // Internal helpers
    // -----------------------------------------------------------------------

    fn set_config(&mut self, config: RankConfig) -> Result<(), SessionError> {
        config.validate()?;
        self.config = config;
        self.recompute();
        Ok(())
    }

    #[instrument(level = "debug", skip(self))]
    fn recompute(&mut self) {
        self.result = pagerank(&self.store, &self.config);
        self.store
            .apply_ranks(self.result.ranks.iter().map(|(&id, &rank)| (id, rank)));
        debug!(
            pages = self.store.node_count(),
            links = self.store.edge_count(),
            "ranks refreshed"
        );
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn id(raw: u32) -> NodeId {
        NodeId::new(raw)
    }

    #[test]
    fn every_mutation_refreshes_ranks() {
        let mut session = Session::default();
        let a = session.add_page();
        assert_eq!(session.rank_of(a), Some(1.0));

        let b = session.add_page();
        assert!((session.rank_of(b).expect("ranked") - 0.5).abs() < 1e-12);

        session.link(a, b).expect("link");
        let after_link = session.rank_of(b).expect("ranked");
        assert!(after_link > 0.5);
        assert_eq!(session.store().rank_of(b), Some(after_link));
        assert!(session.contribution_of(a, b) > 0.0);
        assert!(session.contribution_of(b, a) > 0.0, "dangling b fans out to a");

        assert!(session.unlink(a, b));
        assert!((session.rank_of(b).expect("ranked") - 0.5).abs() < 1e-12);
        // Both pages dangle: each sends d * 0.5 / 2 to every page.
        assert!((session.contribution_of(a, b) - 0.2125).abs() < 1e-12);

        assert!(session.remove_page(a));
        assert_eq!(session.rank_of(a), None);
        assert!(session.contribution_of(a, b).abs() < f64::EPSILON);
        assert!((session.rank_of(b).expect("ranked") - 1.0).abs() < 1e-12);
    }

    #[test]
    fn self_link_is_refused_before_the_store() {
        let mut session = Session::default();
        let a = session.add_page();
        assert_eq!(session.link(a, a), Err(SessionError::SelfLink(a)));
        assert_eq!(session.store().edge_count(), 0);
    }

    #[test]
    fn missing_page_is_reported_before_self_link() {
        let mut session = Session::default();
        session.add_page();
        let err = session.link(id(9), id(9)).expect_err("missing page");
        assert_eq!(err.code(), "E2001");
        assert!(matches!(
            err,
            SessionError::Graph(GraphError::InvalidReference { missing, .. }) if missing == id(9)
        ));
    }

    #[test]
    fn new_rejects_invalid_parameters() {
        for config in [
            RankConfig::new(1.5, 20),
            RankConfig::new(f64::NAN, 20),
            RankConfig::new(0.85, 10_001),
        ] {
            let err = Session::new(config).expect_err("invalid config");
            assert_eq!(err.code(), "E1002");
        }
        let session = Session::new(RankConfig::new(0.5, 3)).expect("valid config");
        assert_eq!(session.config(), &RankConfig::new(0.5, 3));
    }

    #[test]
    fn failed_link_leaves_result_untouched() {
        let mut session = Session::default();
        session.seed_demo().expect("demo");
        let before = session.result().clone();

        let err = session.link(id(1), id(2)).expect_err("duplicate");
        assert_eq!(err.code(), "E2002");
        let err = session.link(id(1), id(40)).expect_err("missing page");
        assert_eq!(err.code(), "E2001");

        assert_eq!(session.result(), &before);
    }

    #[test]
    fn parameter_changes_recompute() {
        let mut session = Session::default();
        session.seed_demo().expect("demo");
        let before = session.rank_of(id(2)).expect("ranked");

        session.set_damping(0.5).expect("valid damping");
        let after = session.rank_of(id(2)).expect("ranked");
        assert!((before - after).abs() > 1e-6);
        assert!((session.result().damping - 0.5).abs() < f64::EPSILON);

        session.set_iterations(0).expect("valid iterations");
        assert!((session.rank_of(id(2)).expect("ranked") - 1.0 / 6.0).abs() < 1e-12);

        assert!(session.set_damping(1.2).is_err());
        assert!((session.config().damping - 0.5).abs() < f64::EPSILON);
    }

    #[test]
    fn reset_restores_ids_and_baseline() {
        let mut session = Session::new(RankConfig::new(0.9, 30)).expect("valid config");
        session.seed_demo().expect("demo");
        session.set_damping(0.1).expect("valid damping");

        session.reset();
        assert!(session.store().is_empty());
        assert!(session.result().is_empty());
        assert_eq!(session.config(), &RankConfig::new(0.9, 30));
        assert_eq!(session.add_page(), NodeId::FIRST);
    }

    #[test]
    fn demo_graph_shape() {
        let mut session = Session::default();
        session.seed_demo().expect("demo");
        assert_eq!(session.store().node_count(), 6);
        assert_eq!(session.store().edge_count(), 5);

        let top = &session.ranking()[0];
        assert_eq!(top.page, id(5), "page 5 is fed by the hub page 2");
        assert_eq!(session.links().len(), 5);
    }
}
