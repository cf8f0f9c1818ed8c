//! `lr demo`: rank the built-in starter graph.

use linkrank_core::RankConfig;
use linkrank_rank::Session;
use tracing::info;

use crate::output::OutputMode;
use crate::report::{self, Report};

/// Execute `lr demo`.
pub fn run_demo(config: RankConfig, output: OutputMode) -> anyhow::Result<()> {
    let mut session = Session::new(config)?;
    session.seed_demo()?;
    info!(
        pages = session.store().node_count(),
        links = session.store().edge_count(),
        "demo graph seeded"
    );
    report::print(output, &Report::from_session(&session))
}
