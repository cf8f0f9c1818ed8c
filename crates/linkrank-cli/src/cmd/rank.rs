//! `lr rank`: rank a graph described entirely by flags.
//!
//! Pages are numbered `1..=N`. Unlike `lr run`, a bad link is fatal here.

use anyhow::Context;
use clap::Args;
use linkrank_core::{GraphStore, NodeId, RankConfig};
use linkrank_rank::{SessionError, pagerank};

use crate::output::OutputMode;
use crate::report::{self, Report};

/// Arguments for `lr rank`.
#[derive(Args, Debug)]
pub struct RankArgs {
    /// Number of pages to create.
    #[arg(long, default_value_t = 0)]
    pub pages: usize,

    /// A link as `SOURCE:TARGET`. Repeat for more links.
    #[arg(long = "link", value_name = "S:T", value_parser = parse_link)]
    pub links: Vec<(NodeId, NodeId)>,
}

/// Execute `lr rank`.
pub fn run_rank(args: &RankArgs, config: RankConfig, output: OutputMode) -> anyhow::Result<()> {
    let store = build_store(args)?;
    let result = pagerank(&store, &config);
    report::print(output, &Report::new(&store, &config, &result))
}

fn build_store(args: &RankArgs) -> anyhow::Result<GraphStore> {
    let mut store = GraphStore::new();
    for _ in 0..args.pages {
        store.add_node();
    }
    for &(source, target) in &args.links {
        if source == target && store.contains_node(source) {
            return Err(SessionError::SelfLink(source))
                .with_context(|| format!("invalid --link {source}:{target}"));
        }
        store
            .add_edge(source, target)
            .with_context(|| format!("invalid --link {source}:{target}"))?;
    }
    Ok(store)
}

fn parse_link(raw: &str) -> Result<(NodeId, NodeId), String> {
    let (source, target) = raw
        .split_once(':')
        .ok_or_else(|| format!("expected SOURCE:TARGET, got `{raw}`"))?;
    let parse = |part: &str| {
        part.parse::<NodeId>()
            .map_err(|err| format!("invalid page id `{part}`: {err}"))
    };
    Ok((parse(source)?, parse(target)?))
}
