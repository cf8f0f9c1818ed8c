//! Ranking and link tables as printed by every subcommand.

use std::io::{self, Write};

use linkrank_core::{GraphStore, RankConfig};
use linkrank_rank::analytics::{self, LinkRow, RankRow};
use linkrank_rank::{PageRankResult, Session};
use serde::Serialize;

#[cfg(test)]
use crate::output::write_mode;
use crate::output::{OutputMode, pretty_kv, pretty_section, render_mode};

/// Snapshot of a session: parameters plus both tables.
#[derive(Debug, Serialize)]
pub struct Report {
    pub damping: f64,
    pub iterations: usize,
    pub pages: Vec<RankRow>,
    pub links: Vec<LinkRow>,
}

impl Report {
    pub fn new(store: &GraphStore, config: &RankConfig, result: &PageRankResult) -> Self {
        Self {
            damping: config.damping,
            iterations: config.iterations,
            pages: analytics::ranking_table(store, result),
            links: analytics::link_table(store, result),
        }
    }

    pub fn from_session(session: &Session) -> Self {
        Self::new(session.store(), session.config(), session.result())
    }
}

/// Print `report` to stdout.
pub fn print(mode: OutputMode, report: &Report) -> anyhow::Result<()> {
    render_mode(mode, report, render_text, render_pretty)
}

#[cfg(test)]
fn write(out: &mut dyn Write, mode: OutputMode, report: &Report) -> anyhow::Result<()> {
    write_mode(out, mode, report, render_text, render_pretty)
}

fn render_text(report: &Report, w: &mut dyn Write) -> io::Result<()> {
    writeln!(w, "position  page  rank  inbound  outbound")?;
    for row in &report.pages {
        writeln!(
            w,
            "{}  {}  {:.6}  {}  {}",
            row.position, row.page, row.rank, row.inbound, row.outbound
        )?;
    }
    writeln!(w)?;
    writeln!(w, "source  target  importance  tier  share")?;
    for row in &report.links {
        writeln!(
            w,
            "{}  {}  {:.6}  {}  {}",
            row.source,
            row.target,
            row.importance,
            row.tier.as_str(),
            row.share_of_target
                .map_or_else(|| "-".to_string(), |s| format!("{s:.2}"))
        )?;
    }
    Ok(())
}

fn render_pretty(report: &Report, w: &mut dyn Write) -> io::Result<()> {
    pretty_section(w, "Parameters")?;
    pretty_kv(w, "damping", format!("{}", report.damping))?;
    pretty_kv(w, "iterations", report.iterations.to_string())?;
    writeln!(w)?;

    pretty_section(w, &format!("Pages ({})", report.pages.len()))?;
    if report.pages.is_empty() {
        writeln!(w, "(no pages)")?;
    } else {
        writeln!(w, "{:>4}  {:>6}  {:>10}  {:>4}  {:>4}", "#", "page", "rank", "in", "out")?;
        for row in &report.pages {
            writeln!(
                w,
                "{:>4}  {:>6}  {:>10.6}  {:>4}  {:>4}",
                row.position, row.page, row.rank, row.inbound, row.outbound
            )?;
        }
    }
    writeln!(w)?;

    pretty_section(w, &format!("Links ({})", report.links.len()))?;
    if report.links.is_empty() {
        writeln!(w, "(no links)")?;
    } else {
        writeln!(
            w,
            "{:>6}    {:<6}  {:>10}  {:<6}  {:>8}",
            "from", "to", "flow", "tier", "share"
        )?;
        for row in &report.links {
            let share = row
                .share_of_target
                .map_or_else(|| "-".to_string(), |s| format!("{s:.1}%"));
            writeln!(
                w,
                "{:>6} -> {:<6}  {:>10.6}  {:<6}  {:>8}",
                row.source,
                row.target,
                row.importance,
                row.tier.as_str(),
                share
            )?;
        }
    }
    Ok(())
}
