//! `lr run`: replay a graph script against a fresh session.
//!
//! The script is parsed up front; a syntax error aborts before any command
//! runs. Commands that fail at runtime (missing page, duplicate link,
//! self-link, out-of-range parameter) are logged and skipped, and the
//! replay carries on.

use std::io;
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::Args;
use linkrank_core::RankConfig;
use linkrank_rank::Session;
use tracing::{debug, info, warn};

use crate::output::OutputMode;
use crate::report::{self, Report};
use crate::script::{self, Command, Step};

/// Arguments for `lr run`.
#[derive(Args, Debug)]
pub struct RunArgs {
    /// Script to replay. Use `-` to read from stdin.
    pub script: PathBuf,
}

/// Counters from one replay.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ReplaySummary {
    pub applied: usize,
    pub skipped: usize,
}

/// Execute `lr run`.
pub fn run_run(args: &RunArgs, config: RankConfig, output: OutputMode) -> anyhow::Result<()> {
    let source = read_script(&args.script)?;
    let steps = script::parse(&source)
        .inspect_err(|err| debug!(line = err.line(), "script rejected"))
        .with_context(|| format!("failed to parse {}", args.script.display()))?;

    let mut session = Session::new(config)?;
    let summary = replay(&mut session, &steps, |session| {
        report::print(output, &Report::from_session(session))
    })?;
    info!(applied = summary.applied, skipped = summary.skipped, "script replayed");

    report::print(output, &Report::from_session(&session))
}

fn read_script(path: &Path) -> anyhow::Result<String> {
    if path == Path::new("-") {
        return io::read_to_string(io::stdin()).context("failed to read script from stdin");
    }
    std::fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))
}

/// Apply `steps` to `session` in order, calling `on_show` for each `show`.
///
/// # Errors
///
/// Only errors from `on_show` are returned; graph and parameter errors are
/// logged and counted as skipped.
pub fn replay(
    session: &mut Session,
    steps: &[Step],
    mut on_show: impl FnMut(&Session) -> anyhow::Result<()>,
) -> anyhow::Result<ReplaySummary> {
    let mut summary = ReplaySummary::default();

    for step in steps {
        let skipped = match step.command {
            Command::Page(count) => {
                for _ in 0..count {
                    session.add_page();
                }
                None
            }
            Command::Drop(id) => {
                (!session.remove_page(id)).then(|| format!("page {id} does not exist"))
            }
            Command::Link(source, target) => session.link(source, target).err().map(|e| e.to_string()),
            Command::Unlink(source, target) => (!session.unlink(source, target))
                .then(|| format!("link {source} -> {target} does not exist")),
            Command::Reset => {
                session.reset();
                None
            }
            Command::Damping(value) => session.set_damping(value).err().map(|e| e.to_string()),
            Command::Iterations(count) => {
                session.set_iterations(count).err().map(|e| e.to_string())
            }
            Command::Show => {
                on_show(session)?;
                None
            }
        };

        match skipped {
            Some(reason) => {
                warn!(line = step.line, "skipped: {reason}");
                summary.skipped += 1;
            }
            None => summary.applied += 1,
        }
    }

    Ok(summary)
}
