#![forbid(unsafe_code)]

mod cmd;
mod output;
mod report;
mod script;

use std::env;
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use linkrank_core::config::{ConfigLayer, resolve_config};
use output::OutputMode;
use tracing::{debug, info};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[derive(Parser, Debug)]
#[command(
    name = "lr",
    author,
    version,
    about = "linkrank: build a link graph and rank its pages",
    long_about = None
)]
struct Cli {
    /// Enable verbose logging.
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Damping factor in [0, 1]. Overrides config files.
    #[arg(long, global = true)]
    damping: Option<f64>,

    /// Exact number of power iterations. Overrides config files.
    #[arg(long, global = true)]
    iterations: Option<usize>,

    /// Read parameters from this TOML file (must exist).
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Output format.
    #[arg(long, global = true, value_enum)]
    format: Option<OutputMode>,

    /// Shorthand for `--format json`.
    #[arg(long, global = true, hide = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

impl Cli {
    fn output_mode(&self) -> OutputMode {
        output::resolve_output_mode(self.format, self.json)
    }

    const fn overrides(&self) -> ConfigLayer {
        ConfigLayer {
            damping: self.damping,
            iterations: self.iterations,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    #[command(
        about = "Rank the built-in starter graph",
        after_help = "EXAMPLES:\n    lr demo\n\n    # Stronger link-following\n    lr demo --damping 0.95 --json"
    )]
    Demo,

    #[command(
        about = "Replay a graph script",
        long_about = "Replay a graph script against a fresh graph and print the final ranking.\n\nCommands: page [count], drop <id>, link <s> <t>, unlink <s> <t>, reset, damping <f>, iterations <k>, show.",
        after_help = "EXAMPLES:\n    lr run graph.lr\n\n    # Read the script from stdin\n    printf 'page 2\\nlink 1 2\\n' | lr run -"
    )]
    Run(cmd::run::RunArgs),

    #[command(
        about = "Rank a graph given on the command line",
        after_help = "EXAMPLES:\n    lr rank --pages 3 --link 1:2 --link 3:2"
    )]
    Rank(cmd::rank::RankArgs),
}

fn init_tracing(verbose: bool) {
    let filter = EnvFilter::try_from_env("LINKRANK_LOG").unwrap_or_else(|_| {
        EnvFilter::new(if verbose || env::var("DEBUG").is_ok() {
            "linkrank=debug,lr=debug,info"
        } else {
            "linkrank=info,lr=info,warn"
        })
    });

    let format = env::var("LINKRANK_LOG_FORMAT").unwrap_or_else(|_| "compact".to_string());

    let registry = tracing_subscriber::registry().with(filter);

    match format.as_str() {
        "json" => {
            registry
                .with(fmt::layer().json().with_ansi(false).with_writer(std::io::stderr))
                .init();
        }
        _ => {
            registry
                .with(fmt::layer().compact().with_writer(std::io::stderr))
                .init();
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if cli.verbose {
        info!("Verbose mode enabled");
    }

    let project_root = env::current_dir()?;
    let config = resolve_config(&project_root, cli.config.as_deref(), &cli.overrides())?;
    debug!(damping = config.damping, iterations = config.iterations, "config resolved");

    let output = cli.output_mode();

    match cli.command {
        Commands::Demo => cmd::demo::run_demo(config, output),
        Commands::Run(ref args) => cmd::run::run_run(args, config, output),
        Commands::Rank(ref args) => cmd::rank::run_rank(args, config, output),
    }
}
