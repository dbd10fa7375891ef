mod cmd;
mod output;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "vestibule",
    about = "Welcome layer toolkit — validate config, inspect the menu layout, simulate a lobby",
    version,
    propagate_version = true
)]
struct Cli {
    /// Config file (omit to use built-in defaults)
    #[arg(long, global = true, env = "VESTIBULE_CONFIG")]
    config: Option<PathBuf>,

    /// Output as JSON
    #[arg(long, global = true, short = 'j')]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate the configuration and report every correction it would need
    Check,

    /// Render the effective menu grid
    Layout,

    /// Run a scripted arrival/menu/click session against stub collaborators
    Simulate {
        /// Logical ticks to run after the scripted events
        #[arg(long, default_value_t = 60)]
        ticks: u64,

        /// Number of arriving actors
        #[arg(long, default_value_t = 2)]
        actors: usize,
    },
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Check => cmd::check::run(cli.config.as_deref(), cli.json),
        Commands::Layout => cmd::layout::run(cli.config.as_deref(), cli.json),
        Commands::Simulate { ticks, actors } => {
            cmd::simulate::run(cli.config.as_deref(), ticks, actors)
        }
    }
}
