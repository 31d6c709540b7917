//! Aynorica: branch network companion CLI.
//!
//! # Usage
//!
//! ```text
//! aynorica [-C <root>] network
//! aynorica [-C <root>] sync [--yes]
//! aynorica [-C <root>] deploy [SPECIALTY]
//! aynorica [-C <root>] load [NODE]
//! aynorica [-C <root>] refresh [--yes]
//! aynorica [-C <root>] quick
//! aynorica [-C <root>] status [--json]
//! aynorica [-C <root>] watch [--auto-sync-on-save] [--sync-debounce-ms N]
//! ```

mod commands;
mod host;

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};

use aynorica_sync::Action;
use commands::{
    actions::{ConfirmArgs, DeployArgs, LoadArgs},
    status::StatusArgs,
    watch::WatchArgs,
};
use host::TerminalHost;

// ---------------------------------------------------------------------------
// CLI entry point
// ---------------------------------------------------------------------------

#[derive(Parser, Debug)]
#[command(
    name = "aynorica",
    version,
    about = "Inspect and sync an Aynorica branch network from the terminal",
    long_about = None,
)]
struct Cli {
    /// Workspace root (the directory containing `.github/`).
    #[arg(long, short = 'C', global = true, default_value = ".")]
    root: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Print the network registry as a Markdown report.
    Network,

    /// Commit and push pending brain state under `.github/`.
    Sync(ConfirmArgs),

    /// Prepare the chat command that deploys a new node.
    Deploy(DeployArgs),

    /// Prepare the chat command that loads another node's context.
    Load(LoadArgs),

    /// Fetch the parent branch and rebase onto it.
    Refresh(ConfirmArgs),

    /// Choose one of the above from a menu.
    Quick,

    /// Show the current node and sync age of every node.
    Status(StatusArgs),

    /// Keep a session open: live status and optional sync offers.
    Watch(WatchArgs),
}

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    if !matches!(cli.command, Commands::Watch(_)) {
        init_tracing();
    }

    let root = cli.root;
    let host = TerminalHost::new();
    match cli.command {
        Commands::Network => commands::actions::run(&root, Action::ShowNetwork, host),
        Commands::Sync(args) => {
            commands::actions::run(&root, Action::SyncBrainState, host.assume_yes(args.yes))
        }
        Commands::Deploy(args) => {
            commands::actions::run(&root, Action::DeployNode, host.with_input(args.specialty))
        }
        Commands::Load(args) => {
            commands::actions::run(&root, Action::LoadNode, host.with_pick(args.node))
        }
        Commands::Refresh(args) => {
            commands::actions::run(&root, Action::RefreshRegistry, host.assume_yes(args.yes))
        }
        Commands::Quick => commands::actions::run(&root, Action::QuickActions, host),
        Commands::Status(args) => args.run(&root).map(|()| ExitCode::SUCCESS),
        Commands::Watch(args) => args.run(&root).map(|()| ExitCode::SUCCESS),
    }
}

fn init_tracing() {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}
