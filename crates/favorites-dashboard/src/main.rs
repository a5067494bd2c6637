//! `favd` - favorites dashboard CLI entry point
//!
//! Renders the favorites grid from a states file and the favorites store,
//! edits the store directly, and manages the configuration file.

mod commands;

use clap::{Parser, Subcommand};
use commands::{
    run_config_command, run_render_command, run_store_command, ConfigAction, RenderArgs,
    StoreAction,
};
use favorites_dashboard::config::loader::ConfigLoader;
use favorites_dashboard::logging;
use std::path::PathBuf;
use std::process::ExitCode;

/// Favorites dashboard
#[derive(Parser)]
#[command(name = "favd")]
#[command(version, about = "Favorites dashboard widgets in the terminal")]
struct Cli {
    /// Configuration file (defaults to the XDG location)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// Available subcommands for the favd CLI
#[derive(Subcommand)]
enum Commands {
    /// Render the favorites grid for one user
    Render {
        /// JSON object mapping entity ids to `{state, attributes}`
        #[arg(long)]
        states: PathBuf,
        /// Favorites store file (defaults to the XDG data location)
        #[arg(long)]
        store: Option<PathBuf>,
        /// Viewing user id
        #[arg(long)]
        user: String,
        /// Output width in columns
        #[arg(long, default_value_t = 80)]
        width: u16,
    },

    /// Operate on the favorites store file
    Store {
        /// Favorites store file (defaults to the XDG data location)
        #[arg(long)]
        path: Option<PathBuf>,
        #[command(subcommand)]
        action: StoreAction,
    },

    /// Manage configuration file
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // A broken config is reported by the command itself.
    let level = ConfigLoader::load(cli.config.as_deref())
        .map(|config| config.logging.level)
        .unwrap_or_default();
    logging::init(level);

    match cli.command {
        Commands::Render {
            states,
            store,
            user,
            width,
        } => run_render_command(&RenderArgs {
            states: &states,
            store: store.as_deref(),
            user: &user,
            width,
            config: cli.config.as_deref(),
        }),
        Commands::Store { path, action } => run_store_command(path.as_deref(), action),
        Commands::Config { action } => run_config_command(cli.config.as_deref(), action),
    }
}
