use clap::{Parser, Subcommand};
use colored::Colorize as _;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(
    name = "osfloor",
    version,
    about = "Keep an MDM compliance policy's minimum OS version on the latest Apple release"
)]
struct Cli {
    #[command(flatten)]
    global: GlobalArgs,

    #[command(subcommand)]
    command: Commands,
}

/// Options shared by every subcommand.
#[derive(clap::Args, Clone)]
pub struct GlobalArgs {
    /// Config file (default: ~/.config/osfloor/config.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Management API bearer token; overrides the keyring
    #[arg(long, global = true, env = "OSFLOOR_GRAPH_TOKEN", hide_env_values = true)]
    pub token: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Sync the policy's minimum OS version with the latest release
    Run {
        /// Report what would change without updating the policy
        #[arg(long)]
        dry_run: bool,
        /// Print the sync report as JSON
        #[arg(long)]
        json: bool,
    },
    /// List compliance policies
    Policies {
        /// Only show policies for this platform (ios, macos, android, windows)
        #[arg(long)]
        platform: Option<osfloor_core::Platform>,
        #[arg(long)]
        json: bool,
    },
    /// Show the newest release announcement matching the feed filter
    Feed {
        #[arg(long)]
        json: bool,
    },
    /// Management API credential storage
    Auth {
        #[command(subcommand)]
        action: commands::auth::AuthAction,
    },
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let cli = Cli::parse();
    let global = cli.global;
    let result = match cli.command {
        Commands::Run { dry_run, json } => commands::run::run(&global, dry_run, json),
        Commands::Policies { platform, json } => commands::policies::run(&global, platform, json),
        Commands::Feed { json } => commands::feed::run(&global, json),
        Commands::Auth { action } => commands::auth::run(action),
        Commands::Config { action } => commands::config::run(&global, action),
    };

    if let Err(e) = result {
        eprintln!("{} {e}", "error:".red().bold());
        std::process::exit(1);
    }
}
