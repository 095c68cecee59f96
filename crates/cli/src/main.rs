use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "biblio")]
#[command(about = "Keeps a merged history of library loans across runs", long_about = None)]
struct Cli {
    /// Settings file (defaults to ./appsettings.json when present)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch current loans and merge them into the stored history
    Sync {
        /// Read the snapshot from a captured scraper output instead of running the scraper
        #[arg(short, long)]
        snapshot: Option<PathBuf>,
        /// Only sync this account (books, books-2)
        #[arg(short, long)]
        account: Option<String>,
    },
    /// Reconcile two JSON loan lists offline and print the result
    Merge {
        #[arg(long)]
        prior: PathBuf,
        #[arg(long)]
        snapshot: PathBuf,
    },
    /// Print the stored loan list of an account
    Show {
        #[arg(short, long, default_value = biblio_core::PRIMARY_ACCOUNT_KEY)]
        account: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Sync { snapshot, account } => {
            commands::sync::run(cli.config.as_deref(), snapshot, account.as_deref()).await?;
        },
        Commands::Merge { prior, snapshot } => {
            commands::merge::run(&prior, &snapshot).await?;
        },
        Commands::Show { account } => {
            commands::show::run(cli.config.as_deref(), &account).await?;
        },
    }

    Ok(())
}
