//! Delivery Notify CLI
//!
//! Load a courier manifest and notify recipients over WhatsApp links

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use delivery_notify::cli::{handle_load, handle_message, handle_run, LoadArgs, MessageArgs, RunArgs};
use delivery_notify::AppConfig;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
#[command(name = "dn")]
#[command(about = "Delivery Notify - carga manifiestos de reparto y notifica a los destinatarios")]
#[command(version)]
struct Cli {
    /// Config file (default: <config_dir>/delivery-notify/config.json)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the normalized rows of a manifest
    Load(LoadArgs),
    /// Render the message and WhatsApp link for one row
    Message(MessageArgs),
    /// Interactive session: notify rows with cooldown
    Run(RunArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    // RUST_LOG controls verbosity, e.g. RUST_LOG=debug dn run ruta.csv
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("delivery_notify=info,dn=info"));

    fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .init();

    let cli = Cli::parse();
    let config = AppConfig::load(cli.config.as_deref())?;

    match cli.command {
        Commands::Load(args) => handle_load(args, &config)?,
        Commands::Message(args) => handle_message(args, &config)?,
        Commands::Run(args) => handle_run(args, &config).await?,
    }

    Ok(())
}
