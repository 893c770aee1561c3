// src/cli/message.rs
//! Message command - render the message and link for one row

use anyhow::{anyhow, Result};
use clap::Args;

use super::load::ManifestArgs;
use super::output::format_output;
use crate::config::AppConfig;

/// Message command arguments
#[derive(Args, Debug)]
pub struct MessageArgs {
    #[command(flatten)]
    pub manifest: ManifestArgs,

    /// Row number as shown by `load` (1-based)
    #[arg(long, short)]
    pub row: usize,

    /// Seed for the template choice
    #[arg(long)]
    pub seed: Option<u64>,

    /// Print text and link as JSON
    #[arg(long)]
    pub json: bool,
}

/// Handle the message command
pub fn handle_message(args: MessageArgs, config: &AppConfig) -> Result<()> {
    let (session, _) = args.manifest.open(config)?;
    let mut session = match args.seed {
        Some(seed) => session.with_seed(seed),
        None => session,
    };

    let total = session.rows().len();
    let message = args
        .row
        .checked_sub(1)
        .and_then(|index| session.preview(index))
        .ok_or_else(|| anyhow!("row {} out of range (1-{})", args.row, total))?;

    if args.json {
        println!("{}", format_output(&message));
    } else {
        println!("{}\n\n{}", message.text, message.link);
    }
    Ok(())
}
