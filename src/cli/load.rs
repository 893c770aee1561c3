// src/cli/load.rs
//! Load command - parse a manifest and print the normalized rows

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use tokio::time::Instant;
use tracing::info;

use super::output::{format_output, render_rows};
use crate::config::AppConfig;
use crate::manifest::HeaderStrategy;
use crate::session::Session;

/// Manifest options shared by every command
#[derive(Args, Debug, Clone)]
pub struct ManifestArgs {
    /// Manifest file (.csv, `;` or `,` separated)
    pub file: PathBuf,

    /// Delivery window in hours (minimum 2)
    #[arg(long, short, value_parser = clap::value_parser!(u32).range(2..))]
    pub window: Option<u32>,

    /// Take the first row starting with `Codigo` (or row 1) as header, without column checks
    #[arg(long)]
    pub sentinel: bool,
}

impl ManifestArgs {
    /// Apply flag overrides on top of the file config
    pub fn apply(&self, config: &AppConfig) -> AppConfig {
        let mut config = config.clone();
        if let Some(window) = self.window {
            config.window_hours = window;
        }
        if self.sentinel {
            config.header_strategy = HeaderStrategy::Sentinel;
        }
        config
    }

    /// Read the file and start a session over it
    pub fn open(&self, config: &AppConfig) -> Result<(Session, AppConfig)> {
        let config = self.apply(config);
        let bytes = fs::read(&self.file)
            .with_context(|| format!("failed to read {}", self.file.display()))?;
        let session = Session::from_config(&bytes, &config)
            .with_context(|| format!("cannot load {}", self.file.display()))?;
        info!(file = %self.file.display(), rows = session.rows().len(), "Manifest opened");
        Ok((session, config))
    }
}

/// Load command arguments
#[derive(Args, Debug)]
pub struct LoadArgs {
    #[command(flatten)]
    pub manifest: ManifestArgs,

    /// Print rows as JSON
    #[arg(long)]
    pub json: bool,
}

/// Handle the load command
pub fn handle_load(args: LoadArgs, config: &AppConfig) -> Result<()> {
    let (session, _) = args.manifest.open(config)?;

    if args.json {
        println!("{}", format_output(&session.rows()));
    } else {
        print!("{}", render_rows(&session, Instant::now()));
        println!();
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn manifest_file(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_flags_override_config() {
        let args = ManifestArgs {
            file: PathBuf::from("x.csv"),
            window: Some(5),
            sentinel: true,
        };
        let config = args.apply(&AppConfig::default());
        assert_eq!(config.window_hours, 5);
        assert_eq!(config.header_strategy, HeaderStrategy::Sentinel);
    }

    #[test]
    fn test_open_reads_file() {
        let file = manifest_file(
            "Codigo,Cliente,Servicio,Destinatario,Telefono,Direccion,Referencia,Bultos,VisitaEstimada,Estado\n\
             A1,Sol,Express,Ana,111,Calle 1,,1,10:00,Pendiente\n",
        );
        let args = ManifestArgs {
            file: file.path().to_path_buf(),
            window: None,
            sentinel: false,
        };
        let (session, config) = args.open(&AppConfig::default()).unwrap();
        assert_eq!(session.rows().len(), 1);
        assert_eq!(config.window_hours, 2);
    }

    #[test]
    fn test_open_reports_missing_columns() {
        let file = manifest_file("Codigo;Cliente\nA1;Sol\n");
        let args = ManifestArgs {
            file: file.path().to_path_buf(),
            window: None,
            sentinel: false,
        };
        let err = args.open(&AppConfig::default()).unwrap_err();
        assert!(format!("{err:#}").contains("missing columns"));
    }
}
