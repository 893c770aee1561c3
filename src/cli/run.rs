// src/cli/run.rs
//! Run command - interactive notify session
//!
//! Reads commands from stdin while cooldown tickets arrive from timer tasks;
//! both are handled on the same loop so the session has a single owner.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::Args;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::time::Instant;
use tracing::{info, warn};

use super::load::ManifestArgs;
use super::output::{reason_label, render_rows};
use crate::config::AppConfig;
use crate::notification::{CooldownScope, TokioScheduler};
use crate::session::{NotifyReply, Session};

const HELP: &str = "Comandos:
  <n>         notificar la fila n
  p <n>       ver el mensaje de la fila n sin notificar
  l           listar filas
  o <archivo> cargar otro manifiesto
  h           ayuda
  q           salir";

/// Run command arguments
#[derive(Args, Debug)]
pub struct RunArgs {
    #[command(flatten)]
    pub manifest: ManifestArgs,

    /// Lock only the notified row instead of every row
    #[arg(long)]
    pub per_row: bool,
}

/// One line of user input
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunCommand {
    /// 1-based row number
    Notify(usize),
    Preview(usize),
    List,
    Open(PathBuf),
    Help,
    Quit,
    Empty,
    Unknown(String),
}

impl RunCommand {
    pub fn parse(line: &str) -> Self {
        let line = line.trim();
        let (head, arg) = match line.split_once(char::is_whitespace) {
            Some((head, arg)) => (head, arg.trim()),
            None => (line, ""),
        };

        match head {
            "" => RunCommand::Empty,
            "q" | "quit" | "exit" => RunCommand::Quit,
            "l" | "list" | "ls" => RunCommand::List,
            "h" | "help" | "?" => RunCommand::Help,
            "p" | "preview" => match arg.parse::<usize>() {
                Ok(n) if n > 0 => RunCommand::Preview(n),
                _ => RunCommand::Unknown(line.to_string()),
            },
            "o" | "open" if !arg.is_empty() => RunCommand::Open(PathBuf::from(arg)),
            _ => match head.parse::<usize>() {
                Ok(n) if n > 0 && arg.is_empty() => RunCommand::Notify(n),
                _ => RunCommand::Unknown(line.to_string()),
            },
        }
    }
}

/// Handle the run command
pub async fn handle_run(args: RunArgs, config: &AppConfig) -> Result<()> {
    let mut config = args.manifest.apply(config);
    if args.per_row {
        config.cooldown_scope = CooldownScope::PerRow;
    }
    let (mut session, config) = args.manifest.open(&config)?;

    info!(
        scope = ?config.cooldown_scope,
        cooldown_secs = config.cooldown_secs,
        "Notify session started"
    );

    let (scheduler, mut tickets) = TokioScheduler::channel();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    println!("{}", render_rows(&session, Instant::now()));
    println!("{}", HELP);

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else { break };
                match RunCommand::parse(&line) {
                    RunCommand::Quit => break,
                    RunCommand::Empty => {}
                    RunCommand::Help => println!("{}", HELP),
                    RunCommand::List => println!("{}", render_rows(&session, Instant::now())),
                    RunCommand::Notify(n) => match session.notify(n - 1, &scheduler) {
                        NotifyReply::Sent(message) => {
                            println!("{}\n\nAbrir: {}", message.text, message.link);
                        }
                        NotifyReply::Ignored(reason) => {
                            println!("Fila {}: {}", n, reason_label(reason));
                        }
                    },
                    RunCommand::Preview(n) => match session.preview(n - 1) {
                        Some(message) => println!("{}\n\n{}", message.text, message.link),
                        None => println!("Fila {} inexistente", n),
                    },
                    RunCommand::Open(path) => reload(&mut session, &path),
                    RunCommand::Unknown(input) => {
                        println!("Comando desconocido: {} (h para ayuda)", input);
                    }
                }
            }
            Some(ticket) = tickets.recv() => {
                if session.release(ticket) {
                    println!("Notificar disponible nuevamente");
                }
            }
        }
    }

    Ok(())
}

fn reload(session: &mut Session, path: &Path) {
    let bytes = match fs::read(path) {
        Ok(bytes) => bytes,
        Err(err) => {
            warn!(file = %path.display(), error = %err, "Cannot read manifest");
            println!("No se pudo leer {}: {}", path.display(), err);
            return;
        }
    };
    match session.reload(&bytes) {
        Ok(count) => {
            println!("{} paquetes cargados", count);
            println!("{}", render_rows(session, Instant::now()));
        }
        Err(err) => println!("Manifiesto inválido: {}", err),
    }
}
