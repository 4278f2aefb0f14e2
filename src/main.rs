// ABOUTME: Entry point for voicedesk — a terminal front end for a voice assistant session.
// ABOUTME: Parses CLI args, loads config and secrets, sets up tracing, and launches the app.

use std::fs::OpenOptions;
use std::path::PathBuf;
use std::sync::Mutex;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use voicedesk::app::App;
use voicedesk::config::{Config, load_env_files};
use voicedesk::session::MessageLog;

#[derive(Parser, Debug)]
#[command(name = "voicedesk", version, about = "Voice assistant conversation desk")]
struct Cli {
    /// Config file (defaults to ~/.voicedesk/config.toml)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Conversation log file to read and write
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Refresh period while connected, in milliseconds
    #[arg(long)]
    poll_interval_ms: Option<u64>,

    /// Clear the conversation log before starting
    #[arg(long)]
    fresh: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the conversation log and exit
    Dump {
        /// Print the raw JSON document instead of one line per entry
        #[arg(long)]
        json: bool,
    },
    /// Empty the conversation log and exit
    Clear,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let env_problems = load_env_files();
    init_tracing(cli.command.is_none());
    for problem in env_problems {
        tracing::warn!("{}", problem);
    }

    let mut config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };
    if let Some(path) = cli.log_file {
        config.log.path = path;
    }
    if let Some(ms) = cli.poll_interval_ms {
        config.ui.poll_interval_ms = ms;
    }

    match cli.command {
        None => App::new(config, cli.fresh).run().await,
        Some(Command::Dump { json }) => {
            let log = MessageLog::new(config.log.path);
            let entries = log.try_read_all()?;
            if json {
                println!("{}", serde_json::to_string_pretty(&entries)?);
            } else {
                for entry in &entries {
                    println!("{}", entry);
                }
            }
            Ok(())
        }
        Some(Command::Clear) => {
            let log = MessageLog::new(config.log.path);
            log.try_clear()?;
            println!("Cleared {}", log.path().display());
            Ok(())
        }
    }
}

/// The TUI owns the terminal, so interactive runs log to a file; the
/// one-shot subcommands log to stderr.
fn init_tracing(interactive: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    if !interactive {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .try_init();
        return;
    }

    let path = Config::diagnostics_path();
    if let Some(parent) = path.parent() {
        let _ = std::fs::create_dir_all(parent);
    }
    match OpenOptions::new().create(true).append(true).open(&path) {
        Ok(file) => {
            let _ = tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .try_init();
        }
        Err(_) => {
            let _ = tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(std::io::sink)
                .try_init();
        }
    }
}
