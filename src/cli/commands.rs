use std::io::{self, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing::debug;

use crate::config::ExtractorConfig;
use crate::dom::Snapshot;
use crate::extract::Extractor;
use crate::models::{ConversationKind, ExtractionReport};
use crate::utils::{STDIN_PATH, config_path, format_path_with_tilde, load_snapshot};

#[derive(Parser)]
#[command(name = "chat-transcript")]
#[command(version = "0.1.0")]
#[command(about = "Extract conversations and messages from rendered chat snapshots", long_about = None)]
pub struct Cli {
    /// Configuration file (defaults to $CHAT_TRANSCRIPT_CONFIG, then the user config dir)
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Pretty-print JSON output
    #[arg(long, global = true)]
    pub pretty: bool,

    /// Emit the full report, issues included, instead of the bare record array
    #[arg(long, global = true)]
    pub report: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List the conversations of a sidebar snapshot
    Conversations {
        /// Snapshot file (.json node dump or HTML), `-` for stdin
        snapshot: PathBuf,
    },
    /// Extract the messages of the conversation in a snapshot
    Messages {
        /// Snapshot file (.json node dump or HTML), `-` for stdin
        snapshot: PathBuf,
    },
    /// Show a summary of a snapshot
    Stats {
        /// Snapshot file (.json node dump or HTML), `-` for stdin
        snapshot: PathBuf,
    },
    /// Print the effective configuration as TOML
    Config,
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();

    match &cli.command {
        Some(command) => {
            let config = load_config(cli.config.as_deref())?;
            match command {
                Commands::Conversations { snapshot } => {
                    let (snapshot, extractor) = prepare(snapshot, &config)?;
                    let report = extractor.list_conversations(&snapshot, snapshot.root());
                    print_report(report, &cli)?;
                }
                Commands::Messages { snapshot } => {
                    let (snapshot, extractor) = prepare(snapshot, &config)?;
                    let report = extractor.list_messages(&snapshot, snapshot.root());
                    print_report(report, &cli)?;
                }
                Commands::Stats { snapshot: path } => {
                    let (snapshot, extractor) = prepare(path, &config)?;
                    show_stats(path, &snapshot, &extractor)?;
                }
                Commands::Config => {
                    let rendered =
                        toml::to_string_pretty(&config).context("Failed to render configuration")?;
                    print!("{}", rendered);
                }
            }
        }
        None => {
            println!("Use --help for usage information");
        }
    }

    Ok(())
}

fn load_config(explicit: Option<&Path>) -> Result<ExtractorConfig> {
    match config_path(explicit) {
        Some(path) => ExtractorConfig::load(&path),
        None => {
            debug!("No configuration file found, using defaults");
            Ok(ExtractorConfig::default())
        }
    }
}

fn prepare(path: &Path, config: &ExtractorConfig) -> Result<(Snapshot, Extractor)> {
    let extractor = Extractor::new(config).context("Invalid selector in configuration")?;
    let snapshot = load_snapshot(path)?;
    Ok((snapshot, extractor))
}

fn print_report<T: Serialize>(report: ExtractionReport<T>, cli: &Cli) -> Result<()> {
    let rendered = if cli.report {
        to_json(&report, cli.pretty)?
    } else {
        to_json(&report.into_records(), cli.pretty)?
    };

    let mut stdout = io::stdout().lock();
    writeln!(stdout, "{}", rendered).context("Failed to write output")?;
    Ok(())
}

fn to_json<T: Serialize + ?Sized>(value: &T, pretty: bool) -> Result<String> {
    let rendered =
        if pretty { serde_json::to_string_pretty(value) } else { serde_json::to_string(value) };
    rendered.context("Failed to serialize output")
}

fn show_stats(path: &Path, snapshot: &Snapshot, extractor: &Extractor) -> Result<()> {
    let conversations = extractor.list_conversations(snapshot, snapshot.root());
    let messages = extractor.list_messages(snapshot, snapshot.root());

    let channels =
        conversations.records.iter().filter(|c| c.kind() == ConversationKind::Channel).count();
    let direct_messages = conversations.records.len() - channels;
    let unread = conversations.records.iter().filter(|c| c.unread()).count();

    let source = if path.as_os_str() == STDIN_PATH {
        "<stdin>".to_string()
    } else {
        format_path_with_tilde(path)
    };

    println!("Chat Snapshot Statistics");
    println!("========================");
    println!("Snapshot: {}", source);
    println!("Nodes: {}", snapshot.len());
    println!("Conversations: {}", conversations.records.len());
    println!("  Channels: {}", channels);
    println!("  Direct messages: {}", direct_messages);
    println!("  Unread: {}", unread);
    println!("Messages: {}", messages.records.len());
    println!("Issues: {}", conversations.issues.len() + messages.issues.len());

    let newest = messages.records.iter().filter_map(|m| m.timestamp_datetime()).max();
    if let Some(newest) = newest {
        println!("Newest message: {}", newest.format("%Y-%m-%d %H:%M:%S"));
    }

    let last_active = conversations.records.iter().filter_map(|c| c.timestamp_datetime()).max();
    if let Some(last_active) = last_active {
        println!("Last active conversation: {}", last_active.format("%Y-%m-%d %H:%M:%S"));
    }

    Ok(())
}
