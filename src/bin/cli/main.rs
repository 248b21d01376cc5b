mod app;
mod commands;
mod render;
#[cfg(feature = "tui")]
mod tui;

use std::io::{IsTerminal, Read};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use recall_lib::config::{ConfigError, RecallConfig};
use recall_lib::flashcards::{Arousal, CardUpdate, Importance};

use app::parse_tags;
use commands::add::AddArgs;

#[derive(Parser)]
#[command(name = "recall", about = "Spaced-repetition review from the terminal", version)]
struct Cli {
    /// Directory holding state.json (overrides the config file)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Output format
    #[arg(long, global = true, default_value = "plain")]
    format: OutputFormat,

    /// Disable ANSI colors
    #[arg(long, global = true)]
    no_color: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Clone, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    Plain,
    Json,
}

#[derive(Subcommand)]
enum Command {
    /// Add a new card
    Add {
        /// The prompt shown during review
        cue: String,
        /// Long-form content (use "-" to read from stdin)
        #[arg(long)]
        content: Option<String>,
        /// Situation where the knowledge applies
        #[arg(long)]
        context: Option<String>,
        /// Small exercise shown with the cue
        #[arg(long = "micro")]
        micro_task: Option<String>,
        /// Comma-separated tags; the first one is the card's domain
        #[arg(long)]
        tags: Option<String>,
        /// H, M or L
        #[arg(long, default_value = "M")]
        importance: Importance,
        /// Arousal the card was written in: L, M or H
        #[arg(long)]
        arousal: Option<Arousal>,
    },

    /// Change a card's text, tags or importance
    Edit {
        /// Card id or unique prefix
        id: String,
        #[arg(long)]
        cue: Option<String>,
        /// New content (use "-" to read from stdin)
        #[arg(long)]
        content: Option<String>,
        #[arg(long)]
        context: Option<String>,
        #[arg(long = "micro")]
        micro_task: Option<String>,
        /// Comma-separated tags, replacing the current ones
        #[arg(long)]
        tags: Option<String>,
        #[arg(long)]
        importance: Option<Importance>,
    },

    /// Remove a card
    Rm {
        /// Card id or unique prefix
        id: String,
    },

    /// List cards, optionally filtered by a search query
    List {
        /// Matches cue, content and tags (case-insensitive)
        query: Option<String>,
    },

    /// Show today's counts and the queue a session would start with
    Due {
        /// Seed for the queue shuffle
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Review due and new cards in the terminal
    Review {
        /// Arousal recorded with each answer unless given per answer
        #[arg(long)]
        arousal: Option<Arousal>,
        /// Seed for the queue shuffle
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Show or change session limits
    Settings {
        /// Session size at which new cards stop being admitted
        #[arg(long, allow_negative_numbers = true)]
        daily_cap: Option<i32>,
        /// Maximum consecutive cards from the same domain
        #[arg(long)]
        domain_cap: Option<i32>,
    },

    /// Export everything as JSON (to stdout, a file, or a directory)
    Export {
        path: Option<PathBuf>,
    },

    /// Replace everything with an exported JSON document
    Import {
        path: PathBuf,
    },

    /// Delete all cards, reviews and settings
    Reset {
        /// Confirm the reset
        #[arg(long)]
        yes: bool,
    },

    /// Launch interactive TUI review
    #[cfg(feature = "tui")]
    Tui {
        /// Seed for the queue shuffle
        #[arg(long)]
        seed: Option<u64>,
    },
}

/// Resolve "-" as stdin
fn resolve_content(content: Option<String>) -> Result<Option<String>> {
    match content.as_deref() {
        Some("-") => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read content from stdin")?;
            Ok(Some(buf.trim_end().to_string()))
        }
        _ => Ok(content),
    }
}

fn load_config() -> Result<RecallConfig> {
    match RecallConfig::load_default() {
        Ok(config) => Ok(config),
        Err(ConfigError::ConfigDirNotFound) => {
            log::warn!("No config directory on this platform, using defaults");
            Ok(RecallConfig::default())
        }
        Err(e) => Err(e).context("Failed to load config"),
    }
}

fn main() -> Result<()> {
    // Default to warn; RUST_LOG overrides
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();
    let config = load_config()?;
    let use_color = !cli.no_color && config.color && std::io::stdout().is_terminal();
    let mut app = app::App::new(config, cli.data_dir)?;

    match cli.command {
        None => {
            // No subcommand → launch TUI
            #[cfg(feature = "tui")]
            {
                tui::run(&mut app, None)?;
            }
            #[cfg(not(feature = "tui"))]
            {
                commands::review::run(&mut app, None, None, use_color)?;
            }
        }
        Some(Command::Add {
            cue,
            content,
            context,
            micro_task,
            tags,
            importance,
            arousal,
        }) => {
            let args = AddArgs {
                cue,
                content: resolve_content(content)?,
                context,
                micro_task,
                tags,
                importance,
                arousal,
            };
            commands::add::run(&mut app, args, &cli.format)?;
        }
        Some(Command::Edit {
            id,
            cue,
            content,
            context,
            micro_task,
            tags,
            importance,
        }) => {
            let update = CardUpdate {
                cue,
                content: resolve_content(content)?,
                context,
                micro_task,
                tags: tags.as_deref().map(parse_tags),
                importance,
            };
            commands::edit::run_edit(&mut app, &id, update, &cli.format)?;
        }
        Some(Command::Rm { id }) => {
            commands::edit::run_remove(&mut app, &id)?;
        }
        Some(Command::List { query }) => {
            commands::list::run(&app, query.as_deref(), &cli.format, use_color)?;
        }
        Some(Command::Due { seed }) => {
            commands::due::run(&app, seed, &cli.format, use_color)?;
        }
        Some(Command::Review { arousal, seed }) => {
            commands::review::run(&mut app, arousal, seed, use_color)?;
        }
        Some(Command::Settings {
            daily_cap,
            domain_cap,
        }) => {
            commands::settings::run(&mut app, daily_cap, domain_cap, &cli.format)?;
        }
        Some(Command::Export { path }) => {
            commands::transfer::run_export(&app, path.as_deref())?;
        }
        Some(Command::Import { path }) => {
            commands::transfer::run_import(&mut app, &path)?;
        }
        Some(Command::Reset { yes }) => {
            commands::transfer::run_reset(&mut app, yes)?;
        }
        #[cfg(feature = "tui")]
        Some(Command::Tui { seed }) => {
            tui::run(&mut app, seed)?;
        }
    }

    Ok(())
}
