// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Jonathan D. A. Jewell <hyperpolymath>

//! Img Renamer: Interactive Bulk Image Renamer
//!
//! Renames every image in a folder to `"<base name> - <n>.<ext>"`.

use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use img_renamer::config::AppConfig;
use img_renamer::history::{undo_batches, History};
use img_renamer::session::{Session, SessionOptions};
use img_renamer::ui::TerminalConsole;
use img_renamer::Result;

/// Img Renamer CLI - Interactive Bulk Image Renamer
#[derive(Parser, Debug)]
#[command(name = "img-renamer")]
#[command(author = "Jonathan D. A. Jewell <hyperpolymath>")]
#[command(version = "1.0.0")]
#[command(about = "Rename every image in a folder to a numbered sequence", long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Path to configuration file (JSON format)
    #[arg(short, long, default_value = "img-renamer.json", global = true)]
    config: PathBuf,

    /// Enable verbose logging (debug level)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Enable trace logging (most verbose)
    #[arg(long, global = true)]
    trace: bool,

    /// Only log errors
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Start the interactive renamer (default)
    Run {
        /// Show what would be renamed without touching any file
        #[arg(long)]
        dry_run: bool,

        /// Do not clear the screen or draw the banner
        #[arg(long)]
        no_banner: bool,

        /// Answer the first folder prompt
        #[arg(short, long)]
        dir: Option<String>,
    },

    /// History and undo operations
    History {
        #[command(subcommand)]
        action: HistoryCommands,
    },

    /// Configuration management
    Config {
        #[command(subcommand)]
        action: ConfigCommands,
    },
}

#[derive(Subcommand, Debug)]
enum HistoryCommands {
    /// List recent history entries
    List {
        /// Number of entries to show
        #[arg(short = 'n', long, default_value = "10")]
        count: usize,
    },

    /// Undo recent batches
    Undo {
        /// Number of batches to undo
        #[arg(short, long, default_value = "1")]
        batches: usize,

        /// Dry run (show what would be undone)
        #[arg(long)]
        dry_run: bool,
    },

    /// Clear all history
    Clear {
        /// Skip confirmation
        #[arg(long)]
        force: bool,
    },
}

#[derive(Subcommand, Debug)]
enum ConfigCommands {
    /// Show current configuration
    Show,

    /// Generate default configuration file
    Generate {
        /// Output file path
        #[arg(short, long, default_value = "img-renamer.json")]
        output: PathBuf,
    },

    /// Validate configuration file
    Validate,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.trace {
        "trace"
    } else if cli.verbose {
        "debug"
    } else if cli.quiet {
        "error"
    } else {
        "warn"
    };

    // Logs go to stderr so they never land inside a prompt
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let config = AppConfig::load(&cli.config)?;
    debug!("Loaded configuration: {:?}", config);

    match cli.command {
        Some(Commands::Run { dry_run, no_banner, dir }) => {
            run_session(config, dry_run, no_banner, dir)
        }
        Some(Commands::History { action }) => run_history_command(&config, action),
        Some(Commands::Config { action }) => run_config_command(&config, action, &cli.config),
        None => run_session(config, false, false, None),
    }
}

/// Run the interactive prompt loop until the user exits
fn run_session(
    mut config: AppConfig,
    dry_run: bool,
    no_banner: bool,
    dir: Option<String>,
) -> Result<()> {
    if no_banner {
        config.ui.banner = false;
    }

    let console = TerminalConsole::new(config.ui.clone());
    let options = SessionOptions {
        dry_run,
        initial_folder: dir,
    };

    let stats = Session::new(console, &config, options).run()?;
    info!(
        "Renamed {} file(s) in {} batch(es), {} failure(s)",
        stats.renamed, stats.batches, stats.failed
    );
    Ok(())
}

/// Run history commands
fn run_history_command(config: &AppConfig, action: HistoryCommands) -> Result<()> {
    let history = History::new(PathBuf::from(&config.history.path));

    match action {
        HistoryCommands::List { count } => {
            let entries = history.get_recent(count)?;
            println!("Recent history ({} entries):", entries.len());
            for entry in entries {
                let status = if entry.undone { "[UNDONE]" } else { "" };
                println!("  {} {} -> {} {}",
                    entry.timestamp.format("%Y-%m-%d %H:%M"),
                    entry.original_path.display(),
                    entry.new_path.display(),
                    status
                );
            }
        }
        HistoryCommands::Undo { batches, dry_run } => {
            let report = undo_batches(&history, batches, dry_run)?;

            if report.undone.is_empty() && report.skipped.is_empty() {
                println!("No renames to undo");
                return Ok(());
            }

            for entry in &report.undone {
                println!("{} {} -> {}",
                    if dry_run { "Would undo:" } else { "Undone:" },
                    entry.new_path.display(),
                    entry.original_path.display()
                );
            }
            for (entry, reason) in &report.skipped {
                eprintln!("Skip: {} ({})", entry.new_path.display(), reason);
            }
            println!("\nDone. {} undone, {} skipped.", report.undone.len(), report.skipped.len());
        }
        HistoryCommands::Clear { force } => {
            if !force {
                eprintln!("Use --force to confirm clearing history");
                return Ok(());
            }
            history.clear()?;
            println!("History cleared");
        }
    }

    Ok(())
}

/// Run config commands
fn run_config_command(
    config: &AppConfig,
    action: ConfigCommands,
    config_path: &Path,
) -> Result<()> {
    match action {
        ConfigCommands::Show => {
            let json = serde_json::to_string_pretty(config)?;
            println!("{}", json);
        }
        ConfigCommands::Generate { output } => {
            AppConfig::default().save(&output)?;
            println!("Generated config at {:?}", output);
        }
        ConfigCommands::Validate => {
            config.validate()?;
            println!("Configuration at {:?} is valid", config_path);
            println!("  Extensions: {:?}", config.rules.extensions);
            println!("  Separator: {:?}", config.rules.separator);
            println!("  On failure: {:?}", config.rules.on_failure);
            let history = if config.history.enabled {
                config.history.path.as_str()
            } else {
                "disabled"
            };
            println!("  History: {}", history);
        }
    }

    Ok(())
}
