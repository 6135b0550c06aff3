// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Jonathan D. A. Jewell <hyperpolymath>

//! Terminal console: banner, prompts, spinner and coloured status lines

use colored::Colorize;
use crossterm::cursor::MoveTo;
use crossterm::execute;
use crossterm::terminal::{Clear, ClearType};
use dialoguer::theme::ColorfulTheme;
use dialoguer::{Confirm, Input, Select};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;
use std::thread::sleep;
use std::time::Duration;
use tracing::warn;

use crate::config::UiConfig;
use crate::executor::{RenameProgress, RenameReport};
use crate::folder::validate_folder;
use crate::plan::{RenamePlan, RenameStep};
use crate::session::Console;
use crate::{RenamerError, Result};

const BANNER: &str = r"
 ___                   ____
|_ _|_ __ ___   __ _  |  _ \ ___ _ __   __ _ _ __ ___   ___ _ __
 | || '_ ` _ \ / _` | | |_) / _ \ '_ \ / _` | '_ ` _ \ / _ \ '__|
 | || | | | | | (_| | |  _ <  __/ | | | (_| | | | | | |  __/ |
|___|_| |_| |_|\__, | |_| \_\___|_| |_|\__,_|_| |_| |_|\___|_|
               |___/
";

/// Interactive console backed by stdin/stdout
pub struct TerminalConsole {
    theme: ColorfulTheme,
    ui: UiConfig,
}

impl TerminalConsole {
    pub fn new(ui: UiConfig) -> Self {
        if !ui.colors {
            colored::control::set_override(false);
        }
        Self {
            theme: ColorfulTheme::default(),
            ui,
        }
    }
}

impl Console for TerminalConsole {
    fn show_header(&mut self) {
        if !self.ui.banner {
            return;
        }
        let mut stdout = std::io::stdout();
        if let Err(e) = execute!(stdout, Clear(ClearType::All), MoveTo(0, 0)) {
            warn!("Failed to clear screen: {}", e);
        }
        println!("{}", BANNER.cyan());
        println!("{}", "---------------------------------------------------".dimmed());
        println!("{}", "           CLI Bulk Image Renamer Tool             ".dimmed());
        println!("{}", "---------------------------------------------------\n".dimmed());
    }

    fn ask_folder(&mut self) -> Result<PathBuf> {
        let input: String = Input::with_theme(&self.theme)
            .with_prompt("📂 Enter the image folder path")
            .validate_with(|input: &String| validate_folder(input).map(|_| ()))
            .interact_text()?;

        validate_folder(&input).map_err(|m| RenamerError::InvalidFolder(m.to_string()))
    }

    fn ask_base_name(&mut self) -> Result<String> {
        let name: String = Input::with_theme(&self.theme)
            .with_prompt("📝 Enter the new file name (without numbers)")
            .allow_empty(true)
            .validate_with(|input: &String| {
                if input.is_empty() {
                    Err("File name must not be empty!")
                } else {
                    Ok(())
                }
            })
            .interact_text()?;

        Ok(name)
    }

    fn confirm(&mut self, count: usize, pattern: &str) -> Result<bool> {
        let answer = Confirm::with_theme(&self.theme)
            .with_prompt(format!("Rename {} file(s) to \"{}\"?", count, pattern))
            .default(true)
            .interact()?;
        Ok(answer)
    }

    fn ask_continue(&mut self) -> Result<bool> {
        println!();
        let choice = Select::with_theme(&self.theme)
            .with_prompt("What would you like to do next?")
            .items(&["🔄 Choose another folder", "🚪 Exit"])
            .default(0)
            .interact()?;
        Ok(choice == 0)
    }

    fn invalid_folder(&mut self, message: &str) {
        println!("{}", message.red());
    }

    fn found(&mut self, count: usize) {
        println!("{}", format!("✓ Found {} image file(s).", count).green());
    }

    fn no_images(&mut self) {
        println!("{}", "\n⚠️  No image files in that folder.\n".yellow());
    }

    fn listing_failed(&mut self, error: &RenamerError) {
        println!("{}", format!("\n⚠️  Could not read the folder: {}\n", error).yellow());
    }

    fn cancelled(&mut self) {
        println!("{}", "❌ Cancelled.".red());
    }

    fn dry_run(&mut self, plan: &RenamePlan) {
        println!("{}", "\n[DRY RUN] Nothing will be renamed.".cyan());
        for step in &plan.steps {
            println!("   {} -> {}", step.from_name(), step.to_name().green());
        }
    }

    fn collisions(&mut self, steps: &[&RenameStep]) {
        println!("{}", "\n⚠️  Renaming would overwrite existing files:".yellow());
        for step in steps {
            println!("   {} -> {}", step.from_name(), step.to_name().red());
        }
        println!("{}", "Nothing was renamed.".yellow());
    }

    fn report(&mut self, report: &RenameReport) {
        println!("{}", "\n📊 Report:".cyan());
        println!("   Renamed: {}", report.succeeded().to_string().green());
        println!("   Failed : {}", report.failed().to_string().red());
        if report.aborted() {
            println!("   Skipped: {}", report.skipped.to_string().yellow());
        }
        for failure in &report.failures {
            println!(
                "{}",
                format!(
                    "   {} -> {}: {}",
                    failure.step.from_name(),
                    failure.step.to_name(),
                    failure.message
                )
                .red()
            );
        }
    }

    fn goodbye(&mut self) {
        println!("{}", "\nThanks for using Image Renamer CLI! 👋\n".blue());
    }

    fn progress(&mut self, _total: usize) -> Box<dyn RenameProgress> {
        Box::new(SpinnerProgress::new(&self.ui))
    }
}

/// Spinner showing the file currently being renamed
pub struct SpinnerProgress {
    bar: ProgressBar,
    spinner_delay: Duration,
    step_delay: Duration,
}

impl SpinnerProgress {
    pub fn new(ui: &UiConfig) -> Self {
        let bar = ProgressBar::new_spinner();
        let style = ProgressStyle::with_template("{spinner:.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner());
        bar.set_style(style);

        Self {
            bar,
            spinner_delay: Duration::from_millis(ui.spinner_delay_ms),
            step_delay: Duration::from_millis(ui.step_delay_ms),
        }
    }
}

impl RenameProgress for SpinnerProgress {
    fn start(&mut self, _total: usize) {
        println!();
        self.bar.set_message("Starting rename...");
        self.bar.enable_steady_tick(Duration::from_millis(80));
        sleep(self.spinner_delay);
    }

    fn step(&mut self, index: usize, step: &RenameStep) {
        if index > 0 {
            sleep(self.step_delay);
        }
        self.bar
            .set_message(format!("Renaming: {} -> {}", step.from_name(), step.to_name()));
    }

    fn finish(&mut self, report: &RenameReport) {
        if report.failures.is_empty() {
            self.bar.finish_with_message("✔ Done!".green().to_string());
        } else {
            let message = "✖ An error occurred while processing files.".red();
            self.bar.abandon_with_message(message.to_string());
        }
    }
}
