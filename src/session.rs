// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Jonathan D. A. Jewell <hyperpolymath>

//! Interactive session loop
//!
//! The flow is a flat state machine:
//!
//! ```text
//! Start -> ListFiles -> { AskContinue (no images)
//!                       | ConfirmName -> { AskContinue (declined)
//!                                        | Rename -> AskContinue } }
//! AskContinue -> { Start | Exit }
//! ```
//!
//! Repeating goes back to `Start` inside the same loop; nothing carries over
//! between rounds.

use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::config::AppConfig;
use crate::executor::{execute, RenameProgress, RenameReport};
use crate::filter::ImageFilter;
use crate::folder::{list_entries, validate_folder};
use crate::history::History;
use crate::plan::{RenamePlan, RenameStep};
use crate::{RenamerError, Result};

/// Everything the session needs from the user and the screen
pub trait Console {
    /// Clear the screen and draw the banner
    fn show_header(&mut self);

    /// Ask for a folder until the answer passes [`validate_folder`]
    fn ask_folder(&mut self) -> Result<PathBuf>;

    /// Ask for a non-empty base name
    fn ask_base_name(&mut self) -> Result<String>;

    /// Yes/no before renaming `count` files; `pattern` reads like `"Trip - [n]"`
    fn confirm(&mut self, count: usize, pattern: &str) -> Result<bool>;

    /// `true` to start over with another folder, `false` to exit
    fn ask_continue(&mut self) -> Result<bool>;

    fn invalid_folder(&mut self, message: &str);
    fn found(&mut self, count: usize);
    fn no_images(&mut self);
    fn listing_failed(&mut self, error: &RenamerError);
    fn cancelled(&mut self);
    fn dry_run(&mut self, plan: &RenamePlan);
    fn collisions(&mut self, steps: &[&RenameStep]);
    fn report(&mut self, report: &RenameReport);
    fn goodbye(&mut self);

    /// Progress display for a batch of `total` renames
    fn progress(&mut self, total: usize) -> Box<dyn RenameProgress>;
}

/// Per-invocation switches from the command line
#[derive(Debug, Clone, Default)]
pub struct SessionOptions {
    pub dry_run: bool,
    /// Answer to the first folder prompt
    pub initial_folder: Option<String>,
}

/// Totals across every round of a session
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionStats {
    pub rounds: usize,
    pub batches: usize,
    pub renamed: usize,
    pub failed: usize,
}

enum State {
    Start,
    ListFiles(PathBuf),
    ConfirmName(PathBuf, Vec<PathBuf>),
    Rename(RenamePlan),
    AskContinue,
    Exit,
}

pub struct Session<'a, C: Console> {
    console: C,
    config: &'a AppConfig,
    filter: ImageFilter,
    history: Option<History>,
    options: SessionOptions,
}

impl<'a, C: Console> Session<'a, C> {
    pub fn new(console: C, config: &'a AppConfig, options: SessionOptions) -> Self {
        let history = config
            .history
            .enabled
            .then(|| History::new(PathBuf::from(&config.history.path)));

        Self {
            console,
            config,
            filter: ImageFilter::new(&config.rules.extensions),
            history,
            options,
        }
    }

    /// Drive the prompts until the user chooses to exit
    pub fn run(&mut self) -> Result<SessionStats> {
        let mut stats = SessionStats::default();
        let mut state = State::Start;

        loop {
            state = match state {
                State::Start => {
                    stats.rounds += 1;
                    self.console.show_header();
                    State::ListFiles(self.choose_folder()?)
                }
                State::ListFiles(folder) => self.list_images(&folder),
                State::ConfirmName(folder, images) => self.confirm_name(&folder, &images)?,
                State::Rename(plan) => {
                    if let Some(report) = self.rename(&plan) {
                        stats.batches += 1;
                        stats.renamed += report.succeeded();
                        stats.failed += report.failed();
                    }
                    State::AskContinue
                }
                State::AskContinue => {
                    if self.console.ask_continue()? {
                        State::Start
                    } else {
                        State::Exit
                    }
                }
                State::Exit => break,
            };
        }

        self.console.goodbye();
        info!("Session finished: {:?}", stats);
        Ok(stats)
    }

    pub fn into_console(self) -> C {
        self.console
    }

    fn choose_folder(&mut self) -> Result<PathBuf> {
        if let Some(initial) = self.options.initial_folder.take() {
            match validate_folder(&initial) {
                Ok(folder) => return Ok(folder),
                Err(message) => self.console.invalid_folder(message),
            }
        }
        self.console.ask_folder()
    }

    fn list_images(&mut self, folder: &Path) -> State {
        let listing = match list_entries(folder, self.config.rules.skip_directories) {
            Ok(listing) => listing,
            Err(e) => {
                self.console.listing_failed(&e);
                return State::AskContinue;
            }
        };

        let images = self.filter.filter(listing);
        debug!("{} image(s) in {:?}", images.len(), folder);

        if images.is_empty() {
            self.console.no_images();
            return State::AskContinue;
        }

        self.console.found(images.len());
        State::ConfirmName(folder.to_path_buf(), images)
    }

    fn confirm_name(&mut self, folder: &Path, images: &[PathBuf]) -> Result<State> {
        let base_name = self.console.ask_base_name()?;
        let plan = RenamePlan::build(folder, images, &base_name, &self.config.rules)?;

        let pattern = format!("{}{}[n]", plan.base_name, self.config.rules.separator);
        if !self.console.confirm(plan.len(), &pattern)? {
            self.console.cancelled();
            return Ok(State::AskContinue);
        }

        Ok(State::Rename(plan))
    }

    fn rename(&mut self, plan: &RenamePlan) -> Option<RenameReport> {
        if self.config.rules.collision_check {
            let colliding = plan.collisions();
            if !colliding.is_empty() {
                self.console.collisions(&colliding);
                return None;
            }
        }

        if self.options.dry_run {
            self.console.dry_run(plan);
            return None;
        }

        let mut progress = self.console.progress(plan.len());
        let report = execute(
            plan,
            self.config.rules.on_failure,
            progress.as_mut(),
            self.history.as_ref(),
        );
        self.console.report(&report);
        Some(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FailurePolicy;
    use crate::executor::NoProgress;
    use std::collections::VecDeque;
    use std::fs;

    /// Console that replays canned answers and records what it was told
    #[derive(Default)]
    struct Scripted {
        folders: VecDeque<PathBuf>,
        names: VecDeque<String>,
        confirms: VecDeque<bool>,
        continues: VecDeque<bool>,
        events: Vec<String>,
        reports: Vec<(usize, usize, usize)>,
    }

    impl Console for Scripted {
        fn show_header(&mut self) {
            self.events.push("header".into());
        }
        fn ask_folder(&mut self) -> Result<PathBuf> {
            Ok(self.folders.pop_front().expect("no folder scripted"))
        }
        fn ask_base_name(&mut self) -> Result<String> {
            Ok(self.names.pop_front().expect("no name scripted"))
        }
        fn confirm(&mut self, count: usize, pattern: &str) -> Result<bool> {
            self.events.push(format!("confirm {} {}", count, pattern));
            Ok(self.confirms.pop_front().expect("no confirm scripted"))
        }
        fn ask_continue(&mut self) -> Result<bool> {
            Ok(self.continues.pop_front().expect("no continue scripted"))
        }
        fn invalid_folder(&mut self, message: &str) {
            self.events.push(format!("invalid {}", message));
        }
        fn found(&mut self, count: usize) {
            self.events.push(format!("found {}", count));
        }
        fn no_images(&mut self) {
            self.events.push("no images".into());
        }
        fn listing_failed(&mut self, _error: &RenamerError) {
            self.events.push("listing failed".into());
        }
        fn cancelled(&mut self) {
            self.events.push("cancelled".into());
        }
        fn dry_run(&mut self, plan: &RenamePlan) {
            self.events.push(format!("dry run {}", plan.len()));
        }
        fn collisions(&mut self, steps: &[&RenameStep]) {
            self.events.push(format!("collisions {}", steps.len()));
        }
        fn report(&mut self, report: &RenameReport) {
            self.reports.push((report.succeeded(), report.failed(), report.skipped));
        }
        fn goodbye(&mut self) {
            self.events.push("goodbye".into());
        }
        fn progress(&mut self, _total: usize) -> Box<dyn RenameProgress> {
            Box::new(NoProgress)
        }
    }

    fn quiet_config() -> AppConfig {
        let mut config = AppConfig::default();
        config.ui.spinner_delay_ms = 0;
        config.ui.step_delay_ms = 0;
        config
    }

    fn populate(dir: &Path, names: &[&str]) {
        for name in names {
            fs::write(dir.join(name), name.as_bytes()).unwrap();
        }
    }

    fn names_in(dir: &Path) -> Vec<String> {
        let mut names: Vec<String> = fs::read_dir(dir)
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().to_string())
            .collect();
        names.sort();
        names
    }

    #[test]
    fn test_trip_scenario() {
        let dir = tempfile::tempdir().unwrap();
        populate(dir.path(), &["a.png", "notes.txt", "b.JPG", "c.gif"]);
        // Positions follow the directory listing order
        let listed = ImageFilter::new(&AppConfig::default().rules.extensions)
            .filter(list_entries(dir.path(), false).unwrap());

        let config = quiet_config();
        let console = Scripted {
            folders: VecDeque::from([dir.path().to_path_buf()]),
            names: VecDeque::from(["Trip".to_string()]),
            confirms: VecDeque::from([true]),
            continues: VecDeque::from([false]),
            ..Default::default()
        };
        let mut session = Session::new(console, &config, SessionOptions::default());
        let stats = session.run().unwrap();
        let console = session.into_console();

        assert_eq!(stats.renamed, 3);
        assert_eq!(stats.failed, 0);
        assert_eq!(console.reports, vec![(3, 0, 0)]);
        assert!(console.events.contains(&"found 3".to_string()));

        let mut expected: Vec<String> = listed
            .iter()
            .enumerate()
            .map(|(i, p)| format!("Trip - {}.{}", i + 1, p.extension().unwrap().to_str().unwrap()))
            .collect();
        expected.push("notes.txt".to_string());
        expected.sort();
        assert_eq!(names_in(dir.path()), expected);

        for (i, original) in listed.iter().enumerate() {
            let ext = original.extension().unwrap().to_str().unwrap();
            let renamed = dir.path().join(format!("Trip - {}.{}", i + 1, ext));
            let content = fs::read(&renamed).unwrap();
            assert_eq!(content, original.file_name().unwrap().to_string_lossy().as_bytes());
        }
    }

    #[test]
    fn test_declining_leaves_files_alone() {
        let dir = tempfile::tempdir().unwrap();
        populate(dir.path(), &["a.png", "b.jpg"]);

        let config = quiet_config();
        let console = Scripted {
            folders: VecDeque::from([dir.path().to_path_buf()]),
            names: VecDeque::from(["Trip".to_string()]),
            confirms: VecDeque::from([false]),
            continues: VecDeque::from([false]),
            ..Default::default()
        };
        let mut session = Session::new(console, &config, SessionOptions::default());
        let stats = session.run().unwrap();

        assert_eq!(stats.batches, 0);
        assert_eq!(names_in(dir.path()), vec!["a.png", "b.jpg"]);
        assert!(session.into_console().events.contains(&"cancelled".to_string()));
    }

    #[test]
    fn test_empty_folder_returns_to_start() {
        let empty = tempfile::tempdir().unwrap();
        populate(empty.path(), &["notes.txt"]);
        let full = tempfile::tempdir().unwrap();
        populate(full.path(), &["x.webp"]);

        let config = quiet_config();
        let console = Scripted {
            folders: VecDeque::from([empty.path().to_path_buf(), full.path().to_path_buf()]),
            names: VecDeque::from(["Cat".to_string()]),
            confirms: VecDeque::from([true]),
            continues: VecDeque::from([true, false]),
            ..Default::default()
        };
        let mut session = Session::new(console, &config, SessionOptions::default());
        let stats = session.run().unwrap();
        let console = session.into_console();

        assert_eq!(stats.rounds, 2);
        assert_eq!(stats.renamed, 1);
        assert_eq!(names_in(empty.path()), vec!["notes.txt"]);
        assert_eq!(names_in(full.path()), vec!["Cat - 1.webp"]);
        assert_eq!(
            console.events,
            vec!["header", "no images", "header", "found 1", "confirm 1 Cat - [n]", "goodbye"]
        );
    }

    #[test]
    fn test_initial_folder_skips_prompt_when_valid() {
        let dir = tempfile::tempdir().unwrap();
        populate(dir.path(), &["a.png"]);

        let config = quiet_config();
        let console = Scripted {
            names: VecDeque::from(["Trip".to_string()]),
            confirms: VecDeque::from([true]),
            continues: VecDeque::from([false]),
            ..Default::default()
        };
        let options = SessionOptions {
            initial_folder: Some(dir.path().to_string_lossy().to_string()),
            ..Default::default()
        };
        let mut session = Session::new(console, &config, options);
        session.run().unwrap();

        assert_eq!(names_in(dir.path()), vec!["Trip - 1.png"]);
    }

    #[test]
    fn test_invalid_initial_folder_falls_back_to_prompt() {
        let dir = tempfile::tempdir().unwrap();
        populate(dir.path(), &["notes.txt"]);

        let config = quiet_config();
        let console = Scripted {
            folders: VecDeque::from([dir.path().to_path_buf()]),
            continues: VecDeque::from([false]),
            ..Default::default()
        };
        let options = SessionOptions {
            initial_folder: Some(dir.path().join("missing").to_string_lossy().to_string()),
            ..Default::default()
        };
        let mut session = Session::new(console, &config, options);
        session.run().unwrap();

        let events = session.into_console().events;
        assert!(events[1].starts_with("invalid "));
        assert_eq!(events[2], "no images");
    }

    #[test]
    fn test_dry_run_renames_nothing() {
        let dir = tempfile::tempdir().unwrap();
        populate(dir.path(), &["a.png", "b.png"]);

        let config = quiet_config();
        let console = Scripted {
            folders: VecDeque::from([dir.path().to_path_buf()]),
            names: VecDeque::from(["Trip".to_string()]),
            confirms: VecDeque::from([true]),
            continues: VecDeque::from([false]),
            ..Default::default()
        };
        let options = SessionOptions { dry_run: true, ..Default::default() };
        let mut session = Session::new(console, &config, options);
        let stats = session.run().unwrap();

        assert_eq!(stats.batches, 0);
        assert_eq!(names_in(dir.path()), vec!["a.png", "b.png"]);
        assert!(session.into_console().events.contains(&"dry run 2".to_string()));
    }

    /// A directory already sitting at the destination name; run these with
    /// `skip_directories` so the directory itself is not a candidate
    fn blocked_folder() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        populate(dir.path(), &["a.png"]);
        fs::create_dir(dir.path().join("Trip - 1.png")).unwrap();
        dir
    }

    fn one_round(dir: &Path) -> Scripted {
        Scripted {
            folders: VecDeque::from([dir.to_path_buf()]),
            names: VecDeque::from(["Trip".to_string()]),
            confirms: VecDeque::from([true]),
            continues: VecDeque::from([false]),
            ..Default::default()
        }
    }

    #[test]
    fn test_collision_check_refuses_plan() {
        let dir = blocked_folder();
        let mut config = quiet_config();
        config.rules.collision_check = true;
        config.rules.skip_directories = true;

        let mut session = Session::new(one_round(dir.path()), &config, SessionOptions::default());
        let stats = session.run().unwrap();

        assert_eq!(stats.batches, 0);
        assert!(session.into_console().events.contains(&"collisions 1".to_string()));
        assert!(dir.path().join("a.png").is_file());
    }

    #[cfg(unix)]
    #[test]
    fn test_rename_failure_is_reported_not_fatal() {
        let dir = blocked_folder();
        let mut config = quiet_config();
        config.rules.skip_directories = true;
        assert_eq!(config.rules.on_failure, FailurePolicy::Abort);

        let mut session = Session::new(one_round(dir.path()), &config, SessionOptions::default());
        let stats = session.run().unwrap();
        let console = session.into_console();

        assert_eq!(stats.failed, 1);
        assert_eq!(console.reports, vec![(0, 1, 0)]);
        assert_eq!(console.events.last().map(String::as_str), Some("goodbye"));
        assert!(dir.path().join("a.png").is_file());
    }

    #[test]
    fn test_unreadable_folder_goes_to_continue_prompt() {
        let dir = tempfile::tempdir().unwrap();
        let gone = dir.path().join("gone");

        let config = quiet_config();
        let console = Scripted {
            folders: VecDeque::from([gone]),
            continues: VecDeque::from([false]),
            ..Default::default()
        };
        let mut session = Session::new(console, &config, SessionOptions::default());
        let stats = session.run().unwrap();

        assert_eq!(stats.batches, 0);
        assert_eq!(
            session.into_console().events,
            vec!["header", "listing failed", "goodbye"]
        );
    }

    #[test]
    fn test_directory_with_image_name_takes_a_number() {
        let dir = tempfile::tempdir().unwrap();
        populate(dir.path(), &["a.png"]);
        fs::create_dir(dir.path().join("album.jpg")).unwrap();

        let config = quiet_config();
        let mut session = Session::new(one_round(dir.path()), &config, SessionOptions::default());
        let stats = session.run().unwrap();

        assert_eq!(stats.renamed, 2);
        let names = names_in(dir.path());
        assert_eq!(names.len(), 2);
        assert!(names.iter().all(|n| n.starts_with("Trip - ")));
        assert!(names.iter().any(|n| dir.path().join(n).is_dir()));
    }
}
