// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Jonathan D. A. Jewell <hyperpolymath>

//! History management for undo support
//!
//! Each confirmed run is one batch; every successful rename in it appends a
//! JSON line sharing the batch id.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs::{self, File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::Result;

/// A single rename operation in history
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub id: String,
    pub batch_id: String,
    pub timestamp: DateTime<Utc>,
    pub original_path: PathBuf,
    pub new_path: PathBuf,
    pub base_name: String,
    pub file_hash: String,
    #[serde(default)]
    pub undone: bool,
}

/// History manager for tracking file renames
pub struct History {
    path: PathBuf,
}

impl History {
    /// Create a new history manager
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// Append an entry to the history
    pub fn append(&self, entry: &HistoryEntry) -> Result<()> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;

        let json = serde_json::to_string(entry)?;
        writeln!(file, "{}", json)?;

        Ok(())
    }

    /// Read all history entries, oldest first
    pub fn read_all(&self) -> Result<Vec<HistoryEntry>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }

        let file = File::open(&self.path)?;
        let reader = BufReader::new(file);

        let mut entries = Vec::new();
        for line in reader.lines() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            match serde_json::from_str(&line) {
                Ok(entry) => entries.push(entry),
                Err(e) => {
                    warn!("Failed to parse history entry: {}", e);
                }
            }
        }

        Ok(entries)
    }

    /// Get the most recent N entries (newest first)
    pub fn get_recent(&self, count: usize) -> Result<Vec<HistoryEntry>> {
        let mut entries = self.read_all()?;
        entries.reverse();
        entries.truncate(count);
        Ok(entries)
    }

    /// Entries of the newest `count` batches that still have undoable
    /// renames, newest rename first
    pub fn recent_batches(&self, count: usize) -> Result<Vec<HistoryEntry>> {
        let mut undoable: Vec<HistoryEntry> =
            self.read_all()?.into_iter().filter(|e| !e.undone).collect();
        undoable.reverse();

        let mut batches: Vec<String> = Vec::new();
        for entry in &undoable {
            if !batches.contains(&entry.batch_id) {
                batches.push(entry.batch_id.clone());
            }
        }
        batches.truncate(count);

        Ok(undoable
            .into_iter()
            .filter(|e| batches.contains(&e.batch_id))
            .collect())
    }

    /// Mark entries as undone
    pub fn mark_undone(&self, ids: &[String]) -> Result<()> {
        if ids.is_empty() {
            return Ok(());
        }
        let ids: HashSet<&str> = ids.iter().map(String::as_str).collect();
        let entries = self.read_all()?;

        // Rewrite the entire file with the updated entries
        let file = File::create(&self.path)?;
        let mut writer = std::io::BufWriter::new(file);

        for mut entry in entries {
            if ids.contains(entry.id.as_str()) {
                entry.undone = true;
            }
            let json = serde_json::to_string(&entry)?;
            writeln!(writer, "{}", json)?;
        }
        writer.flush()?;

        Ok(())
    }

    /// Clear all history
    pub fn clear(&self) -> Result<()> {
        if self.path.exists() {
            fs::remove_file(&self.path)?;
        }
        Ok(())
    }

    /// Get history file path
    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Create a new history entry
pub fn create_entry(
    batch_id: &str,
    original_path: PathBuf,
    new_path: PathBuf,
    base_name: &str,
    file_hash: String,
) -> HistoryEntry {
    HistoryEntry {
        id: uuid::Uuid::new_v4().to_string(),
        batch_id: batch_id.to_string(),
        timestamp: Utc::now(),
        original_path,
        new_path,
        base_name: base_name.to_string(),
        file_hash,
        undone: false,
    }
}

/// Calculate a file's content hash
pub fn calculate_file_hash(path: &Path) -> Result<String> {
    let data = fs::read(path)?;
    let hash = blake3::hash(&data);
    Ok(hash.to_hex().to_string())
}

/// Why an entry could not be undone
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    Missing,
    OriginalOccupied,
    ContentChanged,
    Failed(String),
}

impl std::fmt::Display for SkipReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SkipReason::Missing => write!(f, "file not found, may have been moved/deleted"),
            SkipReason::OriginalOccupied => write!(f, "original path already exists"),
            SkipReason::ContentChanged => write!(f, "file content changed since rename"),
            SkipReason::Failed(e) => write!(f, "{}", e),
        }
    }
}

/// Outcome of an undo pass
#[derive(Debug, Default)]
pub struct UndoReport {
    pub undone: Vec<HistoryEntry>,
    pub skipped: Vec<(HistoryEntry, SkipReason)>,
}

/// Reverse the renames of the newest `batches` batches.
///
/// With `dry_run` nothing moves and the history is left untouched; `undone`
/// then lists what would be reversed.
pub fn undo_batches(history: &History, batches: usize, dry_run: bool) -> Result<UndoReport> {
    let mut report = UndoReport::default();

    for entry in history.recent_batches(batches)? {
        if entry.new_path.symlink_metadata().is_err() {
            report.skipped.push((entry, SkipReason::Missing));
            continue;
        }
        if entry.original_path.symlink_metadata().is_ok() {
            report.skipped.push((entry, SkipReason::OriginalOccupied));
            continue;
        }
        match calculate_file_hash(&entry.new_path) {
            Ok(hash) if hash == entry.file_hash => {}
            Ok(_) => {
                report.skipped.push((entry, SkipReason::ContentChanged));
                continue;
            }
            Err(e) => {
                report.skipped.push((entry, SkipReason::Failed(e.to_string())));
                continue;
            }
        }

        if dry_run {
            report.undone.push(entry);
            continue;
        }

        match fs::rename(&entry.new_path, &entry.original_path) {
            Ok(()) => {
                info!("Undone: {:?} -> {:?}", entry.new_path, entry.original_path);
                report.undone.push(entry);
            }
            Err(e) => {
                warn!("Undo failed for {:?}: {}", entry.new_path, e);
                report.skipped.push((entry, SkipReason::Failed(e.to_string())));
            }
        }
    }

    if !dry_run {
        let ids: Vec<String> = report.undone.iter().map(|e| e.id.clone()).collect();
        history.mark_undone(&ids)?;
    }

    Ok(report)
}
