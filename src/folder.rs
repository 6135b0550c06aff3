// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Jonathan D. A. Jewell <hyperpolymath>

//! Folder validation and directory listing

use std::path::{Path, PathBuf};
use tracing::debug;

use crate::Result;

pub const MSG_NOT_FOUND: &str = "Folder not found! Make sure the path is correct.";
pub const MSG_NOT_A_FOLDER: &str = "The given path is not a folder.";

/// Turn raw prompt input into a path, expanding a leading `~`
pub fn resolve_input(input: &str) -> PathBuf {
    let input = input.trim();

    if input == "~" || input.starts_with("~/") {
        if let Some(home) = home::home_dir() {
            return match input.strip_prefix("~/") {
                Some(rest) => home.join(rest),
                None => home,
            };
        }
    }

    PathBuf::from(input)
}

/// Check a folder path typed by the user.
///
/// Returns the message to show when the path is unusable. The check uses
/// `symlink_metadata`, so a symlink pointing at a directory is rejected.
pub fn validate_folder(input: &str) -> std::result::Result<PathBuf, &'static str> {
    let path = resolve_input(input);
    if input.trim().is_empty() {
        return Err(MSG_NOT_FOUND);
    }

    match std::fs::symlink_metadata(&path) {
        Ok(meta) if meta.is_dir() => Ok(path),
        Ok(_) => Err(MSG_NOT_A_FOLDER),
        Err(_) => Err(MSG_NOT_FOUND),
    }
}

/// List a folder's entries in the order the OS returns them.
///
/// Directories are included unless `skip_directories` is set.
pub fn list_entries(dir: &Path, skip_directories: bool) -> Result<Vec<PathBuf>> {
    let mut entries = Vec::new();

    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        if skip_directories && entry.file_type()?.is_dir() {
            debug!("Skipping directory {:?}", entry.path());
            continue;
        }
        entries.push(entry.path());
    }

    debug!("Listed {} entries in {:?}", entries.len(), dir);
    Ok(entries)
}
