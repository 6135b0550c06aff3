// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Jonathan D. A. Jewell <hyperpolymath>

//! Allow-list extension filter

use std::path::{Path, PathBuf};

/// Keeps only paths whose extension is in a fixed allow-list
#[derive(Debug, Clone)]
pub struct ImageFilter {
    extensions: Vec<String>,
}

impl ImageFilter {
    /// Build a filter; entries may carry a leading dot and any case
    pub fn new<I, S>(extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let extensions = extensions
            .into_iter()
            .map(|e| e.as_ref().trim().trim_start_matches('.').to_lowercase())
            .filter(|e| !e.is_empty())
            .collect();
        Self { extensions }
    }

    pub fn extensions(&self) -> &[String] {
        &self.extensions
    }

    /// Check if a path carries an allowed extension
    pub fn is_image(&self, path: &Path) -> bool {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) => {
                let ext = ext.to_lowercase();
                self.extensions.iter().any(|e| *e == ext)
            }
            None => false,
        }
    }

    /// Keep the matching entries, preserving their order
    pub fn filter(&self, listing: Vec<PathBuf>) -> Vec<PathBuf> {
        listing.into_iter().filter(|p| self.is_image(p)).collect()
    }
}
