// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Jonathan D. A. Jewell <hyperpolymath>

//! Rename planning
//!
//! A plan is the full list of `(source, destination)` pairs for one batch,
//! computed before anything on disk changes. Step `i` of the filtered list
//! becomes `"<base><separator><start_index + i>.<ext>"`, with the extension
//! kept exactly as it was.

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::config::RuleConfig;
use crate::{RenamerError, Result};

/// One file's move within a batch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenameStep {
    pub from: PathBuf,
    pub to: PathBuf,
}

impl RenameStep {
    /// File name of the source, for display
    pub fn from_name(&self) -> String {
        display_name(&self.from)
    }

    /// File name of the destination, for display
    pub fn to_name(&self) -> String {
        display_name(&self.to)
    }

    pub fn is_noop(&self) -> bool {
        self.from == self.to
    }
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string())
}

/// Build a destination file name
pub fn target_name(base: &str, separator: &str, index: usize, ext: &str) -> String {
    format!("{}{}{}.{}", base, separator, index, ext)
}

/// All renames for one batch, in execution order
#[derive(Debug, Clone)]
pub struct RenamePlan {
    pub folder: PathBuf,
    pub base_name: String,
    pub steps: Vec<RenameStep>,
}

impl RenamePlan {
    /// Compute the plan for `files`, which must already be filtered.
    ///
    /// The base name is used exactly as given; only an empty name is refused.
    pub fn build(
        folder: &Path,
        files: &[PathBuf],
        base_name: &str,
        rules: &RuleConfig,
    ) -> Result<Self> {
        if base_name.is_empty() {
            return Err(RenamerError::EmptyBaseName);
        }

        let steps = files
            .iter()
            .enumerate()
            .map(|(i, from)| {
                let ext = from.extension().and_then(|e| e.to_str()).unwrap_or("");
                let name = target_name(base_name, &rules.separator, rules.start_index + i, ext);
                RenameStep {
                    from: from.clone(),
                    to: folder.join(name),
                }
            })
            .collect();

        Ok(Self {
            folder: folder.to_path_buf(),
            base_name: base_name.to_string(),
            steps,
        })
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Steps whose destination would overwrite something.
    ///
    /// A destination is safe when it is the step's own source or the source of
    /// an earlier step (moved away by the time this step runs). Any other
    /// existing file at the destination, including a later step's source, is
    /// a collision.
    pub fn collisions(&self) -> Vec<&RenameStep> {
        let mut moved_away: HashSet<&Path> = HashSet::new();
        let mut colliding = Vec::new();

        for step in &self.steps {
            let occupied = step.to.symlink_metadata().is_ok();
            if occupied && !step.is_noop() && !moved_away.contains(step.to.as_path()) {
                debug!("Collision: {:?} -> {:?}", step.from, step.to);
                colliding.push(step);
            }
            moved_away.insert(step.from.as_path());
        }

        colliding
    }
}
