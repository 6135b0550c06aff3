// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Jonathan D. A. Jewell <hyperpolymath>

//! Rename executor
//!
//! Applies a [`RenamePlan`] one step at a time. Nothing is rolled back: with
//! [`FailurePolicy::Abort`] the files renamed before the failure keep their
//! new names and the rest are left alone.

use tracing::{debug, info, warn};

use crate::config::FailurePolicy;
use crate::history::{calculate_file_hash, create_entry, History};
use crate::plan::{RenamePlan, RenameStep};

/// Observer for a running batch
pub trait RenameProgress {
    /// Called once before the first step
    fn start(&mut self, _total: usize) {}

    /// Called before step `index` (0-based) is attempted
    fn step(&mut self, index: usize, step: &RenameStep);

    /// Called once with the final report
    fn finish(&mut self, _report: &RenameReport) {}
}

/// Progress sink that ignores everything
pub struct NoProgress;

impl RenameProgress for NoProgress {
    fn step(&mut self, _index: usize, _step: &RenameStep) {}
}

/// A step that could not be applied
#[derive(Debug, Clone)]
pub struct RenameFailure {
    pub step: RenameStep,
    pub message: String,
}

/// Outcome of a batch
#[derive(Debug, Clone, Default)]
pub struct RenameReport {
    pub renamed: Vec<RenameStep>,
    pub failures: Vec<RenameFailure>,
    /// Steps never attempted because the batch aborted
    pub skipped: usize,
}

impl RenameReport {
    pub fn succeeded(&self) -> usize {
        self.renamed.len()
    }

    pub fn failed(&self) -> usize {
        self.failures.len()
    }

    pub fn aborted(&self) -> bool {
        self.skipped > 0
    }
}

/// Run every step of `plan` in order
pub fn execute(
    plan: &RenamePlan,
    policy: FailurePolicy,
    progress: &mut dyn RenameProgress,
    history: Option<&History>,
) -> RenameReport {
    let mut report = RenameReport::default();
    let batch_id = uuid::Uuid::new_v4().to_string();
    let total = plan.len();

    progress.start(total);
    info!("Renaming {} file(s) in {:?}", total, plan.folder);

    for (index, step) in plan.steps.iter().enumerate() {
        progress.step(index, step);

        if step.is_noop() {
            debug!("Already named {:?}", step.to);
            report.renamed.push(step.clone());
            continue;
        }

        match std::fs::rename(&step.from, &step.to) {
            Ok(()) => {
                info!("Renamed {:?} -> {:?}", step.from, step.to);
                if let Some(history) = history {
                    record(history, &batch_id, &plan.base_name, step);
                }
                report.renamed.push(step.clone());
            }
            Err(e) => {
                warn!("Failed to rename {:?} -> {:?}: {}", step.from, step.to, e);
                report.failures.push(RenameFailure {
                    step: step.clone(),
                    message: e.to_string(),
                });
                if policy == FailurePolicy::Abort {
                    report.skipped = total - index - 1;
                    break;
                }
            }
        }
    }

    progress.finish(&report);
    report
}

fn record(history: &History, batch_id: &str, base_name: &str, step: &RenameStep) {
    let result = calculate_file_hash(&step.to).and_then(|hash| {
        let entry = create_entry(batch_id, step.from.clone(), step.to.clone(), base_name, hash);
        history.append(&entry)
    });
    if let Err(e) = result {
        warn!("Failed to write history for {:?}: {}", step.to, e);
    }
}
