//! Observational reporting for batch runs.
//!
//! Sinks receive events as the runner makes progress and the final
//! [`BatchSummary`]; they never influence what gets patched or written.

pub mod json;
pub mod text;

pub use json::JsonReport;
pub use text::TextReport;

use crate::core::batch::PatchOutcome;
use crate::core::rules::RuleChange;
use serde::Serialize;
use std::path::Path;

/// Receives progress events from the batch runner.
pub trait ReportSink {
    fn file_started(&mut self, path: &Path);
    fn rule_applied(&mut self, path: &Path, change: &RuleChange);
    fn file_finished(&mut self, outcome: &PatchOutcome);
    fn finish(&mut self, summary: &BatchSummary);
}

/// Sink that drops every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullReport;

impl ReportSink for NullReport {
    fn file_started(&mut self, _path: &Path) {}
    fn rule_applied(&mut self, _path: &Path, _change: &RuleChange) {}
    fn file_finished(&mut self, _outcome: &PatchOutcome) {}
    fn finish(&mut self, _summary: &BatchSummary) {}
}

/// One error attributed to the document it came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorEntry {
    pub file: String,
    pub message: String,
}

/// Aggregate result of a batch run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BatchSummary {
    pub dry_run: bool,
    pub files_scanned: usize,
    pub files_changed: usize,
    pub outcomes: Vec<PatchOutcome>,
    pub errors: Vec<ErrorEntry>,
}

impl BatchSummary {
    pub fn new(dry_run: bool) -> Self {
        Self {
            dry_run,
            files_scanned: 0,
            files_changed: 0,
            outcomes: Vec::new(),
            errors: Vec::new(),
        }
    }

    /// Fold one document outcome into the totals.
    pub fn record(&mut self, outcome: PatchOutcome) {
        self.files_scanned += 1;
        if outcome.changed {
            self.files_changed += 1;
        }
        self.errors
            .extend(outcome.errors.iter().map(|message| ErrorEntry {
                file: outcome.file.clone(),
                message: message.clone(),
            }));
        self.outcomes.push(outcome);
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    pub fn has_changes(&self) -> bool {
        self.files_changed > 0
    }
}
