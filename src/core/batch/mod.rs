use crate::core::config::PatchConfig;
use crate::core::document::WorkflowDocument;
use crate::core::error::PatchError;
use crate::core::report::{BatchSummary, ReportSink};
use crate::core::rules::{RuleChange, RuleSet};
use globset::{Glob, GlobMatcher};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, info_span, warn};

/// Result of patching a single document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PatchOutcome {
    /// File name, used as the document label in reports.
    pub file: String,
    pub path: PathBuf,
    /// At least one rule changed the document.
    pub changed: bool,
    /// The changed document was persisted.
    pub written: bool,
    pub changes: Vec<RuleChange>,
    pub errors: Vec<String>,
}

impl PatchOutcome {
    fn new(path: &Path) -> Self {
        Self {
            file: file_label(path),
            path: path.to_path_buf(),
            changed: false,
            written: false,
            changes: Vec::new(),
            errors: Vec::new(),
        }
    }
}

/// Whether changed documents are persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteMode {
    Write,
    DryRun,
}

/// Applies the rule set to every document of a corpus, one document at a time.
///
/// Nothing is shared between documents: a failure while loading, patching or
/// writing one document is recorded in its outcome and the run continues.
pub struct BatchRunner {
    rules: RuleSet,
    mode: WriteMode,
}

impl BatchRunner {
    pub fn new(rules: RuleSet, mode: WriteMode) -> Self {
        Self { rules, mode }
    }

    pub fn from_config(config: &PatchConfig, mode: WriteMode) -> Result<Self, PatchError> {
        Ok(Self::new(RuleSet::from_config(config)?, mode))
    }

    /// Regular files directly inside `dir` whose file name matches `pattern`,
    /// sorted lexicographically by file name.
    pub fn discover(dir: &Path, pattern: &str) -> Result<Vec<PathBuf>, PatchError> {
        let discovery_error = |message: String| PatchError::Discovery {
            path: dir.to_path_buf(),
            message,
        };
        let matcher: GlobMatcher = Glob::new(pattern)
            .map_err(|e| discovery_error(format!("invalid pattern '{}': {}", pattern, e)))?
            .compile_matcher();

        let entries = fs::read_dir(dir).map_err(|e| discovery_error(e.to_string()))?;
        let mut files = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| discovery_error(e.to_string()))?;
            let path = entry.path();
            if !path.is_file() {
                continue;
            }
            if matcher.is_match(entry.file_name()) {
                files.push(path);
            }
        }
        files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
        Ok(files)
    }

    /// Enumerate and patch a corpus directory.
    pub fn run(
        &self,
        dir: &Path,
        pattern: &str,
        sink: &mut dyn ReportSink,
    ) -> Result<BatchSummary, PatchError> {
        let files = Self::discover(dir, pattern)?;
        info!(dir = %dir.display(), pattern, files = files.len(), "starting patch run");
        Ok(self.run_files(&files, sink))
    }

    /// Patch an explicit, already ordered list of documents.
    pub fn run_files(&self, files: &[PathBuf], sink: &mut dyn ReportSink) -> BatchSummary {
        let mut summary = BatchSummary::new(self.mode == WriteMode::DryRun);
        for path in files {
            summary.record(self.patch_file(path, sink));
        }
        sink.finish(&summary);
        info!(
            scanned = summary.files_scanned,
            changed = summary.files_changed,
            errors = summary.errors.len(),
            "patch run finished"
        );
        summary
    }

    /// Load, patch and (when changed) write one document.
    pub fn patch_file(&self, path: &Path, sink: &mut dyn ReportSink) -> PatchOutcome {
        let mut outcome = PatchOutcome::new(path);
        let _span = info_span!("document", file = %outcome.file).entered();
        sink.file_started(path);

        let mut document = match WorkflowDocument::load(path) {
            Ok(document) => document,
            Err(err) => {
                warn!(error = %err, "skipping unreadable document");
                outcome.errors.push(err.to_string());
                sink.file_finished(&outcome);
                return outcome;
            }
        };

        let patch = self.rules.apply(&mut document);
        for change in &patch.changes {
            sink.rule_applied(path, change);
        }
        outcome.changed = patch.changed();
        outcome.errors.extend(patch.errors.iter().map(ToString::to_string));
        outcome.changes = patch.changes;

        if outcome.changed && self.mode == WriteMode::Write {
            match document.save() {
                Ok(()) => {
                    outcome.written = true;
                    debug!("document written");
                }
                Err(err) => {
                    warn!(error = %err, "failed to write patched document");
                    outcome.errors.push(err.to_string());
                }
            }
        }

        sink.file_finished(&outcome);
        outcome
    }
}

fn file_label(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
