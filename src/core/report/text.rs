use super::{BatchSummary, ReportSink};
use crate::core::batch::PatchOutcome;
use crate::core::rules::RuleChange;
use std::fmt;
use std::io::Write;
use std::path::Path;

const RULE_WIDTH: usize = 60;

/// Human-readable console report.
pub struct TextReport<W: Write> {
    out: W,
    dry_run: bool,
}

impl<W: Write> TextReport<W> {
    pub fn new(out: W, dry_run: bool) -> Self {
        Self { out, dry_run }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn line(&mut self, args: fmt::Arguments<'_>) {
        if let Err(err) = writeln!(self.out, "{}", args) {
            tracing::debug!(error = %err, "report output unavailable");
        }
    }

    fn banner(&mut self) {
        self.line(format_args!("{}", "=".repeat(RULE_WIDTH)));
    }
}

impl<W: Write> ReportSink for TextReport<W> {
    fn file_started(&mut self, path: &Path) {
        let name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        self.line(format_args!("Patching: {}", name));
    }

    fn rule_applied(&mut self, _path: &Path, change: &RuleChange) {
        self.line(format_args!("  + {}: {}", change.notice, change.node));
    }

    fn file_finished(&mut self, outcome: &PatchOutcome) {
        if outcome.changed && self.dry_run {
            self.line(format_args!("  ~ Would modify file"));
        } else if outcome.changed && outcome.written {
            self.line(format_args!("  * File modified"));
        } else if outcome.changed {
            self.line(format_args!("  ! File changed in memory but not written"));
        } else if outcome.errors.is_empty() {
            self.line(format_args!("  - No changes needed"));
        } else {
            self.line(format_args!("  ! Skipped"));
        }
    }

    fn finish(&mut self, summary: &BatchSummary) {
        self.banner();
        let verb = if summary.dry_run {
            "would be modified"
        } else {
            "modified"
        };
        self.line(format_args!(
            "Summary: {} of {} files {}",
            summary.files_changed, summary.files_scanned, verb
        ));
        if summary.has_errors() {
            self.line(format_args!("Errors: {}", summary.errors.len()));
            for entry in &summary.errors {
                self.line(format_args!("  ! [{}] {}", entry.file, entry.message));
            }
        }
        self.banner();
        if let Err(err) = self.out.flush() {
            tracing::debug!(error = %err, "report output unavailable");
        }
    }
}
