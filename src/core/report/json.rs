use super::{BatchSummary, ReportSink};
use crate::core::batch::PatchOutcome;
use crate::core::rules::RuleChange;
use std::io::Write;
use std::path::Path;

/// Writes the whole summary as one JSON document when the run finishes.
pub struct JsonReport<W: Write> {
    out: W,
}

impl<W: Write> JsonReport<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> ReportSink for JsonReport<W> {
    fn file_started(&mut self, _path: &Path) {}

    fn rule_applied(&mut self, _path: &Path, _change: &RuleChange) {}

    fn file_finished(&mut self, _outcome: &PatchOutcome) {}

    fn finish(&mut self, summary: &BatchSummary) {
        let result = serde_json::to_writer_pretty(&mut self.out, summary)
            .map_err(std::io::Error::from)
            .and_then(|_| writeln!(self.out))
            .and_then(|_| self.out.flush());
        if let Err(err) = result {
            tracing::warn!(error = %err, "failed to write JSON report");
        }
    }
}
