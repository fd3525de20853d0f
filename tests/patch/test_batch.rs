use flowpatch::core::{
    BatchRunner, BatchSummary, NullReport, PatchConfig, PatchOutcome, ReportSink, RuleChange,
    TextReport, WriteMode,
};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

const DATABASE_WORKFLOW: &str = r#"{
  "name": "W1 Menu",
  "nodes": [
    {
      "name": "Load Menu",
      "type": "n8n-nodes-base.postgres",
      "parameters": {
        "query": "SELECT * FROM menu"
      }
    }
  ],
  "connections": {}
}
"#;

const SUB_WORKFLOW: &str = r#"{
  "name": "W3 Router",
  "nodes": [
    {
      "name": "Call Order Flow",
      "type": "n8n-nodes-base.executeWorkflow",
      "parameters": {
        "workflowId": "={{$env.ORDER_WORKFLOW_ID}}"
      }
    }
  ]
}
"#;

fn write_corpus(dir: &Path, files: &[(&str, &str)]) {
    for (name, content) in files {
        fs::write(dir.join(name), content).unwrap();
    }
}

fn runner(mode: WriteMode) -> BatchRunner {
    BatchRunner::from_config(&PatchConfig::default(), mode).unwrap()
}

#[test]
fn malformed_document_does_not_stop_the_batch() -> Result<(), Box<dyn std::error::Error>> {
    let temp_dir = TempDir::new()?;
    write_corpus(
        temp_dir.path(),
        &[
            ("W1_MENU.json", DATABASE_WORKFLOW),
            ("W2_BROKEN.json", "{ \"nodes\": [ "),
            ("W3_ROUTER.json", SUB_WORKFLOW),
        ],
    );

    let summary = runner(WriteMode::Write).run(temp_dir.path(), "W*.json", &mut NullReport)?;

    assert_eq!(summary.files_scanned, 3);
    assert_eq!(summary.files_changed, 2);
    assert_eq!(summary.errors.len(), 1);
    assert_eq!(summary.errors[0].file, "W2_BROKEN.json");
    assert!(summary.errors[0].message.starts_with("Failed to load"));

    let menu = fs::read_to_string(temp_dir.path().join("W1_MENU.json"))?;
    assert!(menu.contains("\"postgres-resto-bot\""));
    let router = fs::read_to_string(temp_dir.path().join("W3_ROUTER.json"))?;
    assert!(router.contains("\"workflowId\": \"={$env.ORDER_WORKFLOW_ID}\""));
    assert_eq!(
        fs::read_to_string(temp_dir.path().join("W2_BROKEN.json"))?,
        "{ \"nodes\": [ "
    );

    Ok(())
}

#[test]
fn dry_run_reports_changes_without_writing() -> Result<(), Box<dyn std::error::Error>> {
    let temp_dir = TempDir::new()?;
    write_corpus(temp_dir.path(), &[("W1_MENU.json", DATABASE_WORKFLOW)]);

    let summary = runner(WriteMode::DryRun).run(temp_dir.path(), "W*.json", &mut NullReport)?;

    assert!(summary.dry_run);
    assert!(summary.has_changes());
    assert!(!summary.outcomes[0].written);
    assert_eq!(
        fs::read_to_string(temp_dir.path().join("W1_MENU.json"))?,
        DATABASE_WORKFLOW
    );

    Ok(())
}

#[test]
fn documents_are_processed_in_file_name_order() -> Result<(), Box<dyn std::error::Error>> {
    let temp_dir = TempDir::new()?;
    write_corpus(
        temp_dir.path(),
        &[
            ("W3_ROUTER.json", SUB_WORKFLOW),
            ("W1_MENU.json", DATABASE_WORKFLOW),
            ("README.json", DATABASE_WORKFLOW),
        ],
    );

    let summary = runner(WriteMode::DryRun).run(temp_dir.path(), "W*.json", &mut NullReport)?;
    let files: Vec<&str> = summary.outcomes.iter().map(|o| o.file.as_str()).collect();

    assert_eq!(files, vec!["W1_MENU.json", "W3_ROUTER.json"]);

    Ok(())
}

#[test]
fn unchanged_document_keeps_its_original_bytes() -> Result<(), Box<dyn std::error::Error>> {
    let temp_dir = TempDir::new()?;
    // Compact formatting would be rewritten if the document were saved.
    let healthy = r#"{"nodes":[{"name":"Set","type":"n8n-nodes-base.set"}]}"#;
    write_corpus(temp_dir.path(), &[("W5_SET.json", healthy)]);

    let summary = runner(WriteMode::Write).run(temp_dir.path(), "W*.json", &mut NullReport)?;

    assert_eq!(summary.files_changed, 0);
    assert_eq!(fs::read_to_string(temp_dir.path().join("W5_SET.json"))?, healthy);

    Ok(())
}

#[test]
fn text_report_lists_every_document() -> Result<(), Box<dyn std::error::Error>> {
    let temp_dir = TempDir::new()?;
    write_corpus(
        temp_dir.path(),
        &[
            ("W1_MENU.json", DATABASE_WORKFLOW),
            ("W2_BROKEN.json", "[]"),
        ],
    );

    let mut report = TextReport::new(Vec::new(), false);
    runner(WriteMode::Write).run(temp_dir.path(), "W*.json", &mut report)?;
    let output = String::from_utf8(report.into_inner())?;

    assert!(output.contains("Patching: W1_MENU.json"));
    assert!(output.contains("  + Added credentials to: Load Menu"));
    assert!(output.contains("  * File modified"));
    assert!(output.contains("Patching: W2_BROKEN.json"));
    assert!(output.contains("Summary: 1 of 2 files modified"));
    assert!(output.contains("Errors: 1"));

    Ok(())
}

#[test]
fn missing_corpus_directory_is_a_discovery_error() {
    let temp_dir = TempDir::new().unwrap();
    let missing = temp_dir.path().join("workflows");

    let err = runner(WriteMode::Write)
        .run(&missing, "W*.json", &mut NullReport)
        .unwrap_err();

    assert_eq!(err.kind(), "discovery");
}

/// Forwards to a text report and deletes `doomed` once a rule has changed a
/// document inside it, so the following save has nowhere to write.
struct VanishingDirReport {
    doomed: PathBuf,
    inner: TextReport<Vec<u8>>,
}

impl ReportSink for VanishingDirReport {
    fn file_started(&mut self, path: &Path) {
        self.inner.file_started(path);
    }

    fn rule_applied(&mut self, path: &Path, change: &RuleChange) {
        if path.starts_with(&self.doomed) && self.doomed.exists() {
            fs::remove_dir_all(&self.doomed).unwrap();
        }
        self.inner.rule_applied(path, change);
    }

    fn file_finished(&mut self, outcome: &PatchOutcome) {
        self.inner.file_finished(outcome);
    }

    fn finish(&mut self, summary: &BatchSummary) {
        self.inner.finish(summary);
    }
}

#[test]
fn write_failure_is_recorded_and_batch_continues() -> Result<(), Box<dyn std::error::Error>> {
    let first = TempDir::new()?;
    let second = TempDir::new()?;
    let doomed = first.path().join("corpus");
    fs::create_dir(&doomed)?;
    write_corpus(&doomed, &[("W1_MENU.json", DATABASE_WORKFLOW)]);
    write_corpus(second.path(), &[("W3_ROUTER.json", SUB_WORKFLOW)]);
    let files = vec![
        doomed.join("W1_MENU.json"),
        second.path().join("W3_ROUTER.json"),
    ];

    let mut report = VanishingDirReport {
        doomed: doomed.clone(),
        inner: TextReport::new(Vec::new(), false),
    };
    let summary = runner(WriteMode::Write).run_files(&files, &mut report);

    let failed = &summary.outcomes[0];
    assert!(failed.changed);
    assert!(!failed.written);
    assert!(failed.errors[0].starts_with("Failed to write"));
    assert_eq!(summary.errors.len(), 1);
    assert_eq!(summary.errors[0].file, "W1_MENU.json");

    let patched = &summary.outcomes[1];
    assert!(patched.written);
    assert!(fs::read_to_string(&files[1])?.contains("={$env.ORDER_WORKFLOW_ID}"));

    let output = String::from_utf8(report.inner.into_inner())?;
    assert!(output.contains("  ! File changed in memory but not written"));
    assert!(output.contains("Summary: 2 of 2 files modified"));

    Ok(())
}
