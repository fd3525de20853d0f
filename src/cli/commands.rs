use crate::{
    cli::args::{CheckArgs, CorpusArgs, PatchArgs, ReportFormat, ValidateContractArgs},
    cli::{EXIT_FAILED, EXIT_OK},
    core::{
        contract, BatchRunner, BatchSummary, ConfigLoader, JsonReport, ReportSink, TextReport,
        WriteMode,
    },
    Result,
};
use anyhow::Context;
use std::io::{self, Write};
use tracing::info;

/// Patch the corpus in place (or pretend to, with `--dry-run`).
pub fn patch(args: PatchArgs) -> Result<u8> {
    let mode = if args.dry_run {
        WriteMode::DryRun
    } else {
        WriteMode::Write
    };
    let summary = run_batch(&args.corpus, mode)?;
    Ok(if summary.has_errors() {
        EXIT_FAILED
    } else {
        EXIT_OK
    })
}

/// Dry run that fails when anything would change.
pub fn check(args: CheckArgs) -> Result<u8> {
    let summary = run_batch(&args.corpus, WriteMode::DryRun)?;
    Ok(if summary.has_errors() || summary.has_changes() {
        EXIT_FAILED
    } else {
        EXIT_OK
    })
}

/// Validate payload files against a JSON Schema contract.
pub fn validate_contract(args: ValidateContractArgs) -> Result<u8> {
    let schema = contract::load_json(&args.schema)?;
    let stdout = io::stdout();
    let mut out = stdout.lock();
    let mut failed = false;

    for payload_path in &args.payloads {
        let label = payload_path.display();
        let payload = match contract::load_json(payload_path) {
            Ok(payload) => payload,
            Err(err) => {
                failed = true;
                writeln!(out, "FAIL: {}", err)?;
                continue;
            }
        };

        let violations = contract::validate(&schema, &payload)?;
        if violations.is_empty() {
            writeln!(out, "OK: {}", label)?;
            continue;
        }
        failed = true;
        writeln!(out, "FAIL: {} ({} violations)", label, violations.len())?;
        for violation in &violations {
            let at = if violation.instance_path.is_empty() {
                "/"
            } else {
                violation.instance_path.as_str()
            };
            writeln!(out, "   - {} {}", at, violation.message)?;
        }
    }

    out.flush()?;
    Ok(if failed { EXIT_FAILED } else { EXIT_OK })
}

fn run_batch(corpus: &CorpusArgs, mode: WriteMode) -> Result<BatchSummary> {
    let mut config = ConfigLoader::load(corpus.config.as_deref(), &corpus.dir)
        .with_context(|| format!("failed to configure patch run for {}", corpus.dir.display()))?;
    if let Some(pattern) = &corpus.pattern {
        config.batch.pattern = pattern.clone();
    }

    let runner = BatchRunner::from_config(&config, mode)?;
    let stdout = io::stdout();
    let mut sink: Box<dyn ReportSink> = match corpus.format {
        ReportFormat::Text => Box::new(TextReport::new(stdout.lock(), mode == WriteMode::DryRun)),
        ReportFormat::Json => Box::new(JsonReport::new(stdout.lock())),
    };

    let summary = runner.run(&corpus.dir, &config.batch.pattern, sink.as_mut())?;
    info!(
        changed = summary.files_changed,
        errors = summary.errors.len(),
        dry_run = summary.dry_run,
        "batch complete"
    );
    Ok(summary)
}
