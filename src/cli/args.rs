use clap::{Args, ValueEnum};
use std::path::PathBuf;

/// Output format of the batch report.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ReportFormat {
    Text,
    Json,
}

#[derive(Args, Debug, Clone)]
pub struct CorpusArgs {
    /// Directory containing the workflow documents
    #[arg(value_name = "DIR")]
    pub dir: PathBuf,

    /// File name glob selecting documents (default: batch.pattern, then W*.json)
    #[arg(long, value_name = "GLOB")]
    pub pattern: Option<String>,

    /// Path to config file (default: {DIR}/flowpatch.toml)
    #[arg(long, value_name = "FILE", help_heading = "Configuration")]
    pub config: Option<PathBuf>,

    /// Report format written to stdout
    #[arg(
        long,
        value_enum,
        default_value_t = ReportFormat::Text,
        help_heading = "Output Options"
    )]
    pub format: ReportFormat,
}

#[derive(Args, Debug, Clone)]
pub struct PatchArgs {
    #[command(flatten)]
    pub corpus: CorpusArgs,

    /// Report what would change without writing any file
    #[arg(long)]
    pub dry_run: bool,
}

#[derive(Args, Debug, Clone)]
pub struct CheckArgs {
    #[command(flatten)]
    pub corpus: CorpusArgs,
}

#[derive(Args, Debug, Clone)]
pub struct ValidateContractArgs {
    /// JSON Schema the payloads must satisfy
    #[arg(long, value_name = "FILE")]
    pub schema: PathBuf,

    /// Payload files to validate
    #[arg(value_name = "PAYLOAD", required = true)]
    pub payloads: Vec<PathBuf>,
}
