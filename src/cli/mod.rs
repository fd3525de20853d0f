pub mod args;
pub mod commands;

pub use args::{CheckArgs, CorpusArgs, PatchArgs, ReportFormat, ValidateContractArgs};
use clap::{Parser, Subcommand};

/// Run completed without errors (and, for `check`, without pending changes).
pub const EXIT_OK: u8 = 0;
/// At least one document or payload failed.
pub const EXIT_FAILED: u8 = 1;
/// The run could not start: bad configuration, unreadable corpus, logging failure.
pub const EXIT_FATAL: u8 = 2;

const HELP_TEMPLATE: &str = "\
{name} {version}\n\
{about-with-newline}\n\
USAGE:\n    {usage}\n\
\nOPTIONS:\n{options}\n\
COMMANDS:\n{subcommands}\n";

#[derive(Parser, Debug)]
#[command(name = "flowpatch")]
#[command(version = crate::VERSION)]
#[command(about = "Repair known defects in workflow definition documents")]
#[command(help_template = HELP_TEMPLATE)]
#[command(
    after_long_help = "Typical flow: run `check` in CI to spot pending fixes, then `patch` to apply them in place."
)]
pub struct Args {
    /// Log rule activity to stderr
    #[arg(long, short, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    #[command(
        about = "Patch every matching document in place",
        long_about = "Patch loads each matching document, applies the credential, expression and use-before-declaration rules, and rewrites only the documents that changed.",
        after_help = "Example:\n    flowpatch patch ./workflows --pattern 'W*.json'"
    )]
    Patch(PatchArgs),
    #[command(
        about = "Report pending fixes without writing",
        long_about = "Check runs the same rules as patch but never writes. It exits with status 1 when any document would change or could not be processed.",
        after_help = "Example:\n    flowpatch check ./workflows --format json"
    )]
    Check(CheckArgs),
    #[command(
        about = "Validate payloads against a JSON Schema contract",
        long_about = "Validate-contract checks each payload file against a Draft 2020-12 JSON Schema with format assertions and lists every violation.",
        after_help = "Example:\n    flowpatch validate-contract --schema schemas/inbound/v1.json tests/contracts/valid_v1.json"
    )]
    ValidateContract(ValidateContractArgs),
}

/// Dispatch the parsed command and return the process exit status.
pub fn run(args: Args) -> crate::Result<u8> {
    match args.command {
        Command::Patch(patch_args) => commands::patch(patch_args),
        Command::Check(check_args) => commands::check(check_args),
        Command::ValidateContract(contract_args) => commands::validate_contract(contract_args),
    }
}
