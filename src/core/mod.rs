pub mod batch;
pub mod config;
pub mod contract;
pub mod document;
pub mod error;
pub mod report;
pub mod rules;
pub mod text;

pub use batch::{BatchRunner, PatchOutcome, WriteMode};
pub use config::{ConfigLoader, ConfigValidator, PatchConfig};
pub use document::{Node, NodeCapability, WorkflowDocument};
pub use error::{PatchError, RuleError};
pub use report::{BatchSummary, JsonReport, NullReport, ReportSink, TextReport};
pub use rules::{DocumentPatch, PatchRule, RuleChange, RuleSet};
