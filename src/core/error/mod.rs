use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors produced while loading, patching, or writing workflow documents.
///
/// Every variant is recoverable at the batch level: the runner records the
/// rendered message in the affected document's outcome and moves on. Only
/// `Config` and `Discovery` stop a run, and both happen before any document is
/// opened.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PatchError {
    #[error("Failed to load {}: {message}", path.display())]
    Parse { path: PathBuf, message: String },

    #[error("Failed to write {}: {message}", path.display())]
    Write { path: PathBuf, message: String },

    #[error("Rule {rule} failed on node '{node}': {message}")]
    Rule {
        rule: String,
        node: String,
        message: String,
    },

    #[error("Unexpected document shape in {}: {message}", path.display())]
    Shape { path: PathBuf, message: String },

    #[error("Failed to enumerate {}: {message}", path.display())]
    Discovery { path: PathBuf, message: String },

    #[error("Invalid configuration: {message}")]
    Config { message: String },
}

impl PatchError {
    pub fn parse(path: &Path, message: impl ToString) -> Self {
        PatchError::Parse {
            path: path.to_path_buf(),
            message: message.to_string(),
        }
    }

    pub fn write(path: &Path, message: impl ToString) -> Self {
        PatchError::Write {
            path: path.to_path_buf(),
            message: message.to_string(),
        }
    }

    pub fn config(message: impl Into<String>) -> Self {
        PatchError::Config {
            message: message.into(),
        }
    }

    /// Short, stable identifier used in JSON reports.
    pub fn kind(&self) -> &'static str {
        match self {
            PatchError::Parse { .. } => "parse",
            PatchError::Write { .. } => "write",
            PatchError::Rule { .. } => "rule",
            PatchError::Shape { .. } => "shape",
            PatchError::Discovery { .. } => "discovery",
            PatchError::Config { .. } => "config",
        }
    }
}

/// Raised by a rule when a node does not have the shape the rule expects.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct RuleError {
    pub message: String,
}

impl RuleError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// Attach the rule code and node name so the error is meaningful in a report.
    pub fn into_patch_error(self, rule: &str, node: &str) -> PatchError {
        PatchError::Rule {
            rule: rule.to_string(),
            node: node.to_string(),
            message: self.message,
        }
    }
}
