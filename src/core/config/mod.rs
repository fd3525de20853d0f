pub mod loader;
pub mod validation;

pub use loader::ConfigLoader;
pub use validation::ConfigValidator;

use serde::{Deserialize, Serialize};

/// File name looked up in the corpus directory when no `--config` is given.
pub const CONFIG_FILE_NAME: &str = "flowpatch.toml";

/// Patch engine configuration loaded from flowpatch.toml.
///
/// Every value has a default that reproduces the built-in n8n patch set, so an
/// empty file (or no file at all) is a valid configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct PatchConfig {
    /// Node type tags mapped onto capabilities
    #[serde(default)]
    pub node_types: NodeTypeConfig,

    /// Default credential reference inserted into database nodes
    #[serde(default)]
    pub credentials: CredentialConfig,

    /// Expression syntax normalization settings
    #[serde(default)]
    pub expression: ExpressionConfig,

    /// Use-before-declaration patch settings
    #[serde(default)]
    pub declaration: DeclarationConfig,

    /// Corpus enumeration settings
    #[serde(default)]
    pub batch: BatchConfig,
}

/// Node type tags recognized by the rule set
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NodeTypeConfig {
    #[serde(default = "default_database_type")]
    pub database: String,

    #[serde(default = "default_sub_workflow_type")]
    pub sub_workflow: String,

    #[serde(default = "default_script_type")]
    pub script: String,
}

/// Credential reference injected when a database node has none
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CredentialConfig {
    /// Key under the node's `credentials` object
    #[serde(default = "default_credential_key")]
    pub key: String,

    #[serde(default = "default_credential_id")]
    pub id: String,

    #[serde(default = "default_credential_name")]
    pub name: String,
}

/// Expression normalizer configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ExpressionConfig {
    /// Parameter holding the sub-workflow reference
    #[serde(default = "default_expression_parameter")]
    pub parameter: String,

    /// Prefix of an expression that lost its leading `=`
    #[serde(default = "default_bare_prefix")]
    pub bare_prefix: String,
}

/// Use-before-declaration patcher configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DeclarationConfig {
    /// Parameter holding the script text
    #[serde(default = "default_script_parameter")]
    pub parameter: String,

    /// Variable checked before its `let` declaration
    #[serde(default = "default_variable")]
    pub variable: String,

    /// Comment left in place of a removed check
    #[serde(default = "default_marker")]
    pub marker: String,
}

/// Corpus enumeration configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct BatchConfig {
    /// Glob matched against file names in the corpus directory
    #[serde(default = "default_pattern")]
    pub pattern: String,
}

impl Default for NodeTypeConfig {
    fn default() -> Self {
        Self {
            database: default_database_type(),
            sub_workflow: default_sub_workflow_type(),
            script: default_script_type(),
        }
    }
}

impl Default for CredentialConfig {
    fn default() -> Self {
        Self {
            key: default_credential_key(),
            id: default_credential_id(),
            name: default_credential_name(),
        }
    }
}

impl Default for ExpressionConfig {
    fn default() -> Self {
        Self {
            parameter: default_expression_parameter(),
            bare_prefix: default_bare_prefix(),
        }
    }
}

impl Default for DeclarationConfig {
    fn default() -> Self {
        Self {
            parameter: default_script_parameter(),
            variable: default_variable(),
            marker: default_marker(),
        }
    }
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            pattern: default_pattern(),
        }
    }
}

fn default_database_type() -> String {
    "n8n-nodes-base.postgres".to_string()
}

fn default_sub_workflow_type() -> String {
    "n8n-nodes-base.executeWorkflow".to_string()
}

fn default_script_type() -> String {
    "n8n-nodes-base.code".to_string()
}

fn default_credential_key() -> String {
    "postgres".to_string()
}

fn default_credential_id() -> String {
    "postgres-resto-bot".to_string()
}

fn default_credential_name() -> String {
    "PostgreSQL Resto Bot".to_string()
}

fn default_expression_parameter() -> String {
    "workflowId".to_string()
}

fn default_bare_prefix() -> String {
    "{$env".to_string()
}

fn default_script_parameter() -> String {
    "jsCode".to_string()
}

fn default_variable() -> String {
    "denyReason".to_string()
}

fn default_marker() -> String {
    "// denyReason check moved after declaration".to_string()
}

fn default_pattern() -> String {
    "W*.json".to_string()
}
