use crate::core::config::NodeTypeConfig;
use crate::core::error::RuleError;
use serde::Serialize;
use serde_json::{Map, Value};
use std::fmt;

const NAME_KEY: &str = "name";
const TYPE_KEY: &str = "type";
const PARAMETERS_KEY: &str = "parameters";
const CREDENTIALS_KEY: &str = "credentials";

/// What a node does, as far as the rule set is concerned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeCapability {
    /// Talks to an external relational database and needs a credential reference.
    Database,
    /// Invokes another workflow by id.
    SubWorkflow,
    /// Runs embedded script text.
    Script,
    /// Any node type no rule cares about.
    Other,
}

impl NodeCapability {
    /// Classify a node type tag using the configured tags.
    pub fn classify(node_type: &str, types: &NodeTypeConfig) -> Self {
        if node_type == types.database {
            NodeCapability::Database
        } else if node_type == types.sub_workflow {
            NodeCapability::SubWorkflow
        } else if node_type == types.script {
            NodeCapability::Script
        } else {
            NodeCapability::Other
        }
    }
}

impl fmt::Display for NodeCapability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeCapability::Database => write!(f, "database"),
            NodeCapability::SubWorkflow => write!(f, "sub_workflow"),
            NodeCapability::Script => write!(f, "script"),
            NodeCapability::Other => write!(f, "other"),
        }
    }
}

/// Mutable view of one node object inside a [`super::WorkflowDocument`].
#[derive(Debug)]
pub struct Node<'a> {
    index: usize,
    fields: &'a mut Map<String, Value>,
}

impl<'a> Node<'a> {
    pub fn new(index: usize, fields: &'a mut Map<String, Value>) -> Self {
        Self { index, fields }
    }

    pub(crate) fn fallback_name(index: usize) -> String {
        format!("node_{}", index)
    }

    /// Display label for reports; not guaranteed unique.
    pub fn name(&self) -> String {
        self.fields
            .get(NAME_KEY)
            .and_then(Value::as_str)
            .map(str::to_string)
            .unwrap_or_else(|| Self::fallback_name(self.index))
    }

    /// The node's type tag, empty when absent or not a string.
    pub fn node_type(&self) -> &str {
        self.fields
            .get(TYPE_KEY)
            .and_then(Value::as_str)
            .unwrap_or("")
    }

    pub fn has_credentials(&self) -> bool {
        self.fields.contains_key(CREDENTIALS_KEY)
    }

    /// Insert a `credentials` entry. Returns false, leaving the node untouched, when
    /// one is already present.
    pub fn insert_credentials(&mut self, credentials: Value) -> bool {
        if self.has_credentials() {
            return false;
        }
        self.fields.insert(CREDENTIALS_KEY.to_string(), credentials);
        true
    }

    /// A string parameter, if present.
    ///
    /// Missing `parameters` means the node has no parameters. Anything other than an
    /// object in that slot is a shape error.
    pub fn string_parameter(&self, key: &str) -> Result<Option<&str>, RuleError> {
        Ok(self.parameters()?.and_then(|params| params.get(key)).and_then(Value::as_str))
    }

    /// Replace the value of an existing parameter.
    pub fn set_string_parameter(&mut self, key: &str, value: String) -> Result<(), RuleError> {
        match self.fields.get_mut(PARAMETERS_KEY) {
            Some(Value::Object(params)) => {
                params.insert(key.to_string(), Value::String(value));
                Ok(())
            }
            Some(other) => Err(Self::parameters_error(other)),
            None => Err(RuleError::new("node has no parameters to update")),
        }
    }

    fn parameters(&self) -> Result<Option<&Map<String, Value>>, RuleError> {
        match self.fields.get(PARAMETERS_KEY) {
            None => Ok(None),
            Some(Value::Object(params)) => Ok(Some(params)),
            Some(other) => Err(Self::parameters_error(other)),
        }
    }

    fn parameters_error(value: &Value) -> RuleError {
        RuleError::new(format!(
            "'parameters' must be an object, found {}",
            super::json_kind(value)
        ))
    }
}
