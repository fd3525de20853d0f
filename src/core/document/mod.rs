//! Loading and saving workflow definition documents.
//!
//! A document is kept as the raw JSON object it was read from so that keys,
//! ordering and unrelated values survive a rewrite untouched. Rules reach the
//! nodes through [`Node`] handles that borrow into that object.

pub mod node;

pub use node::{Node, NodeCapability};

use crate::core::error::{PatchError, RuleError};
use serde_json::{Map, Value};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

const NODES_KEY: &str = "nodes";

/// A node handle, or the fallback name and error of an entry that is not an object.
pub type NodeSlot<'a> = Result<Node<'a>, (String, RuleError)>;

/// Root aggregate of a workflow file, identified by its storage path.
#[derive(Debug, Clone, PartialEq)]
pub struct WorkflowDocument {
    path: PathBuf,
    root: Map<String, Value>,
}

impl WorkflowDocument {
    /// Read and parse a document from disk.
    pub fn load(path: &Path) -> Result<Self, PatchError> {
        let content = fs::read_to_string(path).map_err(|e| PatchError::parse(path, e))?;
        Self::from_json(path, &content)
    }

    /// Parse a document from text, attributing it to `path`.
    pub fn from_json(path: &Path, content: &str) -> Result<Self, PatchError> {
        let value: Value = serde_json::from_str(content).map_err(|e| PatchError::parse(path, e))?;
        match value {
            Value::Object(root) => Ok(Self {
                path: path.to_path_buf(),
                root,
            }),
            other => Err(PatchError::parse(
                path,
                format!("expected a JSON object at the root, found {}", json_kind(&other)),
            )),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn root(&self) -> &Map<String, Value> {
        &self.root
    }

    /// Number of entries in the `nodes` array, zero when it is absent or malformed.
    pub fn node_count(&self) -> usize {
        self.root
            .get(NODES_KEY)
            .and_then(Value::as_array)
            .map_or(0, Vec::len)
    }

    /// Mutable handles to every node, in document order.
    ///
    /// A missing `nodes` key yields no nodes. A `nodes` value that is not an array is
    /// a shape error for the whole document. Entries that are not objects are returned
    /// as per-node errors so the caller can report them and keep going.
    pub fn nodes_mut(&mut self) -> Result<Vec<NodeSlot<'_>>, PatchError> {
        let path = &self.path;
        match self.root.get_mut(NODES_KEY) {
            None => Ok(Vec::new()),
            Some(Value::Array(entries)) => Ok(entries
                .iter_mut()
                .enumerate()
                .map(|(index, entry)| match entry {
                    Value::Object(fields) => Ok(Node::new(index, fields)),
                    other => Err((
                        Node::fallback_name(index),
                        RuleError::new(format!(
                            "node entry is {}, not an object",
                            json_kind(other)
                        )),
                    )),
                })
                .collect()),
            Some(other) => Err(PatchError::Shape {
                path: path.clone(),
                message: format!("'nodes' must be an array, found {}", json_kind(other)),
            }),
        }
    }

    /// Serialize with the fixed formatting convention: two-space indentation and a
    /// trailing newline. Identical documents always produce identical bytes.
    pub fn to_json_string(&self) -> Result<String, PatchError> {
        let mut text = serde_json::to_string_pretty(&self.root)
            .map_err(|e| PatchError::write(&self.path, e))?;
        text.push('\n');
        Ok(text)
    }

    /// Write the document back to its path.
    ///
    /// The bytes go to a temporary file in the same directory which then replaces
    /// the original, so a failed write never leaves a truncated document behind.
    pub fn save(&self) -> Result<(), PatchError> {
        let text = self.to_json_string()?;
        let directory = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };

        let mut temp =
            NamedTempFile::new_in(&directory).map_err(|e| PatchError::write(&self.path, e))?;
        temp.write_all(text.as_bytes())
            .map_err(|e| PatchError::write(&self.path, e))?;
        temp.as_file()
            .sync_all()
            .map_err(|e| PatchError::write(&self.path, e))?;
        temp.persist(&self.path)
            .map_err(|e| PatchError::write(&self.path, e.error))?;
        Ok(())
    }
}

pub(crate) fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
