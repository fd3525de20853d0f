//! JSON Schema contract checks for inbound payloads.

use crate::core::error::PatchError;
use jsonschema::Draft;
use serde_json::Value;
use std::fs;
use std::path::Path;

/// One schema violation found in a payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContractViolation {
    pub instance_path: String,
    pub message: String,
}

/// Validate `payload` against `schema` (Draft 2020-12, formats asserted).
///
/// Violations are returned sorted by instance path; an unusable schema is an error.
pub fn validate(schema: &Value, payload: &Value) -> Result<Vec<ContractViolation>, PatchError> {
    let validator = jsonschema::options()
        .with_draft(Draft::Draft202012)
        .should_validate_formats(true)
        .build(schema)
        .map_err(|e| PatchError::config(format!("invalid contract schema: {}", e)))?;

    let mut violations: Vec<ContractViolation> = validator
        .iter_errors(payload)
        .map(|error| ContractViolation {
            instance_path: error.instance_path().to_string(),
            message: error.to_string(),
        })
        .collect();
    violations.sort_by(|a, b| a.instance_path.cmp(&b.instance_path));
    Ok(violations)
}

/// Read a JSON file for contract validation.
pub fn load_json(path: &Path) -> Result<Value, PatchError> {
    let content = fs::read_to_string(path).map_err(|e| PatchError::parse(path, e))?;
    serde_json::from_str(&content).map_err(|e| PatchError::parse(path, e))
}
