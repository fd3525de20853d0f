use super::PatchRule;
use crate::core::config::CredentialConfig;
use crate::core::document::{Node, NodeCapability};
use crate::core::error::RuleError;
use serde_json::{json, Value};

/// Adds the default credential reference to database nodes that have none.
///
/// The presence check on `credentials` is the only guard, so an existing entry of
/// any shape is never replaced.
pub struct CredentialInjectorRule {
    credentials: Value,
}

impl CredentialInjectorRule {
    pub fn new(config: &CredentialConfig) -> Self {
        let mut credentials = serde_json::Map::new();
        credentials.insert(
            config.key.clone(),
            json!({ "id": config.id, "name": config.name }),
        );
        Self {
            credentials: Value::Object(credentials),
        }
    }
}

impl PatchRule for CredentialInjectorRule {
    fn code(&self) -> &'static str {
        "FP-CRED-001"
    }

    fn notice(&self) -> &str {
        "Added credentials to"
    }

    fn capability(&self) -> NodeCapability {
        NodeCapability::Database
    }

    fn apply(&self, node: &mut Node<'_>) -> Result<bool, RuleError> {
        Ok(node.insert_credentials(self.credentials.clone()))
    }
}
