use crate::core::config::{NodeTypeConfig, PatchConfig};
use crate::core::document::{Node, NodeCapability, WorkflowDocument};
use crate::core::error::{PatchError, RuleError};
use serde::Serialize;
use tracing::{debug, info, warn};

pub mod credentials;
pub mod declaration;
pub mod expression;

pub use credentials::CredentialInjectorRule;
pub use declaration::UseBeforeDeclarationRule;
pub use expression::ExpressionSyntaxRule;

/// Trait implemented by node patch rules.
///
/// A rule serves exactly one capability and is only ever handed nodes of that
/// capability. `apply` mutates the node in place and reports whether anything
/// changed; running it again on its own output must report no change.
pub trait PatchRule: Send + Sync {
    /// Stable identifier shown in reports.
    fn code(&self) -> &'static str;

    /// Short change notice, printed before the node name.
    fn notice(&self) -> &str;

    fn capability(&self) -> NodeCapability;

    fn apply(&self, node: &mut Node<'_>) -> Result<bool, RuleError>;
}

/// One change made by one rule to one node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RuleChange {
    pub code: String,
    pub node: String,
    pub notice: String,
}

impl RuleChange {
    pub fn new(rule: &dyn PatchRule, node: impl Into<String>) -> Self {
        Self {
            code: rule.code().to_string(),
            node: node.into(),
            notice: rule.notice().to_string(),
        }
    }
}

/// Changes and contained errors produced by patching one document.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct DocumentPatch {
    pub changes: Vec<RuleChange>,
    pub errors: Vec<PatchError>,
}

impl DocumentPatch {
    pub fn changed(&self) -> bool {
        !self.changes.is_empty()
    }
}

/// Registry that runs every configured rule against the nodes it serves.
pub struct RuleSet {
    node_types: NodeTypeConfig,
    rules: Vec<Box<dyn PatchRule>>,
}

impl RuleSet {
    /// Construct the built-in rules from configuration.
    pub fn from_config(config: &PatchConfig) -> Result<Self, PatchError> {
        let rules: Vec<Box<dyn PatchRule>> = vec![
            Box::new(CredentialInjectorRule::new(&config.credentials)),
            Box::new(ExpressionSyntaxRule::new(&config.expression)),
            Box::new(UseBeforeDeclarationRule::new(&config.declaration)?),
        ];
        Ok(Self::with_rules(config.node_types.clone(), rules))
    }

    /// Construct a registry from an explicit rule list.
    pub fn with_rules(node_types: NodeTypeConfig, rules: Vec<Box<dyn PatchRule>>) -> Self {
        Self { node_types, rules }
    }

    pub fn capability_of(&self, node: &Node<'_>) -> NodeCapability {
        NodeCapability::classify(node.node_type(), &self.node_types)
    }

    /// Run every rule that serves this node's capability.
    ///
    /// A failing rule is recorded and the remaining rules still run.
    pub fn apply_to_node(&self, node: &mut Node<'_>, patch: &mut DocumentPatch) {
        let capability = self.capability_of(node);
        if capability == NodeCapability::Other {
            return;
        }

        let name = node.name();
        debug!(node = %name, capability = %capability, "dispatching rules");
        for rule in self.rules.iter().filter(|rule| rule.capability() == capability) {
            match rule.apply(node) {
                Ok(true) => {
                    info!(node = %name, rule = rule.code(), "{}", rule.notice());
                    patch.changes.push(RuleChange::new(rule.as_ref(), name.clone()));
                }
                Ok(false) => {
                    debug!(node = %name, rule = rule.code(), "no change");
                }
                Err(err) => {
                    warn!(node = %name, rule = rule.code(), error = %err, "rule failed");
                    patch.errors.push(err.into_patch_error(rule.code(), &name));
                }
            }
        }
    }

    /// Run the rule set over every node of a document.
    pub fn apply(&self, document: &mut WorkflowDocument) -> DocumentPatch {
        let mut patch = DocumentPatch::default();
        let slots = match document.nodes_mut() {
            Ok(slots) => slots,
            Err(err) => {
                patch.errors.push(err);
                return patch;
            }
        };

        for slot in slots {
            match slot {
                Ok(mut node) => self.apply_to_node(&mut node, &mut patch),
                Err((name, err)) => {
                    warn!(node = %name, error = %err, "skipping malformed node");
                    patch.errors.push(err.into_patch_error("document", &name));
                }
            }
        }
        patch
    }
}
