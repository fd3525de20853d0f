use super::PatchRule;
use crate::core::config::ExpressionConfig;
use crate::core::document::{Node, NodeCapability};
use crate::core::error::RuleError;

const EXPRESSION_MARKER: &str = "=";
const DOUBLE_OPEN: &str = "={{";
const DOUBLE_OPEN_BRACE: &str = "{{";
const DOUBLE_CLOSE: &str = "}}";

/// Repairs malformed dynamic-expression strings in sub-workflow references.
pub struct ExpressionSyntaxRule {
    parameter: String,
    bare_prefix: String,
}

impl ExpressionSyntaxRule {
    pub fn new(config: &ExpressionConfig) -> Self {
        Self {
            parameter: config.parameter.clone(),
            bare_prefix: config.bare_prefix.clone(),
        }
    }
}

impl PatchRule for ExpressionSyntaxRule {
    fn code(&self) -> &'static str {
        "FP-EXPR-001"
    }

    fn notice(&self) -> &str {
        "Fixed workflowId syntax in"
    }

    fn capability(&self) -> NodeCapability {
        NodeCapability::SubWorkflow
    }

    fn apply(&self, node: &mut Node<'_>) -> Result<bool, RuleError> {
        let Some(value) = node.string_parameter(&self.parameter)? else {
            return Ok(false);
        };
        match normalize_expression(value, &self.bare_prefix) {
            Some(fixed) => {
                node.set_string_parameter(&self.parameter, fixed)?;
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

/// Return the corrected form of `value`, or `None` when it is already well formed.
///
/// - A value opening with `={{` has every `{{` and `}}` collapsed to a single brace,
///   so `={{a}}_{{b}}` becomes `={a}_{b}`. Collapsing repeats until no doubled brace
///   is left.
/// - A value starting with `bare_prefix` gains the leading `=` and is then collapsed
///   the same way when it opens with `={{`.
pub fn normalize_expression(value: &str, bare_prefix: &str) -> Option<String> {
    if value.starts_with(DOUBLE_OPEN) {
        Some(collapse_double_braces(value.to_string()))
    } else if value.starts_with(bare_prefix) {
        Some(collapse_double_braces(format!("{}{}", EXPRESSION_MARKER, value)))
    } else {
        None
    }
}

fn collapse_double_braces(mut current: String) -> String {
    if !current.starts_with(DOUBLE_OPEN) {
        return current;
    }
    while current.contains(DOUBLE_OPEN_BRACE) || current.contains(DOUBLE_CLOSE) {
        current = current
            .replace(DOUBLE_OPEN_BRACE, "{")
            .replace(DOUBLE_CLOSE, "}");
    }
    current
}
