use super::PatchRule;
use crate::core::config::DeclarationConfig;
use crate::core::document::{Node, NodeCapability};
use crate::core::error::{PatchError, RuleError};
use regex::Regex;
use tracing::warn;

/// Compiled text patterns for one variable.
///
/// This is offset analysis over raw script text, not a parser: checks inside string
/// literals or comments count, and a body containing braces is not recognized as a
/// removable statement.
#[derive(Debug, Clone)]
pub struct DeclarationPatterns {
    check: Regex,
    declaration: Regex,
    statement: Regex,
}

/// Result of analysing one script.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScriptFix {
    /// No check precedes the declaration.
    Clean,
    /// Premature checks were replaced with the marker.
    Patched { code: String, removed: usize },
    /// A check precedes the declaration but is not a removable `if` statement.
    Unrecognized,
}

impl DeclarationPatterns {
    pub fn new(variable: &str) -> Result<Self, PatchError> {
        let var = regex::escape(variable);
        let check = format!(r#"\b{var}\s*(?:!==?|===?)\s*(?:''|"")"#);
        let compile = |pattern: String| {
            Regex::new(&pattern).map_err(|e| {
                PatchError::config(format!(
                    "cannot build declaration pattern for '{}': {}",
                    variable, e
                ))
            })
        };

        Ok(Self {
            statement: compile(format!(r"\bif\s*\(\s*{check}\s*\)\s*\{{[^{{}}]*\}}"))?,
            check: compile(check)?,
            declaration: compile(format!(r"\blet\s+{var}\s*="))?,
        })
    }

    /// True when `text` contains the check or the declaration.
    pub fn matches_marker(&self, text: &str) -> bool {
        self.check.is_match(text) || self.declaration.is_match(text)
    }

    /// Detect checks that precede the first declaration and replace each removable
    /// one with `marker`. Checks after the declaration are never touched.
    pub fn fix(&self, code: &str, marker: &str) -> ScriptFix {
        if !self.check_precedes_declaration(code) {
            return ScriptFix::Clean;
        }

        // Removing an inner statement can expose an enclosing one, so run to a fixpoint.
        // Every removal drops at least one check, which bounds the loop.
        let mut current = code.to_string();
        let mut removed = 0;
        for _ in 0..self.check.find_iter(code).count() {
            match self.remove_premature(&current, marker) {
                Some((next, count)) => {
                    current = next;
                    removed += count;
                }
                None => break,
            }
        }

        if removed == 0 {
            ScriptFix::Unrecognized
        } else {
            ScriptFix::Patched {
                code: current,
                removed,
            }
        }
    }

    fn check_precedes_declaration(&self, code: &str) -> bool {
        match (self.check.find(code), self.declaration.find(code)) {
            (Some(check), Some(declaration)) => check.start() < declaration.start(),
            _ => false,
        }
    }

    fn remove_premature(&self, code: &str, marker: &str) -> Option<(String, usize)> {
        let declared_at = self.declaration.find(code)?.start();
        let mut out = String::with_capacity(code.len());
        let mut last = 0;
        let mut count = 0;

        for statement in self.statement.find_iter(code) {
            if statement.end() > declared_at {
                break;
            }
            out.push_str(&code[last..statement.start()]);
            out.push_str(marker);
            last = statement.end();
            count += 1;
        }

        if count == 0 {
            return None;
        }
        out.push_str(&code[last..]);
        Some((out, count))
    }
}

/// Removes checks of a variable that run before the variable is declared.
pub struct UseBeforeDeclarationRule {
    parameter: String,
    marker: String,
    notice: String,
    patterns: DeclarationPatterns,
}

impl UseBeforeDeclarationRule {
    pub fn new(config: &DeclarationConfig) -> Result<Self, PatchError> {
        Ok(Self {
            parameter: config.parameter.clone(),
            marker: config.marker.clone(),
            notice: format!("Fixed {} check in", config.variable),
            patterns: DeclarationPatterns::new(&config.variable)?,
        })
    }
}

impl PatchRule for UseBeforeDeclarationRule {
    fn code(&self) -> &'static str {
        "FP-DECL-001"
    }

    fn notice(&self) -> &str {
        &self.notice
    }

    fn capability(&self) -> NodeCapability {
        NodeCapability::Script
    }

    fn apply(&self, node: &mut Node<'_>) -> Result<bool, RuleError> {
        let Some(code) = node.string_parameter(&self.parameter)? else {
            return Ok(false);
        };

        match self.patterns.fix(code, &self.marker) {
            ScriptFix::Clean => Ok(false),
            ScriptFix::Unrecognized => {
                warn!(
                    node = %node.name(),
                    "check precedes declaration but is not a removable if statement"
                );
                Ok(false)
            }
            ScriptFix::Patched { code, .. } => {
                node.set_string_parameter(&self.parameter, code)?;
                Ok(true)
            }
        }
    }
}
