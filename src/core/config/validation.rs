use super::PatchConfig;
use crate::core::error::PatchError;
use crate::core::rules::declaration::DeclarationPatterns;
use globset::Glob;

pub struct ConfigValidator;

impl ConfigValidator {
    /// Validate configuration rules
    pub fn validate(config: &PatchConfig) -> Result<(), PatchError> {
        let required = [
            ("node_types.database", &config.node_types.database),
            ("node_types.sub_workflow", &config.node_types.sub_workflow),
            ("node_types.script", &config.node_types.script),
            ("credentials.key", &config.credentials.key),
            ("credentials.id", &config.credentials.id),
            ("credentials.name", &config.credentials.name),
            ("expression.parameter", &config.expression.parameter),
            ("expression.bare_prefix", &config.expression.bare_prefix),
            ("declaration.parameter", &config.declaration.parameter),
            ("declaration.marker", &config.declaration.marker),
            ("batch.pattern", &config.batch.pattern),
        ];
        for (field, value) in required {
            if value.trim().is_empty() {
                return Err(PatchError::config(format!("{} cannot be empty", field)));
            }
        }

        // Node types must be distinct or one tag would silently shadow another
        let types = &config.node_types;
        if types.database == types.sub_workflow
            || types.database == types.script
            || types.sub_workflow == types.script
        {
            return Err(PatchError::config(
                "node_types.database, node_types.sub_workflow and node_types.script must be distinct",
            ));
        }

        // A prefix starting with '=' would match values the normalizer itself produces
        if config.expression.bare_prefix.starts_with('=') {
            return Err(PatchError::config(
                "expression.bare_prefix must not start with '='",
            ));
        }

        if !is_identifier(&config.declaration.variable) {
            return Err(PatchError::config(format!(
                "declaration.variable '{}' is not a valid identifier",
                config.declaration.variable
            )));
        }

        let patterns = DeclarationPatterns::new(&config.declaration.variable)?;
        if patterns.matches_marker(&config.declaration.marker) {
            return Err(PatchError::config(
                "declaration.marker must not contain the check or declaration it replaces",
            ));
        }

        Glob::new(&config.batch.pattern).map_err(|e| {
            PatchError::config(format!(
                "batch.pattern '{}' is not a valid glob: {}",
                config.batch.pattern, e
            ))
        })?;

        Ok(())
    }
}

/// A script identifier the declaration patterns can anchor on.
///
/// The patterns open with a word boundary, which never sits before a leading `$`,
/// so such names are rejected even though the script language allows them.
fn is_identifier(value: &str) -> bool {
    let mut chars = value.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() || first == '_' => {
            chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$')
        }
        _ => false,
    }
}
