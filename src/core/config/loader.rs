use super::{ConfigValidator, PatchConfig, CONFIG_FILE_NAME};
use crate::core::error::PatchError;
use std::env;
use std::path::{Path, PathBuf};

pub const ENV_CREDENTIAL_ID: &str = "FLOWPATCH_CREDENTIAL_ID";
pub const ENV_CREDENTIAL_NAME: &str = "FLOWPATCH_CREDENTIAL_NAME";
pub const ENV_PATTERN: &str = "FLOWPATCH_PATTERN";

pub struct ConfigLoader;

impl ConfigLoader {
    /// Resolve the configuration for a corpus directory.
    ///
    /// An explicit path must exist. Without one, `<corpus>/flowpatch.toml` is used
    /// when present and the defaults otherwise. Environment overrides are applied
    /// last and the result is validated.
    pub fn load(explicit: Option<&Path>, corpus_dir: &Path) -> Result<PatchConfig, PatchError> {
        let mut config = match explicit {
            Some(path) => Self::load_from_file(path)?.ok_or_else(|| {
                PatchError::config(format!("config file {} does not exist", path.display()))
            })?,
            None => Self::load_from_file(&Self::default_path(corpus_dir))?.unwrap_or_default(),
        };

        Self::apply_overrides(&mut config, |key| env::var(key).ok());
        ConfigValidator::validate(&config)?;
        Ok(config)
    }

    /// Location of the implicit per-corpus config file.
    pub fn default_path(corpus_dir: &Path) -> PathBuf {
        corpus_dir.join(CONFIG_FILE_NAME)
    }

    /// Load config from a specific file path.
    /// Returns Ok(None) if the file doesn't exist.
    pub fn load_from_file(path: &Path) -> Result<Option<PatchConfig>, PatchError> {
        if !path.exists() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(path).map_err(|e| {
            PatchError::config(format!(
                "failed to read config file {}: {}",
                path.display(),
                e
            ))
        })?;

        let config: PatchConfig = toml::from_str(&content).map_err(|e| {
            PatchError::config(format!(
                "failed to parse config file {}: {}",
                path.display(),
                e
            ))
        })?;

        Ok(Some(config))
    }

    /// Apply overrides from a variable lookup; empty values are ignored.
    pub fn apply_overrides<F>(config: &mut PatchConfig, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        if let Some(id) = non_empty(ENV_CREDENTIAL_ID) {
            config.credentials.id = id;
        }
        if let Some(name) = non_empty(ENV_CREDENTIAL_NAME) {
            config.credentials.name = name;
        }
        if let Some(pattern) = non_empty(ENV_PATTERN) {
            config.batch.pattern = pattern;
        }
    }
}
