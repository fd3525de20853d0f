use flowpatch::core::config::loader::{ENV_CREDENTIAL_ID, ENV_CREDENTIAL_NAME, ENV_PATTERN};
use flowpatch::core::config::ConfigLoader;
use flowpatch::core::PatchConfig;
use serial_test::serial;
use std::env;
use std::fs;
use tempfile::TempDir;

fn clear_flowpatch_env() {
    for v in &[ENV_CREDENTIAL_ID, ENV_CREDENTIAL_NAME, ENV_PATTERN] {
        env::remove_var(v);
    }
}

/// Corpus-local flowpatch.toml is picked up without --config
#[test]
#[serial]
fn test_corpus_config_is_loaded_implicitly() {
    clear_flowpatch_env();
    let temp_dir = TempDir::new().unwrap();
    fs::write(
        temp_dir.path().join("flowpatch.toml"),
        r#"
[credentials]
id = "postgres-staging"
name = "PostgreSQL Staging"

[batch]
pattern = "*.workflow.json"
"#,
    )
    .unwrap();

    let config = ConfigLoader::load(None, temp_dir.path()).unwrap();

    assert_eq!(config.credentials.key, "postgres");
    assert_eq!(config.credentials.id, "postgres-staging");
    assert_eq!(config.credentials.name, "PostgreSQL Staging");
    assert_eq!(config.batch.pattern, "*.workflow.json");
    assert_eq!(config.declaration, PatchConfig::default().declaration);
}

#[test]
#[serial]
fn test_missing_config_falls_back_to_defaults() {
    clear_flowpatch_env();
    let temp_dir = TempDir::new().unwrap();

    let config = ConfigLoader::load(None, temp_dir.path()).unwrap();

    assert_eq!(config, PatchConfig::default());
}

#[test]
#[serial]
fn test_explicit_config_wins_over_corpus_config() {
    clear_flowpatch_env();
    let corpus = TempDir::new().unwrap();
    let elsewhere = TempDir::new().unwrap();
    fs::write(
        corpus.path().join("flowpatch.toml"),
        "[credentials]\nid = \"from-corpus\"\n",
    )
    .unwrap();
    let explicit = elsewhere.path().join("ci.toml");
    fs::write(&explicit, "[credentials]\nid = \"from-ci\"\n").unwrap();

    let config = ConfigLoader::load(Some(&explicit), corpus.path()).unwrap();

    assert_eq!(config.credentials.id, "from-ci");
}

#[test]
#[serial]
fn test_environment_overrides_file_values() {
    clear_flowpatch_env();
    let temp_dir = TempDir::new().unwrap();
    fs::write(
        temp_dir.path().join("flowpatch.toml"),
        "[credentials]\nid = \"from-file\"\n",
    )
    .unwrap();

    env::set_var(ENV_CREDENTIAL_ID, "from-env");
    env::set_var(ENV_PATTERN, "  ");
    let config = ConfigLoader::load(None, temp_dir.path());
    clear_flowpatch_env();

    let config = config.unwrap();
    assert_eq!(config.credentials.id, "from-env");
    assert_eq!(config.batch.pattern, "W*.json");
}

#[test]
#[serial]
fn test_invalid_values_are_rejected() {
    clear_flowpatch_env();
    let cases = [
        ("[credentials]\nid = \"\"\n", "credentials.id cannot be empty"),
        ("[expression]\nbare_prefix = \"={$env\"\n", "must not start with '='"),
        ("[declaration]\nvariable = \"deny-reason\"\n", "is not a valid identifier"),
        ("[declaration]\nvariable = \"$reason\"\n", "is not a valid identifier"),
        (
            "[declaration]\nmarker = \"// let denyReason = ''\"\n",
            "must not contain the check or declaration",
        ),
        ("[batch]\npattern = \"W[.json\"\n", "is not a valid glob"),
        ("[credentials\n", "failed to parse config file"),
    ];

    for (content, expected) in cases {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("flowpatch.toml"), content).unwrap();

        let err = ConfigLoader::load(None, temp_dir.path()).unwrap_err();

        assert_eq!(err.kind(), "config", "{content}");
        assert!(err.to_string().contains(expected), "{err} / {expected}");
    }
}
