// tests/config_test.rs
use git_autobump::config::{load_config, Config};
use std::io::Write;
use tempfile::NamedTempFile;

#[test]
fn test_default_config() {
    let config = Config::default();
    assert_eq!(config.files.version_file, "VERSION");
    assert_eq!(config.files.readme_file, "README.md");
    assert_eq!(config.files.changelog_file, "CHANGELOG");
    assert_eq!(config.hook.template, "hooks/pre-commit");
    assert_eq!(config.hook.installed, ".git/hooks/pre-commit");
    assert_eq!(config.git.remote, "origin");
    assert_eq!(config.git.history_branch_format, "{major}.{minor}.x");
    assert_eq!(config.git.master_marker, "(master)");
    assert!(config.commands.release_metadata.is_none());
    assert!(config.commands.fix_permissions.is_none());
}

#[test]
fn test_workaround_defaults() {
    let config = Config::default();
    assert!(config.workaround.enabled);
    assert!(config
        .workaround
        .signatures
        .contains(&"jetbrains".to_string()));
    assert!(config
        .workaround
        .probe_env_vars
        .contains(&"TERMINAL_EMULATOR".to_string()));
}

#[test]
fn test_load_from_file() {
    let mut temp_file = NamedTempFile::new().unwrap();
    let toml_content = r#"
[files]
version_file = "src/info.py"
version_pattern = 'APP_VERSION = "(\d+\.\d+\.\d+)"'

[git]
remote = "upstream"
history_branch_format = "release-{minor}"

[commands]
release_metadata = "python scripts/latest_release.py"
"#;
    temp_file.write_all(toml_content.as_bytes()).unwrap();
    temp_file.flush().unwrap();

    let root = std::env::temp_dir();
    let config = load_config(Some(temp_file.path().to_str().unwrap()), &root).unwrap();
    assert_eq!(config.files.version_file, "src/info.py");
    assert_eq!(config.git.remote, "upstream");
    assert_eq!(config.git.history_branch_format, "release-{minor}");
    assert_eq!(
        config.commands.release_metadata.as_deref(),
        Some("python scripts/latest_release.py")
    );

    // Unspecified sections keep their defaults
    assert_eq!(config.files.readme_file, "README.md");
    assert_eq!(config.git.master_marker, "(master)");
    assert!(config.workaround.enabled);
}

#[test]
fn test_load_from_repo_root() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join("autobump.toml"),
        "[files]\nchangelog_file = \"ChangeLog.txt\"\n",
    )
    .unwrap();

    let config = load_config(None, dir.path()).unwrap();
    assert_eq!(config.files.changelog_file, "ChangeLog.txt");
}

#[test]
fn test_invalid_toml_is_an_error() {
    let mut temp_file = NamedTempFile::new().unwrap();
    temp_file.write_all(b"[files\nbroken").unwrap();
    temp_file.flush().unwrap();

    let root = std::env::temp_dir();
    let result = load_config(Some(temp_file.path().to_str().unwrap()), &root);
    assert!(result.is_err());
}
