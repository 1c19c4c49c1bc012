use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Represents the complete configuration for git-autobump.
///
/// Contains the tracked file locations, history-branch naming, helper command
/// lines, and IDE workaround settings. All paths are relative to the
/// repository root.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Config {
    #[serde(default)]
    pub files: FilesConfig,

    #[serde(default)]
    pub hook: HookConfig,

    #[serde(default)]
    pub git: GitConfig,

    #[serde(default)]
    pub commands: CommandsConfig,

    #[serde(default)]
    pub workaround: WorkaroundConfig,
}

fn default_version_file() -> String {
    "VERSION".to_string()
}

fn default_version_pattern() -> String {
    r"\d+\.\d+\.\d+".to_string()
}

fn default_readme_file() -> String {
    "README.md".to_string()
}

fn default_changelog_file() -> String {
    "CHANGELOG".to_string()
}

/// Locations of the files the hook reads and rewrites.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct FilesConfig {
    #[serde(default = "default_version_file")]
    pub version_file: String,

    #[serde(default = "default_version_pattern")]
    pub version_pattern: String,

    #[serde(default = "default_readme_file")]
    pub readme_file: String,

    #[serde(default = "default_changelog_file")]
    pub changelog_file: String,
}

impl Default for FilesConfig {
    fn default() -> Self {
        FilesConfig {
            version_file: default_version_file(),
            version_pattern: default_version_pattern(),
            readme_file: default_readme_file(),
            changelog_file: default_changelog_file(),
        }
    }
}

fn default_hook_template() -> String {
    "hooks/pre-commit".to_string()
}

fn default_hook_installed() -> String {
    ".git/hooks/pre-commit".to_string()
}

/// Locations of the tracked hook template and the installed hook.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct HookConfig {
    #[serde(default = "default_hook_template")]
    pub template: String,

    #[serde(default = "default_hook_installed")]
    pub installed: String,
}

impl Default for HookConfig {
    fn default() -> Self {
        HookConfig {
            template: default_hook_template(),
            installed: default_hook_installed(),
        }
    }
}

fn default_remote() -> String {
    "origin".to_string()
}

fn default_history_branch_format() -> String {
    "{major}.{minor}.x".to_string()
}

fn default_master_marker() -> String {
    "(master)".to_string()
}

/// History-branch naming and the README marker for master-tracking state.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct GitConfig {
    #[serde(default = "default_remote")]
    pub remote: String,

    #[serde(default = "default_history_branch_format")]
    pub history_branch_format: String,

    #[serde(default = "default_master_marker")]
    pub master_marker: String,
}

impl Default for GitConfig {
    fn default() -> Self {
        GitConfig {
            remote: default_remote(),
            history_branch_format: default_history_branch_format(),
            master_marker: default_master_marker(),
        }
    }
}

/// External helper command lines, run through the shell in the repo root.
///
/// Both are optional; an empty value disables the step.
#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct CommandsConfig {
    #[serde(default)]
    pub release_metadata: Option<String>,

    #[serde(default)]
    pub fix_permissions: Option<String>,
}

fn default_probe_env_vars() -> Vec<String> {
    vec![
        "TERMINAL_EMULATOR".to_string(),
        "TERM_PROGRAM".to_string(),
        "XPC_SERVICE_NAME".to_string(),
        "IDEA_INITIAL_DIRECTORY".to_string(),
    ]
}

fn default_ide_signatures() -> Vec<String> {
    vec![
        "jetbrains".to_string(),
        "intellij".to_string(),
        "pycharm".to_string(),
        "idea".to_string(),
        "clion".to_string(),
    ]
}

fn default_workaround_enabled() -> bool {
    true
}

/// IDE two-phase commit workaround settings.
///
/// The quirk is vendor-version-dependent, so both the probed environment
/// variables and the matched name fragments are configurable.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct WorkaroundConfig {
    #[serde(default = "default_workaround_enabled")]
    pub enabled: bool,

    #[serde(default = "default_probe_env_vars")]
    pub probe_env_vars: Vec<String>,

    #[serde(default = "default_ide_signatures")]
    pub signatures: Vec<String>,
}

impl Default for WorkaroundConfig {
    fn default() -> Self {
        WorkaroundConfig {
            enabled: default_workaround_enabled(),
            probe_env_vars: default_probe_env_vars(),
            signatures: default_ide_signatures(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            files: FilesConfig::default(),
            hook: HookConfig::default(),
            git: GitConfig::default(),
            commands: CommandsConfig::default(),
            workaround: WorkaroundConfig::default(),
        }
    }
}

/// Loads configuration from file or returns defaults.
///
/// Attempts to load configuration in the following order:
/// 1. Custom path provided as parameter
/// 2. `autobump.toml` in the repository root
/// 3. `autobump.toml` in the user config directory
/// 4. Default configuration if no file found
///
/// # Arguments
/// * `config_path` - Optional path to custom configuration file
/// * `repo_root` - Repository root directory
///
/// # Returns
/// * `Ok(Config)` - Loaded or default configuration
/// * `Err` - If file exists but cannot be read or parsed
pub fn load_config(
    config_path: Option<&str>,
    repo_root: &Path,
) -> Result<Config, Box<dyn std::error::Error>> {
    let config_str = if let Some(path) = config_path {
        fs::read_to_string(path)?
    } else if repo_root.join("autobump.toml").exists() {
        fs::read_to_string(repo_root.join("autobump.toml"))?
    } else if let Some(config_dir) = dirs::config_dir() {
        let config_path = config_dir.join("autobump.toml");
        if config_path.exists() {
            fs::read_to_string(config_path)?
        } else {
            return Ok(Config::default());
        }
    } else {
        return Ok(Config::default());
    };

    let config: Config = toml::from_str(&config_str)?;
    Ok(config)
}
