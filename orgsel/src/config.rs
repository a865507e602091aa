//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Global config: `$XDG_CONFIG_HOME/orgsel/orgsel.toml`
//! 3. Local config: `<dir>/.orgsel.toml` (dir given by `-C`, default cwd)
//! 4. Environment variables: `ORGSEL_*` prefix

use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::application::ApplicationError;

pub const DEFAULT_TITLE: &str = "Configuration";

/// Unified configuration for orgsel.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    /// Tree definition used when no `--file` is given (default: demo organisation)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tree_file: Option<PathBuf>,
    /// Label of the virtual root in the tree view
    pub title: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            tree_file: None,
            title: DEFAULT_TITLE.to_string(),
        }
    }
}

/// Raw settings for intermediate parsing (fields are Option to detect "not specified").
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawSettings {
    pub tree_file: Option<PathBuf>,
    pub title: Option<String>,
}

/// Expand environment variables and `~` in a path string.
///
/// Uses shellexpand crate for robust expansion.
pub fn expand_env_vars(path: &str) -> String {
    shellexpand::full(path)
        .map(|s| s.into_owned())
        .unwrap_or_else(|_| path.to_string())
}

/// Get the XDG config directory for orgsel.
pub fn global_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "orgsel").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the global config file.
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("orgsel.toml"))
}

/// Get the path to the local config file in a directory.
pub fn local_config_path(dir: &Path) -> PathBuf {
    dir.join(".orgsel.toml")
}

/// Load a TOML file into RawSettings for manual merging.
fn load_raw_settings(path: &Path) -> Result<RawSettings, ApplicationError> {
    let content = std::fs::read_to_string(path).map_err(|e| ApplicationError::Config {
        message: format!("read {}: {}", path.display(), e),
    })?;
    toml::from_str(&content).map_err(|e| ApplicationError::Config {
        message: format!("parse {}: {}", path.display(), e),
    })
}

/// Expand `~` and `$VAR` once, where a path value enters the settings.
fn expand_path(path: &Path) -> PathBuf {
    PathBuf::from(expand_env_vars(path.to_string_lossy().as_ref()))
}

impl Settings {
    /// Merge overlay config onto self (base): overlay wins if specified.
    ///
    /// A relative `tree_file` is resolved against `base_dir`, the directory
    /// of the config file that named it.
    fn merge_with(&self, overlay: &RawSettings, base_dir: Option<&Path>) -> Self {
        let tree_file = overlay.tree_file.as_ref().map(|p| {
            let expanded = expand_path(p);
            match base_dir {
                Some(dir) if expanded.is_relative() => dir.join(expanded),
                _ => expanded,
            }
        });

        Self {
            tree_file: tree_file.or_else(|| self.tree_file.clone()),
            title: overlay.title.clone().unwrap_or_else(|| self.title.clone()),
        }
    }

    /// Load settings with layered precedence.
    ///
    /// # Arguments
    /// * `local_dir` - Optional directory holding a local `.orgsel.toml`
    ///
    /// # Precedence (lowest to highest)
    /// 1. Compiled defaults
    /// 2. Global config: `$XDG_CONFIG_HOME/orgsel/orgsel.toml`
    /// 3. Local config: `<local_dir>/.orgsel.toml`
    /// 4. Environment variables: `ORGSEL_*` prefix
    pub fn load(local_dir: Option<&Path>) -> Result<Self, ApplicationError> {
        // 1. Start with defaults
        let mut current = Self::default();

        // 2. Global config
        if let Some(global_path) = global_config_path() {
            if global_path.exists() {
                let raw = load_raw_settings(&global_path)?;
                current = current.merge_with(&raw, global_path.parent());
            }
        }

        // 3. Local config
        if let Some(dir) = local_dir {
            let local_path = local_config_path(dir);
            if local_path.exists() {
                let raw = load_raw_settings(&local_path)?;
                current = current.merge_with(&raw, Some(dir));
            }
        }

        // 4. Environment variables (explicit override)
        current = Self::apply_env_overrides(current)?;

        Ok(current)
    }

    /// Apply ORGSEL_* environment variables as explicit overrides.
    fn apply_env_overrides(mut settings: Self) -> Result<Self, ApplicationError> {
        // Use config crate just for env var parsing
        let config = Config::builder()
            .add_source(Environment::with_prefix("ORGSEL").separator("__"))
            .build()
            .map_err(config_err)?;

        if let Ok(val) = config.get_string("tree_file") {
            settings.tree_file = Some(expand_path(Path::new(&val)));
        }
        if let Ok(val) = config.get_string("title") {
            settings.title = val;
        }

        Ok(settings)
    }

    /// Show the effective configuration as TOML.
    pub fn to_toml(&self) -> Result<String, ApplicationError> {
        toml::to_string_pretty(self).map_err(|e| ApplicationError::Config {
            message: format!("serialize config: {e}"),
        })
    }

    /// Generate a template config file.
    pub fn template() -> String {
        r#"# orgsel configuration
#
# Locations (by precedence, lowest to highest):
#   Global: ~/.config/orgsel/orgsel.toml
#   Local:  <dir>/.orgsel.toml            (dir from -C, default cwd)
#   Env:    ORGSEL_* environment variables (explicit overrides)

# Tree definition used when --file is not given.
# Relative paths resolve against the directory of this file.
# Without it the built-in demo organisation is used.
# tree_file = "org.toml"

# Label of the (virtual) root in the tree view
# title = "Configuration"
"#
        .to_string()
    }
}

fn config_err(e: ConfigError) -> ApplicationError {
    ApplicationError::Config {
        message: e.to_string(),
    }
}
