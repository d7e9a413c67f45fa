//! Configuration system for FairLens.
//!
//! Uses `figment` for layered configuration: defaults -> config file -> environment -> overrides.
//! Configuration is loaded from `~/.config/fairlens/config.toml` and/or `.fairlens/config.toml`
//! in the workspace directory. Sections owned by other crates (such as `[audit]`) are
//! extracted from the same layered [`figment`] via [`Figment::extract_inner`].

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Name of the per-workspace configuration directory.
pub const WORKSPACE_CONFIG_DIR: &str = ".fairlens";

/// Top-level configuration for FairLens.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FairlensConfig {
    pub llm: LlmConfig,
}

/// LLM provider configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    /// Provider name. Only "gemini" is currently supported.
    pub provider: String,
    /// Model identifier (e.g., "gemini-2.5-flash").
    pub model: String,
    /// Environment variable name containing the API key.
    pub api_key_env: String,
    /// Explicit API key. Takes precedence over `api_key_env` when set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    /// Optional base URL override for the API endpoint.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    /// Maximum tokens to generate in a response.
    pub max_tokens: usize,
    /// HTTP request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            provider: "gemini".to_string(),
            model: "gemini-2.5-flash".to_string(),
            api_key_env: "GEMINI_API_KEY".to_string(),
            api_key: None,
            base_url: None,
            max_tokens: 8192,
            timeout_secs: 120,
        }
    }
}

impl LlmConfig {
    /// Validate this LLM config and return any warnings.
    ///
    /// Returns an empty Vec if the config is valid. Problems are reported as
    /// human-readable warnings rather than errors.
    pub fn validate(&self) -> Vec<String> {
        let mut warnings = Vec::new();
        if self.max_tokens == 0 {
            warnings.push("max_tokens is 0; every response will be empty".to_string());
        }
        if self.timeout_secs == 0 {
            warnings.push("timeout_secs is 0; requests will time out immediately".to_string());
        }
        if self.api_key.is_none() && self.api_key_env.trim().is_empty() {
            warnings.push("neither api_key nor api_key_env is set".to_string());
        }
        warnings
    }
}

fn user_config_path() -> Option<PathBuf> {
    directories::ProjectDirs::from("dev", "fairlens", "fairlens")
        .map(|dirs| dirs.config_dir().join("config.toml"))
}

/// Path of the workspace-level configuration file.
pub fn workspace_config_path(workspace: &Path) -> PathBuf {
    workspace.join(WORKSPACE_CONFIG_DIR).join("config.toml")
}

/// Build the layered figment without extracting it.
///
/// Priority (highest to lowest):
/// 1. Environment variables (prefixed with `FAIRLENS_`)
/// 2. Workspace-local config (`.fairlens/config.toml`)
/// 3. User config (`~/.config/fairlens/config.toml`)
/// 4. Built-in defaults
pub fn figment(workspace: Option<&Path>) -> Figment {
    let mut figment = Figment::from(Serialized::defaults(FairlensConfig::default()));

    if let Some(user_config) = user_config_path() {
        if user_config.exists() {
            figment = figment.merge(Toml::file(&user_config));
        }
    }

    if let Some(ws) = workspace {
        let ws_config = workspace_config_path(ws);
        if ws_config.exists() {
            figment = figment.merge(Toml::file(&ws_config));
        }
    }

    // FAIRLENS_LLM__MODEL, FAIRLENS_AUDIT__DEFAULT_TECHNIQUE, etc.
    figment.merge(Env::prefixed("FAIRLENS_").split("__"))
}

/// Load configuration from all layers, with optional explicit overrides on top.
pub fn load_config(
    workspace: Option<&Path>,
    overrides: Option<&FairlensConfig>,
) -> Result<FairlensConfig, Box<figment::Error>> {
    let mut figment = figment(workspace);

    if let Some(overrides) = overrides {
        figment = figment.merge(Serialized::defaults(overrides));
    }

    figment.extract().map_err(Box::new)
}

/// Check whether any FairLens configuration file exists (user-level or workspace-level).
pub fn config_exists(workspace: Option<&Path>) -> bool {
    if user_config_path().is_some_and(|p| p.exists()) {
        return true;
    }
    workspace.is_some_and(|ws| workspace_config_path(ws).exists())
}
