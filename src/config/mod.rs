//! Configuration system (layered: defaults > TOML file > environment).

use std::path::Path;
use std::time::Duration;

use serde::Deserialize;

use crate::error::{AgenticsError, Result};
use crate::hooks::HookFailurePolicy;
use crate::state::DEFAULT_MEMORY_WINDOW;

pub const DEFAULT_MODEL: &str = "gpt-4o-mini";
pub const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// Process-level settings: provider credentials and graph defaults.
#[derive(Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct AgenticsConfig {
    pub provider: String,
    pub api_key: Option<String>,
    pub base_url: Option<String>,
    pub model: String,
    pub memory_window: usize,
    pub timeout_secs: u64,
    pub hook_failure_policy: HookFailurePolicy,
}

impl std::fmt::Debug for AgenticsConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AgenticsConfig")
            .field("provider", &self.provider)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("memory_window", &self.memory_window)
            .field("timeout_secs", &self.timeout_secs)
            .field("hook_failure_policy", &self.hook_failure_policy)
            .finish()
    }
}

impl Default for AgenticsConfig {
    fn default() -> Self {
        Self {
            provider: "openai".to_string(),
            api_key: None,
            base_url: None,
            model: DEFAULT_MODEL.to_string(),
            memory_window: DEFAULT_MEMORY_WINDOW,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            hook_failure_policy: HookFailurePolicy::default(),
        }
    }
}

impl AgenticsConfig {
    /// Defaults overlaid with environment variables (and `.env`, if present).
    pub fn from_env() -> Result<Self> {
        let _ = dotenvy::dotenv(); // load .env if present, ignore error
        let mut config = Self::default();
        config.apply_env()?;
        Ok(config)
    }

    /// Parse a TOML document; missing keys keep their defaults.
    pub fn from_toml_str(s: &str) -> Result<Self> {
        toml::from_str(s).map_err(|e| AgenticsError::Configuration(e.to_string()))
    }

    /// TOML file overlaid with environment variables.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self> {
        let _ = dotenvy::dotenv();
        let text = std::fs::read_to_string(path)?;
        let mut config = Self::from_toml_str(&text)?;
        config.apply_env()?;
        Ok(config)
    }

    fn apply_env(&mut self) -> Result<()> {
        if let Some(key) = env_var("OPENAI_API_KEY") {
            self.api_key = Some(key);
        }
        if let Some(url) = env_var("OPENAI_BASE_URL") {
            self.base_url = Some(url);
        }
        if let Some(model) = env_var("AGENTICS_MODEL") {
            self.model = model;
        }
        if let Some(window) = env_var("AGENTICS_MEMORY_WINDOW") {
            self.memory_window = parse_env("AGENTICS_MEMORY_WINDOW", &window)?;
        }
        if let Some(secs) = env_var("AGENTICS_TIMEOUT_SECS") {
            self.timeout_secs = parse_env("AGENTICS_TIMEOUT_SECS", &secs)?;
        }
        Ok(())
    }

    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Per-graph settings derived from this config.
    pub fn graph_config(&self) -> GraphConfig {
        GraphConfig {
            memory_window: self.memory_window,
            hook_failure_policy: self.hook_failure_policy,
        }
    }
}

/// Settings a single graph is built with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GraphConfig {
    pub memory_window: usize,
    pub hook_failure_policy: HookFailurePolicy,
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self {
            memory_window: DEFAULT_MEMORY_WINDOW,
            hook_failure_policy: HookFailurePolicy::default(),
        }
    }
}

fn env_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

fn parse_env<T: std::str::FromStr>(name: &str, raw: &str) -> Result<T> {
    raw.trim()
        .parse()
        .map_err(|_| AgenticsError::Configuration(format!("{name} has invalid value '{raw}'")))
}
