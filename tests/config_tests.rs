//! Tests for configuration system.

use std::io::Write;
use std::sync::{Mutex, OnceLock};

use agentics::config::AgenticsConfig;
use agentics::error::AgenticsError;
use agentics::hooks::HookFailurePolicy;

static ENV_LOCK: OnceLock<Mutex<()>> = OnceLock::new();

const CONFIG_ENV_VARS: [&str; 5] = [
    "OPENAI_API_KEY",
    "OPENAI_BASE_URL",
    "AGENTICS_MODEL",
    "AGENTICS_MEMORY_WINDOW",
    "AGENTICS_TIMEOUT_SECS",
];

struct EnvGuard {
    saved: Vec<(String, Option<String>)>,
}

impl EnvGuard {
    fn capture(keys: &[&str]) -> Self {
        let saved = keys
            .iter()
            .map(|key| ((*key).to_string(), std::env::var(key).ok()))
            .collect();
        Self { saved }
    }
}

impl Drop for EnvGuard {
    fn drop(&mut self) {
        for (key, value) in &self.saved {
            match value {
                Some(v) => std::env::set_var(key, v),
                None => std::env::remove_var(key),
            }
        }
    }
}

fn env_lock_guard() -> std::sync::MutexGuard<'static, ()> {
    ENV_LOCK
        .get_or_init(|| Mutex::new(()))
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
}

fn clear_env() -> EnvGuard {
    let guard = EnvGuard::capture(&CONFIG_ENV_VARS);
    for key in CONFIG_ENV_VARS {
        std::env::remove_var(key);
    }
    guard
}

#[test]
fn from_env_reads_provider_settings() {
    let _lock = env_lock_guard();
    let _env = clear_env();
    std::env::set_var("OPENAI_API_KEY", "sk-test");
    std::env::set_var("OPENAI_BASE_URL", "http://localhost:8080/v1");
    std::env::set_var("AGENTICS_MODEL", "gpt-4o");
    std::env::set_var("AGENTICS_MEMORY_WINDOW", "25");
    std::env::set_var("AGENTICS_TIMEOUT_SECS", "30");

    let config = AgenticsConfig::from_env().unwrap();
    assert_eq!(config.api_key.as_deref(), Some("sk-test"));
    assert_eq!(config.base_url.as_deref(), Some("http://localhost:8080/v1"));
    assert_eq!(config.model, "gpt-4o");
    assert_eq!(config.memory_window, 25);
    assert_eq!(config.timeout_secs, 30);
}

#[test]
fn from_env_without_vars_uses_defaults() {
    let _lock = env_lock_guard();
    let _env = clear_env();

    let config = AgenticsConfig::from_env().unwrap();
    assert_eq!(config.model, "gpt-4o-mini");
    assert_eq!(config.memory_window, 10);
}

#[test]
fn invalid_numeric_env_is_configuration_error() {
    let _lock = env_lock_guard();
    let _env = clear_env();
    std::env::set_var("AGENTICS_MEMORY_WINDOW", "ten");

    let err = AgenticsConfig::from_env().unwrap_err();
    assert!(matches!(err, AgenticsError::Configuration(msg) if msg.contains("AGENTICS_MEMORY_WINDOW")));
}

#[test]
fn env_overrides_toml_file() {
    let _lock = env_lock_guard();
    let _env = clear_env();
    std::env::set_var("AGENTICS_MODEL", "from-env");

    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(
        file,
        "model = \"from-file\"\nmemory_window = 4\nhook_failure_policy = \"log_and_continue\""
    )
    .unwrap();

    let config = AgenticsConfig::from_toml_file(file.path()).unwrap();
    assert_eq!(config.model, "from-env");
    assert_eq!(config.memory_window, 4);
    assert_eq!(config.hook_failure_policy, HookFailurePolicy::LogAndContinue);
}

#[test]
fn missing_api_key_fails_provider_creation() {
    let config = AgenticsConfig::default();
    let err = agentics::provider::create_provider(&config).err().unwrap();
    assert!(matches!(err, AgenticsError::Authentication(msg) if msg.contains("OPENAI_API_KEY")));
}

#[test]
fn unknown_provider_is_configuration_error() {
    let mut config = AgenticsConfig::default().with_api_key("sk");
    config.provider = "carrier-pigeon".to_string();
    let err = agentics::provider::create_provider(&config).err().unwrap();
    assert!(matches!(err, AgenticsError::Configuration(_)));
}
