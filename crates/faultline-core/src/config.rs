//! Environment-driven configuration.
//!
//! Faultline has no project config file of its own -- the external
//! interfaces (CLI flags, HTTP request body) supply per-request overrides,
//! and everything else recognized here comes from environment variables
//! (see the top-level design notes for the full table).

use std::env;

/// LLM model priority list and API key pool.
#[derive(Debug, Clone, PartialEq)]
pub struct LlmConfig {
    pub models: Vec<String>,
    pub keys: Vec<String>,
}

impl LlmConfig {
    const DEFAULT_MODELS: &'static [&'static str] =
        &["gemini-3-flash-preview", "gemini-2.5-flash", "gemini-2.5-flash-lite"];

    pub fn from_env() -> Self {
        let models = env::var("ROMA_MODELS")
            .or_else(|_| env::var("GEMINI_MODELS"))
            .ok()
            .filter(|s| !s.trim().is_empty())
            .map(|s| s.split(',').map(|m| m.trim().to_string()).collect())
            .unwrap_or_else(|| {
                Self::DEFAULT_MODELS.iter().map(|s| s.to_string()).collect()
            });

        let mut keys = Vec::new();
        if let Ok(pool) = env::var("GEMINI_API_KEYS") {
            keys.extend(pool.split(',').map(|s| s.trim().to_string()).filter(|s| !s.is_empty()));
        }
        if let Ok(k) = env::var("GEMINI_API_KEY") {
            if !k.trim().is_empty() {
                keys.push(k);
            }
        }
        let mut i = 2;
        loop {
            match env::var(format!("GEMINI_API_KEY{i}")) {
                Ok(k) if !k.trim().is_empty() => {
                    keys.push(k);
                    i += 1;
                }
                _ => break,
            }
        }
        keys.dedup();

        LlmConfig { models, keys }
    }
}

/// Size caps applied before the LLM call / before writing a patch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SizeCaps {
    pub max_log_bytes: usize,
    pub max_patch_bytes: usize,
    pub max_repo_files: usize,
    pub max_repo_bytes: usize,
}

impl Default for SizeCaps {
    fn default() -> Self {
        SizeCaps {
            max_log_bytes: 1_000_000,
            max_patch_bytes: 200 * 1024,
            max_repo_files: 20_000,
            max_repo_bytes: 200_000_000,
        }
    }
}

impl SizeCaps {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        SizeCaps {
            max_log_bytes: env_usize("ROMA_MAX_LOG_BYTES").unwrap_or(defaults.max_log_bytes),
            max_patch_bytes: env_usize("ROMA_MAX_PATCH_BYTES").unwrap_or(defaults.max_patch_bytes),
            max_repo_files: env_usize("ROMA_MAX_REPO_FILES").unwrap_or(defaults.max_repo_files),
            max_repo_bytes: env_usize("ROMA_MAX_REPO_BYTES").unwrap_or(defaults.max_repo_bytes),
        }
    }
}

fn env_usize(name: &str) -> Option<usize> {
    env::var(name).ok().and_then(|s| s.trim().parse().ok())
}

/// HTTP server access control, read once at startup.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ServerAccessConfig {
    pub allow_client_project_root: bool,
    pub allowed_origins: Vec<String>,
    pub allowed_origin_regex: Option<String>,
    pub required_api_key: Option<String>,
}

impl ServerAccessConfig {
    pub fn from_env() -> Self {
        ServerAccessConfig {
            allow_client_project_root: env::var("ROMA_ALLOW_PROJECT_ROOT")
                .map(|v| parse_bool(&v))
                .unwrap_or(false),
            allowed_origins: env::var("ROMA_ALLOWED_ORIGINS")
                .ok()
                .map(|s| s.split(',').map(|o| o.trim().to_string()).filter(|o| !o.is_empty()).collect())
                .unwrap_or_default(),
            allowed_origin_regex: env::var("ROMA_ALLOWED_ORIGIN_REGEX").ok(),
            required_api_key: env::var("ROMA_API_KEY").ok().filter(|k| !k.is_empty()),
        }
    }
}

fn parse_bool(v: &str) -> bool {
    matches!(v.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on")
}

/// Top-level runtime configuration, assembled once at process start.
#[derive(Debug, Clone)]
pub struct FaultlineConfig {
    pub llm: LlmConfig,
    pub size_caps: SizeCaps,
    pub server: ServerAccessConfig,
}

impl FaultlineConfig {
    pub fn from_env() -> Self {
        FaultlineConfig {
            llm: LlmConfig::from_env(),
            size_caps: SizeCaps::from_env(),
            server: ServerAccessConfig::from_env(),
        }
    }

    /// Whether an API key has been configured at all (used by `/health`).
    pub fn api_key_configured(&self) -> bool {
        !self.llm.keys.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    // Environment variables are process-global; serialize the tests that
    // touch them so parallel execution can't observe half-set state.
    static ENV_LOCK: Mutex<()> = Mutex::new(());

    fn clear_llm_env() {
        for var in [
            "ROMA_MODELS",
            "GEMINI_MODELS",
            "GEMINI_API_KEY",
            "GEMINI_API_KEY2",
            "GEMINI_API_KEY3",
            "GEMINI_API_KEYS",
        ] {
            env::remove_var(var);
        }
    }

    #[test]
    fn default_model_list_matches_spec_order() {
        let _g = ENV_LOCK.lock().unwrap();
        clear_llm_env();
        let cfg = LlmConfig::from_env();
        assert_eq!(
            cfg.models,
            vec!["gemini-3-flash-preview", "gemini-2.5-flash", "gemini-2.5-flash-lite"]
        );
        assert!(cfg.keys.is_empty());
    }

    #[test]
    fn enumerated_keys_are_collected_in_order() {
        let _g = ENV_LOCK.lock().unwrap();
        clear_llm_env();
        env::set_var("GEMINI_API_KEY", "key-a");
        env::set_var("GEMINI_API_KEY2", "key-b");
        env::set_var("GEMINI_API_KEY3", "key-c");
        let cfg = LlmConfig::from_env();
        assert_eq!(cfg.keys, vec!["key-a", "key-b", "key-c"]);
        clear_llm_env();
    }

    #[test]
    fn comma_separated_pool_is_split_and_trimmed() {
        let _g = ENV_LOCK.lock().unwrap();
        clear_llm_env();
        env::set_var("GEMINI_API_KEYS", "key-a, key-b ,key-c");
        let cfg = LlmConfig::from_env();
        assert_eq!(cfg.keys, vec!["key-a", "key-b", "key-c"]);
        clear_llm_env();
    }

    #[test]
    fn size_caps_default_to_documented_values() {
        let caps = SizeCaps::default();
        assert_eq!(caps.max_patch_bytes, 200 * 1024);
    }

    #[test]
    fn server_access_defaults_deny_client_project_root() {
        let _g = ENV_LOCK.lock().unwrap();
        env::remove_var("ROMA_ALLOW_PROJECT_ROOT");
        let cfg = ServerAccessConfig::from_env();
        assert!(!cfg.allow_client_project_root);
    }
}
