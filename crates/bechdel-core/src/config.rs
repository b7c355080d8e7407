use std::time::Duration;

use crate::errors::BechdelError;

pub const DEFAULT_MODEL: &str = "llama2";
pub const DEFAULT_HOST: &str = "http://localhost:11434";

/// Settings for the external judgment service client and its caches.
#[derive(Debug, Clone)]
pub struct JudgeConfig {
    /// Ollama model name.
    pub model: String,
    /// Base URL of the Ollama server.
    pub host: String,
    /// Per-call timeout; timeouts degrade to the fallback path.
    pub timeout: Duration,
    /// Bound on each judgment cache (entries, LRU eviction).
    pub cache_size: usize,
    pub temperature: f32,
    pub max_tokens: u32,
}

impl Default for JudgeConfig {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            host: DEFAULT_HOST.to_string(),
            timeout: Duration::from_secs(30),
            cache_size: 128,
            temperature: 0.0,
            max_tokens: 64,
        }
    }
}

impl JudgeConfig {
    /// Build from `OLLAMA_MODEL`, `OLLAMA_HOST`, `OLLAMA_TIMEOUT` (seconds)
    /// and `OLLAMA_CACHE_SIZE`, falling back to defaults for unset values.
    pub fn from_env() -> Result<Self, BechdelError> {
        let defaults = Self::default();
        let timeout = match std::env::var("OLLAMA_TIMEOUT") {
            Ok(raw) => Duration::from_secs(raw.parse::<u64>().map_err(|e| {
                BechdelError::Config(format!("OLLAMA_TIMEOUT must be seconds: {e}"))
            })?),
            Err(_) => defaults.timeout,
        };
        let cache_size = match std::env::var("OLLAMA_CACHE_SIZE") {
            Ok(raw) => raw.parse::<usize>().map_err(|e| {
                BechdelError::Config(format!("OLLAMA_CACHE_SIZE must be an integer: {e}"))
            })?,
            Err(_) => defaults.cache_size,
        };
        Ok(Self {
            model: std::env::var("OLLAMA_MODEL").unwrap_or(defaults.model),
            host: std::env::var("OLLAMA_HOST").unwrap_or(defaults.host),
            timeout,
            cache_size,
            temperature: defaults.temperature,
            max_tokens: defaults.max_tokens,
        })
    }
}
