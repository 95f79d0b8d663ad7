//! Process configuration — built once at startup from the environment
//! (plus an optional `.env` file) and shared read-only with handlers.

use std::net::SocketAddr;

use axum::http::HeaderValue;

pub const DEFAULT_LISTEN: &str = "0.0.0.0:8000";
pub const DEFAULT_API_BASE: &str = "https://api.openai.com/v1";
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";

/// Which browser origins may call the relay.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CorsPolicy {
    /// Any origin, method, and header, with credentials.
    Any,
    /// Only the listed origins, with credentials.
    Origins(Vec<HeaderValue>),
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub listen_addr: SocketAddr,
    pub api_key: Option<String>,
    pub api_base: String,
    pub model: String,
    pub cors: CorsPolicy,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid listen address '{value}': {reason}")]
    InvalidListenAddr { value: String, reason: String },

    #[error("Invalid CORS origin '{0}'")]
    InvalidOrigin(String),
}

impl AppConfig {
    /// Read configuration from the process environment.
    ///
    /// Call `dotenvy::dotenv()` first if a `.env` file should be honoured.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read configuration through `lookup`, which maps a variable name to its value.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let listen = non_empty("VAULTAI_LISTEN").unwrap_or_else(|| DEFAULT_LISTEN.to_string());
        let listen_addr = listen
            .parse::<SocketAddr>()
            .map_err(|e| ConfigError::InvalidListenAddr {
                value: listen.clone(),
                reason: e.to_string(),
            })?;

        let api_base = non_empty("OPENAI_BASE_URL")
            .unwrap_or_else(|| DEFAULT_API_BASE.to_string())
            .trim_end_matches('/')
            .to_string();

        let cors = match non_empty("VAULTAI_CORS_ORIGINS") {
            None => CorsPolicy::Any,
            Some(raw) => parse_cors_origins(&raw)?,
        };

        Ok(Self {
            listen_addr,
            api_key: non_empty("OPENAI_API_KEY"),
            api_base,
            model: non_empty("OPENAI_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            cors,
        })
    }

    pub fn chat_completions_url(&self) -> String {
        format!("{}/chat/completions", self.api_base)
    }
}

/// Parse a comma-separated origin list. A lone `*` (or any `*` entry) means any origin.
fn parse_cors_origins(raw: &str) -> Result<CorsPolicy, ConfigError> {
    let entries: Vec<&str> = raw
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect();

    if entries.is_empty() || entries.contains(&"*") {
        return Ok(CorsPolicy::Any);
    }

    let origins = entries
        .into_iter()
        .map(|origin| {
            HeaderValue::from_str(origin).map_err(|_| ConfigError::InvalidOrigin(origin.to_string()))
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(CorsPolicy::Origins(origins))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(vars: &[(&str, &str)]) -> Result<AppConfig, ConfigError> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|key| map.get(key).cloned())
    }

    #[test]
    fn defaults_when_env_is_empty() {
        let config = config_from(&[]).unwrap();
        assert_eq!(config.listen_addr, DEFAULT_LISTEN.parse::<SocketAddr>().unwrap());
        assert_eq!(config.api_key, None);
        assert_eq!(config.api_base, DEFAULT_API_BASE);
        assert_eq!(config.model, DEFAULT_MODEL);
        assert_eq!(config.cors, CorsPolicy::Any);
    }

    #[test]
    fn reads_all_variables() {
        let config = config_from(&[
            ("VAULTAI_LISTEN", "127.0.0.1:9100"),
            ("OPENAI_API_KEY", "sk-test"),
            ("OPENAI_BASE_URL", "http://localhost:4000/v1/"),
            ("OPENAI_MODEL", "gpt-4o"),
            ("VAULTAI_CORS_ORIGINS", "http://localhost:3000, https://app.example.com"),
        ])
        .unwrap();

        assert_eq!(config.listen_addr.port(), 9100);
        assert_eq!(config.api_key.as_deref(), Some("sk-test"));
        assert_eq!(config.api_base, "http://localhost:4000/v1");
        assert_eq!(
            config.chat_completions_url(),
            "http://localhost:4000/v1/chat/completions"
        );
        assert_eq!(config.model, "gpt-4o");
        match config.cors {
            CorsPolicy::Origins(origins) => {
                assert_eq!(origins.len(), 2);
                assert_eq!(origins[0], "http://localhost:3000");
                assert_eq!(origins[1], "https://app.example.com");
            }
            other => panic!("Expected explicit origins, got {:?}", other),
        }
    }

    #[test]
    fn blank_api_key_counts_as_missing() {
        let config = config_from(&[("OPENAI_API_KEY", "   ")]).unwrap();
        assert_eq!(config.api_key, None);
    }

    #[test]
    fn wildcard_origin_means_any() {
        let config = config_from(&[("VAULTAI_CORS_ORIGINS", "http://a.test,*")]).unwrap();
        assert_eq!(config.cors, CorsPolicy::Any);
    }

    #[test]
    fn rejects_bad_listen_addr() {
        let err = config_from(&[("VAULTAI_LISTEN", "not-an-addr")]).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidListenAddr { .. }));
    }

    #[test]
    fn rejects_bad_origin() {
        let err = config_from(&[("VAULTAI_CORS_ORIGINS", "http://ok.test,bad\norigin")]).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidOrigin(_)));
    }
}
