//! Configuration for AI Utility.
//!
//! Everything is read from the process environment. A `.env` file is loaded
//! by the binary before [`Config::from_env`] runs.

use std::net::SocketAddr;
use std::time::Duration;

use secrecy::SecretString;

use crate::error::ConfigError;

const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
const DEFAULT_CHAT_MODEL: &str = "gemini-2.0-flash-exp";
const DEFAULT_EMBEDDING_MODEL: &str = "gemini-embedding-001";
const DEFAULT_HOST: &str = "127.0.0.1";
const DEFAULT_PORT: u16 = 8501;
const DEFAULT_SESSION_IDLE_SECS: u64 = 3600;

/// Main configuration.
#[derive(Debug, Clone)]
pub struct Config {
    pub google: GoogleConfig,
    pub gateway: GatewayConfig,
    pub session: SessionConfig,
}

/// Google Gemini API settings.
#[derive(Debug, Clone)]
pub struct GoogleConfig {
    pub api_key: SecretString,
    pub base_url: String,
    /// Model used for chat, captioning and Q&A.
    pub chat_model: String,
    /// Model used for text embeddings.
    pub embedding_model: String,
}

/// Web gateway bind settings.
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    pub host: String,
    pub port: u16,
}

/// Browser session lifetime settings.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Sessions unused for this long are dropped with their transcript.
    pub idle_timeout: Duration,
}

impl GatewayConfig {
    /// Resolve the socket address to bind.
    pub fn addr(&self) -> Result<SocketAddr, ConfigError> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|e| ConfigError::InvalidValue {
                key: "GATEWAY_HOST".to_string(),
                message: format!("{}:{} is not a socket address: {}", self.host, self.port, e),
            })
    }
}

impl Config {
    /// Load configuration from the process environment.
    ///
    /// Fails if `GOOGLE_API_KEY` is absent or empty.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary key lookup.
    pub(crate) fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let api_key = get("GOOGLE_API_KEY").ok_or_else(|| ConfigError::MissingEnvVar {
            key: "GOOGLE_API_KEY".to_string(),
        })?;

        let port = match get("GATEWAY_PORT") {
            Some(raw) => raw.parse::<u16>().map_err(|e| ConfigError::InvalidValue {
                key: "GATEWAY_PORT".to_string(),
                message: e.to_string(),
            })?,
            None => DEFAULT_PORT,
        };

        let idle_secs = match get("SESSION_IDLE_TIMEOUT_SECS") {
            Some(raw) => match raw.parse::<u64>() {
                Ok(secs) if secs > 0 => secs,
                Ok(_) => {
                    return Err(ConfigError::InvalidValue {
                        key: "SESSION_IDLE_TIMEOUT_SECS".to_string(),
                        message: "must be greater than zero".to_string(),
                    });
                }
                Err(e) => {
                    return Err(ConfigError::InvalidValue {
                        key: "SESSION_IDLE_TIMEOUT_SECS".to_string(),
                        message: e.to_string(),
                    });
                }
            },
            None => DEFAULT_SESSION_IDLE_SECS,
        };

        Ok(Self {
            google: GoogleConfig {
                api_key: SecretString::from(api_key),
                base_url: get("GEMINI_BASE_URL").unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
                chat_model: get("GEMINI_CHAT_MODEL")
                    .unwrap_or_else(|| DEFAULT_CHAT_MODEL.to_string()),
                embedding_model: get("GEMINI_EMBEDDING_MODEL")
                    .unwrap_or_else(|| DEFAULT_EMBEDDING_MODEL.to_string()),
            },
            gateway: GatewayConfig {
                host: get("GATEWAY_HOST").unwrap_or_else(|| DEFAULT_HOST.to_string()),
                port,
            },
            session: SessionConfig {
                idle_timeout: Duration::from_secs(idle_secs),
            },
        })
    }
}
