//! Environment-driven configuration.
//!
//! Values come from the process environment. The binary loads a `.env` file
//! with `dotenvy` before calling [`AppConfig::from_env`].

use std::net::SocketAddr;
use std::str::FromStr;
use std::time::Duration;

use secrecy::SecretString;
use thiserror::Error;

use crate::chat::{
    adapters::ollama::{DEFAULT_OLLAMA_MODEL, DEFAULT_STALL_TIMEOUT},
    services::DEFAULT_MAX_TOKENS,
};

const DEFAULT_BIND_ADDR: &str = "127.0.0.1:3000";
const DEFAULT_POOL_SIZE: u32 = 10;
const DEFAULT_TRADING_TIMEOUT_SECS: u64 = 30;
const DEFAULT_OLLAMA_BASE_URL: &str = "http://127.0.0.1:11434/api";
const DEFAULT_USER_HEADER: &str = "x-user-id";

/// Errors raised while reading configuration.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// A required variable is unset or empty.
    #[error("missing required environment variable {key}")]
    MissingRequired {
        /// Variable name.
        key: String,
    },

    /// A variable is set but cannot be parsed.
    #[error("invalid value for {key}: {message}")]
    InvalidValue {
        /// Variable name.
        key: String,
        /// Parse failure detail.
        message: String,
    },
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Human-readable multi-line output.
    #[default]
    Pretty,
    /// One JSON object per event.
    Json,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "pretty" | "text" => Ok(Self::Pretty),
            "json" => Ok(Self::Json),
            other => Err(format!("expected 'pretty' or 'json', got '{other}'")),
        }
    }
}

/// Chat store settings.
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    /// `PostgreSQL` connection URL.
    pub url: SecretString,
    /// Maximum pooled connections.
    pub pool_size: u32,
}

/// Trading backend settings.
#[derive(Debug, Clone)]
pub struct TradingConfig {
    /// Base URL of the coin-workflow service.
    pub base_url: String,
    /// Sent with every request as `x-api-key`.
    pub api_key: SecretString,
    /// Per-request timeout.
    pub timeout: Duration,
}

/// Language-model provider settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelConfig {
    /// Ollama API base, for example `http://127.0.0.1:11434/api`.
    pub base_url: String,
    /// Model name.
    pub model: String,
    /// Completion token cap per turn.
    pub max_tokens: u32,
    /// Longest tolerated silence from the provider.
    pub stall_timeout: Duration,
}

/// Caller identification settings.
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// Header carrying the authenticated user id.
    pub user_header: String,
    /// When set, requests must carry `Authorization: Bearer <secret>`.
    pub shared_secret: Option<SecretString>,
}

/// Complete application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// HTTP listen address.
    pub bind_addr: SocketAddr,
    /// `PostgreSQL` settings; `None` selects the in-memory store.
    pub database: Option<DatabaseConfig>,
    /// Trading backend settings.
    pub trading: TradingConfig,
    /// Model provider settings.
    pub model: ModelConfig,
    /// Caller identification settings.
    pub auth: AuthConfig,
    /// Log output format.
    pub log_format: LogFormat,
}

impl AppConfig {
    /// Reads configuration from the process environment.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when a required variable is missing or a
    /// value cannot be parsed.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads configuration through `lookup`, which maps a variable name to
    /// its value.
    ///
    /// # Errors
    ///
    /// Same as [`Self::from_env`].
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let env = Env(lookup);

        let database = env
            .optional("DATABASE_URL")
            .map(|url| -> Result<DatabaseConfig, ConfigError> {
                Ok(DatabaseConfig {
                    url: SecretString::from(url),
                    pool_size: env.parse_or("DATABASE_POOL_SIZE", DEFAULT_POOL_SIZE)?,
                })
            })
            .transpose()?;

        let trading = TradingConfig {
            base_url: env.required("COIN_WORKFLOW_BASE_URL")?,
            api_key: SecretString::from(env.required("COIN_WORKFLOW_API_KEY")?),
            timeout: Duration::from_secs(
                env.parse_or("TRADING_TIMEOUT_SECS", DEFAULT_TRADING_TIMEOUT_SECS)?,
            ),
        };

        let model = ModelConfig {
            base_url: env
                .optional("OLLAMA_BASE_URL")
                .unwrap_or_else(|| DEFAULT_OLLAMA_BASE_URL.to_owned()),
            model: env
                .optional("OLLAMA_MODEL")
                .unwrap_or_else(|| DEFAULT_OLLAMA_MODEL.to_owned()),
            max_tokens: env.parse_or("MODEL_MAX_TOKENS", DEFAULT_MAX_TOKENS)?,
            stall_timeout: Duration::from_secs(
                env.parse_or("MODEL_STALL_TIMEOUT_SECS", DEFAULT_STALL_TIMEOUT.as_secs())?,
            ),
        };

        let auth = AuthConfig {
            user_header: env
                .optional("AUTH_USER_HEADER")
                .map_or_else(|| DEFAULT_USER_HEADER.to_owned(), |h| h.to_ascii_lowercase()),
            shared_secret: env.optional("AUTH_SHARED_SECRET").map(SecretString::from),
        };

        Ok(Self {
            bind_addr: env.parse_or_str("MEMECHAT_BIND_ADDR", DEFAULT_BIND_ADDR)?,
            database,
            trading,
            model,
            auth,
            log_format: env.parse_or("LOG_FORMAT", LogFormat::default())?,
        })
    }
}

/// Typed access over a variable lookup. Empty values count as unset.
struct Env<F>(F);

impl<F> Env<F>
where
    F: Fn(&str) -> Option<String>,
{
    fn optional(&self, key: &str) -> Option<String> {
        (self.0)(key)
            .map(|value| value.trim().to_owned())
            .filter(|value| !value.is_empty())
    }

    fn required(&self, key: &str) -> Result<String, ConfigError> {
        self.optional(key).ok_or_else(|| ConfigError::MissingRequired {
            key: key.to_owned(),
        })
    }

    fn parse_or<T>(&self, key: &str, default: T) -> Result<T, ConfigError>
    where
        T: FromStr,
        T::Err: std::fmt::Display,
    {
        self.optional(key)
            .map_or(Ok(default), |raw| parse_value(key, &raw))
    }

    fn parse_or_str<T>(&self, key: &str, default: &str) -> Result<T, ConfigError>
    where
        T: FromStr,
        T::Err: std::fmt::Display,
    {
        let raw = self.optional(key).unwrap_or_else(|| default.to_owned());
        parse_value(key, &raw)
    }
}

fn parse_value<T>(key: &str, raw: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    raw.parse().map_err(|e: T::Err| ConfigError::InvalidValue {
        key: key.to_owned(),
        message: e.to_string(),
    })
}
