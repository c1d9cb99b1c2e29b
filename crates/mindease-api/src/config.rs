use config::{Config as ConfigLoader, ConfigError, Environment, File};
use serde::Deserialize;
use std::fmt::Display;
use std::path::Path;
use std::str::FromStr;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub cors: CorsConfig,
    #[serde(default)]
    pub mongodb: MongoDbConfig,
    #[serde(default)]
    pub llm: LlmConfig,
    #[serde(default)]
    pub chat: ChatConfig,
    #[serde(default)]
    pub logging: LoggingConfig,

    // Secrets (from ENV only)
    #[serde(skip)]
    pub mongodb_uri: Option<String>,
    #[serde(skip)]
    pub groq_api_key: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            request_timeout_secs: default_request_timeout(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8000
}

fn default_request_timeout() -> u64 {
    300
}

#[derive(Debug, Clone, Deserialize)]
pub struct CorsConfig {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default)]
    pub origins: Vec<String>,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            origins: vec!["*".to_string()],
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct MongoDbConfig {
    #[serde(default = "default_database")]
    pub database: String,
}

impl Default for MongoDbConfig {
    fn default() -> Self {
        Self {
            database: default_database(),
        }
    }
}

fn default_database() -> String {
    "mindease".to_string()
}

#[derive(Debug, Clone, Deserialize)]
pub struct LlmConfig {
    #[serde(default = "default_model")]
    pub model: String,
    /// OpenAI-compatible endpoint; Groq when unset
    #[serde(default)]
    pub base_url: Option<String>,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            model: default_model(),
            base_url: None,
        }
    }
}

fn default_model() -> String {
    mindease_core::DEFAULT_MODEL.to_string()
}

/// Listing limits for history and entry endpoints
#[derive(Debug, Clone, Deserialize)]
pub struct ChatConfig {
    #[serde(default = "default_history_limit")]
    pub history_default_limit: usize,
    #[serde(default = "default_history_max")]
    pub history_max_limit: usize,
    #[serde(default = "default_list_limit")]
    pub list_default_limit: usize,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            history_default_limit: default_history_limit(),
            history_max_limit: default_history_max(),
            list_default_limit: default_list_limit(),
        }
    }
}

fn default_history_limit() -> usize {
    50
}

fn default_history_max() -> usize {
    100
}

fn default_list_limit() -> usize {
    10
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_level")]
    pub level: String,
    #[serde(default = "default_format")]
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
            format: default_format(),
        }
    }
}

fn default_level() -> String {
    "info".to_string()
}

fn default_format() -> String {
    "pretty".to_string()
}

impl Config {
    /// Load configuration from TOML files and environment variables
    ///
    /// Hierarchy (weakest to strongest):
    /// 1. config/default.toml
    /// 2. config/{ENV}.toml (if ENV is set)
    /// 3. MINDEASE_<SECTION>__<KEY> variables
    /// 4. Short prefixed variables (SERVER_PORT, MONGODB_DATABASE, LLM_MODEL, LOG_LEVEL, ...)
    pub fn load() -> Result<Self, ConfigError> {
        let env = std::env::var("ENV").unwrap_or_else(|_| "dev".to_string());

        let builder = ConfigLoader::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", env)).required(false))
            .add_source(
                Environment::with_prefix("MINDEASE")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            );

        let mut cfg: Config = builder.build()?.try_deserialize()?;
        cfg.apply_env_overrides()?;
        Ok(cfg)
    }

    /// Load config from a specific path (useful for testing)
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        ConfigLoader::builder()
            .add_source(File::from(path.as_ref()))
            .build()?
            .try_deserialize()
    }

    fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        override_from_env("SERVER_HOST", &mut self.server.host)?;
        override_from_env("SERVER_PORT", &mut self.server.port)?;
        override_from_env("MONGODB_DATABASE", &mut self.mongodb.database)?;
        override_from_env("LLM_MODEL", &mut self.llm.model)?;
        override_from_env("LOG_LEVEL", &mut self.logging.level)?;
        override_from_env("LOG_FORMAT", &mut self.logging.format)?;

        if let Some(base_url) = non_empty_env("LLM_BASE_URL") {
            self.llm.base_url = Some(base_url);
        }

        // Both secrets are optional: missing ones degrade, they do not abort startup
        self.mongodb_uri = non_empty_env("MONGODB_URI");
        self.groq_api_key = non_empty_env("GROQ_API_KEY");

        Ok(())
    }
}

fn non_empty_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn override_from_env<T>(key: &str, target: &mut T) -> Result<(), ConfigError>
where
    T: FromStr,
    T::Err: Display,
{
    if let Some(raw) = non_empty_env(key) {
        *target = raw
            .parse()
            .map_err(|e| ConfigError::Message(format!("Invalid {}: {}", key, e)))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_structure() {
        let toml = r#"
            [server]
            host = "127.0.0.1"
            port = 3000

            [cors]
            enabled = true
            origins = ["http://localhost:3000"]

            [mongodb]
            database = "test"

            [llm]
            model = "llama3-8b-8192"

            [logging]
            level = "debug"
            format = "json"
        "#;

        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.server.request_timeout_secs, 300);
        assert_eq!(config.mongodb.database, "test");
        assert_eq!(config.llm.model, "llama3-8b-8192");
        assert!(config.llm.base_url.is_none());
        assert_eq!(config.chat.history_max_limit, 100);
        assert!(config.groq_api_key.is_none());
    }

    #[test]
    fn empty_file_falls_back_to_defaults() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.server.port, 8000);
        assert_eq!(config.llm.model, "llama3-70b-8192");
        assert_eq!(config.chat.history_default_limit, 50);
        assert_eq!(config.chat.list_default_limit, 10);
        assert_eq!(config.logging.format, "pretty");
    }

    #[test]
    fn env_override_rejects_bad_values() {
        let mut port: u16 = 1;
        std::env::set_var("MINDEASE_TEST_BAD_PORT", "not-a-port");
        assert!(override_from_env("MINDEASE_TEST_BAD_PORT", &mut port).is_err());
        std::env::set_var("MINDEASE_TEST_BAD_PORT", "8080");
        override_from_env("MINDEASE_TEST_BAD_PORT", &mut port).unwrap();
        assert_eq!(port, 8080);
        std::env::remove_var("MINDEASE_TEST_BAD_PORT");
    }
}
