use config::{Config as ConfigBuilder, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigLoadError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Missing required configuration: {0}")]
    MissingRequired(String),

    #[error("Invalid configuration value for {key}: {message}")]
    InvalidValue { key: String, message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct HubConfig {
    pub api: ApiConfig,
    pub stream: StreamConfig,
    pub mock: MockConfig,
    pub logging: LoggingConfig,
    pub theme: ThemeConfig,
    pub tui: TuiConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,

    #[serde(default = "default_api_prefix")]
    pub prefix: String,

    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,

    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StreamConfig {
    /// Commit a leftover transient response as an agent message when the
    /// body ends without a `task_completed` event.
    #[serde(default = "default_true")]
    pub flush_on_end: bool,

    /// Capacity of the broadcast channel carrying decoded events to observers.
    #[serde(default = "default_event_buffer")]
    pub event_buffer: usize,
}

/// Simulated latencies of the mock agents service, in milliseconds.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MockConfig {
    #[serde(default = "default_get_agents_delay")]
    pub get_agents_delay_ms: u64,

    #[serde(default = "default_get_chats_delay")]
    pub get_chats_delay_ms: u64,

    #[serde(default = "default_create_agent_delay")]
    pub create_agent_delay_ms: u64,

    #[serde(default = "default_update_agent_delay")]
    pub update_agent_delay_ms: u64,

    #[serde(default = "default_delete_agent_delay")]
    pub delete_agent_delay_ms: u64,

    #[serde(default = "default_reply_delay")]
    pub reply_delay_ms: u64,

    #[serde(default = "default_highlight_delay")]
    pub highlight_delay_ms: u64,

    #[serde(default = "default_demo_reply")]
    pub demo_reply: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default)]
    pub json_format: bool,

    #[serde(default)]
    pub file_path: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ThemeConfig {
    /// Overrides `<config dir>/agenthub/preferences.toml` when non-empty.
    #[serde(default)]
    pub preference_file: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TuiConfig {
    #[serde(default = "default_tick_rate")]
    pub tick_rate_ms: u64,

    #[serde(default = "default_true")]
    pub unicode_enabled: bool,
}

fn default_base_url() -> String {
    "http://localhost:8000".to_string()
}

fn default_api_prefix() -> String {
    "/api".to_string()
}

fn default_request_timeout() -> u64 {
    30
}

fn default_connect_timeout() -> u64 {
    10
}

fn default_true() -> bool {
    true
}

fn default_event_buffer() -> usize {
    64
}

fn default_get_agents_delay() -> u64 {
    500
}

fn default_get_chats_delay() -> u64 {
    300
}

fn default_create_agent_delay() -> u64 {
    800
}

fn default_update_agent_delay() -> u64 {
    600
}

fn default_delete_agent_delay() -> u64 {
    400
}

fn default_reply_delay() -> u64 {
    300
}

fn default_highlight_delay() -> u64 {
    600
}

fn default_demo_reply() -> String {
    "👍 Got it. (Demo reply)".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_tick_rate() -> u64 {
    250
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            prefix: default_api_prefix(),
            request_timeout_secs: default_request_timeout(),
            connect_timeout_secs: default_connect_timeout(),
        }
    }
}

impl Default for StreamConfig {
    fn default() -> Self {
        Self {
            flush_on_end: true,
            event_buffer: default_event_buffer(),
        }
    }
}

impl Default for MockConfig {
    fn default() -> Self {
        Self {
            get_agents_delay_ms: default_get_agents_delay(),
            get_chats_delay_ms: default_get_chats_delay(),
            create_agent_delay_ms: default_create_agent_delay(),
            update_agent_delay_ms: default_update_agent_delay(),
            delete_agent_delay_ms: default_delete_agent_delay(),
            reply_delay_ms: default_reply_delay(),
            highlight_delay_ms: default_highlight_delay(),
            demo_reply: default_demo_reply(),
        }
    }
}

impl MockConfig {
    /// All latencies set to zero. Used by tests and the CLI.
    pub fn instant() -> Self {
        Self {
            get_agents_delay_ms: 0,
            get_chats_delay_ms: 0,
            create_agent_delay_ms: 0,
            update_agent_delay_ms: 0,
            delete_agent_delay_ms: 0,
            reply_delay_ms: 0,
            highlight_delay_ms: 0,
            demo_reply: default_demo_reply(),
        }
    }

    pub fn reply_delay(&self) -> Duration {
        Duration::from_millis(self.reply_delay_ms)
    }

    pub fn highlight_delay(&self) -> Duration {
        Duration::from_millis(self.highlight_delay_ms)
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json_format: false,
            file_path: String::new(),
        }
    }
}

impl Default for TuiConfig {
    fn default() -> Self {
        Self {
            tick_rate_ms: default_tick_rate(),
            unicode_enabled: true,
        }
    }
}

impl HubConfig {
    pub fn load() -> Result<Self, ConfigLoadError> {
        Self::load_from_paths(get_config_paths())
    }

    pub fn load_from_paths(paths: Vec<PathBuf>) -> Result<Self, ConfigLoadError> {
        load_dotenv_files();

        let mut builder = ConfigBuilder::builder();

        for path in paths {
            if path.exists() {
                builder = builder.add_source(File::from(path).required(false));
            }
        }

        builder = builder.add_source(
            Environment::with_prefix("AGENTHUB")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let config = builder.build()?;

        let mut hub_config: HubConfig = config.try_deserialize().unwrap_or_default();

        if let Ok(url) = std::env::var("AGENTHUB_API_BASE_URL") {
            hub_config.api.base_url = url;
        }

        if let Ok(level) = std::env::var("AGENTHUB_LOG_LEVEL") {
            hub_config.logging.level = level;
        } else if let Ok(level) = std::env::var("RUST_LOG") {
            hub_config.logging.level = level;
        }

        if let Ok(path) = std::env::var("AGENTHUB_PREFERENCE_FILE") {
            hub_config.theme.preference_file = path;
        }

        hub_config.validate()?;

        Ok(hub_config)
    }

    pub fn validate(&self) -> Result<(), ConfigLoadError> {
        if self.api.base_url.is_empty() {
            return Err(ConfigLoadError::MissingRequired("api.base_url".to_string()));
        }

        if !self.api.base_url.starts_with("http://") && !self.api.base_url.starts_with("https://")
        {
            return Err(ConfigLoadError::InvalidValue {
                key: "api.base_url".to_string(),
                message: "Must start with http:// or https://".to_string(),
            });
        }

        if !self.api.prefix.is_empty() && !self.api.prefix.starts_with('/') {
            return Err(ConfigLoadError::InvalidValue {
                key: "api.prefix".to_string(),
                message: "Must be empty or start with '/'".to_string(),
            });
        }

        if self.api.request_timeout_secs == 0 {
            return Err(ConfigLoadError::InvalidValue {
                key: "api.request_timeout_secs".to_string(),
                message: "Must be greater than 0".to_string(),
            });
        }

        if self.api.connect_timeout_secs == 0 {
            return Err(ConfigLoadError::InvalidValue {
                key: "api.connect_timeout_secs".to_string(),
                message: "Must be greater than 0".to_string(),
            });
        }

        if self.tui.tick_rate_ms == 0 {
            return Err(ConfigLoadError::InvalidValue {
                key: "tui.tick_rate_ms".to_string(),
                message: "Must be greater than 0".to_string(),
            });
        }

        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        let level_lower = self.logging.level.to_lowercase();
        if !valid_levels.contains(&level_lower.as_str()) && !level_lower.contains('=') {
            return Err(ConfigLoadError::InvalidValue {
                key: "logging.level".to_string(),
                message: format!(
                    "Invalid log level '{}'. Must be one of: {:?}",
                    self.logging.level, valid_levels
                ),
            });
        }

        Ok(())
    }

    /// Full URL of an endpoint under the API prefix.
    pub fn api_url(&self, path: &str) -> String {
        format!(
            "{}{}{}",
            self.api.base_url.trim_end_matches('/'),
            self.api.prefix.trim_end_matches('/'),
            path
        )
    }

    /// Health endpoint, served outside the API prefix.
    pub fn health_url(&self) -> String {
        format!("{}/health", self.api.base_url.trim_end_matches('/'))
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.api.request_timeout_secs)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.api.connect_timeout_secs)
    }

    pub fn tick_rate(&self) -> Duration {
        Duration::from_millis(self.tui.tick_rate_ms)
    }

    pub fn log_level(&self) -> &str {
        &self.logging.level
    }

    /// Location of the theme preference file.
    pub fn preference_path(&self) -> Option<PathBuf> {
        if self.theme.preference_file.is_empty() {
            get_config_dir().map(|d| d.join("preferences.toml"))
        } else {
            Some(PathBuf::from(&self.theme.preference_file))
        }
    }
}

fn get_config_paths() -> Vec<PathBuf> {
    let mut paths = Vec::new();

    if let Ok(cwd) = std::env::current_dir() {
        paths.push(cwd.join("config").join("default.toml"));
        paths.push(cwd.join("config").join("local.toml"));
        paths.push(cwd.join("agenthub.toml"));
    }

    if let Some(config_dir) = dirs::config_dir() {
        paths.push(config_dir.join("agenthub").join("config.toml"));
    }

    paths
}

fn load_dotenv_files() {
    for path in get_dotenv_paths() {
        if path.exists() {
            let _ = dotenvy::from_path(&path);
        }
    }
}

fn get_dotenv_paths() -> Vec<PathBuf> {
    let mut paths = Vec::new();

    if let Ok(cwd) = std::env::current_dir() {
        paths.push(cwd.join(".env"));
        paths.push(cwd.join(".env.local"));
    }

    if let Some(config_dir) = dirs::config_dir() {
        paths.push(config_dir.join("agenthub").join(".env"));
    }

    paths
}

pub fn get_config_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("agenthub"))
}

pub fn get_data_dir() -> Option<PathBuf> {
    dirs::data_dir().map(|d| d.join("agenthub"))
}

pub fn ensure_config_dir() -> Result<PathBuf, std::io::Error> {
    let config_dir = get_config_dir().ok_or_else(|| {
        std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "Could not determine config directory",
        )
    })?;

    if !config_dir.exists() {
        std::fs::create_dir_all(&config_dir)?;
    }

    Ok(config_dir)
}

pub fn ensure_data_dir() -> Result<PathBuf, std::io::Error> {
    let data_dir = get_data_dir().ok_or_else(|| {
        std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "Could not determine data directory",
        )
    })?;

    if !data_dir.exists() {
        std::fs::create_dir_all(&data_dir)?;
    }

    Ok(data_dir)
}
