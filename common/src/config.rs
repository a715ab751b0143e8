use serde::Deserialize;
use sqlx::mysql::MySqlConnectOptions;
use std::{fmt, fs, io, path::Path};

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Read { path: String, source: io::Error },

    #[error("Failed to parse config file {path}: {source}")]
    Parse { path: String, source: serde_yml::Error },

    #[error("Invalid value for {key}: {value}")]
    InvalidEnv { key: &'static str, value: String },
}

#[derive(Deserialize, Clone)]
#[serde(default)]
pub struct DatabaseConfig {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
    pub name: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 3306,
            user: "root".to_string(),
            password: "tu_contraseña".to_string(),
            name: "pandatat".to_string(),
        }
    }
}

impl DatabaseConfig {
    pub fn connect_options(&self) -> MySqlConnectOptions {
        MySqlConnectOptions::new()
            .host(&self.host)
            .port(self.port)
            .username(&self.user)
            .password(&self.password)
            .database(&self.name)
    }
}

// Keeps the password out of startup logs.
impl fmt::Debug for DatabaseConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DatabaseConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("user", &self.user)
            .field("password", &"***")
            .field("name", &self.name)
            .finish()
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct CommonConfig {
    pub project_name: String,
    pub database: DatabaseConfig,
}

impl Default for CommonConfig {
    fn default() -> Self {
        Self {
            project_name: "pedidos".to_string(),
            database: DatabaseConfig::default(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct BackendConfig {
    pub server_address: String,
    pub log_level: String,
    /// Empty means any origin is accepted.
    pub cors_allowed_origins: Vec<String>,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            server_address: "0.0.0.0:5000".to_string(),
            log_level: "info".to_string(),
            cors_allowed_origins: Vec::new(),
        }
    }
}

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct Config {
    pub common: CommonConfig,
    pub backend: BackendConfig,
}

impl Config {
    /// Loads the YAML file at `config_path` and applies process environment
    /// overrides. A missing file yields the defaults.
    pub fn load(config_path: &str) -> Result<Self, ConfigError> {
        let mut config = Self::from_file(config_path)?;
        config.apply_env_overrides(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    pub fn from_file(config_path: &str) -> Result<Self, ConfigError> {
        if !Path::new(config_path).exists() {
            tracing::warn!(path = config_path, "Config file not found, using defaults");
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(config_path).map_err(|source| ConfigError::Read {
            path: config_path.to_string(),
            source,
        })?;
        Self::from_yaml(&contents).map_err(|source| ConfigError::Parse {
            path: config_path.to_string(),
            source,
        })
    }

    pub fn from_yaml(contents: &str) -> Result<Self, serde_yml::Error> {
        if contents.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yml::from_str(contents)
    }

    /// Overrides values with `DB_HOST`, `DB_PORT`, `DB_USER`, `DB_PASSWORD`,
    /// `DB_NAME`, `SERVER_ADDRESS` and `LOG_LEVEL` when `lookup` yields them.
    pub fn apply_env_overrides<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let database = &mut self.common.database;
        if let Some(host) = lookup("DB_HOST") {
            database.host = host;
        }
        if let Some(port) = lookup("DB_PORT") {
            database.port = port
                .parse()
                .map_err(|_| ConfigError::InvalidEnv { key: "DB_PORT", value: port })?;
        }
        if let Some(user) = lookup("DB_USER") {
            database.user = user;
        }
        if let Some(password) = lookup("DB_PASSWORD") {
            database.password = password;
        }
        if let Some(name) = lookup("DB_NAME") {
            database.name = name;
        }
        if let Some(address) = lookup("SERVER_ADDRESS") {
            self.backend.server_address = address;
        }
        if let Some(level) = lookup("LOG_LEVEL") {
            self.backend.log_level = level;
        }
        Ok(())
    }
}
