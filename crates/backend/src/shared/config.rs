use once_cell::sync::OnceCell;
use serde::Deserialize;
use std::path::{Path, PathBuf};

use contracts::shared::page_params::{DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};

static CONFIG: OnceCell<Config> = OnceCell::new();

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub database: DatabaseConfig,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub events: EventsConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    pub path: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct EventsConfig {
    #[serde(default = "default_page_size")]
    pub default_page_size: u64,
    #[serde(default = "max_page_size")]
    pub max_page_size: u64,
}

impl Default for EventsConfig {
    fn default() -> Self {
        Self {
            default_page_size: default_page_size(),
            max_page_size: max_page_size(),
        }
    }
}

fn default_port() -> u16 {
    3000
}

fn default_page_size() -> u64 {
    DEFAULT_PAGE_SIZE
}

fn max_page_size() -> u64 {
    MAX_PAGE_SIZE
}

/// Default configuration embedded in the binary
const DEFAULT_CONFIG: &str = r#"
[database]
path = "db/events.db"

[server]
port = 3000

[events]
default_page_size = 30
max_page_size = 500
"#;

/// Load configuration from config.toml file
///
/// Search order:
/// 1. Next to the executable (for production)
/// 2. Falls back to embedded default config
pub fn load_config() -> anyhow::Result<Config> {
    if let Ok(exe_path) = std::env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            let config_path = exe_dir.join("config.toml");

            if config_path.exists() {
                tracing::info!("Loading config from: {}", config_path.display());
                let contents = std::fs::read_to_string(&config_path)?;
                let config: Config = toml::from_str(&contents)?;
                return Ok(config);
            } else {
                tracing::warn!("config.toml not found at: {}", config_path.display());
            }
        }
    }

    tracing::info!("Using default embedded configuration");
    let config: Config = toml::from_str(DEFAULT_CONFIG)?;
    Ok(config)
}

/// Makes the loaded config available to handlers. Only the first call wins.
pub fn install(config: Config) {
    if CONFIG.set(config).is_err() {
        tracing::warn!("Configuration already installed, ignoring");
    }
}

/// Paging limits for the events endpoint; defaults when no config is installed.
pub fn events_config() -> EventsConfig {
    CONFIG
        .get()
        .map(|c| c.events.clone())
        .unwrap_or_default()
}

/// Get the database file path from configuration
/// Resolves relative paths relative to the executable directory
pub fn get_database_path(config: &Config) -> anyhow::Result<PathBuf> {
    let db_path_str = &config.database.path;
    let db_path = Path::new(db_path_str);

    if db_path.is_absolute() {
        return Ok(db_path.to_path_buf());
    }

    if let Ok(exe_path) = std::env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            let resolved_path = exe_dir.join(db_path);
            return Ok(resolved_path);
        }
    }

    // Fallback: use relative to current directory
    Ok(PathBuf::from(db_path_str))
}
