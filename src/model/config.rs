use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub runtime: RuntimeConfig,

    #[serde(default)]
    pub capabilities: CapabilitiesConfig,

    #[serde(default)]
    pub database: DatabaseConfig,

    #[serde(default)]
    pub launch: LaunchSettings,

    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuntimeConfig {
    /// Interpreter candidates, tried in order.
    #[serde(default = "default_interpreters")]
    pub interpreters: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CapabilitiesConfig {
    /// Package (distribution) names the application imports.
    #[serde(default = "default_required_capabilities")]
    pub required: Vec<String>,

    /// Import names for packages whose module differs from the distribution name.
    #[serde(default = "default_module_overrides")]
    pub modules: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    #[serde(default = "default_driver")]
    pub driver: String,

    #[serde(default = "default_schema")]
    pub schema: String,

    #[serde(default = "default_required_tables")]
    pub required_tables: Vec<String>,

    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LaunchSettings {
    #[serde(default = "default_entry_point")]
    pub entry_point: PathBuf,

    #[serde(default = "default_env_file")]
    pub env_file: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct LoggingConfig {
    #[serde(default)]
    pub verbose: bool,
}

// Default values
fn default_interpreters() -> Vec<String> {
    vec!["python3".to_string(), "python".to_string()]
}
fn default_required_capabilities() -> Vec<String> {
    ["gradio", "pandas", "psycopg2-binary", "python-dotenv"]
        .into_iter()
        .map(String::from)
        .collect()
}
fn default_module_overrides() -> BTreeMap<String, String> {
    BTreeMap::from([
        ("psycopg2-binary".to_string(), "psycopg2".to_string()),
        ("python-dotenv".to_string(), "dotenv".to_string()),
    ])
}
fn default_driver() -> String {
    "PostgreSQL Unicode".to_string()
}
fn default_schema() -> String {
    "public".to_string()
}
fn default_required_tables() -> Vec<String> {
    ["circuits", "connections", "references_tbl"]
        .into_iter()
        .map(String::from)
        .collect()
}
fn default_connect_timeout() -> u32 {
    10
}
fn default_entry_point() -> PathBuf {
    PathBuf::from("searchtools/gradio_wholebif_query_app_iconip.py")
}
fn default_env_file() -> PathBuf {
    PathBuf::from(".env")
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            interpreters: default_interpreters(),
        }
    }
}

impl Default for CapabilitiesConfig {
    fn default() -> Self {
        Self {
            required: default_required_capabilities(),
            modules: default_module_overrides(),
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            driver: default_driver(),
            schema: default_schema(),
            required_tables: default_required_tables(),
            connect_timeout_secs: default_connect_timeout(),
        }
    }
}

impl Default for LaunchSettings {
    fn default() -> Self {
        Self {
            entry_point: default_entry_point(),
            env_file: default_env_file(),
        }
    }
}

impl Config {
    /// First standard config path that exists.
    pub fn locate() -> Option<PathBuf> {
        Self::standard_config_paths()
            .into_iter()
            .find(|path| path.exists())
    }

    /// Load configuration from a specific file
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let display = path.display().to_string();
        let content =
            fs::read_to_string(path).map_err(|e| ConfigError::FileRead(display.clone(), e.to_string()))?;

        toml::from_str(&content).map_err(|e| ConfigError::Parse(display, e.to_string()))
    }

    /// Standard configuration file paths in order of precedence
    fn standard_config_paths() -> Vec<PathBuf> {
        vec![
            PathBuf::from("launcher.toml"),
            PathBuf::from("config/launcher.toml"),
        ]
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file '{0}': {1}")]
    FileRead(String, String),

    #[error("Failed to parse config file '{0}': {1}")]
    Parse(String, String),
}
