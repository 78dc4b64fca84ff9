// ⚙️ Configuration - TOML file with an embedded fallback

use crate::error::{Result, RfmError};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// File looked up in the working directory when no path is given
pub const CONFIG_FILE_NAME: &str = "rfm-dashboard.toml";

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct Config {
    #[serde(default)]
    pub input: InputConfig,
    #[serde(default)]
    pub analytics: AnalyticsConfig,
    #[serde(default)]
    pub server: ServerConfig,
    /// Directory relative paths are resolved against
    #[serde(skip)]
    base_dir: Option<PathBuf>,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct InputConfig {
    /// Single-byte field separator
    #[serde(default = "default_delimiter")]
    pub delimiter: String,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct AnalyticsConfig {
    /// Weeks in the rolling mean of the sales trend
    #[serde(default = "default_smoothing_window")]
    pub smoothing_window: usize,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct ServerConfig {
    #[serde(default = "default_bind")]
    pub bind: String,
    /// Transaction table served by the API
    #[serde(default = "default_data_path")]
    pub data_path: String,
}

fn default_delimiter() -> String {
    ",".to_string()
}

fn default_smoothing_window() -> usize {
    3
}

fn default_bind() -> String {
    "0.0.0.0:3000".to_string()
}

fn default_data_path() -> String {
    "data/transactions.csv".to_string()
}

impl Default for InputConfig {
    fn default() -> Self {
        InputConfig {
            delimiter: default_delimiter(),
        }
    }
}

impl Default for AnalyticsConfig {
    fn default() -> Self {
        AnalyticsConfig {
            smoothing_window: default_smoothing_window(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig {
            bind: default_bind(),
            data_path: default_data_path(),
        }
    }
}

/// Default configuration embedded in the binary
const DEFAULT_CONFIG: &str = r#"
[input]
delimiter = ","

[analytics]
smoothing_window = 3

[server]
bind = "0.0.0.0:3000"
data_path = "data/transactions.csv"
"#;

impl Config {
    pub fn from_toml(contents: &str) -> Result<Self> {
        let config: Config = toml::from_str(contents).map_err(|e| RfmError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.input.delimiter.len() != 1 {
            return Err(RfmError::Config(format!(
                "delimiter must be a single byte, got {:?}",
                self.input.delimiter
            )));
        }
        if self.analytics.smoothing_window == 0 {
            return Err(RfmError::Config("smoothing_window must be at least 1".to_string()));
        }
        Ok(())
    }

    /// Field separator as the byte the CSV reader wants
    pub fn delimiter(&self) -> u8 {
        self.input.delimiter.as_bytes().first().copied().unwrap_or(b',')
    }

    /// `server.data_path`, resolved against the config file's directory when relative
    pub fn data_path(&self) -> PathBuf {
        let path = Path::new(&self.server.data_path);
        match &self.base_dir {
            Some(base) if path.is_relative() => base.join(path),
            _ => path.to_path_buf(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            input: InputConfig::default(),
            analytics: AnalyticsConfig::default(),
            server: ServerConfig::default(),
            base_dir: None,
        }
    }
}

/// Load configuration
///
/// Search order:
/// 1. Explicit path (fails if it cannot be read)
/// 2. `rfm-dashboard.toml` in the working directory
/// 3. Embedded default config
pub fn load_config(explicit: Option<&Path>) -> Result<Config> {
    let candidate = match explicit {
        Some(path) => Some(path.to_path_buf()),
        None => {
            let local = PathBuf::from(CONFIG_FILE_NAME);
            if local.exists() {
                Some(local)
            } else {
                None
            }
        }
    };

    if let Some(path) = candidate {
        tracing::info!("Loading config from: {}", path.display());
        let contents = std::fs::read_to_string(&path)?;
        let mut config = Config::from_toml(&contents)?;
        config.base_dir = path.parent().map(Path::to_path_buf);
        return Ok(config);
    }

    tracing::info!("Using default embedded configuration");
    Config::from_toml(DEFAULT_CONFIG)
}
