//! Configuration management.
//!
//! Configuration is read from `~/.config/storefront/config.toml` at startup.
//! If the file doesn't exist, a default configuration with comments is created.

pub mod colors;
pub mod keybindings;

pub use colors::ColorConfig;
pub use keybindings::KeybindingConfig;

use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::feed::PAGE_SIZE;

/// Backend connection settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    pub base_url: String,
    pub timeout_secs: u64,
    pub page_size: u32,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:5000/api".to_string(),
            timeout_secs: 10,
            page_size: PAGE_SIZE,
        }
    }
}

impl ApiConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Products per request; a configured 0 still asks for one.
    pub fn page_limit(&self) -> u32 {
        self.page_size.max(1)
    }
}

/// Longest admin session the config may ask for: one week.
const MAX_ADMIN_SESSION_MINUTES: u64 = 7 * 24 * 60;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AdminConfig {
    /// Minutes an admin login stays valid.
    pub session_minutes: u64,
}

impl Default for AdminConfig {
    fn default() -> Self {
        Self {
            session_minutes: 60,
        }
    }
}

impl AdminConfig {
    pub fn session_ttl(&self) -> chrono::Duration {
        let minutes = self.session_minutes.clamp(1, MAX_ADMIN_SESSION_MINUTES);
        chrono::Duration::minutes(minutes as i64)
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub api: ApiConfig,
    pub admin: AdminConfig,
    pub colors: ColorConfig,
    pub keybindings: KeybindingConfig,
}

impl Config {
    /// Load configuration from the default path, creating a commented
    /// default file on first run. Missing fields use default values.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&Self::default_config_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            Self::create_default_config(path)?;
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;

        toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            source: e,
        })
    }

    /// `~/.config/storefront/config.toml`
    pub fn default_config_path() -> Result<PathBuf, ConfigError> {
        let config_dir = dirs::config_dir().ok_or(ConfigError::NoConfigDir)?;
        Ok(config_dir.join("storefront").join("config.toml"))
    }

    fn create_default_config(path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| ConfigError::Io {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }

        fs::write(path, Self::default_config_content()).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        })
    }

    fn default_config_content() -> &'static str {
        r##"# Storefront Configuration

[api]
# Base URL of the store backend; /products and /orders hang off it
base_url = "http://localhost:5000/api"

# Request timeout in seconds
timeout_secs = 10

# Products requested per catalog page
page_size = 12

[admin]
# Minutes an admin login stays valid (at most one week)
session_minutes = 60

[colors]
# Named colors (Cyan, DarkGray, LightGreen, ...) or hex ("#RRGGBB", "#RGB")
border = "Cyan"
selection_bg = "Cyan"
selection_fg = "Black"
price = "White"
sale_price = "LightGreen"
in_cart = "Yellow"
status_fg = "White"
status_bg = "DarkGray"
error = "LightRed"

[keybindings]
# Single characters, special keys (Enter, PageDown, Delete, F1-F12, ...)
# and modifiers ("Ctrl+c", "Shift+Tab")
quit = ["q", "Ctrl+c"]
move_up = ["k", "Up"]
move_down = ["j", "Down"]
next_page = ["n", "PageDown"]
prev_page = ["p", "PageUp"]
add_to_cart = ["a", "Enter"]
remove_from_cart = ["x", "Delete"]
refresh = ["R"]
retry = ["r"]
"##
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Could not determine config directory")]
    NoConfigDir,

    #[error("Failed to read/write config file at {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file at {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}
