use crate::errors::{CurtainError, Result};
use crate::modal::RetentionPolicy;
use ratatui::style::Color;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Application configuration loaded from file
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct CurtainConfig {
    /// Modal registry behavior
    #[serde(default)]
    pub modals: ModalsConfig,

    /// Notification delivery
    #[serde(default)]
    pub notifications: NotificationsConfig,

    /// Demo dashboard knobs
    #[serde(default)]
    pub demo: DemoConfig,
}

/// Modal registry configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct ModalsConfig {
    /// Closed records to keep before evicting the oldest (absent = keep all)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub retain_closed: Option<usize>,
}

impl ModalsConfig {
    pub fn retention(&self) -> RetentionPolicy {
        self.retain_closed
            .map_or(RetentionPolicy::Unbounded, RetentionPolicy::KeepClosed)
    }
}

/// Notification configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NotificationsConfig {
    /// Mirror notifications to the desktop
    #[serde(default)]
    pub desktop: bool,

    /// How long a toast stays in the footer
    #[serde(default = "default_toast_seconds")]
    pub toast_seconds: u64,
}

impl Default for NotificationsConfig {
    fn default() -> Self {
        Self {
            desktop: false,
            toast_seconds: default_toast_seconds(),
        }
    }
}

fn default_toast_seconds() -> u64 {
    4
}

/// Demo dashboard configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DemoConfig {
    /// Simulated payment processor latency for refunds
    #[serde(default = "default_refund_latency_ms")]
    pub refund_latency_ms: u64,
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            refund_latency_ms: default_refund_latency_ms(),
        }
    }
}

fn default_refund_latency_ms() -> u64 {
    1200
}

impl CurtainConfig {
    /// Load configuration from default path (~/.config/curtain/config.toml)
    pub fn load() -> Self {
        Self::load_from_path(&Self::default_path())
    }

    /// Get the default configuration path
    pub fn default_path() -> PathBuf {
        directories::BaseDirs::new().map_or_else(
            || PathBuf::from("~/.config/curtain/config.toml"),
            |dirs| dirs.config_dir().join("curtain").join("config.toml"),
        )
    }

    /// Load configuration from a specific path, falling back to defaults
    pub fn load_from_path(path: &Path) -> Self {
        if !path.exists() {
            tracing::debug!("Config file not found at {:?}, using defaults", path);
            return Self::default();
        }

        match Self::try_load(path) {
            Ok(config) => {
                tracing::info!("Loaded configuration from {:?}", path);
                config
            }
            Err(e) => {
                tracing::warn!("{}, using defaults", e);
                Self::default()
            }
        }
    }

    /// Load configuration, surfacing read and parse failures
    pub fn try_load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|source| CurtainError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&content).map_err(|source| CurtainError::ConfigParse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Generate example configuration file content
    pub fn example() -> String {
        r#"# Curtain Configuration
# Place this file at ~/.config/curtain/config.toml

[modals]
# Keep at most this many closed dialogs around; the oldest closed one is
# evicted when a new dialog id is opened. Omit to keep every record.
# retain_closed = 16

[notifications]
# Mirror error/success toasts as desktop notifications
desktop = false

# Seconds a toast stays visible in the footer
toast_seconds = 4

[demo]
# Simulated payment processor latency for refunds
refund_latency_ms = 1200
"#
        .to_string()
    }
}

/// Tokyo Night color palette
pub mod colors {
    use super::Color;

    pub const BG: Color = Color::Rgb(26, 27, 38); // #1a1b26
    pub const BG_LIGHT: Color = Color::Rgb(41, 46, 66); // #292e42
    pub const FG: Color = Color::Rgb(192, 202, 245); // #c0caf5
    pub const MUTED: Color = Color::Rgb(86, 95, 137); // #565f89
    pub const BORDER: Color = Color::Rgb(59, 66, 97); // #3b4261
    pub const HIGHLIGHT: Color = Color::Rgb(187, 154, 247); // #bb9af7 purple
    pub const ACCENT: Color = Color::Rgb(122, 162, 247); // #7aa2f7 blue
    pub const DANGER: Color = Color::Rgb(247, 118, 142); // #f7768e red
    pub const SUCCESS: Color = Color::Rgb(158, 206, 106); // #9ece6a green
    pub const WARNING: Color = Color::Rgb(255, 158, 100); // #ff9e64 orange
}
