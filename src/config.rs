//! Connection configuration.
//!
//! Both configs deserialize from TOML. Every field has a default, so an empty
//! document yields a working anonymous configuration:
//!
//! ```toml
//! channel = "forsen"
//! ping_interval_ms = 30000
//! detect_links = true
//!
//! [backoff]
//! base_ms = 1000
//! max_ms = 30000
//! ```

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Default Twitch chat WebSocket endpoint.
pub const TWITCH_WS_URL: &str = "wss://irc-ws.chat.twitch.tv";
/// Anonymous login nick.
pub const ANONYMOUS_NICK: &str = "justinfan1234";
/// Anonymous login password.
pub const ANONYMOUS_PASS: &str = "SCHMOOPIIE";

/// Public Pusher application key used by Kick chat.
pub const KICK_PUSHER_KEY: &str = "32cbd69e4b950bf97679";
/// Pusher cluster hosting Kick chat.
pub const KICK_PUSHER_CLUSTER: &str = "us2";
/// Kick public API base.
pub const KICK_API_BASE: &str = "https://kick.com/api/v2";

/// Reconnect backoff after keepalive failures.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackoffConfig {
    /// Delay of the first retry after an immediate reconnect failed.
    #[serde(default = "default_backoff_base_ms")]
    pub base_ms: u64,
    /// Upper bound on any delay.
    #[serde(default = "default_backoff_max_ms")]
    pub max_ms: u64,
}

impl BackoffConfig {
    pub fn base(&self) -> Duration {
        Duration::from_millis(self.base_ms)
    }

    pub fn max(&self) -> Duration {
        Duration::from_millis(self.max_ms)
    }
}

impl Default for BackoffConfig {
    fn default() -> Self {
        Self {
            base_ms: default_backoff_base_ms(),
            max_ms: default_backoff_max_ms(),
        }
    }
}

/// Keepalive timing of one connection.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct KeepaliveConfig {
    /// Time between pings.
    pub ping_interval: Duration,
    /// How long to wait for the pong before reconnecting.
    pub ping_timeout: Duration,
    pub backoff: BackoffConfig,
}

impl Default for KeepaliveConfig {
    fn default() -> Self {
        Self {
            ping_interval: Duration::from_millis(default_twitch_ping_interval_ms()),
            ping_timeout: Duration::from_millis(default_twitch_ping_timeout_ms()),
            backoff: BackoffConfig::default(),
        }
    }
}

/// Twitch chat connection settings.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TwitchConfig {
    /// Channel to join, without `#`.
    #[serde(default)]
    pub channel: Option<String>,
    #[serde(default = "default_twitch_url")]
    pub url: String,
    #[serde(default = "default_nick")]
    pub nick: String,
    #[serde(default = "default_pass")]
    pub pass: String,
    /// Capabilities requested with `CAP REQ`.
    #[serde(default = "default_capabilities")]
    pub capabilities: Vec<String>,
    #[serde(default = "default_twitch_ping_interval_ms")]
    pub ping_interval_ms: u64,
    #[serde(default = "default_twitch_ping_timeout_ms")]
    pub ping_timeout_ms: u64,
    #[serde(default)]
    pub backoff: BackoffConfig,
    /// Split URLs in message text into link spans.
    #[serde(default)]
    pub detect_links: bool,
}

impl Default for TwitchConfig {
    fn default() -> Self {
        Self {
            channel: None,
            url: default_twitch_url(),
            nick: default_nick(),
            pass: default_pass(),
            capabilities: default_capabilities(),
            ping_interval_ms: default_twitch_ping_interval_ms(),
            ping_timeout_ms: default_twitch_ping_timeout_ms(),
            backoff: BackoffConfig::default(),
            detect_links: false,
        }
    }
}

impl TwitchConfig {
    /// Anonymous read-only access to `channel`.
    pub fn anonymous(channel: impl Into<String>) -> Self {
        Self {
            channel: Some(channel.into()),
            ..Self::default()
        }
    }

    /// Parse a TOML document.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(s)?)
    }

    pub fn keepalive(&self) -> KeepaliveConfig {
        KeepaliveConfig {
            ping_interval: Duration::from_millis(self.ping_interval_ms),
            ping_timeout: Duration::from_millis(self.ping_timeout_ms),
            backoff: self.backoff.clone(),
        }
    }
}

/// Kick chat connection settings.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct KickConfig {
    /// Channel slug.
    #[serde(default)]
    pub channel: Option<String>,
    #[serde(default = "default_pusher_key")]
    pub pusher_key: String,
    #[serde(default = "default_pusher_cluster")]
    pub pusher_cluster: String,
    /// Base URL of the channel metadata API.
    #[serde(default = "default_api_base")]
    pub api_base: String,
    #[serde(default = "default_kick_ping_interval_ms")]
    pub ping_interval_ms: u64,
    #[serde(default = "default_kick_ping_timeout_ms")]
    pub ping_timeout_ms: u64,
    #[serde(default)]
    pub backoff: BackoffConfig,
    #[serde(default)]
    pub detect_links: bool,
}

impl Default for KickConfig {
    fn default() -> Self {
        Self {
            channel: None,
            pusher_key: default_pusher_key(),
            pusher_cluster: default_pusher_cluster(),
            api_base: default_api_base(),
            ping_interval_ms: default_kick_ping_interval_ms(),
            ping_timeout_ms: default_kick_ping_timeout_ms(),
            backoff: BackoffConfig::default(),
            detect_links: false,
        }
    }
}

impl KickConfig {
    pub fn channel(channel: impl Into<String>) -> Self {
        Self {
            channel: Some(channel.into()),
            ..Self::default()
        }
    }

    /// Parse a TOML document.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(s)?)
    }

    /// Pusher WebSocket endpoint.
    pub fn pusher_url(&self) -> String {
        format!(
            "wss://ws-{}.pusher.com/app/{}?protocol=7&client=js&version=8.4.0-rc2&flash=false",
            self.pusher_cluster, self.pusher_key
        )
    }

    /// Metadata endpoint for `channel`.
    pub fn channel_url(&self, channel: &str) -> String {
        format!("{}/channels/{}", self.api_base.trim_end_matches('/'), channel)
    }

    pub fn keepalive(&self) -> KeepaliveConfig {
        KeepaliveConfig {
            ping_interval: Duration::from_millis(self.ping_interval_ms),
            ping_timeout: Duration::from_millis(self.ping_timeout_ms),
            backoff: self.backoff.clone(),
        }
    }
}

fn default_twitch_url() -> String {
    TWITCH_WS_URL.to_string()
}

fn default_nick() -> String {
    ANONYMOUS_NICK.to_string()
}

fn default_pass() -> String {
    ANONYMOUS_PASS.to_string()
}

fn default_capabilities() -> Vec<String> {
    vec!["twitch.tv/commands".to_string(), "twitch.tv/tags".to_string()]
}

fn default_twitch_ping_interval_ms() -> u64 {
    30_000
}

fn default_twitch_ping_timeout_ms() -> u64 {
    10_000
}

fn default_pusher_key() -> String {
    KICK_PUSHER_KEY.to_string()
}

fn default_pusher_cluster() -> String {
    KICK_PUSHER_CLUSTER.to_string()
}

fn default_api_base() -> String {
    KICK_API_BASE.to_string()
}

// Pusher's own activity timeout.
fn default_kick_ping_interval_ms() -> u64 {
    120_000
}

fn default_kick_ping_timeout_ms() -> u64 {
    30_000
}

fn default_backoff_base_ms() -> u64 {
    1_000
}

fn default_backoff_max_ms() -> u64 {
    30_000
}
