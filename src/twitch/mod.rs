//! Twitch chat over IRC-on-WebSocket.
//!
//! [`TwitchSession`] handles frames without doing I/O. With the `tokio`
//! feature, [`TwitchClient`] drives it over a real socket.

#[cfg(feature = "tokio")]
mod client;

#[cfg(feature = "tokio")]
pub use self::client::TwitchClient;

use std::collections::HashMap;
use std::time::Instant;

use tracing::{debug, info, warn};

use crate::assets::{AssetTable, BadgeAsset, MergePolicy};
use crate::command::CommandKind;
use crate::config::TwitchConfig;
use crate::handlers::Handlers;
use crate::message::{split_frame, IrcMessage};
use crate::normalize::{normalize_twitch, NormalizeOptions};
use crate::session::ChatSession;
use crate::state::{Action, ConnectionMachine, ConnectionState};

/// Merge direction for caller-supplied Twitch assets: stored entries win.
pub const TWITCH_MERGE_POLICY: MergePolicy = MergePolicy::PreferExisting;

/// Sans-IO Twitch chat session.
pub struct TwitchSession {
    config: TwitchConfig,
    channel: Option<String>,
    machine: ConnectionMachine,
    assets: AssetTable,
    handlers: Handlers<IrcMessage>,
}

impl TwitchSession {
    pub fn new(config: TwitchConfig) -> Self {
        let channel = config.channel.as_deref().map(normalize_channel);
        let machine = ConnectionMachine::new(config.keepalive(), "PING");
        Self {
            config,
            channel,
            machine,
            assets: AssetTable::new(),
            handlers: Handlers::new(),
        }
    }

    pub fn config(&self) -> &TwitchConfig {
        &self.config
    }

    pub fn state(&self) -> ConnectionState {
        self.machine.state()
    }

    pub fn is_connected(&self) -> bool {
        self.machine.is_connected()
    }

    pub fn latency(&self) -> Option<std::time::Duration> {
        self.machine.latency()
    }

    /// Add badge images. Entries already stored are kept.
    pub fn set_badges(&mut self, badges: HashMap<String, BadgeAsset>) {
        self.assets.merge_badges(badges, TWITCH_MERGE_POLICY);
    }

    /// Add third-party emotes. Entries already stored are kept.
    pub fn set_external_emotes(&mut self, emotes: HashMap<String, String>) {
        self.assets.merge_external_emotes(emotes, TWITCH_MERGE_POLICY);
    }

    pub fn stored_badges(&self) -> &HashMap<String, BadgeAsset> {
        &self.assets.badges
    }

    pub fn stored_external_emotes(&self) -> &HashMap<String, String> {
        &self.assets.external_emotes
    }

    /// Direct access to the asset table, e.g. to replace it wholesale.
    pub fn assets_mut(&mut self) -> &mut AssetTable {
        &mut self.assets
    }

    /// Process a single protocol line.
    pub fn handle_line(&mut self, line: &str, now: Instant) -> Vec<Action> {
        let msg = IrcMessage::parse(line);
        self.handlers.dispatch_raw(&msg);

        match msg.command() {
            CommandKind::Ping => {
                let arg = msg.line.param(0);
                let reply = if arg.is_empty() {
                    "PONG".to_string()
                } else {
                    format!("PONG :{arg}")
                };
                match self.machine.send(reply) {
                    Ok(action) => vec![action],
                    Err(e) => {
                        warn!(error = %e, "cannot answer PING");
                        Vec::new()
                    }
                }
            }
            CommandKind::Pong => {
                self.machine.on_pong(now);
                Vec::new()
            }
            CommandKind::Reconnect => {
                info!("server announced a restart");
                Vec::new()
            }
            _ => {
                let options = NormalizeOptions {
                    detect_links: self.config.detect_links,
                };
                if let Some(event) = normalize_twitch(&msg, &self.assets, options) {
                    self.handlers.dispatch(&event);
                }
                Vec::new()
            }
        }
    }
}

impl ChatSession for TwitchSession {
    type Raw = IrcMessage;

    fn channel(&self) -> Option<&str> {
        self.channel.as_deref()
    }

    fn set_channel(&mut self, channel: &str) {
        self.channel = Some(normalize_channel(channel));
    }

    fn endpoint(&self) -> String {
        self.config.url.clone()
    }

    fn handshake(&self) -> Vec<String> {
        let mut lines = Vec::with_capacity(4);
        if !self.config.capabilities.is_empty() {
            lines.push(format!("CAP REQ :{}", self.config.capabilities.join(" ")));
        }
        lines.push(format!("PASS {}", self.config.pass));
        lines.push(format!("NICK {}", self.config.nick));
        if let Some(channel) = &self.channel {
            lines.push(format!("JOIN #{channel}"));
        }
        lines
    }

    fn handle_frame(&mut self, frame: &str, now: Instant) -> Vec<Action> {
        if !self.machine.is_connected() {
            debug!(state = ?self.machine.state(), "frame dropped while not joined");
            return Vec::new();
        }
        let mut actions = Vec::new();
        for line in split_frame(frame) {
            actions.extend(self.handle_line(line, now));
        }
        actions
    }

    fn machine(&self) -> &ConnectionMachine {
        &self.machine
    }

    fn machine_mut(&mut self) -> &mut ConnectionMachine {
        &mut self.machine
    }

    fn handlers_mut(&mut self) -> &mut Handlers<IrcMessage> {
        &mut self.handlers
    }
}

fn normalize_channel(channel: &str) -> String {
    channel.trim_start_matches('#').to_lowercase()
}
