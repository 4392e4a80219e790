//! Kick chat over Pusher.
//!
//! Connecting takes two steps: fetch the channel metadata (chatroom id and
//! subscriber badges), then open the Pusher socket and subscribe to the
//! chatroom channel once the server confirms the connection.

#[cfg(feature = "tokio")]
mod client;
pub mod pusher;
pub mod types;

#[cfg(feature = "tokio")]
pub use self::client::KickClient;
pub use self::pusher::PusherFrame;
pub use self::types::{ChannelInfo, ChatMessageEvent};

use std::collections::HashMap;
use std::time::{Duration, Instant};

use tracing::{debug, info, warn};

use self::pusher::PusherEvent;
use crate::assets::{AssetTable, BadgeAsset, MergePolicy};
use crate::config::KickConfig;
use crate::error::{MetadataError, Result};
use crate::event::ChatEvent;
use crate::handlers::Handlers;
use crate::normalize::{normalize_kick, NormalizeOptions};
use crate::session::ChatSession;
use crate::state::{Action, ConnectionMachine, ConnectionState};

/// Merge direction for caller-supplied Kick assets: incoming entries win.
pub const KICK_MERGE_POLICY: MergePolicy = MergePolicy::PreferIncoming;

/// Sans-IO Kick chat session.
pub struct KickSession {
    config: KickConfig,
    channel: Option<String>,
    chatroom_id: Option<u64>,
    machine: ConnectionMachine,
    assets: AssetTable,
    handlers: Handlers<PusherFrame>,
}

impl KickSession {
    pub fn new(config: KickConfig) -> Self {
        let machine = ConnectionMachine::new(config.keepalive(), pusher::ping());
        Self {
            channel: config.channel.clone(),
            config,
            chatroom_id: None,
            machine,
            assets: AssetTable::kick_defaults(),
            handlers: Handlers::new(),
        }
    }

    pub fn config(&self) -> &KickConfig {
        &self.config
    }

    pub fn state(&self) -> ConnectionState {
        self.machine.state()
    }

    pub fn is_connected(&self) -> bool {
        self.machine.is_connected()
    }

    pub fn latency(&self) -> Option<Duration> {
        self.machine.latency()
    }

    /// Chatroom id learned from the channel metadata.
    pub fn chatroom_id(&self) -> Option<u64> {
        self.chatroom_id
    }

    /// Add badge images, replacing stored entries with the same set id.
    pub fn set_badges(&mut self, badges: HashMap<String, BadgeAsset>) {
        self.assets.merge_badges(badges, KICK_MERGE_POLICY);
    }

    /// Add third-party emotes, replacing stored entries with the same name.
    pub fn set_external_emotes(&mut self, emotes: HashMap<String, String>) {
        self.assets.merge_external_emotes(emotes, KICK_MERGE_POLICY);
    }

    pub fn stored_badges(&self) -> &HashMap<String, BadgeAsset> {
        &self.assets.badges
    }

    pub fn stored_external_emotes(&self) -> &HashMap<String, String> {
        &self.assets.external_emotes
    }

    pub fn assets_mut(&mut self) -> &mut AssetTable {
        &mut self.assets
    }

    /// Record the chatroom and merge the channel's subscriber badge tiers.
    pub fn apply_channel_info(&mut self, info: &ChannelInfo) {
        for badge in &info.subscriber_badges {
            self.assets
                .insert_tier("subscriber", badge.months, badge.badge_image.src.clone());
        }
        debug!(
            chatroom_id = info.chatroom.id,
            badges = info.subscriber_badges.len(),
            "channel metadata applied"
        );
        self.chatroom_id = Some(info.chatroom.id);
    }

    fn on_chat_message(&mut self, frame: &PusherFrame) {
        let event: ChatMessageEvent = match frame.data_as() {
            Ok(event) => event,
            Err(e) => {
                warn!(error = %e, "malformed chat message");
                return;
            }
        };
        let options = NormalizeOptions {
            detect_links: self.config.detect_links,
        };
        let channel = self.channel.as_deref().unwrap_or("unknown");
        let message = normalize_kick(&event, channel, &self.assets, options);
        self.handlers.dispatch(&ChatEvent::Message(message));
    }
}

impl ChatSession for KickSession {
    type Raw = PusherFrame;

    fn channel(&self) -> Option<&str> {
        self.channel.as_deref()
    }

    fn set_channel(&mut self, channel: &str) {
        self.channel = Some(channel.to_string());
    }

    fn endpoint(&self) -> String {
        self.config.pusher_url()
    }

    fn metadata_url(&self) -> Option<String> {
        self.channel
            .as_deref()
            .map(|channel| self.config.channel_url(channel))
    }

    fn apply_metadata(&mut self, body: &str) -> Result<()> {
        let info: ChannelInfo = serde_json::from_str(body).map_err(MetadataError::from)?;
        self.apply_channel_info(&info);
        Ok(())
    }

    fn handshake(&self) -> Vec<String> {
        Vec::new()
    }

    fn handle_frame(&mut self, frame: &str, now: Instant) -> Vec<Action> {
        if !self.machine.is_connected() {
            debug!(state = ?self.machine.state(), "frame dropped while not joined");
            return Vec::new();
        }
        let frame = match PusherFrame::decode(frame) {
            Ok(frame) => frame,
            Err(e) => {
                warn!(error = %e, "undecodable pusher frame");
                return Vec::new();
            }
        };
        self.handlers.dispatch_raw(&frame);

        match frame.kind() {
            PusherEvent::ConnectionEstablished => match self.chatroom_id {
                Some(id) => {
                    let subscribe = pusher::subscribe(&pusher::chatroom_channel(id));
                    self.machine.send(subscribe).into_iter().collect()
                }
                None => {
                    warn!("no chatroom to subscribe to");
                    Vec::new()
                }
            },
            PusherEvent::SubscriptionSucceeded => {
                info!(
                    channel = self.channel.as_deref().unwrap_or_default(),
                    "connected to Kick Pusher"
                );
                Vec::new()
            }
            PusherEvent::Ping => self.machine.send(pusher::pong()).into_iter().collect(),
            PusherEvent::Pong => {
                self.machine.on_pong(now);
                Vec::new()
            }
            PusherEvent::Error => {
                warn!(data = %frame.data, "pusher error");
                Vec::new()
            }
            PusherEvent::ChatMessage => {
                self.on_chat_message(&frame);
                Vec::new()
            }
            PusherEvent::Other(event) => {
                debug!(event, "unhandled pusher event");
                Vec::new()
            }
        }
    }

    fn machine(&self) -> &ConnectionMachine {
        &self.machine
    }

    fn machine_mut(&mut self) -> &mut ConnectionMachine {
        &mut self.machine
    }

    fn handlers_mut(&mut self) -> &mut Handlers<PusherFrame> {
        &mut self.handlers
    }
}
