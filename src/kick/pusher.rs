//! Pusher WebSocket protocol frames.
//!
//! Every frame is a JSON object `{event, data, channel}`. Servers encode
//! `data` as a JSON string holding another JSON document; [`PusherFrame::decode`]
//! unwraps that second layer.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

pub const CONNECTION_ESTABLISHED: &str = "pusher:connection_established";
pub const SUBSCRIPTION_SUCCEEDED: &str = "pusher_internal:subscription_succeeded";
pub const PING: &str = "pusher:ping";
pub const PONG: &str = "pusher:pong";
pub const ERROR: &str = "pusher:error";
pub const CHAT_MESSAGE: &str = "App\\Events\\ChatMessageEvent";

/// Kinds of inbound frames the session reacts to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PusherEvent<'a> {
    ConnectionEstablished,
    SubscriptionSucceeded,
    Ping,
    Pong,
    Error,
    ChatMessage,
    Other(&'a str),
}

impl<'a> From<&'a str> for PusherEvent<'a> {
    fn from(event: &'a str) -> Self {
        match event {
            CONNECTION_ESTABLISHED => Self::ConnectionEstablished,
            SUBSCRIPTION_SUCCEEDED => Self::SubscriptionSucceeded,
            PING => Self::Ping,
            PONG => Self::Pong,
            ERROR => Self::Error,
            CHAT_MESSAGE => Self::ChatMessage,
            other => Self::Other(other),
        }
    }
}

/// One Pusher frame. This is what the raw-message subscriber of the Kick
/// path receives.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PusherFrame {
    pub event: String,
    #[serde(default)]
    pub data: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub channel: Option<String>,
}

impl PusherFrame {
    /// Decode a text frame, unwrapping string-encoded `data`.
    pub fn decode(text: &str) -> Result<Self, serde_json::Error> {
        let mut frame: Self = serde_json::from_str(text)?;
        if let Value::String(inner) = &frame.data {
            if let Ok(value) = serde_json::from_str::<Value>(inner) {
                frame.data = value;
            }
        }
        Ok(frame)
    }

    pub fn kind(&self) -> PusherEvent<'_> {
        PusherEvent::from(self.event.as_str())
    }

    /// Deserialize `data` into a payload type.
    pub fn data_as<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        T::deserialize(&self.data)
    }
}

/// `pusher:subscribe` for a public channel.
pub fn subscribe(channel: &str) -> String {
    json!({"event": "pusher:subscribe", "data": {"auth": "", "channel": channel}}).to_string()
}

pub fn ping() -> String {
    json!({"event": PING, "data": {}}).to_string()
}

pub fn pong() -> String {
    json!({"event": PONG, "data": {}}).to_string()
}

/// Pusher channel carrying a chatroom's messages.
pub fn chatroom_channel(chatroom_id: u64) -> String {
    format!("chatrooms.{chatroom_id}.v2")
}
