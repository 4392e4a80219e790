//! Kick payload shapes.
//!
//! Only the fields the normalizer and session read are modelled; everything
//! else in the payloads is ignored.

use serde::{Deserialize, Serialize};

/// `App\Events\ChatMessageEvent` payload.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessageEvent {
    pub id: String,
    pub chatroom_id: u64,
    pub content: String,
    #[serde(rename = "type", default)]
    pub kind: String,
    /// RFC 3339 send time.
    #[serde(default)]
    pub created_at: String,
    pub sender: Sender,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sender {
    pub id: u64,
    pub username: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
    #[serde(default)]
    pub identity: Identity,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    #[serde(default)]
    pub color: String,
    #[serde(default)]
    pub badges: Vec<SenderBadge>,
}

/// A badge as Kick attaches it to a sender.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SenderBadge {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub count: Option<u64>,
}

/// Response of the channel metadata endpoint.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelInfo {
    pub id: u64,
    pub slug: String,
    pub chatroom: Chatroom,
    #[serde(default)]
    pub subscriber_badges: Vec<SubscriberBadge>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chatroom {
    pub id: u64,
}

/// Channel-specific subscriber badge unlocked after `months`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubscriberBadge {
    pub months: u64,
    pub badge_image: BadgeImage,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BadgeImage {
    pub src: String,
    #[serde(default)]
    pub srcset: String,
}
