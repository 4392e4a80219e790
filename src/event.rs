//! Unified chat event model.
//!
//! Every platform path produces these same shapes. Events are plain values:
//! once handed to a subscriber they are never touched again.

use serde::Serialize;

use crate::body::BodySpan;

/// Channel an event belongs to.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Channel {
    /// Platform room id, `"unknown"` when the source did not say.
    pub room_id: String,
    /// Channel name.
    pub name: String,
}

/// A resolved badge.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Badge {
    /// Badge set id, e.g. `subscriber`.
    pub set_id: String,
    /// Image URL.
    pub url: String,
    /// Extra detail such as exact subscription months.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub info: Option<String>,
}

/// Privileges of a chat user.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Roles {
    pub broadcaster: bool,
    pub moderator: bool,
    pub vip: bool,
    pub subscriber: bool,
    pub turbo: bool,
    pub admin: bool,
    pub global_moderator: bool,
    pub staff: bool,
}

/// Author of a message or event.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct User {
    pub id: String,
    /// Canonical lower-case handle.
    pub username: String,
    /// Name as the user styles it.
    pub display_name: String,
    /// Name color as `#RRGGBB`.
    pub color: String,
    pub badges: Vec<Badge>,
    pub roles: Roles,
}

/// A chat message.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ChatMessage {
    pub id: String,
    pub body: Vec<BodySpan>,
    pub channel: Channel,
    pub raw_text: String,
    /// Unix epoch milliseconds.
    pub timestamp_sent: i64,
    pub user: User,
}

/// Target of a chat clear.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ClearedUser {
    pub id: String,
    pub username: String,
}

/// Messages were cleared: a user's when `user` is set, otherwise the whole chat.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ClearMessages {
    pub channel: Channel,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<ClearedUser>,
    /// Timeout length; absent for permanent bans and full clears.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout_duration_seconds: Option<i64>,
    pub timestamp_sent: i64,
}

/// Author of a deleted message.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct DeletedUser {
    pub username: String,
}

/// A single message was deleted.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct DeleteMessage {
    pub channel: Channel,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<DeletedUser>,
    /// Id of the deleted message.
    pub id: String,
    pub raw_text: String,
    pub timestamp_sent: i64,
}

/// Subscription tier.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum PlanType {
    #[serde(rename = "prime")]
    Prime,
    #[serde(rename = "1000")]
    Tier1,
    #[serde(rename = "2000")]
    Tier2,
    #[serde(rename = "3000")]
    Tier3,
}

impl PlanType {
    /// Parse the wire value (`Prime`, `1000`, `2000`, `3000`).
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "Prime" | "prime" => Some(Self::Prime),
            "1000" => Some(Self::Tier1),
            "2000" => Some(Self::Tier2),
            "3000" => Some(Self::Tier3),
            _ => None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SubscriptionPlan {
    #[serde(rename = "type")]
    pub kind: PlanType,
    pub name: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct NamedUser {
    pub username: String,
    pub display_name: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct GiftUpgrade {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gift_total: Option<i64>,
    pub promo_name: String,
    pub sender: NamedUser,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Subscription {
    pub months: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub streak: Option<i64>,
    pub subscription_plan: SubscriptionPlan,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gift_upgrade: Option<GiftUpgrade>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct GiftRecipient {
    pub id: String,
    pub username: String,
    pub display_name: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Gift {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub months: Option<i64>,
    pub recipient: GiftRecipient,
    pub subscription_plan: SubscriptionPlan,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct RaidSender {
    pub username: String,
    pub display_name: String,
    /// Absent when the notice did not carry a count.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub viewer_count: Option<i64>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Raid {
    pub sender: RaidSender,
}

/// Payload of a platform event.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "type", content = "data", rename_all = "snake_case")]
pub enum EventData {
    Subscription(Subscription),
    Gift(Gift),
    Raid(Raid),
}

/// A platform event such as a subscription, gift or raid.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct PlatformEvent {
    #[serde(flatten)]
    pub data: EventData,
    pub body: Vec<BodySpan>,
    pub channel: Channel,
    pub id: String,
    pub raw_text: String,
    /// Server-rendered description of the event.
    pub system_message: String,
    pub timestamp_sent: i64,
    pub user: User,
}

/// Any normalized event.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ChatEvent {
    Message(ChatMessage),
    ClearMessages(ClearMessages),
    DeleteMessage(DeleteMessage),
    Event(PlatformEvent),
}

impl ChatEvent {
    /// Subscriber slot this event is delivered to.
    pub fn kind(&self) -> EventKind {
        match self {
            Self::Message(_) => EventKind::Message,
            Self::ClearMessages(_) => EventKind::ClearMessages,
            Self::DeleteMessage(_) => EventKind::DeleteMessage,
            Self::Event(_) => EventKind::Event,
        }
    }
}

/// Subscriber slots.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EventKind {
    Message,
    ClearMessages,
    DeleteMessage,
    Event,
    RawMessage,
}

impl EventKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Message => "message",
            Self::ClearMessages => "clear_messages",
            Self::DeleteMessage => "delete_message",
            Self::Event => "event",
            Self::RawMessage => "raw_message",
        }
    }
}
