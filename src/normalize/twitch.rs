//! Twitch IRC normalization.

use std::collections::HashMap;

use tracing::debug;

use super::{build_body, NormalizeOptions};
use crate::assets::AssetTable;
use crate::body::twitch_emotes;
use crate::command::CommandKind;
use crate::event::{
    Badge, Channel, ChatEvent, ChatMessage, ClearMessages, ClearedUser, DeleteMessage, DeletedUser,
    EventData, Gift, GiftRecipient, GiftUpgrade, NamedUser, PlanType, PlatformEvent, Raid,
    RaidSender, Roles, Subscription, SubscriptionPlan, User,
};
use crate::message::{IrcMessage, TagMap};
use crate::time;

const DEFAULT_COLOR: &str = "#FFFFFF";
const UNKNOWN: &str = "unknown";

/// Normalize one decoded Twitch line.
///
/// Returns `None` for commands that carry no chat event (keepalive, room
/// state, ...) and for lines missing the tags an event requires.
pub fn normalize_twitch(
    msg: &IrcMessage,
    assets: &AssetTable,
    options: NormalizeOptions,
) -> Option<ChatEvent> {
    match msg.command() {
        CommandKind::Privmsg => privmsg(msg, assets, options).map(ChatEvent::Message),
        CommandKind::ClearChat => clearchat(msg).map(ChatEvent::ClearMessages),
        CommandKind::ClearMsg => clearmsg(msg).map(ChatEvent::DeleteMessage),
        CommandKind::UserNotice => usernotice(msg, assets, options).map(ChatEvent::Event),
        _ => None,
    }
}

fn privmsg(msg: &IrcMessage, assets: &AssetTable, options: NormalizeOptions) -> Option<ChatMessage> {
    let tags = msg.tags.as_ref()?;
    let (Some(user_id), Some(id), Some(room_id)) = (
        tags.get_non_empty("user-id"),
        tags.get_non_empty("id"),
        tags.get_non_empty("room-id"),
    ) else {
        debug!("PRIVMSG without user-id, id or room-id");
        return None;
    };

    let text = msg.line.param(0);
    if text.is_empty() {
        return None;
    }

    let platform = tags.get("emotes").map(twitch_emotes).unwrap_or_default();

    Some(ChatMessage {
        id: id.to_string(),
        body: build_body(text, platform, assets, options),
        channel: Channel {
            room_id: room_id.to_string(),
            name: msg.line.channel.clone(),
        },
        raw_text: text.to_string(),
        timestamp_sent: timestamp(tags),
        user: user(msg, tags, user_id, assets),
    })
}

fn clearchat(msg: &IrcMessage) -> Option<ClearMessages> {
    let tags = msg.tags.as_ref()?;
    let target = msg.line.param(0);
    let user = match tags.get_non_empty("target-user-id") {
        Some(id) if !target.is_empty() => Some(ClearedUser {
            id: id.to_string(),
            username: target.to_lowercase(),
        }),
        _ => None,
    };

    Some(ClearMessages {
        channel: channel(msg, tags),
        user,
        timeout_duration_seconds: tags.get_i64("ban-duration"),
        timestamp_sent: timestamp(tags),
    })
}

fn clearmsg(msg: &IrcMessage) -> Option<DeleteMessage> {
    let tags = msg.tags.as_ref()?;
    let Some(id) = tags.get_non_empty("target-msg-id") else {
        debug!("CLEARMSG without target-msg-id");
        return None;
    };

    Some(DeleteMessage {
        channel: channel(msg, tags),
        user: tags.get_non_empty("login").map(|login| DeletedUser {
            username: login.to_lowercase(),
        }),
        id: id.to_string(),
        raw_text: msg.line.param(0).to_string(),
        timestamp_sent: timestamp(tags),
    })
}

fn usernotice(
    msg: &IrcMessage,
    assets: &AssetTable,
    options: NormalizeOptions,
) -> Option<PlatformEvent> {
    let tags = msg.tags.as_ref()?;
    let (Some(id), Some(user_id)) = (tags.get_non_empty("id"), tags.get_non_empty("user-id")) else {
        debug!("USERNOTICE without id or user-id");
        return None;
    };
    let kind = tags.get("msg-id").unwrap_or_default();

    let data = match kind {
        "sub" | "resub" => EventData::Subscription(Subscription {
            months: tags
                .get_i64("msg-param-cumulative-months")
                .or_else(|| tags.get_i64("msg-param-months"))
                .unwrap_or(1),
            streak: tags
                .get("msg-param-should-share-streak")
                .filter(|share| *share == "1")
                .and_then(|_| tags.get_i64("msg-param-streak-months")),
            subscription_plan: plan(tags)?,
            gift_upgrade: gift_upgrade(tags),
        }),
        "subgift" | "anonsubgift" => EventData::Gift(Gift {
            months: tags.get_i64("msg-param-gift-months"),
            recipient: GiftRecipient {
                id: tags.get("msg-param-recipient-id").unwrap_or_default().to_string(),
                username: tags
                    .get("msg-param-recipient-user-name")
                    .unwrap_or_default()
                    .to_lowercase(),
                display_name: tags
                    .get("msg-param-recipient-display-name")
                    .unwrap_or_default()
                    .to_string(),
            },
            subscription_plan: plan(tags)?,
        }),
        "raid" => EventData::Raid(Raid {
            sender: RaidSender {
                username: tags.get("msg-param-login").unwrap_or_default().to_lowercase(),
                display_name: tags
                    .get("msg-param-displayName")
                    .unwrap_or_default()
                    .to_string(),
                viewer_count: tags.get_i64("msg-param-viewerCount"),
            },
        }),
        other => {
            debug!(msg_id = other, "USERNOTICE without a unified event");
            return None;
        }
    };

    let text = msg.line.param(0);
    let platform = tags.get("emotes").map(twitch_emotes).unwrap_or_default();

    Some(PlatformEvent {
        data,
        body: build_body(text, platform, assets, options),
        channel: channel(msg, tags),
        id: id.to_string(),
        raw_text: text.to_string(),
        system_message: tags.get("system-msg").unwrap_or_default().to_string(),
        timestamp_sent: timestamp(tags),
        user: user(msg, tags, user_id, assets),
    })
}

fn plan(tags: &TagMap) -> Option<SubscriptionPlan> {
    let raw = tags.get("msg-param-sub-plan").unwrap_or_default();
    let Some(kind) = PlanType::parse(raw) else {
        debug!(plan = raw, "unknown subscription plan");
        return None;
    };
    Some(SubscriptionPlan {
        kind,
        name: tags
            .get("msg-param-sub-plan-name")
            .unwrap_or_default()
            .to_string(),
    })
}

fn gift_upgrade(tags: &TagMap) -> Option<GiftUpgrade> {
    let sender = tags.get_non_empty("msg-param-sender-login")?;
    Some(GiftUpgrade {
        gift_total: tags.get_i64("msg-param-promo-gift-total"),
        promo_name: tags
            .get("msg-param-promo-name")
            .unwrap_or_default()
            .to_string(),
        sender: NamedUser {
            username: sender.to_lowercase(),
            display_name: tags
                .get("msg-param-sender-name")
                .unwrap_or(sender)
                .to_string(),
        },
    })
}

fn channel(msg: &IrcMessage, tags: &TagMap) -> Channel {
    Channel {
        room_id: tags.get_non_empty("room-id").unwrap_or(UNKNOWN).to_string(),
        name: msg.line.channel.clone(),
    }
}

fn timestamp(tags: &TagMap) -> i64 {
    tags.get_i64("tmi-sent-ts").unwrap_or_else(time::now_millis)
}

fn user(msg: &IrcMessage, tags: &TagMap, user_id: &str, assets: &AssetTable) -> User {
    let nick = msg
        .line
        .source
        .as_ref()
        .and_then(|source| source.nick.as_deref())
        .filter(|nick| !nick.is_empty());
    let login = tags.get_non_empty("login").or(nick);
    let display_name = tags
        .get_non_empty("display-name")
        .or(login)
        .unwrap_or("Unknown")
        .to_string();
    let username = login
        .map(str::to_lowercase)
        .unwrap_or_else(|| display_name.to_lowercase());

    User {
        id: user_id.to_string(),
        username,
        display_name,
        color: tags
            .get_non_empty("color")
            .unwrap_or(DEFAULT_COLOR)
            .to_string(),
        badges: badges(tags, assets),
        roles: roles(tags),
    }
}

/// Resolve the `badges` tag; `badge-info` supplies per-set detail.
fn badges(tags: &TagMap, assets: &AssetTable) -> Vec<Badge> {
    let info: HashMap<&str, &str> = tags
        .get("badge-info")
        .unwrap_or_default()
        .split(',')
        .filter_map(|entry| entry.split_once('/'))
        .collect();

    tags.get("badges")
        .unwrap_or_default()
        .split(',')
        .filter_map(|entry| entry.split_once('/'))
        .filter(|(set_id, version)| !set_id.is_empty() && !version.is_empty())
        .filter_map(|(set_id, version)| {
            let url = assets.resolve_badge(set_id, Some(version), None)?;
            Some(Badge {
                set_id: set_id.to_string(),
                url: url.to_string(),
                info: info.get(set_id).map(|v| v.to_string()),
            })
        })
        .collect()
}

fn roles(tags: &TagMap) -> Roles {
    let badge_sets: Vec<&str> = tags
        .get("badges")
        .unwrap_or_default()
        .split(',')
        .filter_map(|entry| entry.split_once('/').map(|(set, _)| set))
        .collect();
    let flag = |key: &str| tags.get(key) == Some("1");
    let user_type = tags.get("user-type").unwrap_or_default();

    Roles {
        broadcaster: badge_sets.contains(&"broadcaster"),
        moderator: flag("mod"),
        vip: tags.contains_key("vip") || badge_sets.contains(&"vip"),
        subscriber: flag("subscriber"),
        turbo: flag("turbo"),
        admin: user_type == "admin",
        global_moderator: user_type == "global_mod",
        staff: user_type == "staff",
    }
}
