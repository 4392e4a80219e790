use tracing::debug;

use super::{build_body, NormalizeOptions};
use crate::assets::AssetTable;
use crate::body::kick_emotes;
use crate::event::{Badge, Channel, ChatMessage, Roles, User};
use crate::kick::types::{ChatMessageEvent, SenderBadge};
use crate::time;

/// Normalize a Kick chat message received on `channel_name`.
pub fn normalize_kick(
    event: &ChatMessageEvent,
    channel_name: &str,
    assets: &AssetTable,
    options: NormalizeOptions,
) -> ChatMessage {
    let sender = &event.sender;
    let username = match sender.slug.as_deref().filter(|slug| !slug.is_empty()) {
        Some(slug) => slug.to_string(),
        None => sender.username.to_lowercase(),
    };

    let timestamp_sent = time::parse_rfc3339_millis(&event.created_at).unwrap_or_else(|| {
        debug!(created_at = %event.created_at, "unparseable message time");
        time::now_millis()
    });

    ChatMessage {
        id: event.id.clone(),
        body: build_body(&event.content, kick_emotes(&event.content), assets, options),
        channel: Channel {
            room_id: event.chatroom_id.to_string(),
            name: channel_name.to_string(),
        },
        raw_text: event.content.clone(),
        timestamp_sent,
        user: User {
            id: sender.id.to_string(),
            username,
            display_name: sender.username.clone(),
            color: sender.identity.color.clone(),
            badges: sender
                .identity
                .badges
                .iter()
                .filter_map(|badge| resolve_badge(badge, assets))
                .collect(),
            roles: roles(&sender.identity.badges),
        },
    }
}

fn resolve_badge(badge: &SenderBadge, assets: &AssetTable) -> Option<Badge> {
    let url = assets.resolve_badge(&badge.kind, None, badge.count)?;
    Some(Badge {
        set_id: badge.kind.clone(),
        url: url.to_string(),
        info: badge.count.map(|count| count.to_string()),
    })
}

fn roles(badges: &[SenderBadge]) -> Roles {
    let mut roles = Roles::default();
    for badge in badges {
        match badge.kind.as_str() {
            "broadcaster" => roles.broadcaster = true,
            "moderator" => roles.moderator = true,
            "vip" => roles.vip = true,
            "subscriber" => roles.subscriber = true,
            "staff" => roles.staff = true,
            _ => {}
        }
    }
    roles
}
