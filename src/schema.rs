//! Tag schema registry.
//!
//! Each tagged command has a fixed set of metadata keys the server is known
//! to send. Keys outside the set are still decoded but flagged, which is how
//! new or undocumented server tags get noticed.

use crate::command::CommandKind;

const CLEARCHAT: &[&str] = &["ban-duration", "room-id", "target-user-id", "tmi-sent-ts"];

const CLEARMSG: &[&str] = &["login", "room-id", "target-msg-id", "tmi-sent-ts"];

const GLOBALUSERSTATE: &[&str] = &[
    "badge-info",
    "badges",
    "color",
    "display-name",
    "emote-sets",
    "turbo",
    "user-id",
    "user-type",
];

const NOTICE: &[&str] = &["msg-id", "target-user-id"];

const PRIVMSG: &[&str] = &[
    "badge-info",
    "badges",
    "bits",
    "color",
    "display-name",
    "emotes",
    "emote-only",
    "id",
    "mod",
    "custom-reward-id",
    "reply-thread-parent-display-name",
    "reply-thread-parent-user-id",
    "pinned-chat-paid-amount",
    "pinned-chat-paid-currency",
    "pinned-chat-paid-exponent",
    "pinned-chat-paid-level",
    "pinned-chat-paid-is-system-message",
    "reply-parent-msg-id",
    "reply-parent-user-id",
    "reply-parent-user-login",
    "reply-parent-display-name",
    "reply-parent-msg-body",
    "reply-thread-parent-msg-id",
    "reply-thread-parent-user-login",
    "room-id",
    "subscriber",
    "tmi-sent-ts",
    "turbo",
    "user-id",
    "user-type",
    "vip",
    // undocumented
    "client-nonce",
    "first-msg",
    "flags",
    "returning-chatter",
];

const ROOMSTATE: &[&str] = &["emote-only", "followers-only", "r9k", "room-id", "slow", "subs-only"];

const USERNOTICE: &[&str] = &[
    "badge-info",
    "badges",
    "color",
    "display-name",
    "emotes",
    "id",
    "login",
    "mod",
    "msg-id",
    "room-id",
    "subscriber",
    "system-msg",
    "tmi-sent-ts",
    "turbo",
    "user-id",
    "user-type",
    "vip",
    "flags",
    // subscription and raid parameters
    "msg-param-cumulative-months",
    "msg-param-displayName",
    "msg-param-login",
    "msg-param-multimonth-duration",
    "msg-param-multimonth-tenure",
    "msg-param-months",
    "msg-param-promo-gift-total",
    "msg-param-promo-name",
    "msg-param-recipient-display-name",
    "msg-param-recipient-id",
    "msg-param-recipient-user-name",
    "msg-param-sender-login",
    "msg-param-sender-name",
    "msg-param-should-share-streak",
    "msg-param-streak-months",
    "msg-param-sub-plan",
    "msg-param-sub-plan-name",
    "msg-param-viewerCount",
    "msg-param-ritual-name",
    "msg-param-threshold",
    "msg-param-gift-months",
    "msg-param-was-gifted",
    "msg-param-community-gift-id",
    "msg-param-mass-gift-count",
    "msg-param-origin-id",
];

const USERSTATE: &[&str] = &[
    "badge-info",
    "badges",
    "color",
    "display-name",
    "emote-sets",
    "id",
    "mod",
    "subscriber",
    "turbo",
    "user-type",
];

const WHISPER: &[&str] = &[
    "badges",
    "color",
    "display-name",
    "emotes",
    "message-id",
    "thread-id",
    "turbo",
    "user-id",
    "user-type",
];

/// Permitted tag keys for a command.
///
/// Returns `None` for [`CommandKind::Unknown`], which has no schema to check
/// against. Known commands that never carry tags return an empty slice, so
/// any tag on them is anomalous.
pub fn allowed_tags(command: &CommandKind) -> Option<&'static [&'static str]> {
    let keys: &'static [&'static str] = match command {
        CommandKind::ClearChat => CLEARCHAT,
        CommandKind::ClearMsg => CLEARMSG,
        CommandKind::GlobalUserState => GLOBALUSERSTATE,
        CommandKind::Notice => NOTICE,
        CommandKind::Privmsg => PRIVMSG,
        CommandKind::RoomState => ROOMSTATE,
        CommandKind::UserNotice => USERNOTICE,
        CommandKind::UserState => USERSTATE,
        CommandKind::Whisper => WHISPER,
        CommandKind::HostTarget
        | CommandKind::Part
        | CommandKind::Ping
        | CommandKind::Pong
        | CommandKind::Reconnect => &[],
        CommandKind::Unknown(_) => return None,
    };
    Some(keys)
}

/// Whether `key` is in the schema for `command`.
///
/// Unknown commands accept every key.
pub fn is_allowed(command: &CommandKind, key: &str) -> bool {
    match allowed_tags(command) {
        Some(keys) => keys.contains(&key),
        None => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_privmsg_schema() {
        assert!(is_allowed(&CommandKind::Privmsg, "emotes"));
        assert!(is_allowed(&CommandKind::Privmsg, "returning-chatter"));
        assert!(!is_allowed(&CommandKind::Privmsg, "msg-id"));
    }

    #[test]
    fn test_tagless_commands() {
        assert_eq!(allowed_tags(&CommandKind::Ping), Some(&[][..]));
        assert!(!is_allowed(&CommandKind::Pong, "anything"));
    }

    #[test]
    fn test_unknown_command_has_no_schema() {
        let kind = CommandKind::Unknown("JOIN".to_string());
        assert!(allowed_tags(&kind).is_none());
        assert!(is_allowed(&kind, "whatever"));
    }

    #[test]
    fn test_clearchat_schema() {
        let keys = allowed_tags(&CommandKind::ClearChat).unwrap();
        assert_eq!(keys.len(), 4);
        assert!(keys.contains(&"ban-duration"));
    }
}
