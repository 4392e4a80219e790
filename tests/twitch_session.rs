//! Twitch lines through a session into subscribers.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Instant;

use serde_json::json;
use unichat::config::TwitchConfig;
use unichat::{
    BadgeAsset, BodySpan, ChatEvent, ChatSession, EventData, TwitchSession,
};

fn session() -> (TwitchSession, Arc<Mutex<Vec<ChatEvent>>>) {
    let mut session = TwitchSession::new(TwitchConfig::anonymous("forsen"));
    let events = Arc::new(Mutex::new(Vec::new()));
    let handlers = session.handlers_mut();
    {
        let events = events.clone();
        handlers.on_message(move |m| events.lock().unwrap().push(ChatEvent::Message(m.clone())));
    }
    {
        let events = events.clone();
        handlers.on_clear_messages(move |c| {
            events.lock().unwrap().push(ChatEvent::ClearMessages(c.clone()))
        });
    }
    {
        let events = events.clone();
        handlers.on_delete_message(move |d| {
            events.lock().unwrap().push(ChatEvent::DeleteMessage(d.clone()))
        });
    }
    {
        let events = events.clone();
        handlers.on_event(move |e| events.lock().unwrap().push(ChatEvent::Event(e.clone())));
    }
    (session, events)
}

#[test]
fn test_privmsg_with_badges_and_external_emotes() {
    let (mut session, events) = session();
    session.set_badges(HashMap::from([(
        "subscriber".to_string(),
        BadgeAsset::tiers([(0, "https://b/sub0"), (12, "https://b/sub12")]),
    )]));
    session.set_external_emotes(HashMap::from([(
        "catJAM".to_string(),
        "https://7tv/catjam".to_string(),
    )]));

    session.handle_line(
        "@badge-info=subscriber/14;badges=subscriber/12,unknownset/1;color=#1E90FF;\
display-name=Viewer;emotes=25:0-4;id=m1;room-id=22484632;subscriber=1;\
tmi-sent-ts=1700000000000;user-id=42 :viewer!viewer@viewer.tmi.twitch.tv PRIVMSG #forsen :Kappa catJAM",
        Instant::now(),
    );

    let events = events.lock().unwrap();
    let Some(ChatEvent::Message(m)) = events.first() else {
        panic!("expected a message, got {events:?}");
    };
    assert_eq!(m.user.username, "viewer");
    assert_eq!(m.user.badges.len(), 1);
    assert_eq!(m.user.badges[0].url, "https://b/sub12");
    assert_eq!(m.user.badges[0].info.as_deref(), Some("14"));
    assert!(m.user.roles.subscriber);
    assert_eq!(m.timestamp_sent, 1_700_000_000_000);

    let urls: Vec<&str> = m
        .body
        .iter()
        .filter_map(|span| match span {
            BodySpan::Emote { url, .. } => Some(url.as_str()),
            _ => None,
        })
        .collect();
    assert_eq!(urls.len(), 2);
    assert!(urls[0].contains("/25/"));
    assert_eq!(urls[1], "https://7tv/catjam");
}

#[test]
fn test_stored_assets_win_on_merge() {
    let (mut session, _) = session();
    session.set_external_emotes(HashMap::from([("a".to_string(), "first".to_string())]));
    session.set_external_emotes(HashMap::from([
        ("a".to_string(), "second".to_string()),
        ("b".to_string(), "extra".to_string()),
    ]));
    assert_eq!(session.stored_external_emotes()["a"], "first");
    assert_eq!(session.stored_external_emotes()["b"], "extra");
}

#[test]
fn test_timeout_and_clear() {
    let (mut session, events) = session();
    let now = Instant::now();
    session.handle_line(
        "@ban-duration=600;room-id=1;target-user-id=9;tmi-sent-ts=5 :tmi.twitch.tv CLEARCHAT #forsen :Spammer",
        now,
    );
    session.handle_line("@room-id=1;tmi-sent-ts=6 :tmi.twitch.tv CLEARCHAT #forsen", now);

    let events = events.lock().unwrap();
    let (ChatEvent::ClearMessages(timeout), ChatEvent::ClearMessages(clear)) = (&events[0], &events[1]) else {
        panic!("expected two clears, got {events:?}");
    };
    assert_eq!(timeout.timeout_duration_seconds, Some(600));
    assert_eq!(timeout.user.as_ref().map(|u| u.username.as_str()), Some("spammer"));
    assert_eq!(clear.timeout_duration_seconds, None);
    assert!(clear.user.is_none());
}

#[test]
fn test_clearmsg_is_delete() {
    let (mut session, events) = session();
    session.handle_line(
        "@login=Someone;room-id=1;target-msg-id=abc;tmi-sent-ts=7 :tmi.twitch.tv CLEARMSG #forsen :bad words",
        Instant::now(),
    );
    let events = events.lock().unwrap();
    let ChatEvent::DeleteMessage(d) = &events[0] else {
        panic!("expected delete");
    };
    assert_eq!(d.id, "abc");
    assert_eq!(d.raw_text, "bad words");
    assert_eq!(d.user.as_ref().unwrap().username, "someone");
}

#[test]
fn test_raid_event_json_shape() {
    let (mut session, events) = session();
    session.handle_line(
        "@display-name=Raider;id=r1;login=raider;msg-id=raid;msg-param-displayName=Raider;\
msg-param-login=raider;msg-param-viewerCount=123;room-id=1;\
system-msg=123\\sraiders\\sfrom\\sRaider;tmi-sent-ts=8;user-id=5 :tmi.twitch.tv USERNOTICE #forsen",
        Instant::now(),
    );

    let events = events.lock().unwrap();
    let ChatEvent::Event(event) = &events[0] else {
        panic!("expected event");
    };
    assert!(matches!(&event.data, EventData::Raid(raid) if raid.sender.viewer_count == Some(123)));

    let value = serde_json::to_value(&events[0]).unwrap();
    assert_eq!(value["type"], json!("raid"));
    assert_eq!(value["data"]["sender"]["username"], json!("raider"));
    assert_eq!(value["system_message"], json!("123 raiders from Raider"));
    assert_eq!(value["channel"], json!({"room_id": "1", "name": "forsen"}));
}

#[test]
fn test_keepalive_lines_produce_no_events() {
    let (mut session, events) = session();
    let now = Instant::now();
    session.handle_line(":tmi.twitch.tv PONG tmi.twitch.tv :tmi.twitch.tv", now);
    session.handle_line(":tmi.twitch.tv RECONNECT", now);
    session.handle_line("@emote-only=0;room-id=1 :tmi.twitch.tv ROOMSTATE #forsen", now);
    assert!(events.lock().unwrap().is_empty());
}
