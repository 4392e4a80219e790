//! Drives `TwitchClient` over an in-memory transport with a paused clock.

#![cfg(feature = "tokio")]

mod common;

use std::sync::{Arc, Mutex};
use std::time::Duration;

use common::MockConnector;
use unichat::config::{TwitchConfig, TWITCH_WS_URL};
use unichat::{ChatError, ChatSession, Client, ConnectionState, IrcMessage, TwitchSession};

const PONG: &str = ":tmi.twitch.tv PONG tmi.twitch.tv :tmi.twitch.tv";

fn client(channel: Option<&str>) -> (Client<TwitchSession, MockConnector>, MockConnector) {
    let mut config = TwitchConfig::default();
    config.channel = channel.map(str::to_string);
    let connector = MockConnector::default();
    let client = Client::with_connector(TwitchSession::new(config), connector.clone());
    (client, connector)
}

#[tokio::test(start_paused = true)]
async fn test_connect_sends_handshake_then_ping() {
    let (mut client, connector) = client(Some("Forsen"));
    client.connect(None).await.unwrap();

    assert_eq!(connector.urls(), vec![TWITCH_WS_URL.to_string()]);
    assert_eq!(
        connector.sent(),
        vec![
            "CAP REQ :twitch.tv/commands twitch.tv/tags",
            "PASS SCHMOOPIIE",
            "NICK justinfan1234",
            "JOIN #forsen",
            "PING",
        ]
    );
    assert_eq!(client.state(), ConnectionState::AwaitingPong);
}

#[tokio::test(start_paused = true)]
async fn test_connect_channel_argument_overrides_config() {
    let (mut client, connector) = client(Some("forsen"));
    client.connect(Some("#XQC")).await.unwrap();
    assert_eq!(connector.count_sent("JOIN #xqc"), 1);
    assert_eq!(connector.count_sent("JOIN #forsen"), 0);
}

#[tokio::test(start_paused = true)]
async fn test_connect_without_channel_opens_nothing() {
    let (mut client, connector) = client(None);
    let err = client.connect(None).await.unwrap_err();
    assert!(matches!(err, ChatError::NoChannel));
    assert_eq!(connector.connects(), 0);
    assert_eq!(client.state(), ConnectionState::Disconnected);
}

#[tokio::test(start_paused = true)]
async fn test_send_before_connect_fails() {
    let (mut client, connector) = client(Some("forsen"));
    let err = client.send("PRIVMSG #forsen :hi").await.unwrap_err();
    assert!(matches!(err, ChatError::NotConnected));
    assert!(connector.sent().is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_refused_connect_leaves_disconnected() {
    let (mut client, connector) = client(Some("forsen"));
    connector.refuse();
    let err = client.connect(None).await.unwrap_err();
    assert!(matches!(err, ChatError::Transport(_)));
    assert_eq!(client.state(), ConnectionState::Disconnected);
}

#[tokio::test(start_paused = true)]
async fn test_pong_measures_latency() {
    let (mut client, connector) = client(Some("forsen"));
    client.connect(None).await.unwrap();

    tokio::time::advance(Duration::from_millis(75)).await;
    connector.push(PONG);
    assert!(client.step().await.unwrap());

    assert_eq!(client.latency(), Some(Duration::from_millis(75)));
    assert_eq!(client.state(), ConnectionState::Joined);
}

#[tokio::test(start_paused = true)]
async fn test_keepalive_pings_on_interval() {
    let (mut client, connector) = client(Some("forsen"));
    client.connect(None).await.unwrap();
    connector.push(PONG);
    client.step().await.unwrap();

    // Nothing inbound: the next wake-up is the 30s ping timer.
    let before = tokio::time::Instant::now();
    assert!(client.step().await.unwrap());
    let waited = before.elapsed();
    assert!(waited >= Duration::from_secs(30) && waited < Duration::from_secs(31));
    assert_eq!(connector.count_sent("PING"), 2);
    assert_eq!(connector.connects(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_pong_timeout_reconnects_once() {
    let (mut client, connector) = client(Some("forsen"));
    client.connect(None).await.unwrap();

    // No PONG within 10s of the first PING.
    assert!(client.step().await.unwrap());

    assert_eq!(connector.connects(), 2);
    assert_eq!(connector.closed(), 1);
    assert_eq!(connector.count_sent("JOIN #forsen"), 2);
    assert_eq!(connector.count_sent("PING"), 2);
    assert_eq!(client.session().machine().reconnects(), 1);
    assert_eq!(client.state(), ConnectionState::AwaitingPong);

    // The fresh connection answers; no further reconnect.
    connector.push(PONG);
    client.step().await.unwrap();
    assert_eq!(client.state(), ConnectionState::Joined);
    assert_eq!(connector.connects(), 2);
}

#[tokio::test(start_paused = true)]
async fn test_server_ping_answered() {
    let (mut client, connector) = client(Some("forsen"));
    client.connect(None).await.unwrap();
    connector.push("PING :tmi.twitch.tv");
    client.step().await.unwrap();
    assert_eq!(connector.count_sent("PONG :tmi.twitch.tv"), 1);
}

#[tokio::test(start_paused = true)]
async fn test_frame_dispatches_message_and_raw() {
    let (mut client, connector) = client(Some("forsen"));
    let messages = Arc::new(Mutex::new(Vec::new()));
    let raws = Arc::new(Mutex::new(Vec::<IrcMessage>::new()));
    {
        let messages = messages.clone();
        client.on_message(move |m| messages.lock().unwrap().push(m.raw_text.clone()));
        let raws = raws.clone();
        client.on_raw_message(move |r| raws.lock().unwrap().push(r.clone()));
    }
    client.connect(None).await.unwrap();

    connector.push(
        "@id=m1;room-id=22484632;user-id=1;display-name=A;tmi-sent-ts=1 :a!a@a.tmi.twitch.tv PRIVMSG #forsen :first\r\n\
         @id=m2;room-id=22484632;user-id=2;display-name=B;tmi-sent-ts=2 :b!b@b.tmi.twitch.tv PRIVMSG #forsen :second\r\n",
    );
    client.step().await.unwrap();

    assert_eq!(*messages.lock().unwrap(), vec!["first", "second"]);
    assert_eq!(raws.lock().unwrap().len(), 2);
}

#[tokio::test(start_paused = true)]
async fn test_peer_close_ends_run() {
    let (mut client, connector) = client(Some("forsen"));
    client.connect(None).await.unwrap();
    connector.hang_up();

    client.run().await.unwrap();
    assert_eq!(client.state(), ConnectionState::Disconnected);
    assert_eq!(connector.connects(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_disconnect_closes_transport() {
    let (mut client, connector) = client(Some("forsen"));
    client.connect(None).await.unwrap();
    client.disconnect().await.unwrap();

    assert_eq!(connector.closed(), 1);
    assert!(!client.is_connected());
    assert!(!client.step().await.unwrap());
}

#[tokio::test(start_paused = true)]
async fn test_failed_write_drops_transport() {
    let (mut client, connector) = client(Some("forsen"));
    client.connect(None).await.unwrap();
    connector.break_pipe();

    let err = client.send("PRIVMSG #forsen :hi").await.unwrap_err();
    assert!(matches!(err, ChatError::Transport(_)));
    assert_eq!(client.state(), ConnectionState::Disconnected);
    assert!(!client.is_connected());

    let err = client.send("PRIVMSG #forsen :again").await.unwrap_err();
    assert!(matches!(err, ChatError::NotConnected));
    assert!(!client.step().await.unwrap());
}
