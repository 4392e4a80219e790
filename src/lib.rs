//! # unichat
//!
//! A normalization layer for live chat feeds from Twitch (IRC over
//! WebSocket) and Kick (Pusher), exposing one event model regardless of
//! where a message came from.
//!
//! ## Features
//!
//! - Total IRC line parser: a malformed line never aborts its frame
//! - Tag decoding checked against a per-command schema, with unknown keys
//!   reported instead of dropped
//! - Body segmentation into text, emote and link spans that tile the text
//!   exactly
//! - Badge resolution with flat, versioned and count-tiered images
//! - Sans-IO keepalive state machine with latency measurement and
//!   reconnect backoff
//! - Optional Tokio clients for both platforms
//!
//! Logging goes through `tracing`; the library never installs a subscriber.

#![deny(clippy::all)]
#![cfg_attr(docsrs, feature(doc_cfg))]

//! ## Quick Start
//!
//! ### Parsing a line
//!
//! ```rust
//! use unichat::{CommandKind, IrcMessage};
//!
//! let msg = IrcMessage::parse("@id=123 :nick!user@host PRIVMSG #chan :hello world");
//! assert_eq!(msg.command(), &CommandKind::Privmsg);
//! assert_eq!(msg.line.channel, "chan");
//! assert_eq!(msg.line.params, vec!["hello world"]);
//! assert_eq!(msg.tags.unwrap().get("id"), Some("123"));
//! ```
//!
//! ### Segmenting a body
//!
//! ```rust
//! use unichat::body::{segment, twitch_emotes, BodySpan};
//!
//! let spans = segment("Kappa hi Kappa", &twitch_emotes("25:0-4,9-13"));
//! assert_eq!(spans.len(), 3);
//! assert!(matches!(spans[1], BodySpan::Text { ref text, .. } if text == " hi "));
//! ```
//!
//! ### Watching a channel
//!
//! ```no_run
//! # async fn demo() -> unichat::Result<()> {
//! use unichat::config::TwitchConfig;
//! use unichat::twitch::TwitchClient;
//!
//! let mut client = TwitchClient::new(TwitchConfig::anonymous("forsen"));
//! client.on_message(|m| println!("{}: {}", m.user.display_name, m.raw_text));
//! client.connect(None).await?;
//! client.run().await
//! # }
//! ```

pub mod assets;
pub mod body;
pub mod command;
pub mod config;
pub mod error;
pub mod event;
pub mod handlers;
pub mod kick;
pub mod message;
pub mod normalize;
pub mod schema;
pub mod session;
pub mod state;
pub mod time;
pub mod twitch;

#[cfg(feature = "tokio")]
pub mod client;
#[cfg(feature = "tokio")]
pub mod http;
#[cfg(feature = "tokio")]
pub mod transport;

pub use self::assets::{AssetTable, BadgeAsset, MergePolicy};
pub use self::body::{BodySpan, EmoteAnnotation};
pub use self::command::CommandKind;
pub use self::config::{BackoffConfig, KeepaliveConfig, KickConfig, TwitchConfig};
pub use self::error::{
    ChatError, ConfigError, MessageParseError, MetadataError, Result, TransportError,
};
pub use self::event::{
    Badge, Channel, ChatEvent, ChatMessage, ClearMessages, DeleteMessage, EventData, EventKind,
    PlatformEvent, Roles, User,
};
pub use self::handlers::Handlers;
pub use self::kick::{KickSession, PusherFrame};
pub use self::message::{IrcMessage, RawLine, RawSource, TagAnomaly, TagMap};
pub use self::normalize::NormalizeOptions;
pub use self::session::ChatSession;
pub use self::state::{Action, ConnectionMachine, ConnectionState};
pub use self::twitch::TwitchSession;

#[cfg(feature = "tokio")]
pub use self::client::Client;
#[cfg(feature = "tokio")]
pub use self::kick::KickClient;
#[cfg(feature = "tokio")]
pub use self::transport::{ChatTransport, Connector, WsConnector};
#[cfg(feature = "tokio")]
pub use self::twitch::TwitchClient;
