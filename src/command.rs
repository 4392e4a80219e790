//! Protocol command kinds.
//!
//! The IRC-derived transport only ever delivers a known set of verbs that
//! carry tags. Modelling them as a closed enum keeps tag validation a table
//! lookup; anything else lands in [`CommandKind::Unknown`].

use std::fmt;
use std::str::FromStr;

use serde::{Serialize, Serializer};

/// Command verb of a protocol line.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum CommandKind {
    /// `CLEARCHAT`: a user's messages (or the whole chat) were cleared.
    ClearChat,
    /// `CLEARMSG`: a single message was deleted.
    ClearMsg,
    /// `GLOBALUSERSTATE`: sent after login.
    GlobalUserState,
    /// `HOSTTARGET`: the channel started or stopped hosting.
    HostTarget,
    /// `NOTICE`: server notice.
    Notice,
    /// `PART`: a user left the channel.
    Part,
    /// `PING`: keepalive request.
    Ping,
    /// `PONG`: keepalive reply.
    Pong,
    /// `PRIVMSG`: chat message.
    Privmsg,
    /// `RECONNECT`: the server is about to restart.
    Reconnect,
    /// `ROOMSTATE`: room settings changed.
    RoomState,
    /// `USERNOTICE`: subscription, gift, raid and similar events.
    UserNotice,
    /// `USERSTATE`: sent after joining or sending a message.
    UserState,
    /// `WHISPER`: private message.
    Whisper,
    /// Any other verb, including numerics, `CAP` and `JOIN`.
    Unknown(String),
}

impl CommandKind {
    /// Wire name of the command.
    pub fn as_str(&self) -> &str {
        match self {
            Self::ClearChat => "CLEARCHAT",
            Self::ClearMsg => "CLEARMSG",
            Self::GlobalUserState => "GLOBALUSERSTATE",
            Self::HostTarget => "HOSTTARGET",
            Self::Notice => "NOTICE",
            Self::Part => "PART",
            Self::Ping => "PING",
            Self::Pong => "PONG",
            Self::Privmsg => "PRIVMSG",
            Self::Reconnect => "RECONNECT",
            Self::RoomState => "ROOMSTATE",
            Self::UserNotice => "USERNOTICE",
            Self::UserState => "USERSTATE",
            Self::Whisper => "WHISPER",
            Self::Unknown(raw) => raw,
        }
    }

    /// Whether this is a verb with a tag schema.
    pub fn is_known(&self) -> bool {
        !matches!(self, Self::Unknown(_))
    }
}

impl FromStr for CommandKind {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "CLEARCHAT" => Self::ClearChat,
            "CLEARMSG" => Self::ClearMsg,
            "GLOBALUSERSTATE" => Self::GlobalUserState,
            "HOSTTARGET" => Self::HostTarget,
            "NOTICE" => Self::Notice,
            "PART" => Self::Part,
            "PING" => Self::Ping,
            "PONG" => Self::Pong,
            "PRIVMSG" => Self::Privmsg,
            "RECONNECT" => Self::Reconnect,
            "ROOMSTATE" => Self::RoomState,
            "USERNOTICE" => Self::UserNotice,
            "USERSTATE" => Self::UserState,
            "WHISPER" => Self::Whisper,
            other => Self::Unknown(other.to_string()),
        })
    }
}

impl From<&str> for CommandKind {
    fn from(s: &str) -> Self {
        match s.parse() {
            Ok(kind) => kind,
            Err(never) => match never {},
        }
    }
}

impl Serialize for CommandKind {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl fmt::Display for CommandKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
