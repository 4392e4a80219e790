//! Line source (`nick!user@host`) parsing.

use serde::Serialize;

/// Origin of a protocol line.
///
/// Parsed leniently: the components are not validated, and the optional
/// parts are absent when their separator is.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct RawSource {
    /// Host part, or the whole source when no separators are present.
    pub host: String,
    /// Nickname, present when the source contains `!`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nick: Option<String>,
    /// Username, present when the source contains `@`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<String>,
}

impl RawSource {
    /// Parse a source string (without the leading `:`).
    pub fn parse(s: &str) -> Self {
        let (nick, rest) = match s.split_once('!') {
            Some((nick, rest)) => (Some(nick), rest),
            None => (None, s),
        };
        let (user, host) = match rest.split_once('@') {
            Some((user, host)) => (Some(user), host),
            None => (None, rest),
        };

        Self {
            host: host.to_string(),
            nick: nick.map(str::to_string),
            user: user.map(str::to_string),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_mask() {
        let source = RawSource::parse("nick!user@host");
        assert_eq!(source.nick.as_deref(), Some("nick"));
        assert_eq!(source.user.as_deref(), Some("user"));
        assert_eq!(source.host, "host");
    }

    #[test]
    fn test_bare_host() {
        let source = RawSource::parse("tmi.twitch.tv");
        assert_eq!(source.host, "tmi.twitch.tv");
        assert!(source.nick.is_none());
        assert!(source.user.is_none());
    }

    #[test]
    fn test_user_at_host() {
        let source = RawSource::parse("user@host");
        assert!(source.nick.is_none());
        assert_eq!(source.user.as_deref(), Some("user"));
        assert_eq!(source.host, "host");
    }

    #[test]
    fn test_nick_without_host() {
        let source = RawSource::parse("nick!user");
        assert_eq!(source.nick.as_deref(), Some("nick"));
        assert!(source.user.is_none());
        assert_eq!(source.host, "user");
    }
}
