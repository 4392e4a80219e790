//! Protocol line parsing and tag decoding.
//!
//! A frame from the IRC-derived transport holds one or more `\r\n`-joined
//! lines. Each line becomes a [`RawLine`], whose tag block is then decoded
//! against the command's schema into an [`IrcMessage`].

mod nom_parser;
mod source;
pub mod tags;

use serde::Serialize;

pub use self::nom_parser::ParsedLine;
pub use self::source::RawSource;
pub use self::tags::{decode_tags, DecodedTags, TagAnomaly, TagMap};

use crate::command::CommandKind;
use crate::error::MessageParseError;

/// One protocol line split into its components.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct RawLine {
    /// Raw tag block without the `@` marker.
    pub tag_block: Option<String>,
    /// Parsed source, if the line had one.
    pub source: Option<RawSource>,
    /// Command verb.
    pub command: CommandKind,
    /// Channel name without `#`; empty when the line targets no channel.
    pub channel: String,
    /// Parameters after the channel, trailing parameter last.
    pub params: Vec<String>,
}

impl RawLine {
    /// Parse a line. Never fails; see [`RawLine::try_parse`] for a strict variant.
    pub fn parse(line: &str) -> Self {
        ParsedLine::parse(line).into()
    }

    /// Parse a line, rejecting empty input and lines with no command token.
    pub fn try_parse(line: &str) -> Result<Self, MessageParseError> {
        let trimmed = line.trim_end_matches(['\r', '\n']);
        if trimmed.is_empty() {
            return Err(MessageParseError::EmptyMessage);
        }
        let parsed = ParsedLine::parse(trimmed);
        if parsed.command.is_empty() {
            return Err(MessageParseError::MissingCommand);
        }
        Ok(parsed.into())
    }

    /// Parameter at `index`, or `""` when the line is shorter.
    pub fn param(&self, index: usize) -> &str {
        self.params.get(index).map(String::as_str).unwrap_or("")
    }
}

impl From<ParsedLine<'_>> for RawLine {
    fn from(parsed: ParsedLine<'_>) -> Self {
        Self {
            tag_block: parsed.tags.map(str::to_string),
            source: parsed.source.map(RawSource::parse),
            command: CommandKind::from(parsed.command),
            channel: parsed.channel.unwrap_or("").to_string(),
            params: parsed.params.into_iter().map(str::to_string).collect(),
        }
    }
}

/// A line with its tag block decoded.
///
/// This is what the raw-message subscriber of the IRC-derived path receives.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct IrcMessage {
    /// The parsed line.
    #[serde(flatten)]
    pub line: RawLine,
    /// Decoded tags; `None` when the line had no tag block.
    pub tags: Option<TagMap>,
    /// Unrecognized tag keys.
    #[serde(skip)]
    pub anomalies: Vec<TagAnomaly>,
}

impl IrcMessage {
    /// Parse and decode one line.
    pub fn parse(line: &str) -> Self {
        Self::from_line(RawLine::parse(line))
    }

    /// Decode the tag block of an already parsed line.
    pub fn from_line(line: RawLine) -> Self {
        let (tags, anomalies) = match &line.tag_block {
            Some(block) => {
                let decoded = decode_tags(block, &line.command);
                (Some(decoded.tags), decoded.anomalies)
            }
            None => (None, Vec::new()),
        };
        Self {
            line,
            tags,
            anomalies,
        }
    }

    /// Command verb of the line.
    pub fn command(&self) -> &CommandKind {
        &self.line.command
    }
}

/// Split a frame into lines in arrival order, dropping blank lines.
pub fn split_frame(frame: &str) -> impl Iterator<Item = &str> {
    frame
        .trim()
        .split("\r\n")
        .map(|line| line.trim_end_matches(['\r', '\n']))
        .filter(|line| !line.is_empty())
}
