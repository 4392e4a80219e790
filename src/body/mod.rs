//! Message body segmentation.
//!
//! A chat message body is delivered as flat text plus emote positions. The
//! segmenter turns that into an ordered list of [`BodySpan`]s that tile the
//! text exactly: no gaps, no overlaps, no reordering.
//!
//! All offsets are Unicode scalar (char) offsets into the text.

pub mod annotations;
mod links;
mod segment;

use serde::Serialize;

pub use self::annotations::{external_emotes, kick_emotes, merge_annotations, twitch_emotes};
pub use self::links::linkify;
pub use self::segment::segment;

/// An emote occurrence found in the text, before segmentation.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct EmoteAnnotation {
    /// First char covered.
    pub start: usize,
    /// One past the last char covered.
    pub end: usize,
    /// Image URL of the emote.
    pub url: String,
}

impl EmoteAnnotation {
    /// Create an annotation covering `start..end`.
    pub fn new(start: usize, end: usize, url: impl Into<String>) -> Self {
        Self {
            start,
            end,
            url: url.into(),
        }
    }

    /// Whether the two annotations share at least one char.
    pub fn overlaps(&self, other: &EmoteAnnotation) -> bool {
        self.start < other.end && other.start < self.end
    }
}

/// One contiguous typed region of a message body.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum BodySpan {
    /// Plain text.
    Text {
        /// The covered text.
        text: String,
        /// First char covered.
        start_inclusive: usize,
        /// One past the last char covered.
        end_exclusive: usize,
    },
    /// An emote image.
    Emote {
        /// Image URL.
        url: String,
        /// First char covered.
        start_inclusive: usize,
        /// One past the last char covered.
        end_exclusive: usize,
    },
    /// A hyperlink.
    Link {
        /// Link target.
        url: String,
        /// Text shown for the link.
        label: String,
        /// First char covered.
        start_inclusive: usize,
        /// One past the last char covered.
        end_exclusive: usize,
    },
}

impl BodySpan {
    pub(crate) fn text(text: impl Into<String>, start: usize, end: usize) -> Self {
        Self::Text {
            text: text.into(),
            start_inclusive: start,
            end_exclusive: end,
        }
    }

    pub fn start(&self) -> usize {
        match self {
            Self::Text { start_inclusive, .. }
            | Self::Emote { start_inclusive, .. }
            | Self::Link { start_inclusive, .. } => *start_inclusive,
        }
    }

    pub fn end(&self) -> usize {
        match self {
            Self::Text { end_exclusive, .. }
            | Self::Emote { end_exclusive, .. }
            | Self::Link { end_exclusive, .. } => *end_exclusive,
        }
    }

    /// Width in chars.
    pub fn len(&self) -> usize {
        self.end().saturating_sub(self.start())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn is_text(&self) -> bool {
        matches!(self, Self::Text { .. })
    }
}

/// Char-offset view of a string for slicing by char ranges.
pub(crate) struct CharIndex<'a> {
    text: &'a str,
    /// Byte offset of every char, plus `text.len()` as the final entry.
    bounds: Vec<usize>,
}

impl<'a> CharIndex<'a> {
    pub(crate) fn new(text: &'a str) -> Self {
        let bounds = text
            .char_indices()
            .map(|(i, _)| i)
            .chain(std::iter::once(text.len()))
            .collect();
        Self { text, bounds }
    }

    /// Number of chars.
    pub(crate) fn len(&self) -> usize {
        self.bounds.len() - 1
    }

    /// Text between two char offsets, clamped to the string.
    pub(crate) fn slice(&self, start: usize, end: usize) -> &'a str {
        let end = end.min(self.len());
        let start = start.min(end);
        &self.text[self.bounds[start]..self.bounds[end]]
    }

    /// Char offset of a byte offset that lies on a char boundary.
    pub(crate) fn char_offset(&self, byte: usize) -> usize {
        match self.bounds.binary_search(&byte) {
            Ok(i) | Err(i) => i,
        }
    }
}
