//! Emote annotation collectors.
//!
//! Each platform marks emotes differently: Twitch sends explicit char ranges
//! in the `emotes` tag, Kick embeds `[emote:<id>:<name>]` markers in the
//! text. Third-party emotes are matched by name against a lookup table.

use std::collections::HashMap;
use std::sync::OnceLock;

use regex::Regex;
use tracing::debug;

use super::{CharIndex, EmoteAnnotation};

/// Image URL of a Twitch emote.
pub fn twitch_emote_url(emote_id: &str) -> String {
    format!("https://static-cdn.jtvnw.net/emoticons/v2/{emote_id}/default/dark/1.0")
}

/// Image URL of a Kick emote.
pub fn kick_emote_url(emote_id: &str) -> String {
    format!("https://files.kick.com/emotes/{emote_id}/fullsize")
}

fn kick_emote_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"\[emote:(\d+):([a-zA-Z0-9]*)\]").expect("kick emote pattern is valid")
    })
}

/// Decode a Twitch `emotes` tag value.
///
/// Format: `<id>:<a>-<b>,<c>-<d>/<id2>:<e>-<f>`, with inclusive end
/// positions. Malformed entries are skipped.
pub fn twitch_emotes(tag: &str) -> Vec<EmoteAnnotation> {
    let mut annotations = Vec::new();

    for raw_emote in tag.split('/') {
        let Some((emote_id, positions)) = raw_emote.split_once(':') else {
            continue;
        };
        if emote_id.is_empty() || positions.is_empty() {
            continue;
        }

        for position in positions.split(',') {
            let range = position.split_once('-').and_then(|(a, b)| {
                let start = a.parse::<usize>().ok()?;
                let end = b.parse::<usize>().ok()?.checked_add(1)?;
                Some((start, end))
            });
            match range {
                Some((start, end)) => {
                    annotations.push(EmoteAnnotation::new(start, end, twitch_emote_url(emote_id)))
                }
                None => debug!(emote_id, position, "malformed emote position"),
            }
        }
    }

    annotations
}

/// Find Kick `[emote:<id>:<name>]` markers in `text`.
pub fn kick_emotes(text: &str) -> Vec<EmoteAnnotation> {
    let index = CharIndex::new(text);
    kick_emote_pattern()
        .captures_iter(text)
        .filter_map(|caps| {
            let marker = caps.get(0)?;
            let emote_id = caps.get(1)?.as_str();
            Some(EmoteAnnotation::new(
                index.char_offset(marker.start()),
                index.char_offset(marker.end()),
                kick_emote_url(emote_id),
            ))
        })
        .collect()
}

/// Find whole space-delimited words of `text` that name an external emote.
pub fn external_emotes(text: &str, emotes: &HashMap<String, String>) -> Vec<EmoteAnnotation> {
    if emotes.is_empty() {
        return Vec::new();
    }

    let mut annotations = Vec::new();
    let mut offset = 0;
    for word in text.split(' ') {
        let width = word.chars().count();
        if let Some(url) = emotes.get(word) {
            annotations.push(EmoteAnnotation::new(offset, offset + width, url.clone()));
        }
        offset += width + 1;
    }
    annotations
}

/// Combine platform annotations with external ones.
///
/// Platform annotations win: an external annotation overlapping any of them
/// is dropped.
pub fn merge_annotations(
    mut platform: Vec<EmoteAnnotation>,
    external: Vec<EmoteAnnotation>,
) -> Vec<EmoteAnnotation> {
    let extra: Vec<_> = external
        .into_iter()
        .filter(|ext| !platform.iter().any(|p| p.overlaps(ext)))
        .collect();
    platform.extend(extra);
    platform
}
