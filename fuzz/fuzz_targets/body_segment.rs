//! Fuzz target for body segmentation.
//!
//! Input is split at the first NUL: text, then a Twitch `emotes` tag value.
//! The output must tile the text.

#![no_main]

use libfuzzer_sys::fuzz_target;
use std::str;
use unichat::body::{kick_emotes, linkify, merge_annotations, segment, twitch_emotes};

fuzz_target!(|data: &[u8]| {
    let Ok(input) = str::from_utf8(data) else {
        return;
    };
    let (text, tag) = input.split_once('\0').unwrap_or((input, ""));

    let annotations = merge_annotations(twitch_emotes(tag), kick_emotes(text));
    let body = linkify(segment(text, &annotations));

    let mut cursor = 0;
    for span in &body {
        assert_eq!(span.start(), cursor);
        cursor = span.end();
    }
    assert_eq!(cursor, text.chars().count());
});
