//! Fuzz target for line parsing, tag decoding and normalization.
//!
//! None of these may panic on any input.

#![no_main]

use libfuzzer_sys::fuzz_target;
use std::str;
use unichat::normalize::{normalize_twitch, NormalizeOptions};
use unichat::{AssetTable, IrcMessage};

fuzz_target!(|data: &[u8]| {
    if let Ok(input) = str::from_utf8(data) {
        if input.len() > 8192 {
            return;
        }

        for line in unichat::message::split_frame(input) {
            let msg = IrcMessage::parse(line);
            let _ = normalize_twitch(&msg, &AssetTable::new(), NormalizeOptions { detect_links: true });
        }
    }
});
