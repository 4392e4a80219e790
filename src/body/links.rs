use std::sync::OnceLock;

use regex::Regex;

use super::{BodySpan, CharIndex};

fn url_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"https?://[^\s]+").expect("url pattern is valid"))
}

/// Split `http(s)://` URLs out of text spans into link spans.
///
/// Emote spans pass through untouched and the tiling is preserved.
pub fn linkify(body: Vec<BodySpan>) -> Vec<BodySpan> {
    let mut out = Vec::with_capacity(body.len());

    for span in body {
        let (text, start_inclusive, end_exclusive) = match span {
            BodySpan::Text {
                text,
                start_inclusive,
                end_exclusive,
            } => (text, start_inclusive, end_exclusive),
            other => {
                out.push(other);
                continue;
            }
        };

        let index = CharIndex::new(&text);
        let mut cursor = 0;
        for found in url_pattern().find_iter(&text) {
            let start = index.char_offset(found.start());
            let end = index.char_offset(found.end());
            if start > cursor {
                out.push(BodySpan::text(
                    index.slice(cursor, start),
                    start_inclusive + cursor,
                    start_inclusive + start,
                ));
            }
            out.push(BodySpan::Link {
                url: found.as_str().to_string(),
                label: found.as_str().to_string(),
                start_inclusive: start_inclusive + start,
                end_exclusive: start_inclusive + end,
            });
            cursor = end;
        }

        if cursor == 0 {
            out.push(BodySpan::Text {
                text,
                start_inclusive,
                end_exclusive,
            });
        } else if cursor < index.len() {
            out.push(BodySpan::text(
                index.slice(cursor, index.len()),
                start_inclusive + cursor,
                end_exclusive,
            ));
        }
    }

    out
}
