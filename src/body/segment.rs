use tracing::debug;

use super::{BodySpan, CharIndex, EmoteAnnotation};

/// Segment `text` into spans given unordered emote annotations.
///
/// Two phases: emote spans are collected in positional order, then the gaps
/// between them are filled with text spans and the whole list is re-sorted.
/// The result tiles `0..len` in chars. With no annotations this is a single
/// text span, even for empty text.
///
/// Annotations are clamped to the text. An annotation that is empty after
/// clamping, or that starts inside an earlier one, is skipped so the tiling
/// never overlaps.
pub fn segment(text: &str, annotations: &[EmoteAnnotation]) -> Vec<BodySpan> {
    let index = CharIndex::new(text);
    let len = index.len();

    let mut sorted: Vec<&EmoteAnnotation> = annotations.iter().collect();
    sorted.sort_by_key(|a| a.start);

    let mut body: Vec<BodySpan> = Vec::with_capacity(sorted.len() * 2 + 1);
    let mut covered_to = 0;
    for annotation in sorted {
        let end = annotation.end.min(len);
        if annotation.start >= end {
            debug!(start = annotation.start, end = annotation.end, len, "empty emote range skipped");
            continue;
        }
        if annotation.start < covered_to {
            debug!(start = annotation.start, covered_to, "overlapping emote skipped");
            continue;
        }
        body.push(BodySpan::Emote {
            url: annotation.url.clone(),
            start_inclusive: annotation.start,
            end_exclusive: end,
        });
        covered_to = end;
    }

    if body.is_empty() {
        return vec![BodySpan::text(text, 0, len)];
    }

    let mut gaps = Vec::with_capacity(body.len() + 1);
    let mut previous_end = 0;
    for span in &body {
        let start = span.start();
        if start.saturating_sub(previous_end) > 0 {
            gaps.push(BodySpan::text(index.slice(previous_end, start), previous_end, start));
        }
        previous_end = span.end();
    }
    if previous_end < len {
        gaps.push(BodySpan::text(index.slice(previous_end, len), previous_end, len));
    }

    body.extend(gaps);
    body.sort_by_key(BodySpan::start);
    body
}
