//! Message Normalizer.
//!
//! Maps one decoded platform event plus the connection's [`AssetTable`] to
//! at most one [`ChatEvent`](crate::event::ChatEvent).

pub mod kick;
pub mod twitch;

use crate::assets::AssetTable;
use crate::body::{self, BodySpan, EmoteAnnotation};

pub use self::kick::normalize_kick;
pub use self::twitch::normalize_twitch;

/// Settings shared by both normalizers.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct NormalizeOptions {
    /// Split URLs out of text spans.
    pub detect_links: bool,
}

/// Segment `text` with platform annotations plus external emotes from `assets`.
pub(crate) fn build_body(
    text: &str,
    platform: Vec<EmoteAnnotation>,
    assets: &AssetTable,
    options: NormalizeOptions,
) -> Vec<BodySpan> {
    let external = body::external_emotes(text, &assets.external_emotes);
    let annotations = body::merge_annotations(platform, external);
    let spans = body::segment(text, &annotations);
    if options.detect_links {
        body::linkify(spans)
    } else {
        spans
    }
}
