//! Badge and emote asset tables.
//!
//! Chat events reference badges by set id plus an optional version or count,
//! and third-party emotes by name. The [`AssetTable`] maps those references
//! to image URLs. A table belongs to one connection; replacing or merging
//! entries affects only messages normalized afterwards.

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

/// How incoming entries combine with stored ones on merge.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum MergePolicy {
    /// Stored entries win; incoming ones only fill missing keys.
    #[default]
    PreferExisting,
    /// Incoming entries replace stored ones with the same key.
    PreferIncoming,
}

/// Image source for one badge set.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged, from = "RawBadgeAsset")]
pub enum BadgeAsset {
    /// One image regardless of version or count.
    Url(String),
    /// Images keyed by minimum count; the greatest threshold not exceeding
    /// the badge's count wins.
    Tiers(BTreeMap<u64, String>),
    /// Images keyed by exact version, with `*` as the fallback version.
    Versions(BTreeMap<String, String>),
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawBadgeAsset {
    Url(String),
    Map(BTreeMap<String, String>),
}

impl From<RawBadgeAsset> for BadgeAsset {
    fn from(raw: RawBadgeAsset) -> Self {
        match raw {
            RawBadgeAsset::Url(url) => Self::Url(url),
            RawBadgeAsset::Map(map) => {
                let tiers: Option<BTreeMap<u64, String>> = map
                    .iter()
                    .map(|(k, v)| k.parse::<u64>().ok().map(|k| (k, v.clone())))
                    .collect();
                match tiers {
                    Some(tiers) if !tiers.is_empty() => Self::Tiers(tiers),
                    _ => Self::Versions(map),
                }
            }
        }
    }
}

impl BadgeAsset {
    /// Build a tiered entry from `(threshold, url)` pairs.
    pub fn tiers<I, S>(tiers: I) -> Self
    where
        I: IntoIterator<Item = (u64, S)>,
        S: Into<String>,
    {
        Self::Tiers(tiers.into_iter().map(|(k, v)| (k, v.into())).collect())
    }

    /// Pick the image for a badge reference.
    ///
    /// `count` takes precedence over a numeric `version` for tiered entries.
    pub fn resolve(&self, version: Option<&str>, count: Option<u64>) -> Option<&str> {
        match self {
            Self::Url(url) => Some(url.as_str()),
            Self::Tiers(tiers) => {
                let count = count.or_else(|| version.and_then(|v| v.parse().ok()))?;
                tiers.range(..=count).next_back().map(|(_, url)| url.as_str())
            }
            Self::Versions(versions) => version
                .and_then(|v| versions.get(v))
                .or_else(|| versions.get("*"))
                .map(String::as_str),
        }
    }
}

/// Badge and external-emote lookup tables for one connection.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetTable {
    /// Badge images by set id.
    #[serde(default)]
    pub badges: HashMap<String, BadgeAsset>,
    /// Third-party emote images by emote name.
    #[serde(default)]
    pub external_emotes: HashMap<String, String>,
}

impl AssetTable {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// The built-in Kick badge images.
    pub fn kick_defaults() -> Self {
        let mut badges = HashMap::new();
        for name in [
            "founder",
            "moderator",
            "og",
            "verified",
            "vip",
            "broadcaster",
            "staff",
        ] {
            badges.insert(
                name.to_string(),
                BadgeAsset::Url(format!("/svgs/badges/default-kick/{name}.svg")),
            );
        }
        badges.insert(
            "sub_gifter".to_string(),
            BadgeAsset::tiers([
                (1, "/svgs/badges/default-kick/sub-gifter-blue.svg"),
                (25, "/svgs/badges/default-kick/sub-gifter-purple.svg"),
                (50, "/svgs/badges/default-kick/sub-gifter-red.svg"),
                (100, "/svgs/badges/default-kick/sub-gifter-yellow.svg"),
                (200, "/svgs/badges/default-kick/sub-gifter-green.svg"),
            ]),
        );
        Self {
            badges,
            external_emotes: HashMap::new(),
        }
    }

    /// Merge badge entries according to `policy`.
    pub fn merge_badges(&mut self, incoming: HashMap<String, BadgeAsset>, policy: MergePolicy) {
        merge(&mut self.badges, incoming, policy);
    }

    /// Merge external-emote entries according to `policy`.
    pub fn merge_external_emotes(&mut self, incoming: HashMap<String, String>, policy: MergePolicy) {
        merge(&mut self.external_emotes, incoming, policy);
    }

    /// Set one tier of a tiered badge, converting the entry to tiers if needed.
    pub fn insert_tier(&mut self, set_id: &str, threshold: u64, url: impl Into<String>) {
        let entry = self
            .badges
            .entry(set_id.to_string())
            .or_insert_with(|| BadgeAsset::Tiers(BTreeMap::new()));
        if !matches!(entry, BadgeAsset::Tiers(_)) {
            *entry = BadgeAsset::Tiers(BTreeMap::new());
        }
        if let BadgeAsset::Tiers(tiers) = entry {
            tiers.insert(threshold, url.into());
        }
    }

    /// Resolve a badge reference to an image URL.
    pub fn resolve_badge(&self, set_id: &str, version: Option<&str>, count: Option<u64>) -> Option<&str> {
        self.badges.get(set_id)?.resolve(version, count)
    }
}

fn merge<V>(stored: &mut HashMap<String, V>, incoming: HashMap<String, V>, policy: MergePolicy) {
    for (key, value) in incoming {
        match policy {
            MergePolicy::PreferExisting => {
                stored.entry(key).or_insert(value);
            }
            MergePolicy::PreferIncoming => {
                stored.insert(key, value);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn colors() -> BadgeAsset {
        BadgeAsset::tiers([(1, "blue"), (25, "purple"), (50, "red")])
    }

    #[test]
    fn test_tier_greatest_threshold_wins() {
        assert_eq!(colors().resolve(None, Some(30)), Some("purple"));
        assert_eq!(colors().resolve(None, Some(25)), Some("purple"));
        assert_eq!(colors().resolve(None, Some(1)), Some("blue"));
        assert_eq!(colors().resolve(None, Some(5000)), Some("red"));
    }

    #[test]
    fn test_tier_below_minimum_is_none() {
        assert_eq!(colors().resolve(None, Some(0)), None);
        assert_eq!(colors().resolve(None, None), None);
    }

    #[test]
    fn test_tier_uses_numeric_version() {
        assert_eq!(colors().resolve(Some("26"), None), Some("purple"));
        assert_eq!(colors().resolve(Some("abc"), None), None);
    }

    #[test]
    fn test_versions_exact_then_wildcard() {
        let mut map = BTreeMap::new();
        map.insert("1".to_string(), "one".to_string());
        map.insert("gold".to_string(), "gold".to_string());
        map.insert("*".to_string(), "any".to_string());
        let badge = BadgeAsset::Versions(map);
        assert_eq!(badge.resolve(Some("gold"), None), Some("gold"));
        assert_eq!(badge.resolve(Some("silver"), None), Some("any"));
        assert_eq!(badge.resolve(None, None), Some("any"));
    }

    #[test]
    fn test_flat_url_ignores_version() {
        let badge = BadgeAsset::Url("u".into());
        assert_eq!(badge.resolve(Some("9"), Some(3)), Some("u"));
    }

    #[test]
    fn test_deserialize_badge_shapes() {
        let json = r#"{
            "moderator": "https://cdn/mod.png",
            "subscriber": {"0": "s0", "12": "s12"},
            "predictions": {"blue-1": "b1", "*": "p"}
        }"#;
        let badges: HashMap<String, BadgeAsset> = serde_json::from_str(json).unwrap();
        assert_eq!(badges["moderator"], BadgeAsset::Url("https://cdn/mod.png".into()));
        assert!(matches!(badges["subscriber"], BadgeAsset::Tiers(_)));
        assert!(matches!(badges["predictions"], BadgeAsset::Versions(_)));
        assert_eq!(badges["subscriber"].resolve(Some("14"), None), Some("s12"));
    }

    #[test]
    fn test_merge_prefer_existing() {
        let mut table = AssetTable::new();
        table.merge_external_emotes(
            HashMap::from([("a".to_string(), "old".to_string())]),
            MergePolicy::PreferExisting,
        );
        table.merge_external_emotes(
            HashMap::from([
                ("a".to_string(), "new".to_string()),
                ("b".to_string(), "b".to_string()),
            ]),
            MergePolicy::PreferExisting,
        );
        assert_eq!(table.external_emotes["a"], "old");
        assert_eq!(table.external_emotes["b"], "b");
    }

    #[test]
    fn test_merge_prefer_incoming() {
        let mut table = AssetTable::kick_defaults();
        table.merge_badges(
            HashMap::from([("vip".to_string(), BadgeAsset::Url("custom".into()))]),
            MergePolicy::PreferIncoming,
        );
        assert_eq!(table.resolve_badge("vip", None, None), Some("custom"));
    }

    #[test]
    fn test_insert_tier() {
        let mut table = AssetTable::new();
        table.insert_tier("subscriber", 1, "one");
        table.insert_tier("subscriber", 6, "six");
        table.insert_tier("subscriber", 1, "one-new");
        assert_eq!(table.resolve_badge("subscriber", None, Some(3)), Some("one-new"));
        assert_eq!(table.resolve_badge("subscriber", None, Some(6)), Some("six"));
    }

    #[test]
    fn test_kick_defaults() {
        let table = AssetTable::kick_defaults();
        assert_eq!(
            table.resolve_badge("sub_gifter", None, Some(30)),
            Some("/svgs/badges/default-kick/sub-gifter-purple.svg")
        );
        assert_eq!(
            table.resolve_badge("og", None, None),
            Some("/svgs/badges/default-kick/og.svg")
        );
        assert_eq!(table.resolve_badge("unknown", None, None), None);
    }
}
