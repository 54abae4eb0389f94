// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: (C) 2025 Cranky Kernel <crankykernel@proton.me>

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub const DEFAULT_VOICE: &str = "default";
pub const UNKNOWN_QUALITY: &str = "unknown";

/// External id types a source URL can be built from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IdentifierKind {
    Kinopoisk,
    Imdb,
    Shikimori,
}

impl IdentifierKind {
    pub fn placeholder(&self) -> &'static str {
        match self {
            IdentifierKind::Kinopoisk => "{kp_id}",
            IdentifierKind::Imdb => "{imdb_id}",
            IdentifierKind::Shikimori => "{shikimori_id}",
        }
    }
}

impl std::fmt::Display for IdentifierKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IdentifierKind::Kinopoisk => write!(f, "kinopoisk"),
            IdentifierKind::Imdb => write!(f, "imdb"),
            IdentifierKind::Shikimori => write!(f, "shikimori"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceConfig {
    pub id: String,
    pub name: String,
    pub url: String,
    #[serde(default)]
    pub qualities: Vec<String>,
    #[serde(default)]
    pub requires_shikimori: bool,
    /// Display labels for raw voice keys returned by the source.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub voices: BTreeMap<String, String>,
}

impl SourceConfig {
    pub fn accepts(&self, kind: IdentifierKind) -> bool {
        self.url.contains(kind.placeholder())
    }

    /// Picks the id this source is queried with: the dedicated Shikimori id
    /// first when required, then Kinopoisk, then IMDb. Only kinds whose
    /// placeholder appears in the template are considered.
    pub fn select_identifier(&self, ids: &Identifiers) -> Option<(IdentifierKind, String)> {
        let mut order = Vec::with_capacity(3);
        if self.requires_shikimori {
            order.push(IdentifierKind::Shikimori);
        }
        order.push(IdentifierKind::Kinopoisk);
        order.push(IdentifierKind::Imdb);

        order
            .into_iter()
            .filter(|kind| self.accepts(*kind))
            .find_map(|kind| ids.get(kind).map(|value| (kind, value.to_string())))
    }

    pub fn build_url(&self, kind: IdentifierKind, value: &str) -> String {
        self.url
            .replace(kind.placeholder(), &urlencoding::encode(value))
    }

    pub fn default_quality(&self) -> &str {
        self.qualities
            .first()
            .map(String::as_str)
            .unwrap_or(UNKNOWN_QUALITY)
    }

    pub fn voice_label<'a>(&'a self, voice: &'a str) -> &'a str {
        self.voices.get(voice).map(String::as_str).unwrap_or(voice)
    }
}

pub fn cache_key(source_id: &str, identifier: &str) -> String {
    format!("source_{}_{}", source_id, identifier)
}

/// Movie metadata handed over by the host when the detail view is ready.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MovieIdentity {
    #[serde(default)]
    pub kinopoisk_id: Option<String>,
    #[serde(default)]
    pub imdb_id: Option<String>,
    pub title: String,
    #[serde(default)]
    pub original_title: Option<String>,
    #[serde(default)]
    pub resolved_shikimori_id: Option<String>,
}

impl MovieIdentity {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Default::default()
        }
    }

    /// Title used for the Shikimori search; falls back to the display title.
    pub fn search_title(&self) -> Option<&str> {
        self.original_title
            .as_deref()
            .filter(|t| !t.trim().is_empty())
            .or_else(|| Some(self.title.as_str()).filter(|t| !t.trim().is_empty()))
    }

    pub fn identifiers(&self) -> Identifiers {
        Identifiers {
            kinopoisk: self.kinopoisk_id.clone(),
            imdb: self.imdb_id.clone(),
            shikimori: self.resolved_shikimori_id.clone(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Identifiers {
    pub kinopoisk: Option<String>,
    pub imdb: Option<String>,
    pub shikimori: Option<String>,
}

impl Identifiers {
    pub fn get(&self, kind: IdentifierKind) -> Option<&str> {
        let value = match kind {
            IdentifierKind::Kinopoisk => self.kinopoisk.as_deref(),
            IdentifierKind::Imdb => self.imdb.as_deref(),
            IdentifierKind::Shikimori => self.shikimori.as_deref(),
        };
        value.filter(|v| !v.trim().is_empty())
    }

    pub fn is_empty(&self) -> bool {
        [
            IdentifierKind::Kinopoisk,
            IdentifierKind::Imdb,
            IdentifierKind::Shikimori,
        ]
        .iter()
        .all(|kind| self.get(*kind).is_none())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreamOption {
    pub url: String,
    pub quality: String,
    #[serde(default = "default_voice")]
    pub voice: String,
}

fn default_voice() -> String {
    DEFAULT_VOICE.to_string()
}

impl StreamOption {
    pub fn new(url: impl Into<String>, quality: Option<String>, voice: Option<String>) -> Self {
        Self {
            url: url.into(),
            quality: quality
                .filter(|q| !q.is_empty())
                .unwrap_or_else(|| UNKNOWN_QUALITY.to_string()),
            voice: voice.filter(|v| !v.is_empty()).unwrap_or_else(default_voice),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceResult {
    pub source_name: String,
    pub source_id: String,
    pub options: Vec<StreamOption>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn source(url: &str, requires_shikimori: bool) -> SourceConfig {
        SourceConfig {
            id: "test".to_string(),
            name: "Test".to_string(),
            url: url.to_string(),
            qualities: vec!["1080p".to_string()],
            requires_shikimori,
            voices: BTreeMap::new(),
        }
    }

    #[test]
    fn kinopoisk_wins_over_imdb() {
        let src = source("https://a/{kp_id}/{imdb_id}", false);
        let ids = Identifiers {
            kinopoisk: Some("301".into()),
            imdb: Some("tt0133093".into()),
            shikimori: None,
        };
        assert_eq!(
            src.select_identifier(&ids),
            Some((IdentifierKind::Kinopoisk, "301".to_string()))
        );
    }

    #[test]
    fn shikimori_first_when_required() {
        let src = source("https://a?code={shikimori_id}&kp={kp_id}", true);
        let ids = Identifiers {
            kinopoisk: Some("301".into()),
            imdb: None,
            shikimori: Some("5114".into()),
        };
        let (kind, value) = src.select_identifier(&ids).unwrap();
        assert_eq!(kind, IdentifierKind::Shikimori);
        assert_eq!(src.build_url(kind, &value), "https://a?code=5114&kp={kp_id}");
    }

    #[test]
    fn source_without_matching_placeholder_is_skipped() {
        let src = source("https://a/{imdb_id}", false);
        let ids = Identifiers {
            kinopoisk: Some("301".into()),
            ..Default::default()
        };
        assert_eq!(src.select_identifier(&ids), None);
    }

    #[test]
    fn blank_identifiers_count_as_missing() {
        let ids = Identifiers {
            kinopoisk: Some("  ".into()),
            imdb: Some(String::new()),
            shikimori: None,
        };
        assert!(ids.is_empty());
    }

    #[test]
    fn build_url_encodes_value() {
        let src = source("https://a/{imdb_id}", false);
        assert_eq!(src.build_url(IdentifierKind::Imdb, "a b"), "https://a/a%20b");
    }

    #[test]
    fn stream_option_defaults() {
        let opt = StreamOption::new("http://x", None, Some(String::new()));
        assert_eq!(opt.quality, UNKNOWN_QUALITY);
        assert_eq!(opt.voice, DEFAULT_VOICE);
    }

    #[test]
    fn search_title_prefers_original() {
        let mut movie = MovieIdentity::new("Унесённые призраками");
        movie.original_title = Some("Sen to Chihiro no kamikakushi".into());
        assert_eq!(movie.search_title(), Some("Sen to Chihiro no kamikakushi"));
        movie.original_title = Some(" ".into());
        assert_eq!(movie.search_title(), Some("Унесённые призраками"));
    }
}
