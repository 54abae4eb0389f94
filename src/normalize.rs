// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: (C) 2025 Cranky Kernel <crankykernel@proton.me>

//! Per-source response schemas and their mapping onto [`StreamOption`].
//!
//! Every upstream API returns its own JSON shape. Each one gets a typed
//! schema where missing fields deserialize to empty values, and a
//! [`Normalizer`] that turns it into the common option list.

use crate::source::{DEFAULT_VOICE, SourceConfig, StreamOption};
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;

pub trait Normalizer: Send + Sync {
    fn source_id(&self) -> &'static str;

    fn normalize(
        &self,
        body: Value,
        source: &SourceConfig,
    ) -> Result<Vec<StreamOption>, serde_json::Error>;
}

fn deserialize_optional_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value: Value = Deserialize::deserialize(deserializer)?;

    match value {
        Value::String(s) if !s.is_empty() => Ok(Some(s)),
        Value::Number(n) => Ok(Some(n.to_string())),
        _ => Ok(None),
    }
}

fn deserialize_null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Debug, Default, Deserialize)]
struct AniLibriaResponse {
    #[serde(default)]
    player: Option<AniLibriaPlayer>,
}

#[derive(Debug, Default, Deserialize)]
struct AniLibriaPlayer {
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    host: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    url: Option<String>,
}

pub struct AniLibriaNormalizer;

impl Normalizer for AniLibriaNormalizer {
    fn source_id(&self) -> &'static str {
        "animelib"
    }

    fn normalize(
        &self,
        body: Value,
        source: &SourceConfig,
    ) -> Result<Vec<StreamOption>, serde_json::Error> {
        let response: AniLibriaResponse = serde_json::from_value(body)?;
        let url = response.player.and_then(|p| p.host.or(p.url));

        Ok(url
            .map(|url| {
                vec![StreamOption::new(
                    url,
                    Some(source.default_quality().to_string()),
                    Some(DEFAULT_VOICE.to_string()),
                )]
            })
            .unwrap_or_default())
    }
}

/// Item shape shared by list-style APIs.
#[derive(Debug, Default, Deserialize)]
struct StreamItem {
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    url: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    quality: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    voice: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    translation: Option<String>,
}

fn items_to_options(items: Vec<StreamItem>) -> Vec<StreamOption> {
    items
        .into_iter()
        .filter_map(|item| {
            let url = item.url?;
            Some(StreamOption::new(url, item.quality, item.voice.or(item.translation)))
        })
        .collect()
}

#[derive(Debug, Default, Deserialize)]
struct OpenMoviesResponse {
    #[serde(default, deserialize_with = "deserialize_null_as_default")]
    data: Vec<StreamItem>,
}

pub struct OpenMoviesNormalizer;

impl Normalizer for OpenMoviesNormalizer {
    fn source_id(&self) -> &'static str {
        "openmovies"
    }

    fn normalize(
        &self,
        body: Value,
        _source: &SourceConfig,
    ) -> Result<Vec<StreamOption>, serde_json::Error> {
        let response: OpenMoviesResponse = serde_json::from_value(body)?;
        Ok(items_to_options(response.data))
    }
}

#[derive(Debug, Default, Deserialize)]
struct ZetflixResponse {
    #[serde(default, deserialize_with = "deserialize_null_as_default")]
    streams: Vec<StreamItem>,
}

pub struct ZetflixNormalizer;

impl Normalizer for ZetflixNormalizer {
    fn source_id(&self) -> &'static str {
        "zetflix"
    }

    fn normalize(
        &self,
        body: Value,
        _source: &SourceConfig,
    ) -> Result<Vec<StreamOption>, serde_json::Error> {
        let response: ZetflixResponse = serde_json::from_value(body)?;
        Ok(items_to_options(response.streams))
    }
}

#[derive(Clone)]
pub struct NormalizerRegistry {
    normalizers: HashMap<&'static str, Arc<dyn Normalizer>>,
}

impl NormalizerRegistry {
    pub fn empty() -> Self {
        Self {
            normalizers: HashMap::new(),
        }
    }

    pub fn register(&mut self, normalizer: Arc<dyn Normalizer>) {
        self.normalizers.insert(normalizer.source_id(), normalizer);
    }

    pub fn get(&self, source_id: &str) -> Option<&Arc<dyn Normalizer>> {
        self.normalizers.get(source_id)
    }

    /// Unknown source ids produce no options.
    pub fn normalize(
        &self,
        body: Value,
        source: &SourceConfig,
    ) -> Result<Vec<StreamOption>, serde_json::Error> {
        match self.get(&source.id) {
            Some(normalizer) => normalizer.normalize(body, source),
            None => {
                tracing::debug!("No normalizer registered for source {}", source.id);
                Ok(Vec::new())
            }
        }
    }
}

impl Default for NormalizerRegistry {
    fn default() -> Self {
        let mut registry = Self::empty();
        registry.register(Arc::new(AniLibriaNormalizer));
        registry.register(Arc::new(OpenMoviesNormalizer));
        registry.register(Arc::new(ZetflixNormalizer));
        registry
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use serde_json::json;

    fn source(id: &str) -> SourceConfig {
        Config::default().source(id).cloned().unwrap()
    }

    #[test]
    fn anilibria_prefers_host_and_uses_first_quality() {
        let registry = NormalizerRegistry::default();
        let body = json!({ "player": { "host": "cache.libria.fun", "url": "ignored" } });
        let options = registry.normalize(body, &source("animelib")).unwrap();
        assert_eq!(
            options,
            vec![StreamOption::new(
                "cache.libria.fun",
                Some("1080p".into()),
                None
            )]
        );
    }

    #[test]
    fn anilibria_without_player_is_empty() {
        let registry = NormalizerRegistry::default();
        let options = registry
            .normalize(json!({ "code": "x" }), &source("animelib"))
            .unwrap();
        assert!(options.is_empty());
    }

    #[test]
    fn openmovies_defaults_missing_quality() {
        let registry = NormalizerRegistry::default();
        let body = json!({
            "data": [
                { "url": "https://om/1.m3u8", "quality": "4k", "voice": "Dub" },
                { "url": "https://om/2.m3u8" },
                { "quality": "1080p" }
            ]
        });
        let options = registry.normalize(body, &source("openmovies")).unwrap();
        assert_eq!(options.len(), 2);
        assert_eq!(options[0].voice, "Dub");
        assert_eq!(options[1].quality, "unknown");
        assert_eq!(options[1].voice, "default");
    }

    #[test]
    fn zetflix_null_streams_is_empty() {
        let registry = NormalizerRegistry::default();
        let options = registry
            .normalize(json!({ "streams": null }), &source("zetflix"))
            .unwrap();
        assert!(options.is_empty());
    }

    #[test]
    fn zetflix_reads_translation_as_voice() {
        let registry = NormalizerRegistry::default();
        let body = json!({
            "streams": [{ "url": "https://z/a", "quality": 1080, "translation": "LostFilm" }]
        });
        let options = registry.normalize(body, &source("zetflix")).unwrap();
        assert_eq!(options[0].quality, "1080");
        assert_eq!(options[0].voice, "LostFilm");
    }

    #[test]
    fn voice_wins_over_translation_when_both_present() {
        let registry = NormalizerRegistry::default();
        let body = json!({
            "streams": [
                { "url": "https://z/a", "voice": "Dub", "translation": "LostFilm" },
                { "url": "https://z/b", "voice": "", "translation": "LostFilm" }
            ]
        });
        let options = registry.normalize(body, &source("zetflix")).unwrap();
        assert_eq!(options.len(), 2);
        assert_eq!(options[0].voice, "Dub");
        assert_eq!(options[1].voice, "LostFilm");
    }

    #[test]
    fn wrong_shape_is_an_error() {
        let registry = NormalizerRegistry::default();
        assert!(registry
            .normalize(json!({ "data": "nope" }), &source("openmovies"))
            .is_err());
    }

    #[test]
    fn unknown_source_yields_nothing() {
        let registry = NormalizerRegistry::default();
        let mut src = source("zetflix");
        src.id = "mystery".into();
        let options = registry
            .normalize(json!({ "streams": [{ "url": "x" }] }), &src)
            .unwrap();
        assert!(options.is_empty());
    }
}
