// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: (C) 2025 Cranky Kernel <crankykernel@proton.me>

use crate::source::{IdentifierKind, SourceConfig};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub sources: Vec<SourceConfig>,
    #[serde(default)]
    pub shikimori: ShikimoriConfig,
    #[serde(default)]
    pub cache: CacheConfig,
    #[serde(default)]
    pub player: PlayerConfig,
    #[serde(default)]
    pub http: HttpConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShikimoriConfig {
    /// Search endpoint; `{query}` is replaced with the encoded title.
    pub search_url: String,
}

impl Default for ShikimoriConfig {
    fn default() -> Self {
        Self {
            search_url: "https://shikimori.one/api/animes?search={query}&limit=1".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    pub ttl_seconds: u64,
    pub key_prefix: String,
    #[serde(default)]
    pub directory: Option<PathBuf>,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl_seconds: 3600,
            key_prefix: "cache_".to_string(),
            directory: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerConfig {
    pub command: String,
    #[serde(default)]
    pub args: Vec<String>,
    pub referer: String,
    pub origin: String,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            command: "mpv".to_string(),
            args: vec!["--force-window=immediate".to_string()],
            referer: "https://example.com/".to_string(),
            origin: "https://example.com/".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    pub timeout_secs: u64,
    pub user_agent: String,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 30,
            user_agent: "Mozilla/5.0".to_string(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            sources: vec![
                SourceConfig {
                    id: "animelib".to_string(),
                    name: "AniLibria".to_string(),
                    url: "https://api.anilibria.tv/v2/getTitle?code={shikimori_id}".to_string(),
                    qualities: vec!["1080p".to_string()],
                    requires_shikimori: true,
                    voices: BTreeMap::new(),
                },
                SourceConfig {
                    id: "openmovies".to_string(),
                    name: "OpenMovies".to_string(),
                    url: "https://api.openmovies.ru/v1/movies?kp_id={kp_id}".to_string(),
                    qualities: vec!["4k".to_string(), "1080p".to_string()],
                    requires_shikimori: false,
                    voices: BTreeMap::new(),
                },
                SourceConfig {
                    id: "zetflix".to_string(),
                    name: "Zetflix".to_string(),
                    url: "https://api.zetflix-internal.workers.dev/movies/{kp_id}?quality=ultrahd"
                        .to_string(),
                    qualities: vec!["ultrahd".to_string(), "fullhd".to_string()],
                    requires_shikimori: false,
                    voices: BTreeMap::new(),
                },
            ],
            shikimori: ShikimoriConfig::default(),
            cache: CacheConfig::default(),
            player: PlayerConfig::default(),
            http: HttpConfig::default(),
        }
    }
}

impl Config {
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .map(|p| p.join("lampa-online").join("config.toml"))
            .unwrap_or_else(|| PathBuf::from("config.toml"))
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;

        let config: Config =
            toml::from_str(&content).with_context(|| "Failed to parse TOML configuration")?;
        config.validate()?;

        Ok(config)
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        if let Some(parent) = path.as_ref().parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let content =
            toml::to_string_pretty(self).with_context(|| "Failed to serialize config to TOML")?;

        fs::write(&path, content)
            .with_context(|| format!("Failed to write config file: {}", path.as_ref().display()))?;

        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        let mut seen = HashSet::new();
        for source in &self.sources {
            if !seen.insert(source.id.as_str()) {
                anyhow::bail!("Duplicate source id: {}", source.id);
            }
            if source.url.trim().is_empty() {
                anyhow::bail!("Source {} has an empty URL template", source.id);
            }
            let has_placeholder = [
                IdentifierKind::Kinopoisk,
                IdentifierKind::Imdb,
                IdentifierKind::Shikimori,
            ]
            .iter()
            .any(|kind| source.accepts(*kind));
            if !has_placeholder {
                anyhow::bail!(
                    "Source {} URL template has no {{kp_id}}, {{imdb_id}} or {{shikimori_id}} placeholder",
                    source.id
                );
            }

            let sample = [
                IdentifierKind::Kinopoisk,
                IdentifierKind::Imdb,
                IdentifierKind::Shikimori,
            ]
            .iter()
            .fold(source.url.clone(), |url, kind| url.replace(kind.placeholder(), "0"));
            url::Url::parse(&sample)
                .with_context(|| format!("Source {} has an invalid URL template", source.id))?;
        }

        let search = self.shikimori.search_url.replace("{query}", "q");
        url::Url::parse(&search).with_context(|| "Invalid Shikimori search URL")?;
        Ok(())
    }

    pub fn source(&self, id: &str) -> Option<&SourceConfig> {
        self.sources.iter().find(|s| s.id == id)
    }
}
