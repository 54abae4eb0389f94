// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: (C) 2025 Cranky Kernel <crankykernel@proton.me>

use crate::cache::Cache;
use crate::config::ShikimoriConfig;
use crate::http;
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, warn};

#[derive(Debug, Deserialize)]
struct AnimeSearchHit {
    id: Value,
}

/// Resolves a title to a Shikimori anime id via the public search API.
#[derive(Clone)]
pub struct ShikimoriResolver {
    client: Client,
    search_url: String,
    cache: Cache,
}

impl ShikimoriResolver {
    pub fn new(client: Client, config: &ShikimoriConfig, cache: Cache) -> Self {
        Self {
            client,
            search_url: config.search_url.clone(),
            cache,
        }
    }

    fn cache_key(title: &str) -> String {
        format!("shikimori_{}", title)
    }

    /// Never fails: any lookup problem resolves to `None`.
    pub async fn resolve(&self, title: Option<&str>) -> Option<String> {
        let title = title.map(str::trim).filter(|t| !t.is_empty())?;
        let cache_key = Self::cache_key(title);

        if let Some(id) = self.cache.get::<String>(&cache_key) {
            return Some(id);
        }

        let url = self
            .search_url
            .replace("{query}", &urlencoding::encode(title));

        let body = match http::get_json(&self.client, &url).await {
            Ok(body) => body,
            Err(e) => {
                warn!("Shikimori lookup for {:?} failed: {:#}", title, e);
                return None;
            }
        };

        let hits: Vec<AnimeSearchHit> = match serde_json::from_value(body) {
            Ok(hits) => hits,
            Err(e) => {
                warn!("Unexpected Shikimori response for {:?}: {}", title, e);
                return None;
            }
        };

        let id = hits.into_iter().next().and_then(|hit| match hit.id {
            Value::Number(n) => Some(n.to_string()),
            Value::String(s) if !s.is_empty() => Some(s),
            _ => None,
        });

        match &id {
            Some(id) => {
                debug!("Resolved {:?} to Shikimori id {}", title, id);
                self.cache.set(&cache_key, id);
            }
            None => debug!("No Shikimori match for {:?}", title),
        }

        id
    }
}
