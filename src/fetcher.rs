// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: (C) 2025 Cranky Kernel <crankykernel@proton.me>

use crate::cache::Cache;
use crate::error::OnlineError;
use crate::http;
use crate::normalize::NormalizerRegistry;
use crate::source::{Identifiers, SourceConfig, SourceResult, cache_key};
use futures_util::future::join_all;
use reqwest::Client;
use std::time::Instant;
use tracing::{debug, info, warn};

/// Queries every configured source for one set of identifiers.
#[derive(Clone)]
pub struct SourceFetcher {
    client: Client,
    sources: Vec<SourceConfig>,
    normalizers: NormalizerRegistry,
    cache: Cache,
}

impl SourceFetcher {
    pub fn new(
        client: Client,
        sources: Vec<SourceConfig>,
        normalizers: NormalizerRegistry,
        cache: Cache,
    ) -> Self {
        Self {
            client,
            sources,
            normalizers,
            cache,
        }
    }

    pub fn sources(&self) -> &[SourceConfig] {
        &self.sources
    }

    /// Fans out to all sources and waits for every request to settle.
    /// Failing sources are logged and left out of the result.
    pub async fn fetch_all(&self, ids: &Identifiers) -> Result<Vec<SourceResult>, OnlineError> {
        if ids.is_empty() {
            return Err(OnlineError::MissingIdentifier);
        }

        let requests = self.sources.iter().map(|source| async move {
            let start = Instant::now();
            let result = match self.fetch_source(source, ids).await {
                Ok(result) => result,
                Err(e) => {
                    warn!("{}", e);
                    None
                }
            };
            debug!("Source {} settled in {:?}", source.id, start.elapsed());
            result
        });

        let results: Vec<SourceResult> = join_all(requests)
            .await
            .into_iter()
            .flatten()
            .filter(|result| !result.options.is_empty())
            .collect();

        info!(
            "{} of {} sources returned streams",
            results.len(),
            self.sources.len()
        );

        if results.is_empty() {
            return Err(OnlineError::NoSourcesAvailable);
        }
        Ok(results)
    }

    /// `Ok(None)` means the source was skipped for lack of a usable id.
    pub async fn fetch_source(
        &self,
        source: &SourceConfig,
        ids: &Identifiers,
    ) -> Result<Option<SourceResult>, OnlineError> {
        let Some((kind, value)) = source.select_identifier(ids) else {
            debug!("Skipping source {}: no usable identifier", source.id);
            return Ok(None);
        };

        let key = cache_key(&source.id, &value);
        if let Some(cached) = self.cache.get::<SourceResult>(&key) {
            return Ok(Some(cached));
        }

        let url = source.build_url(kind, &value);
        debug!("Fetching source {} by {} id {}", source.id, kind, value);

        let body = http::get_json(&self.client, &url)
            .await
            .map_err(|e| OnlineError::source_fetch(&source.id, format!("{:#}", e)))?;

        let options = self
            .normalizers
            .normalize(body, source)
            .map_err(|e| OnlineError::source_fetch(&source.id, e))?;

        let result = SourceResult {
            source_name: source.name.clone(),
            source_id: source.id.clone(),
            options,
        };
        self.cache.set(&key, &result);

        Ok(Some(result))
    }
}
