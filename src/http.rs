// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: (C) 2025 Cranky Kernel <crankykernel@proton.me>

use crate::config::HttpConfig;
use anyhow::{Context, Result};
use futures_util::StreamExt;
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, warn};

pub fn build_client(config: &HttpConfig) -> Result<Client> {
    Client::builder()
        .timeout(Duration::from_secs(config.timeout_secs))
        .user_agent(config.user_agent.clone())
        .build()
        .with_context(|| "Failed to build HTTP client")
}

/// GETs `url` and parses the body as JSON. A non-2xx status, an empty body
/// or a literal `null` are all errors.
pub async fn get_json(client: &Client, url: &str) -> Result<Value> {
    debug!("Requesting: {}", url);

    let response = client
        .get(url)
        .send()
        .await
        .with_context(|| format!("Failed to send request to {}", url))?;

    if !response.status().is_success() {
        return Err(anyhow::anyhow!(
            "HTTP request failed with status: {}",
            response.status()
        ));
    }

    let mut response_bytes = Vec::new();
    let mut stream = response.bytes_stream();
    while let Some(chunk_result) = stream.next().await {
        let chunk = chunk_result.with_context(|| "Failed to read response chunk")?;
        response_bytes.extend_from_slice(&chunk);
    }

    debug!("Response size: {} bytes", response_bytes.len());

    let response_text = String::from_utf8(response_bytes)
        .with_context(|| "Failed to convert response to UTF-8 string")?;

    if response_text.trim().is_empty() {
        return Err(anyhow::anyhow!("Empty response from server"));
    }

    let json: Value = serde_json::from_str(&response_text).map_err(|e| {
        let preview = if response_text.len() > 200 {
            let mut end = 200;
            while !response_text.is_char_boundary(end) {
                end -= 1;
            }
            format!("{}... (truncated)", &response_text[..end])
        } else {
            response_text.clone()
        };
        warn!(
            "JSON parsing failed at line {}, column {}: {}",
            e.line(),
            e.column(),
            preview
        );
        anyhow::anyhow!("Failed to parse JSON response: {}", e)
    })?;

    if json.is_null() {
        return Err(anyhow::anyhow!("Empty response from server"));
    }

    Ok(json)
}
