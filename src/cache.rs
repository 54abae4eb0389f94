// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: (C) 2025 Cranky Kernel <crankykernel@proton.me>

use crate::error::OnlineError;
use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tracing::{debug, warn};

/// Persistent key/value storage provided by the host.
pub trait Storage: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<Value>>;
    fn set(&self, key: &str, value: Value) -> Result<()>;
    fn clear(&self) -> Result<()>;
}

/// Stores each key as a JSON file named after the key's hash.
#[derive(Debug)]
pub struct FileStorage {
    cache_dir: PathBuf,
}

impl FileStorage {
    pub fn new() -> Result<Self> {
        let cache_dir = dirs::cache_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not determine cache directory"))?
            .join("lampa-online");
        Self::with_dir(cache_dir)
    }

    pub fn with_dir(cache_dir: PathBuf) -> Result<Self> {
        let storage = Self { cache_dir };
        storage.ensure_cache_dir_exists()?;
        Ok(storage)
    }

    fn ensure_cache_dir_exists(&self) -> Result<()> {
        if !self.cache_dir.exists() {
            fs::create_dir_all(&self.cache_dir).with_context(|| {
                format!(
                    "Failed to create cache directory: {}",
                    self.cache_dir.display()
                )
            })?;
        }
        Ok(())
    }

    fn path_for(&self, key: &str) -> PathBuf {
        let mut hasher = Sha256::new();
        hasher.update(key.as_bytes());
        let hash = format!("{:x}", hasher.finalize())[..16].to_string();
        self.cache_dir.join(format!("{}.json", hash))
    }
}

impl Storage for FileStorage {
    fn get(&self, key: &str) -> Result<Option<Value>> {
        let path = self.path_for(key);
        if !path.exists() {
            return Ok(None);
        }

        let content = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read cache file: {}", path.display()))?;
        let value = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse cache JSON: {}", path.display()))?;

        Ok(Some(value))
    }

    fn set(&self, key: &str, value: Value) -> Result<()> {
        self.ensure_cache_dir_exists()?;
        let path = self.path_for(key);
        let content =
            serde_json::to_string(&value).with_context(|| "Failed to serialize cache data")?;
        fs::write(&path, content)
            .with_context(|| format!("Failed to write cache file: {}", path.display()))?;
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        if self.cache_dir.exists() {
            fs::remove_dir_all(&self.cache_dir).with_context(|| {
                format!(
                    "Failed to remove cache directory: {}",
                    self.cache_dir.display()
                )
            })?;
        }
        self.ensure_cache_dir_exists()
    }
}

#[derive(Debug, Default)]
pub struct MemoryStorage {
    entries: Mutex<HashMap<String, Value>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.lock().map(|e| e.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Storage for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<Value>> {
        let entries = self
            .entries
            .lock()
            .map_err(|_| anyhow::anyhow!("memory storage lock poisoned"))?;
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: Value) -> Result<()> {
        let mut entries = self
            .entries
            .lock()
            .map_err(|_| anyhow::anyhow!("memory storage lock poisoned"))?;
        entries.insert(key.to_string(), value);
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        let mut entries = self
            .entries
            .lock()
            .map_err(|_| anyhow::anyhow!("memory storage lock poisoned"))?;
        entries.clear();
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheEntry<T> {
    pub value: T,
    /// Milliseconds since the Unix epoch.
    pub timestamp: i64,
}

impl<T> CacheEntry<T> {
    pub fn new(value: T) -> Self {
        Self {
            value,
            timestamp: now_millis(),
        }
    }

    /// Entries stamped ahead of the local clock count as fresh.
    pub fn is_fresh(&self, ttl: Duration, now_ms: i64) -> bool {
        let ttl_ms = i64::try_from(ttl.as_millis()).unwrap_or(i64::MAX);
        now_ms.saturating_sub(self.timestamp) < ttl_ms
    }
}

pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// TTL cache over host storage. Reads and writes never fail: storage
/// problems are logged and treated as a miss.
#[derive(Clone)]
pub struct Cache {
    storage: Arc<dyn Storage>,
    ttl: Duration,
    prefix: String,
}

impl Cache {
    pub fn new(storage: Arc<dyn Storage>, ttl: Duration, prefix: impl Into<String>) -> Self {
        Self {
            storage,
            ttl,
            prefix: prefix.into(),
        }
    }

    fn storage_key(&self, key: &str) -> String {
        format!("{}{}", self.prefix, key)
    }

    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let storage_key = self.storage_key(key);
        let raw = match self.storage.get(&storage_key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(e) => {
                warn!("Cache read failed for {}: {:#}", storage_key, e);
                return None;
            }
        };

        let entry: CacheEntry<T> = match serde_json::from_value(raw) {
            Ok(entry) => entry,
            Err(e) => {
                warn!("Discarding undecodable cache entry {}: {}", storage_key, e);
                return None;
            }
        };

        if entry.is_fresh(self.ttl, now_millis()) {
            debug!("Cache hit: {}", storage_key);
            Some(entry.value)
        } else {
            debug!("Cache entry expired: {}", storage_key);
            None
        }
    }

    pub fn set<T: Serialize>(&self, key: &str, value: &T) {
        let storage_key = self.storage_key(key);
        let entry = CacheEntry::new(value);
        let raw = match serde_json::to_value(&entry) {
            Ok(raw) => raw,
            Err(e) => {
                warn!("Failed to serialize cache entry {}: {}", storage_key, e);
                return;
            }
        };

        if let Err(e) = self.storage.set(&storage_key, raw) {
            warn!("Cache write failed for {}: {:#}", storage_key, e);
        }
    }

    pub fn clear(&self) -> Result<(), OnlineError> {
        self.storage
            .clear()
            .map_err(|e| OnlineError::Cache(format!("{:#}", e)))
    }
}
