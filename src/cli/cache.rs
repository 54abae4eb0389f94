use super::CommandContext;
use anyhow::{Context, Result};
use lampa_online::Cache;
use std::time::Duration;

pub enum CacheCommand {
    Clear,
}

impl CacheCommand {
    pub async fn execute(self, context: CommandContext) -> Result<bool> {
        match self {
            Self::Clear => {
                let cache = Cache::new(
                    context.storage()?,
                    Duration::from_secs(context.config.cache.ttl_seconds),
                    context.config.cache.key_prefix.clone(),
                );
                cache.clear().with_context(|| "Failed to clear cache")?;
                println!("Cache cleared");
            }
        }

        Ok(true)
    }
}
