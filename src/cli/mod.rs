use anyhow::Result;
use clap::Args;
use std::path::PathBuf;
use std::sync::Arc;

use lampa_online::host::Host;
use lampa_online::menu::TerminalModal;
use lampa_online::player::CommandPlayer;
use lampa_online::terminal::{SpinnerLoading, TerminalNotifier};
use lampa_online::{Config, FileStorage, MemoryStorage, MovieIdentity, OnlinePlugin, Storage};

pub mod cache;
pub mod config;
pub mod play;
pub mod resolve;
pub mod sources;

pub use cache::CacheCommand;
pub use config::ConfigCommand;
pub use play::PlayCommand;
pub use resolve::ResolveCommand;
pub use sources::SourcesCommand;

/// Output format for command results
#[derive(Debug, Clone, Copy)]
pub enum OutputFormat {
    Text,
    Json,
    M3u,
}

impl OutputFormat {
    pub fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "text" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            "m3u" => Ok(Self::M3u),
            _ => anyhow::bail!("Invalid format: {}. Use 'text', 'json', or 'm3u'", s),
        }
    }
}

/// Movie identifiers as given on the command line
#[derive(Debug, Clone, Args)]
pub struct MovieArgs {
    /// Kinopoisk id
    #[arg(long = "kp")]
    pub kinopoisk_id: Option<String>,

    /// IMDb id (e.g. tt0133093)
    #[arg(long = "imdb")]
    pub imdb_id: Option<String>,

    /// Shikimori id, skips the title lookup
    #[arg(long)]
    pub shikimori: Option<String>,

    /// Display title
    #[arg(short, long)]
    pub title: Option<String>,

    /// Original title, used for the Shikimori lookup
    #[arg(long)]
    pub original_title: Option<String>,
}

impl MovieArgs {
    pub fn into_movie(self) -> MovieIdentity {
        let title = self
            .title
            .clone()
            .or_else(|| self.original_title.clone())
            .unwrap_or_default();

        MovieIdentity {
            kinopoisk_id: self.kinopoisk_id,
            imdb_id: self.imdb_id,
            title,
            original_title: self.original_title,
            resolved_shikimori_id: self.shikimori,
        }
    }
}

/// Context for command execution
pub struct CommandContext {
    pub config: Config,
    pub config_path: PathBuf,
    pub no_cache: bool,
}

impl CommandContext {
    pub fn new(config: Config, config_path: PathBuf, no_cache: bool) -> Self {
        Self {
            config,
            config_path,
            no_cache,
        }
    }

    pub fn storage(&self) -> Result<Arc<dyn Storage>> {
        if self.no_cache {
            return Ok(Arc::new(MemoryStorage::new()));
        }

        let storage = match &self.config.cache.directory {
            Some(dir) => FileStorage::with_dir(dir.clone())?,
            None => FileStorage::new()?,
        };
        Ok(Arc::new(storage))
    }

    /// Plugin wired to terminal host services
    pub fn plugin(&self) -> Result<OnlinePlugin> {
        let player = CommandPlayer::new(self.config.player.clone());
        let host = Host {
            notifier: Arc::new(TerminalNotifier),
            loading: Arc::new(SpinnerLoading::new()),
            modal: Arc::new(TerminalModal::default()),
            player: Arc::new(player),
        };

        OnlinePlugin::new(&self.config, self.storage()?, host)
    }
}
