// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: (C) 2025 Cranky Kernel <crankykernel@proton.me>

use crate::cache::{Cache, Storage};
use crate::config::{Config, PlayerConfig};
use crate::error::OnlineError;
use crate::fetcher::SourceFetcher;
use crate::host::{DetailEvent, DetailEventKind, DetailEvents, Host, LoadingGuard, OnlineButton};
use crate::http;
use crate::normalize::NormalizerRegistry;
use crate::player::PlaybackRequest;
use crate::selection::{Selection, build_groups};
use crate::shikimori::ShikimoriResolver;
use crate::source::{IdentifierKind, Identifiers, MovieIdentity, SourceResult};
use anyhow::Result;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::time::Duration;
use tracing::{debug, info, warn};

pub const BUTTON_LABEL: &str = "Watch online";
pub const BUTTON_SUBTITLE: &str = "4K Online";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttemptState {
    Idle,
    ResolvingIdentity,
    Fetching,
    AwaitingSelection,
    Dispatched,
    Failed,
}

#[derive(Debug)]
pub enum Outcome {
    Dispatched(PlaybackRequest),
    /// The modal was closed without a choice.
    Cancelled,
    Failed(OnlineError),
    /// A newer attempt started while this one was in flight.
    Superseded,
}

pub struct OnlinePlugin {
    player_config: PlayerConfig,
    fetcher: SourceFetcher,
    resolver: ShikimoriResolver,
    host: Host,
    initialized: AtomicBool,
    generation: AtomicU64,
    state: Mutex<AttemptState>,
}

impl OnlinePlugin {
    pub fn new(config: &Config, storage: Arc<dyn Storage>, host: Host) -> Result<Self> {
        let client = http::build_client(&config.http)?;
        let cache = Cache::new(
            storage,
            Duration::from_secs(config.cache.ttl_seconds),
            config.cache.key_prefix.clone(),
        );
        let fetcher = SourceFetcher::new(
            client.clone(),
            config.sources.clone(),
            NormalizerRegistry::default(),
            cache.clone(),
        );
        let resolver = ShikimoriResolver::new(client, &config.shikimori, cache);

        Ok(Self::from_parts(
            config.player.clone(),
            fetcher,
            resolver,
            host,
        ))
    }

    pub fn from_parts(
        player_config: PlayerConfig,
        fetcher: SourceFetcher,
        resolver: ShikimoriResolver,
        host: Host,
    ) -> Self {
        Self {
            player_config,
            fetcher,
            resolver,
            host,
            initialized: AtomicBool::new(false),
            generation: AtomicU64::new(0),
            state: Mutex::new(AttemptState::Idle),
        }
    }

    /// Subscribes to detail-view events once. Later calls are no-ops and
    /// return `false`.
    pub fn initialize(&self, events: &dyn DetailEvents) -> bool {
        if self.initialized.swap(true, Ordering::SeqCst) {
            debug!("Online plugin already initialized");
            return false;
        }

        events.follow(Box::new(|event: &DetailEvent| {
            if let Some(button) = Self::button_for(event)
                && let Some(view) = &event.view
            {
                view.insert_button(button);
            }
        }));
        info!("Online plugin initialized");
        true
    }

    pub fn button_for(event: &DetailEvent) -> Option<OnlineButton> {
        if event.kind != DetailEventKind::Complete || event.view.is_none() {
            return None;
        }
        Some(OnlineButton {
            label: BUTTON_LABEL.to_string(),
            subtitle: BUTTON_SUBTITLE.to_string(),
            movie: event.movie.clone(),
        })
    }

    pub fn resolver(&self) -> &ShikimoriResolver {
        &self.resolver
    }

    pub fn state(&self) -> AttemptState {
        self.state
            .lock()
            .map(|s| *s)
            .unwrap_or(AttemptState::Idle)
    }

    fn set_state(&self, state: AttemptState) {
        debug!("Attempt state -> {:?}", state);
        if let Ok(mut current) = self.state.lock() {
            *current = state;
        }
    }

    fn is_current(&self, generation: u64) -> bool {
        self.generation.load(Ordering::SeqCst) == generation
    }

    fn needs_shikimori(&self) -> bool {
        self.fetcher
            .sources()
            .iter()
            .any(|s| s.accepts(IdentifierKind::Shikimori))
    }

    /// Completes the movie's identifiers, looking up the Shikimori id by
    /// title when some source can use it.
    pub async fn resolve_identifiers(&self, movie: &MovieIdentity) -> Identifiers {
        let mut ids = movie.identifiers();
        if ids.shikimori.is_none() && self.needs_shikimori() {
            ids.shikimori = self.resolver.resolve(movie.search_title()).await;
        }
        ids
    }

    pub async fn find_sources(
        &self,
        movie: &MovieIdentity,
    ) -> Result<Vec<SourceResult>, OnlineError> {
        let has_direct_id = !movie.identifiers().is_empty();
        if !has_direct_id && movie.search_title().is_none() {
            return Err(OnlineError::MissingIdentifier);
        }

        self.set_state(AttemptState::ResolvingIdentity);
        let ids = self.resolve_identifiers(movie).await;

        self.set_state(AttemptState::Fetching);
        self.fetcher.fetch_all(&ids).await
    }

    /// Runs one button press to completion.
    pub async fn launch(&self, movie: &MovieIdentity) -> Outcome {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        debug!("Starting attempt {} for {:?}", generation, movie.title);

        let found = {
            let _loading = LoadingGuard::show(self.host.loading.as_ref());
            self.find_sources(movie).await
        };

        if !self.is_current(generation) {
            debug!("Discarding results of superseded attempt {}", generation);
            return Outcome::Superseded;
        }

        let results = match found {
            Ok(results) => results,
            Err(e) => return self.fail(e),
        };

        self.set_state(AttemptState::AwaitingSelection);
        let groups = build_groups(&results, self.fetcher.sources());
        if groups.is_empty() {
            return self.fail(OnlineError::NoSourcesAvailable);
        }

        match self.host.modal.present(&movie.title, &groups) {
            Ok(Some(selection)) => match self.dispatch(&selection) {
                Ok(request) => Outcome::Dispatched(request),
                Err(e) => self.fail(e),
            },
            Ok(None) => {
                debug!("Selection closed without a choice");
                self.set_state(AttemptState::Idle);
                Outcome::Cancelled
            }
            Err(e) => self.fail(OnlineError::Host(format!("{:#}", e))),
        }
    }

    pub fn dispatch(&self, selection: &Selection) -> Result<PlaybackRequest, OnlineError> {
        let request = PlaybackRequest::new(
            &selection.url,
            &selection.quality,
            &selection.title,
            &self.player_config,
        )?;

        self.host
            .player
            .play(&request)
            .map_err(|e| OnlineError::Host(format!("{:#}", e)))?;

        self.set_state(AttemptState::Dispatched);
        Ok(request)
    }

    fn fail(&self, error: OnlineError) -> Outcome {
        warn!("Online playback failed: {}", error);
        self.host.notifier.show(&error.user_message());
        self.set_state(AttemptState::Failed);
        Outcome::Failed(error)
    }
}
