//! Host fakes shared by the integration tests.

#![allow(dead_code)]

use anyhow::Result;
use lampa_online::config::Config;
use lampa_online::host::{Host, HostPlayer, LoadingIndicator, Notifier, SelectionModal};
use lampa_online::player::PlaybackRequest;
use lampa_online::selection::{Selection, SourceGroup};
use lampa_online::source::SourceConfig;
use lampa_online::{MemoryStorage, OnlinePlugin};
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

#[derive(Default)]
pub struct RecordingNotifier {
    pub messages: Mutex<Vec<String>>,
}

impl Notifier for RecordingNotifier {
    fn show(&self, message: &str) {
        self.messages.lock().unwrap().push(message.to_string());
    }
}

#[derive(Default)]
pub struct CountingLoading {
    pub shown: AtomicUsize,
    pub hidden: AtomicUsize,
}

impl CountingLoading {
    pub fn counts(&self) -> (usize, usize) {
        (
            self.shown.load(Ordering::SeqCst),
            self.hidden.load(Ordering::SeqCst),
        )
    }
}

impl LoadingIndicator for CountingLoading {
    fn show(&self) {
        self.shown.fetch_add(1, Ordering::SeqCst);
    }
    fn hide(&self) {
        self.hidden.fetch_add(1, Ordering::SeqCst);
    }
}

/// Modal that picks the first offered option, a fixed selection, or closes.
pub enum ModalScript {
    First,
    Fixed(Selection),
    Close,
}

pub struct ScriptedModal {
    pub script: ModalScript,
    pub presented: Mutex<Vec<Vec<SourceGroup>>>,
}

impl ScriptedModal {
    pub fn new(script: ModalScript) -> Self {
        Self {
            script,
            presented: Mutex::new(Vec::new()),
        }
    }
}

impl SelectionModal for ScriptedModal {
    fn present(&self, movie_title: &str, groups: &[SourceGroup]) -> Result<Option<Selection>> {
        self.presented.lock().unwrap().push(groups.to_vec());
        Ok(match &self.script {
            ModalScript::First => groups
                .first()
                .and_then(|g| g.voices.first())
                .and_then(|v| v.options.first())
                .map(|o| Selection {
                    url: o.url.clone(),
                    quality: o.quality.clone(),
                    title: movie_title.to_string(),
                }),
            ModalScript::Fixed(selection) => Some(selection.clone()),
            ModalScript::Close => None,
        })
    }
}

#[derive(Default)]
pub struct RecordingPlayer {
    pub requests: Mutex<Vec<PlaybackRequest>>,
}

impl HostPlayer for RecordingPlayer {
    fn play(&self, request: &PlaybackRequest) -> Result<()> {
        self.requests.lock().unwrap().push(request.clone());
        Ok(())
    }
}

pub struct Fixture {
    pub plugin: OnlinePlugin,
    pub notifier: Arc<RecordingNotifier>,
    pub loading: Arc<CountingLoading>,
    pub modal: Arc<ScriptedModal>,
    pub player: Arc<RecordingPlayer>,
    pub storage: Arc<MemoryStorage>,
}

pub fn source(id: &str, name: &str, url: String, requires_shikimori: bool) -> SourceConfig {
    SourceConfig {
        id: id.to_string(),
        name: name.to_string(),
        url,
        qualities: vec!["1080p".to_string()],
        requires_shikimori,
        voices: BTreeMap::new(),
    }
}

pub fn config_for(server_uri: &str, sources: Vec<SourceConfig>) -> Config {
    let mut config = Config {
        sources,
        ..Config::default()
    };
    config.shikimori.search_url = format!("{}/api/animes?search={{query}}&limit=1", server_uri);
    config.http.timeout_secs = 5;
    config
}

pub fn fixture(config: &Config, script: ModalScript) -> Fixture {
    let notifier = Arc::new(RecordingNotifier::default());
    let loading = Arc::new(CountingLoading::default());
    let modal = Arc::new(ScriptedModal::new(script));
    let player = Arc::new(RecordingPlayer::default());
    let storage = Arc::new(MemoryStorage::new());

    let host = Host {
        notifier: notifier.clone(),
        loading: loading.clone(),
        modal: modal.clone(),
        player: player.clone(),
    };
    let plugin = OnlinePlugin::new(config, storage.clone(), host).unwrap();

    Fixture {
        plugin,
        notifier,
        loading,
        modal,
        player,
        storage,
    }
}
