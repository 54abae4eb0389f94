// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: (C) 2025 Cranky Kernel <crankykernel@proton.me>

//! Services the embedding application provides to the plugin.

use crate::player::PlaybackRequest;
use crate::selection::{Selection, SourceGroup};
use crate::source::MovieIdentity;
use anyhow::Result;
use std::sync::Arc;

/// Transient toast shown to the user.
pub trait Notifier: Send + Sync {
    fn show(&self, message: &str);
}

/// Calls come in `show`/`hide` pairs, possibly overlapping when a newer
/// attempt starts before an older one has finished.
pub trait LoadingIndicator: Send + Sync {
    fn show(&self);
    fn hide(&self);
}

/// Shows the indicator on creation and hides it when dropped.
pub struct LoadingGuard<'a> {
    indicator: &'a dyn LoadingIndicator,
}

impl<'a> LoadingGuard<'a> {
    pub fn show(indicator: &'a dyn LoadingIndicator) -> Self {
        indicator.show();
        Self { indicator }
    }
}

impl Drop for LoadingGuard<'_> {
    fn drop(&mut self) {
        self.indicator.hide();
    }
}

/// Modal listing sources, voices and qualities. Returns `None` when the
/// user closes it without choosing.
pub trait SelectionModal: Send + Sync {
    fn present(&self, movie_title: &str, groups: &[SourceGroup]) -> Result<Option<Selection>>;
}

pub trait HostPlayer: Send + Sync {
    fn play(&self, request: &PlaybackRequest) -> Result<()>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DetailEventKind {
    Start,
    Complete,
}

/// Handle to a rendered detail view that accepts extra buttons.
pub trait DetailView: Send + Sync {
    fn insert_button(&self, button: OnlineButton);
}

#[derive(Clone)]
pub struct DetailEvent {
    pub kind: DetailEventKind,
    pub movie: MovieIdentity,
    pub view: Option<Arc<dyn DetailView>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct OnlineButton {
    pub label: String,
    pub subtitle: String,
    pub movie: MovieIdentity,
}

pub type DetailHandler = Box<dyn Fn(&DetailEvent) + Send + Sync>;

/// Source of "detail view" lifecycle notifications.
pub trait DetailEvents: Send + Sync {
    fn follow(&self, handler: DetailHandler);
}

#[derive(Clone)]
pub struct Host {
    pub notifier: Arc<dyn Notifier>,
    pub loading: Arc<dyn LoadingIndicator>,
    pub modal: Arc<dyn SelectionModal>,
    pub player: Arc<dyn HostPlayer>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Default)]
    struct Counting {
        shown: AtomicUsize,
        hidden: AtomicUsize,
    }

    impl LoadingIndicator for Counting {
        fn show(&self) {
            self.shown.fetch_add(1, Ordering::SeqCst);
        }
        fn hide(&self) {
            self.hidden.fetch_add(1, Ordering::SeqCst);
        }
    }

    fn fallible(indicator: &Counting, fail: bool) -> Result<()> {
        let _guard = LoadingGuard::show(indicator);
        if fail {
            anyhow::bail!("boom");
        }
        Ok(())
    }

    #[test]
    fn guard_hides_on_every_exit() {
        let indicator = Counting::default();
        assert!(fallible(&indicator, false).is_ok());
        assert!(fallible(&indicator, true).is_err());
        assert_eq!(indicator.shown.load(Ordering::SeqCst), 2);
        assert_eq!(indicator.hidden.load(Ordering::SeqCst), 2);
    }
}
