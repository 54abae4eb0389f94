// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: (C) 2025 Cranky Kernel <crankykernel@proton.me>

//! Host services backed by the terminal.

use crate::host::{
    DetailEvent, DetailEvents, DetailHandler, DetailView, LoadingIndicator, Notifier,
    OnlineButton,
};
use indicatif::{ProgressBar, ProgressStyle};
use std::sync::Mutex;
use std::time::Duration;

pub struct TerminalNotifier;

impl Notifier for TerminalNotifier {
    fn show(&self, message: &str) {
        eprintln!("{}", message);
    }
}

#[derive(Default)]
struct SpinnerState {
    holders: usize,
    bar: Option<ProgressBar>,
}

/// Spinner shared by overlapping attempts. It stays up until every `show`
/// has been matched by a `hide`.
#[derive(Default)]
pub struct SpinnerLoading {
    state: Mutex<SpinnerState>,
}

impl SpinnerLoading {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_visible(&self) -> bool {
        self.state.lock().map(|s| s.bar.is_some()).unwrap_or(false)
    }
}

impl LoadingIndicator for SpinnerLoading {
    fn show(&self) {
        let Ok(mut state) = self.state.lock() else {
            return;
        };
        state.holders += 1;
        if state.bar.is_some() {
            return;
        }

        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.green} {msg} [{elapsed_precise}]")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        pb.set_message("Searching sources...");
        pb.enable_steady_tick(Duration::from_millis(100));
        state.bar = Some(pb);
    }

    fn hide(&self) {
        let Ok(mut state) = self.state.lock() else {
            return;
        };
        state.holders = state.holders.saturating_sub(1);
        if state.holders == 0
            && let Some(pb) = state.bar.take()
        {
            pb.finish_and_clear();
        }
    }
}

/// In-process event bus standing in for the host's listener.
#[derive(Default)]
pub struct LocalEvents {
    handlers: Mutex<Vec<DetailHandler>>,
}

impl LocalEvents {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn emit(&self, event: &DetailEvent) {
        if let Ok(handlers) = self.handlers.lock() {
            for handler in handlers.iter() {
                handler(event);
            }
        }
    }

    pub fn handler_count(&self) -> usize {
        self.handlers.lock().map(|h| h.len()).unwrap_or(0)
    }
}

impl DetailEvents for LocalEvents {
    fn follow(&self, handler: DetailHandler) {
        if let Ok(mut handlers) = self.handlers.lock() {
            handlers.push(handler);
        }
    }
}

/// Collects the buttons injected into a detail view.
#[derive(Default)]
pub struct ButtonRow {
    buttons: Mutex<Vec<OnlineButton>>,
}

impl ButtonRow {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn buttons(&self) -> Vec<OnlineButton> {
        self.buttons.lock().map(|b| b.clone()).unwrap_or_default()
    }
}

impl DetailView for ButtonRow {
    fn insert_button(&self, button: OnlineButton) {
        if let Ok(mut buttons) = self.buttons.lock() {
            buttons.insert(0, button);
        }
    }
}
