// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: (C) 2025 Cranky Kernel <crankykernel@proton.me>

use thiserror::Error;

/// Errors a single playback attempt can end with.
#[derive(Debug, Error)]
pub enum OnlineError {
    #[error("no Kinopoisk, IMDb or Shikimori id available for this title")]
    MissingIdentifier,

    #[error("source {source_id} failed: {message}")]
    SourceFetch { source_id: String, message: String },

    #[error("no sources available")]
    NoSourcesAvailable,

    #[error("invalid playback input: {0}")]
    PlaybackInput(String),

    #[error("cache error: {0}")]
    Cache(String),

    #[error("host error: {0}")]
    Host(String),
}

impl OnlineError {
    pub fn source_fetch(source_id: &str, message: impl std::fmt::Display) -> Self {
        Self::SourceFetch {
            source_id: source_id.to_string(),
            message: message.to_string(),
        }
    }

    /// Text shown to the user in a transient notification.
    pub fn user_message(&self) -> String {
        match self {
            OnlineError::MissingIdentifier => "Error: no id found to search by".to_string(),
            OnlineError::NoSourcesAvailable => "No available sources found".to_string(),
            OnlineError::PlaybackInput(_) => "Error: invalid playback URL".to_string(),
            OnlineError::SourceFetch { .. } | OnlineError::Host(_) => {
                "Error loading sources".to_string()
            }
            OnlineError::Cache(_) => "Cache error".to_string(),
        }
    }
}
