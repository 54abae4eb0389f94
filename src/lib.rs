// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: (C) 2025 Cranky Kernel <crankykernel@proton.me>

pub mod cache;
pub mod config;
pub mod error;
pub mod fetcher;
pub mod host;
pub mod http;
pub mod menu;
pub mod normalize;
pub mod player;
pub mod plugin;
pub mod selection;
pub mod shikimori;
pub mod source;
pub mod terminal;

pub use cache::{Cache, FileStorage, MemoryStorage, Storage};
pub use config::Config;
pub use error::OnlineError;
pub use fetcher::SourceFetcher;
pub use plugin::{OnlinePlugin, Outcome};
pub use source::{MovieIdentity, SourceResult, StreamOption};
