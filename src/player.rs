// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: (C) 2025 Cranky Kernel <crankykernel@proton.me>

use crate::config::PlayerConfig;
use crate::error::OnlineError;
use crate::host::HostPlayer;
use anyhow::{Context, Result};
use serde::Serialize;
use std::collections::BTreeMap;
use std::process::{Command, Stdio};
use tracing::{debug, info};

/// Everything the host player needs to start an online stream.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlaybackRequest {
    pub url: String,
    pub title: String,
    pub quality: String,
    pub is_online: bool,
    pub headers: BTreeMap<String, String>,
}

impl PlaybackRequest {
    pub fn new(
        url: &str,
        quality: &str,
        title: &str,
        config: &PlayerConfig,
    ) -> Result<Self, OnlineError> {
        let url = url.trim();
        if url.is_empty() {
            return Err(OnlineError::PlaybackInput("empty stream URL".to_string()));
        }

        let mut headers = BTreeMap::new();
        headers.insert("Referer".to_string(), config.referer.clone());
        headers.insert("Origin".to_string(), config.origin.clone());

        Ok(Self {
            url: url.to_string(),
            title: format!("{} ({})", title, quality),
            quality: quality.to_string(),
            is_online: true,
            headers,
        })
    }
}

/// Starts an external player process for each request.
#[derive(Debug, Clone)]
pub struct CommandPlayer {
    config: PlayerConfig,
}

impl CommandPlayer {
    pub fn new(config: PlayerConfig) -> Self {
        Self { config }
    }

    fn is_mpv(&self) -> bool {
        std::path::Path::new(&self.config.command)
            .file_stem()
            .map(|stem| stem.eq_ignore_ascii_case("mpv"))
            .unwrap_or(false)
    }

    /// Arguments passed to the player, URL last.
    pub fn build_args(&self, request: &PlaybackRequest) -> Vec<String> {
        let mut args = self.config.args.clone();

        if self.is_mpv() {
            args.push(format!("--force-media-title={}", request.title));
            if !request.headers.is_empty() {
                let fields: Vec<String> = request
                    .headers
                    .iter()
                    .map(|(name, value)| format!("{}: {}", name, value))
                    .collect();
                args.push(format!("--http-header-fields={}", fields.join(",")));
            }
        }

        args.push(request.url.clone());
        args
    }

    pub fn is_available(&self) -> bool {
        Command::new(&self.config.command)
            .arg("--version")
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .map(|status| status.success())
            .unwrap_or(false)
    }
}

impl HostPlayer for CommandPlayer {
    fn play(&self, request: &PlaybackRequest) -> Result<()> {
        let args = self.build_args(request);
        debug!("Starting player: {} {:?}", self.config.command, args);

        let mut cmd = Command::new(&self.config.command);
        cmd.args(&args)
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .stdin(Stdio::null());

        cmd.spawn().with_context(|| {
            format!(
                "Failed to start player in background: {}",
                self.config.command
            )
        })?;

        info!("Playing {} ({})", request.title, request.url);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_composes_title_and_headers() {
        let config = PlayerConfig::default();
        let request = PlaybackRequest::new("https://cdn/1.m3u8", "1080p", "Akira", &config).unwrap();
        assert_eq!(request.title, "Akira (1080p)");
        assert!(request.is_online);
        assert_eq!(request.headers["Referer"], "https://example.com/");
        assert_eq!(request.headers["Origin"], "https://example.com/");
    }

    #[test]
    fn empty_url_is_rejected() {
        let config = PlayerConfig::default();
        let err = PlaybackRequest::new("  ", "1080p", "Akira", &config).unwrap_err();
        assert!(matches!(err, OnlineError::PlaybackInput(_)));
    }

    #[test]
    fn mpv_gets_title_and_header_flags() {
        let config = PlayerConfig {
            args: vec!["--fs".to_string()],
            ..PlayerConfig::default()
        };
        let player = CommandPlayer::new(config.clone());
        let request = PlaybackRequest::new("https://cdn/1.m3u8", "4k", "Akira", &config).unwrap();
        let args = player.build_args(&request);
        assert_eq!(
            args,
            vec![
                "--fs".to_string(),
                "--force-media-title=Akira (4k)".to_string(),
                "--http-header-fields=Origin: https://example.com/,Referer: https://example.com/"
                    .to_string(),
                "https://cdn/1.m3u8".to_string(),
            ]
        );
    }

    #[test]
    fn other_players_get_plain_url() {
        let config = PlayerConfig {
            command: "vlc".to_string(),
            args: vec![],
            ..PlayerConfig::default()
        };
        let player = CommandPlayer::new(config.clone());
        let request = PlaybackRequest::new("https://cdn/1.m3u8", "4k", "Akira", &config).unwrap();
        assert_eq!(player.build_args(&request), vec!["https://cdn/1.m3u8".to_string()]);
    }
}
