// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: (C) 2025 Cranky Kernel <crankykernel@proton.me>

use crate::source::{SourceConfig, SourceResult, StreamOption};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VoiceGroup {
    pub voice: String,
    pub label: String,
    pub options: Vec<StreamOption>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SourceGroup {
    pub source_id: String,
    pub source_name: String,
    pub voices: Vec<VoiceGroup>,
}

impl SourceGroup {
    pub fn option_count(&self) -> usize {
        self.voices.iter().map(|v| v.options.len()).sum()
    }
}

/// What the user picked in the selection modal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Selection {
    pub url: String,
    pub quality: String,
    pub title: String,
}

/// Groups a source's options by voice, keeping the order in which each voice
/// first appears. Options without a URL are not offered.
pub fn group_by_voice(result: &SourceResult, source: Option<&SourceConfig>) -> SourceGroup {
    let mut voices: Vec<VoiceGroup> = Vec::new();

    for option in result.options.iter().filter(|o| !o.url.is_empty()) {
        match voices.iter().position(|g| g.voice == option.voice) {
            Some(idx) => voices[idx].options.push(option.clone()),
            None => voices.push(VoiceGroup {
                voice: option.voice.clone(),
                label: source
                    .map(|s| s.voice_label(&option.voice).to_string())
                    .unwrap_or_else(|| option.voice.clone()),
                options: vec![option.clone()],
            }),
        }
    }

    SourceGroup {
        source_id: result.source_id.clone(),
        source_name: result.source_name.clone(),
        voices,
    }
}

pub fn build_groups(results: &[SourceResult], sources: &[SourceConfig]) -> Vec<SourceGroup> {
    results
        .iter()
        .map(|result| {
            let source = sources.iter().find(|s| s.id == result.source_id);
            group_by_voice(result, source)
        })
        .filter(|group| group.option_count() > 0)
        .collect()
}
