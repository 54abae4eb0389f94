// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: (C) 2025 Cranky Kernel <crankykernel@proton.me>

use crate::host::SelectionModal;
use crate::selection::{Selection, SourceGroup};
use anyhow::Result;
use inquire::Select;

/// One selectable line of the terminal modal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QualityEntry {
    pub source_name: String,
    pub voice_label: String,
    pub quality: String,
    pub url: String,
}

impl std::fmt::Display for QualityEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} / {} / {}",
            self.source_name, self.voice_label, self.quality
        )
    }
}

/// Flattens source -> voice -> quality into selectable lines, keeping the
/// group order.
pub fn quality_entries(groups: &[SourceGroup]) -> Vec<QualityEntry> {
    groups
        .iter()
        .flat_map(|group| {
            group.voices.iter().flat_map(move |voice| {
                voice.options.iter().map(move |option| QualityEntry {
                    source_name: group.source_name.clone(),
                    voice_label: voice.label.clone(),
                    quality: option.quality.clone(),
                    url: option.url.clone(),
                })
            })
        })
        .collect()
}

pub struct TerminalModal {
    page_size: usize,
}

impl TerminalModal {
    pub fn new(page_size: usize) -> Self {
        Self { page_size }
    }
}

impl Default for TerminalModal {
    fn default() -> Self {
        Self::new(20)
    }
}

impl SelectionModal for TerminalModal {
    fn present(&self, movie_title: &str, groups: &[SourceGroup]) -> Result<Option<Selection>> {
        let entries = quality_entries(groups);
        if entries.is_empty() {
            return Ok(None);
        }

        let prompt = format!("Select source for {}:", movie_title);
        let choice = Select::new(&prompt, entries)
            .with_page_size(self.page_size)
            .with_help_message("Enter to play, Esc to close")
            .prompt_skippable()?;

        Ok(choice.map(|entry| Selection {
            url: entry.url,
            quality: entry.quality,
            title: movie_title.to_string(),
        }))
    }
}
