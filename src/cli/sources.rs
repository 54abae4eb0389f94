use super::{CommandContext, MovieArgs, OutputFormat};
use anyhow::Result;
use lampa_online::selection::build_groups;
use lampa_online::{OnlineError, SourceResult};
use serde_json::json;

pub struct SourcesCommand {
    pub movie: MovieArgs,
    pub format: OutputFormat,
}

impl SourcesCommand {
    pub async fn execute(self, context: CommandContext) -> Result<bool> {
        let plugin = context.plugin()?;
        let movie = self.movie.into_movie();

        let results = match plugin.find_sources(&movie).await {
            Ok(results) => results,
            Err(OnlineError::NoSourcesAvailable) => Vec::new(),
            Err(e) => {
                eprintln!("{}", e.user_message());
                return Ok(false);
            }
        };

        match self.format {
            OutputFormat::Json => {
                let groups = build_groups(&results, &context.config.sources);
                println!(
                    "{}",
                    serde_json::to_string_pretty(&json!({
                        "title": movie.title,
                        "sources": groups,
                    }))?
                );
            }
            OutputFormat::Text => {
                if results.is_empty() {
                    println!("No available sources found for '{}'", movie.title);
                } else {
                    Self::print_text(&results, &context);
                }
            }
            OutputFormat::M3u => {
                println!("#EXTM3U");
                for result in &results {
                    for option in &result.options {
                        println!(
                            "#EXTINF:-1,{} ({}) [{} / {}]",
                            movie.title, option.quality, result.source_name, option.voice
                        );
                        println!(
                            "#EXTVLCOPT:http-referrer={}",
                            context.config.player.referer
                        );
                        println!("{}", option.url);
                    }
                }
            }
        }

        Ok(!results.is_empty())
    }

    fn print_text(results: &[SourceResult], context: &CommandContext) {
        for group in build_groups(results, &context.config.sources) {
            println!("\n{}:", group.source_name);
            for voice in group.voices {
                println!("  {}", voice.label);
                for option in voice.options {
                    println!("    [{}] {}", option.quality, option.url);
                }
            }
        }
    }
}
