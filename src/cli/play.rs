use super::{CommandContext, MovieArgs};
use anyhow::Result;
use lampa_online::Outcome;
use lampa_online::host::{DetailEvent, DetailEventKind};
use lampa_online::player::CommandPlayer;
use lampa_online::terminal::{ButtonRow, LocalEvents};
use std::sync::Arc;

pub struct PlayCommand {
    pub movie: MovieArgs,
}

impl PlayCommand {
    /// Returns `false` when the attempt failed.
    pub async fn execute(self, context: CommandContext) -> Result<bool> {
        if !CommandPlayer::new(context.config.player.clone()).is_available() {
            tracing::warn!(
                "Player command '{}' does not answer --version",
                context.config.player.command
            );
        }

        let plugin = context.plugin()?;

        // The terminal host renders a single detail view for the given movie
        let events = LocalEvents::new();
        plugin.initialize(&events);

        let view = Arc::new(ButtonRow::new());
        events.emit(&DetailEvent {
            kind: DetailEventKind::Complete,
            movie: self.movie.into_movie(),
            view: Some(view.clone()),
        });

        let Some(button) = view.buttons().into_iter().next() else {
            anyhow::bail!("Online button was not injected");
        };

        eprintln!("{} ({})", button.label, button.subtitle);

        match plugin.launch(&button.movie).await {
            Outcome::Dispatched(request) => {
                println!("Playing: {}", request.title);
                Ok(true)
            }
            Outcome::Cancelled => {
                eprintln!("No source selected");
                Ok(true)
            }
            Outcome::Superseded => Ok(true),
            Outcome::Failed(_) => Ok(false),
        }
    }
}
