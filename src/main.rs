// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: (C) 2025 Cranky Kernel <crankykernel@proton.me>

use anyhow::Result;
use clap::builder::styling::{AnsiColor, Effects, Styles};
use clap::{Parser, Subcommand};
use std::fs::File;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::prelude::*;

use lampa_online::Config;

mod cli;
use cli::{
    CacheCommand, CommandContext, ConfigCommand, MovieArgs, OutputFormat, PlayCommand,
    ResolveCommand, SourcesCommand,
};

fn cargo_style() -> Styles {
    Styles::styled()
        .header(AnsiColor::Green.on_default() | Effects::BOLD)
        .usage(AnsiColor::Green.on_default() | Effects::BOLD)
        .literal(AnsiColor::Cyan.on_default() | Effects::BOLD)
        .placeholder(AnsiColor::Cyan.on_default())
}

#[derive(Parser)]
#[command(name = "lampa-online")]
#[command(about = "Find online streams for a movie across several sources and play one")]
#[command(version)]
#[command(styles = cargo_style())]
struct Cli {
    /// Enable verbose (debug) logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Enable debug logging to file (lampa_online_debug.log)
    #[arg(long, global = true)]
    debug_log: bool,

    /// Path to the configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Keep cached responses in memory only for this run
    #[arg(long, global = true)]
    no_cache: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Search all sources, pick a stream and start the player
    Play {
        #[command(flatten)]
        movie: MovieArgs,
    },

    /// List available streams without playing
    Sources {
        #[command(flatten)]
        movie: MovieArgs,
        /// Output format (text, json, m3u)
        #[arg(short, long, default_value = "text")]
        format: String,
    },

    /// Look up the Shikimori id for a title
    Resolve {
        /// Title to search for
        title: String,
    },

    /// Manage cache
    #[command(subcommand)]
    Cache(CacheSubCommand),

    /// Manage configuration
    #[command(subcommand)]
    Config(ConfigSubCommand),
}

#[derive(Subcommand)]
enum CacheSubCommand {
    /// Clear cache
    Clear,
}

#[derive(Subcommand)]
enum ConfigSubCommand {
    /// Write the default configuration file
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
    /// Print the effective configuration
    Show,
    /// Print the configuration file path
    Path,
}

fn init_logging(cli: &Cli) -> Result<()> {
    if cli.debug_log {
        let file = File::create("lampa_online_debug.log")?;
        let file_layer = tracing_subscriber::fmt::layer()
            .with_writer(file)
            .with_ansi(false)
            .with_level(true)
            .with_thread_ids(true)
            .with_file(true)
            .with_line_number(true);

        tracing_subscriber::registry()
            .with(file_layer)
            .with(
                EnvFilter::from_default_env()
                    .add_directive("lampa_online=debug".parse()?)
                    .add_directive("hyper_util=error".parse()?),
            )
            .init();
    } else if cli.verbose {
        tracing_subscriber::fmt()
            .with_writer(std::io::stderr)
            .with_env_filter(
                EnvFilter::from_default_env()
                    .add_directive(tracing::Level::DEBUG.into())
                    .add_directive("hyper_util=error".parse()?),
            )
            .init();
    } else if std::env::var("RUST_LOG").is_ok() {
        tracing_subscriber::fmt()
            .with_writer(std::io::stderr)
            .with_env_filter(
                EnvFilter::from_default_env().add_directive("hyper_util=error".parse()?),
            )
            .init();
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    init_logging(&cli)?;

    let config_path = cli.config.clone().unwrap_or_else(Config::default_path);
    let config = if config_path.exists() {
        Config::load(&config_path)?
    } else {
        tracing::debug!(
            "No config at {}, using built-in sources",
            config_path.display()
        );
        Config::default()
    };

    let context = CommandContext::new(config, config_path, cli.no_cache);

    let ok = match cli.command {
        Commands::Play { movie } => PlayCommand { movie }.execute(context).await?,
        Commands::Sources { movie, format } => {
            let format = OutputFormat::from_str(&format)?;
            SourcesCommand { movie, format }.execute(context).await?
        }
        Commands::Resolve { title } => ResolveCommand { title }.execute(context).await?,
        Commands::Cache(CacheSubCommand::Clear) => CacheCommand::Clear.execute(context).await?,
        Commands::Config(cmd) => {
            let cmd = match cmd {
                ConfigSubCommand::Init { force } => ConfigCommand::Init { force },
                ConfigSubCommand::Show => ConfigCommand::Show,
                ConfigSubCommand::Path => ConfigCommand::Path,
            };
            cmd.execute(context).await?
        }
    };

    Ok(if ok { ExitCode::SUCCESS } else { ExitCode::FAILURE })
}
