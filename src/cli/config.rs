use super::CommandContext;
use anyhow::Result;
use lampa_online::Config;

pub enum ConfigCommand {
    /// Write the default configuration unless a file already exists
    Init { force: bool },
    Show,
    Path,
}

impl ConfigCommand {
    pub async fn execute(self, context: CommandContext) -> Result<bool> {
        match self {
            Self::Init { force } => {
                if context.config_path.exists() && !force {
                    eprintln!(
                        "Config already exists at {} (use --force to overwrite)",
                        context.config_path.display()
                    );
                    return Ok(false);
                }
                Config::default().save(&context.config_path)?;
                println!("Wrote {}", context.config_path.display());
            }
            Self::Show => {
                print!("{}", toml::to_string_pretty(&context.config)?);
            }
            Self::Path => {
                println!("{}", context.config_path.display());
            }
        }

        Ok(true)
    }
}
