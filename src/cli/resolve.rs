use super::CommandContext;
use anyhow::Result;

pub struct ResolveCommand {
    pub title: String,
}

impl ResolveCommand {
    pub async fn execute(self, context: CommandContext) -> Result<bool> {
        let plugin = context.plugin()?;
        match plugin.resolver().resolve(Some(&self.title)).await {
            Some(id) => {
                println!("{}", id);
                Ok(true)
            }
            None => {
                eprintln!("No Shikimori match for '{}'", self.title);
                Ok(false)
            }
        }
    }
}
