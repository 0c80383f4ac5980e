use crate::cli::commands::ConfigAction;
use crate::cli::output::{info, success};
use crate::config::PROJECT_ID_VAR;
use anyhow::Result;

use super::CommandContext;

pub fn handle_config(ctx: &mut CommandContext, action: ConfigAction) -> Result<()> {
    match action {
        ConfigAction::Show => {
            println!("{}", ctx.config);
        }
        ConfigAction::SetProject { id } => {
            let persisted = ctx.config.set_project_id(id)?;
            success(&format!("Project ID set to {}", id));
            if !persisted {
                info(&format!(
                    "{} is set; {} was not written",
                    PROJECT_ID_VAR,
                    ctx.config.dotfile_path().display()
                ));
            }
        }
        ConfigAction::Test => {
            ctx.client()?.test_connection()?;
            success("API connection successful!");
        }
    }
    Ok(())
}
