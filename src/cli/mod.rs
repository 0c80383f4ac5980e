pub mod commands;
pub mod handlers;
pub mod output;

pub use commands::{Cli, Commands, OutputFormat};

use anyhow::Result;
use handlers::CommandContext;

/// Dispatch a parsed command line.
pub fn run(ctx: &mut CommandContext, command: Commands) -> Result<()> {
    match command {
        Commands::Config(action) => handlers::handle_config(ctx, action),
        Commands::Teams(action) => handlers::handle_teams(ctx, action),
        Commands::Projects(action) => handlers::handle_projects(ctx, action),
        Commands::Issues(action) => handlers::handle_issues(ctx, action),
        Commands::Events(action) => handlers::handle_events(ctx, action),
        Commands::Releases(action) => handlers::handle_releases(ctx, action),
    }
}
