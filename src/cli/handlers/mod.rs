mod config;
mod events;
mod issues;
mod projects;
mod releases;
mod teams;
mod utils;

pub use config::handle_config;
pub use events::handle_events;
pub use issues::handle_issues;
pub use projects::handle_projects;
pub use releases::handle_releases;
pub use teams::handle_teams;

use crate::cli::commands::OutputFormat;
use crate::client::{BugsinkClient, HttpTransport};
use crate::config::Config;
use anyhow::Result;

/// Common context passed to all command handlers
pub struct CommandContext {
    pub config: Config,
    pub format: OutputFormat,
}

impl CommandContext {
    pub fn new(config: Config, format: OutputFormat) -> Self {
        Self { config, format }
    }

    /// Build the API client. The API key is only required from here on.
    pub fn client(&self) -> Result<BugsinkClient<HttpTransport>> {
        Ok(BugsinkClient::from_config(&self.config)?)
    }
}
