use crate::client::ListResult;
use crate::error::BugsinkError;
use anyhow::Result;
use serde::de::DeserializeOwned;

use super::CommandContext;
use crate::cli::output;

/// Parse a JSON command-line argument into a mutation payload.
pub fn parse_json_arg<T: DeserializeOwned>(raw: &str) -> Result<T> {
    let value = serde_json::from_str(raw).map_err(BugsinkError::InvalidJson)?;
    Ok(value)
}

/// Explicit `--project`, else the configured project id.
pub fn resolve_project(ctx: &CommandContext, project: Option<u64>) -> Result<u64> {
    project.or(ctx.config.project_id()).ok_or_else(|| {
        BugsinkError::Argument(
            "Project ID required (use --project or set via config)".to_string(),
        )
        .into()
    })
}

/// Print a listing, pointing at the next page on stderr when there is one.
pub fn print_page(ctx: &CommandContext, result: &ListResult) -> Result<()> {
    output::print_list(&result.items, ctx.format)?;
    if let Some(next) = &result.next_cursor {
        tracing::debug!(next = %next, "listing truncated");
        eprintln!(
            "More results available: rerun with --cursor={} or --all",
            crate::client::cursor_token(next)
        );
    }
    Ok(())
}
