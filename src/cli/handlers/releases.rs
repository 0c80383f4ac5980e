use crate::cli::commands::{OutputFormat, ReleasesAction};
use crate::cli::output::print_single;
use crate::client::NewRelease;
use anyhow::Result;

use super::CommandContext;
use super::utils::{parse_json_arg, print_page, resolve_project};

pub fn handle_releases(ctx: &CommandContext, action: ReleasesAction) -> Result<()> {
    match action {
        ReleasesAction::List { project } => {
            let project = resolve_project(ctx, project)?;
            let releases = ctx.client()?.releases_list(project)?;
            print_page(ctx, &releases)
        }
        ReleasesAction::Get { uuid } => {
            let release = ctx.client()?.release_get(&uuid)?;
            print_single(&release, ctx.format)
        }
        ReleasesAction::Create { data } => {
            let release: NewRelease = parse_json_arg(&data)?;
            let created = ctx.client()?.release_create(&release)?;
            print_single(&created, OutputFormat::Json)
        }
    }
}
