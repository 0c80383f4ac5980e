use crate::cli::commands::{OutputFormat, ProjectsAction};
use crate::cli::output::print_single;
use crate::client::{NewProject, ProjectFields};
use anyhow::Result;

use super::CommandContext;
use super::utils::{parse_json_arg, print_page};

pub fn handle_projects(ctx: &CommandContext, action: ProjectsAction) -> Result<()> {
    match action {
        ProjectsAction::List { team } => {
            let projects = ctx.client()?.projects_list(team.as_deref())?;
            print_page(ctx, &projects)
        }
        ProjectsAction::Get { id } => {
            let project = ctx.client()?.project_get(id)?;
            print_single(&project, ctx.format)
        }
        ProjectsAction::Create { data } => {
            let project: NewProject = parse_json_arg(&data)?;
            let created = ctx.client()?.project_create(&project)?;
            print_single(&created, OutputFormat::Json)
        }
        ProjectsAction::Update { id, data } => {
            let fields: ProjectFields = parse_json_arg(&data)?;
            let updated = ctx.client()?.project_update(id, &fields)?;
            print_single(&updated, OutputFormat::Json)
        }
    }
}
