use crate::cli::commands::{OutputFormat, TeamsAction};
use crate::cli::output::print_single;
use crate::client::TeamFields;
use anyhow::Result;

use super::CommandContext;
use super::utils::{parse_json_arg, print_page};

pub fn handle_teams(ctx: &CommandContext, action: TeamsAction) -> Result<()> {
    match action {
        TeamsAction::List => {
            let teams = ctx.client()?.teams_list()?;
            print_page(ctx, &teams)
        }
        TeamsAction::Get { uuid } => {
            let team = ctx.client()?.team_get(&uuid)?;
            print_single(&team, ctx.format)
        }
        TeamsAction::Create { data } => {
            let fields: TeamFields = parse_json_arg(&data)?;
            let team = ctx.client()?.team_create(&fields)?;
            print_single(&team, OutputFormat::Json)
        }
        TeamsAction::Update { uuid, data } => {
            let fields: TeamFields = parse_json_arg(&data)?;
            let team = ctx.client()?.team_update(&uuid, &fields)?;
            print_single(&team, OutputFormat::Json)
        }
    }
}
