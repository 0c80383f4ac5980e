use crate::cli::commands::IssuesAction;
use crate::cli::output::print_single;
use crate::client::IssueQuery;
use anyhow::Result;

use super::CommandContext;
use super::utils::{print_page, resolve_project};

pub fn handle_issues(ctx: &CommandContext, action: IssuesAction) -> Result<()> {
    match action {
        IssuesAction::List {
            project,
            sort,
            page,
        } => {
            let project = resolve_project(ctx, project)?;
            let query = IssueQuery {
                project,
                sort: sort.into(),
                order: page.order.into(),
                limit: page.limit,
                cursor: page.cursor,
            };

            let client = ctx.client()?;
            let issues = if page.all {
                client.issues_list_all(&query)?
            } else {
                client.issues_list(&query)?
            };
            print_page(ctx, &issues)
        }
        IssuesAction::Get { uuid } => {
            let issue = ctx.client()?.issue_get(&uuid)?;
            print_single(&issue, ctx.format)
        }
    }
}
