use crate::cli::commands::EventsAction;
use crate::cli::output::print_single;
use crate::client::EventQuery;
use anyhow::Result;

use super::CommandContext;
use super::utils::print_page;

pub fn handle_events(ctx: &CommandContext, action: EventsAction) -> Result<()> {
    match action {
        EventsAction::List { issue, page } => {
            let query = EventQuery {
                issue,
                order: page.order.into(),
                limit: page.limit,
                cursor: page.cursor,
            };

            let client = ctx.client()?;
            let events = if page.all {
                client.events_list_all(&query)?
            } else {
                client.events_list(&query)?
            };
            print_page(ctx, &events)
        }
        EventsAction::Get { uuid } => {
            let event = ctx.client()?.event_get(&uuid)?;
            print_single(&event, ctx.format)
        }
        EventsAction::Stacktrace { uuid } => {
            let stacktrace = ctx.client()?.event_stacktrace(&uuid)?;
            println!("{}", stacktrace);
            Ok(())
        }
    }
}
