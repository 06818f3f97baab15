use tracing::{error, info, warn};

use crate::context::AppContext;
use crate::domain::ticket::{NewIssue, Ticket, TicketDraft};

pub struct ServiceTicketsOutcome {
    pub created: usize,
    pub attempted: usize,
    pub parent: Option<Ticket>,
}

/// Looks up the configured parent issue. Failures are logged and yield `None`.
pub async fn resolve_parent(ctx: &AppContext) -> Option<Ticket> {
    let parent = &ctx.config.parent;
    info!(parent = %parent, "looking up parent issue");

    match ctx
        .issue_tracker
        .find_issue(&ctx.config.team_id, parent.number)
        .await
    {
        Ok(Some(issue)) => {
            info!(key = %issue.key, title = %issue.title, "found parent issue");
            Some(issue)
        }
        Ok(None) => {
            warn!(parent = %parent, "parent issue not found");
            None
        }
        Err(err) => {
            error!(parent = %parent, error = %err, "error looking up parent issue");
            None
        }
    }
}

/// Creates the content ticket for one service. Returns whether it was created.
pub async fn create_service_ticket(
    ctx: &AppContext,
    service: &str,
    parent_id: Option<&str>,
) -> bool {
    let draft = TicketDraft::for_service(service);
    let issue = NewIssue {
        team_id: ctx.config.team_id.clone(),
        title: draft.title,
        description: draft.description,
        priority: ctx.config.priority,
        parent_id: parent_id.map(str::to_string),
    };

    info!(service, "creating ticket");
    match ctx.issue_tracker.create_issue(issue).await {
        Ok(ticket) => {
            info!(
                key = %ticket.key,
                title = %ticket.title,
                url = ticket.url.as_deref().unwrap_or("<none>"),
                "created ticket"
            );
            true
        }
        Err(err) => {
            error!(service, error = %err, "failed to create ticket");
            false
        }
    }
}

/// Creates one ticket per configured service, pausing after every call.
pub async fn create_service_tickets(ctx: &AppContext) -> ServiceTicketsOutcome {
    let parent = resolve_parent(ctx).await;
    if parent.is_none() {
        warn!(
            parent = %ctx.config.parent,
            "continuing without parent relationship; tickets can be linked manually later"
        );
    }
    let parent_id = parent.as_ref().map(|issue| issue.id.as_str());

    let mut created = 0;
    for service in &ctx.config.services {
        if create_service_ticket(ctx, service, parent_id).await {
            created += 1;
        }
        tokio::time::sleep(ctx.config.pause).await;
    }

    ServiceTicketsOutcome {
        created,
        attempted: ctx.config.services.len(),
        parent,
    }
}
