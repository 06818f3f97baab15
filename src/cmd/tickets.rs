use std::sync::Arc;

use crate::config::{API_KEY_VARIABLE, AppConfig};
use crate::context::AppContext;
use crate::error::AppResult;
use crate::infra::linear::LinearClient;
use crate::infra::shell_profile;
use crate::workflow::service_tickets::{ServiceTicketsOutcome, create_service_tickets};

pub async fn run(config: AppConfig) -> AppResult<ServiceTicketsOutcome> {
    let api_key = shell_profile::read_api_key(config.shell_profile()?, API_KEY_VARIABLE)?;

    let issue_tracker = Arc::new(LinearClient::new(config.tickets.endpoint.clone(), api_key));
    let context = AppContext::new(config.tickets, issue_tracker);

    let outcome = create_service_tickets(&context).await;

    println!();
    println!(
        "Done! Created {} out of {} tickets.",
        outcome.created, outcome.attempted
    );
    if outcome.parent.is_some() {
        println!("All tickets are sub-issues of {}", context.config.parent);
    }

    Ok(outcome)
}
