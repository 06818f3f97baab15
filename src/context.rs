use std::sync::Arc;

use crate::config::TicketRunConfig;
use crate::services::IssueTrackerService;

#[derive(Clone)]
pub struct AppContext {
    pub config: TicketRunConfig,
    pub issue_tracker: Arc<dyn IssueTrackerService>,
}

impl AppContext {
    pub fn new(config: TicketRunConfig, issue_tracker: Arc<dyn IssueTrackerService>) -> Self {
        Self {
            config,
            issue_tracker,
        }
    }
}
