use async_trait::async_trait;

use crate::domain::ticket::{NewIssue, Ticket};
use crate::error::AppResult;

#[async_trait]
pub trait IssueTrackerService: Send + Sync {
    /// Looks up the issue numbered `number` in the team; `Ok(None)` when there is none.
    async fn find_issue(&self, team_id: &str, number: u32) -> AppResult<Option<Ticket>>;
    async fn create_issue(&self, issue: NewIssue) -> AppResult<Ticket>;
}
