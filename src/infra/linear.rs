use async_trait::async_trait;
use reqwest::{
    Client,
    header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE},
};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::domain::ticket::{NewIssue, Ticket};
use crate::error::{AppError, AppResult};
use crate::services::IssueTrackerService;

const ISSUE_LOOKUP_QUERY: &str = r#"
query GetIssue($teamId: String!, $number: Float!) {
    team(id: $teamId) {
        issues(filter: { number: { eq: $number } }, first: 1) {
            nodes {
                id
                identifier
                title
            }
        }
    }
}
"#;

const ISSUE_CREATE_MUTATION: &str = r#"
mutation CreateIssue($input: IssueCreateInput!) {
    issueCreate(input: $input) {
        success
        issue {
            id
            identifier
            title
            url
        }
    }
}
"#;

pub struct LinearClient {
    http: Client,
    endpoint: String,
    api_key: String,
}

impl LinearClient {
    pub fn new(endpoint: String, api_key: String) -> Self {
        Self {
            http: Client::new(),
            endpoint,
            api_key,
        }
    }

    /// Posts one GraphQL document and returns the raw response body.
    async fn execute<V: Serialize + Sync>(
        &self,
        request: &GraphqlRequest<'_, V>,
    ) -> AppResult<String> {
        let response = self
            .http
            .post(&self.endpoint)
            .header(AUTHORIZATION, self.api_key.as_str())
            .header(ACCEPT, "application/json")
            .header(CONTENT_TYPE, "application/json")
            .json(request)
            .send()
            .await
            .map_err(|err| AppError::IssueTracker(format!("failed to call Linear: {err}")))?;

        let status = response.status();
        let body = response.text().await.map_err(|err| {
            AppError::IssueTracker(format!("failed to read Linear response: {err}"))
        })?;
        debug!(%status, bytes = body.len(), "linear response received");

        // GraphQL validation errors arrive with a 4xx status but a regular error payload.
        if !status.is_success() && !has_error_payload(&body) {
            return Err(AppError::IssueTracker(format!(
                "Linear responded with {status}: {body}"
            )));
        }

        Ok(body)
    }
}

#[async_trait]
impl IssueTrackerService for LinearClient {
    async fn find_issue(&self, team_id: &str, number: u32) -> AppResult<Option<Ticket>> {
        let request = GraphqlRequest {
            query: ISSUE_LOOKUP_QUERY,
            variables: LookupVariables { team_id, number },
        };
        let body = self.execute(&request).await?;
        parse_lookup_response(&body)
    }

    async fn create_issue(&self, issue: NewIssue) -> AppResult<Ticket> {
        let request = GraphqlRequest {
            query: ISSUE_CREATE_MUTATION,
            variables: CreateVariables {
                input: IssueCreateInput::from(issue),
            },
        };
        let body = self.execute(&request).await?;
        parse_create_response(&body)
    }
}

fn has_error_payload(body: &str) -> bool {
    serde_json::from_str::<GraphqlResponse<serde_json::Value>>(body)
        .map(|payload| payload.errors.is_some())
        .unwrap_or(false)
}

fn parse_lookup_response(body: &str) -> AppResult<Option<Ticket>> {
    let payload: GraphqlResponse<LookupData> = serde_json::from_str(body)
        .map_err(|err| AppError::IssueTracker(format!("failed to parse Linear response: {err}")))?;

    if let Some(errors) = payload.errors {
        return Err(AppError::IssueTracker(describe_errors(&errors)));
    }

    let issue = payload
        .data
        .and_then(|data| data.team)
        .and_then(|team| team.issues.nodes.into_iter().next());

    Ok(issue.map(Ticket::from))
}

fn parse_create_response(body: &str) -> AppResult<Ticket> {
    let payload: GraphqlResponse<CreateData> = serde_json::from_str(body)
        .map_err(|err| AppError::IssueTracker(format!("failed to parse Linear response: {err}")))?;

    if let Some(errors) = payload.errors {
        return Err(AppError::IssueTracker(describe_errors(&errors)));
    }

    match payload.data.map(|data| data.issue_create) {
        Some(IssueCreatePayload {
            success: true,
            issue: Some(issue),
        }) => Ok(Ticket::from(issue)),
        _ => Err(AppError::IssueTracker(format!(
            "issue creation was not successful: {body}"
        ))),
    }
}

fn describe_errors(errors: &[GraphqlError]) -> String {
    let messages = errors
        .iter()
        .map(|error| error.message.as_str())
        .collect::<Vec<_>>();
    format!("Linear returned errors: {}", messages.join("; "))
}

#[derive(Serialize)]
struct GraphqlRequest<'a, V> {
    query: &'a str,
    variables: V,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct LookupVariables<'a> {
    team_id: &'a str,
    number: u32,
}

#[derive(Serialize)]
struct CreateVariables {
    input: IssueCreateInput,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct IssueCreateInput {
    team_id: String,
    title: String,
    description: String,
    priority: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    parent_id: Option<String>,
}

impl From<NewIssue> for IssueCreateInput {
    fn from(issue: NewIssue) -> Self {
        Self {
            team_id: issue.team_id,
            title: issue.title,
            description: issue.description,
            priority: issue.priority,
            parent_id: issue.parent_id,
        }
    }
}

#[derive(Deserialize)]
struct GraphqlResponse<T> {
    data: Option<T>,
    errors: Option<Vec<GraphqlError>>,
}

#[derive(Deserialize)]
struct GraphqlError {
    message: String,
}

#[derive(Deserialize)]
struct LookupData {
    team: Option<TeamIssues>,
}

#[derive(Deserialize)]
struct TeamIssues {
    issues: IssueConnection,
}

#[derive(Deserialize)]
struct IssueConnection {
    nodes: Vec<LinearIssue>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreateData {
    issue_create: IssueCreatePayload,
}

#[derive(Deserialize)]
struct IssueCreatePayload {
    success: bool,
    issue: Option<LinearIssue>,
}

#[derive(Deserialize)]
struct LinearIssue {
    id: String,
    identifier: String,
    title: String,
    url: Option<String>,
}

impl From<LinearIssue> for Ticket {
    fn from(issue: LinearIssue) -> Self {
        Self {
            id: issue.id,
            key: issue.identifier,
            title: issue.title,
            url: issue.url,
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn new_issue(parent_id: Option<&str>) -> NewIssue {
        NewIssue {
            team_id: "team-1".to_string(),
            title: "aviva: create content for veneers".to_string(),
            description: "body".to_string(),
            priority: 3,
            parent_id: parent_id.map(str::to_string),
        }
    }

    #[test]
    fn create_input_omits_missing_parent() {
        let value = serde_json::to_value(IssueCreateInput::from(new_issue(None))).unwrap();
        assert_eq!(
            value,
            json!({
                "teamId": "team-1",
                "title": "aviva: create content for veneers",
                "description": "body",
                "priority": 3,
            })
        );
    }

    #[test]
    fn create_input_carries_parent() {
        let value = serde_json::to_value(IssueCreateInput::from(new_issue(Some("p-1")))).unwrap();
        assert_eq!(value["parentId"], "p-1");
    }

    #[test]
    fn lookup_variables_use_graphql_names() {
        let request = GraphqlRequest {
            query: ISSUE_LOOKUP_QUERY,
            variables: LookupVariables {
                team_id: "team-1",
                number: 42,
            },
        };
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["variables"], json!({ "teamId": "team-1", "number": 42 }));
    }

    #[test]
    fn parses_lookup_match() {
        let body = json!({
            "data": { "team": { "issues": { "nodes": [
                { "id": "uuid-42", "identifier": "MIN-42", "title": "Service pages" }
            ] } } }
        })
        .to_string();

        let issue = parse_lookup_response(&body).unwrap().unwrap();
        assert_eq!(issue.id, "uuid-42");
        assert_eq!(issue.key, "MIN-42");
        assert_eq!(issue.url, None);
    }

    #[test]
    fn lookup_without_nodes_is_none() {
        let body = json!({ "data": { "team": { "issues": { "nodes": [] } } } }).to_string();
        assert_eq!(parse_lookup_response(&body).unwrap(), None);
    }

    #[test]
    fn lookup_errors_are_reported() {
        let body = json!({ "errors": [{ "message": "Entity not found" }] }).to_string();
        let err = parse_lookup_response(&body).unwrap_err();
        assert!(err.to_string().contains("Entity not found"));
    }

    #[test]
    fn parses_created_issue() {
        let body = json!({
            "data": { "issueCreate": {
                "success": true,
                "issue": {
                    "id": "uuid-57",
                    "identifier": "MIN-57",
                    "title": "aviva: create content for veneers",
                    "url": "https://linear.app/team/issue/MIN-57"
                }
            } }
        })
        .to_string();

        let ticket = parse_create_response(&body).unwrap();
        assert_eq!(ticket.key, "MIN-57");
        assert_eq!(
            ticket.url.as_deref(),
            Some("https://linear.app/team/issue/MIN-57")
        );
    }

    #[test]
    fn unsuccessful_create_includes_raw_response() {
        let body = json!({ "data": { "issueCreate": { "success": false, "issue": null } } })
            .to_string();
        let err = parse_create_response(&body).unwrap_err();
        assert!(matches!(err, AppError::IssueTracker(_)));
        assert!(err.to_string().contains("\"success\":false"));
    }

    #[test]
    fn create_errors_are_reported() {
        let body = json!({
            "data": null,
            "errors": [{ "message": "rate limited" }, { "message": "try later" }]
        })
        .to_string();
        let err = parse_create_response(&body).unwrap_err();
        assert!(err.to_string().contains("rate limited; try later"));
    }

    #[test]
    fn detects_error_payload() {
        assert!(has_error_payload(r#"{"errors":[{"message":"bad"}]}"#));
        assert!(!has_error_payload("<html>bad gateway</html>"));
    }
}
