//! Client for the BugSink canonical REST API.
//!
//! Every operation is one stateless round trip through a [`Transport`]:
//! build an [`ApiRequest`], check the status, normalize the body.

pub mod response;
pub mod transport;

pub use response::{ListResult, cursor_token, normalize, normalize_single};
pub use transport::{ApiRequest, HttpTransport, Method, RawResponse, Transport};

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

use crate::config::Config;
use crate::error::{BugsinkError, ClientError, Result};

pub const API_PREFIX: &str = "/api/canonical/0";
pub const DEFAULT_PAGE_LIMIT: u32 = 250;

/// Fields accepted when creating or updating a team.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TeamFields {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visibility: Option<String>,
}

/// Updatable project fields.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProjectFields {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visibility: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alert_on_new_issue: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alert_on_regression: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alert_on_unmute: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NewProject {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub team: Option<String>,
    #[serde(flatten)]
    pub fields: ProjectFields,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NewRelease {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SortOrder::Asc => write!(f, "asc"),
            SortOrder::Desc => write!(f, "desc"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IssueSort {
    #[default]
    LastSeen,
    DigestOrder,
}

impl fmt::Display for IssueSort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IssueSort::LastSeen => write!(f, "last_seen"),
            IssueSort::DigestOrder => write!(f, "digest_order"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct IssueQuery {
    pub project: u64,
    pub sort: IssueSort,
    pub order: SortOrder,
    pub limit: u32,
    pub cursor: Option<String>,
}

impl IssueQuery {
    pub fn new(project: u64) -> Self {
        Self {
            project,
            sort: IssueSort::default(),
            order: SortOrder::default(),
            limit: DEFAULT_PAGE_LIMIT,
            cursor: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct EventQuery {
    pub issue: String,
    pub order: SortOrder,
    pub limit: u32,
    pub cursor: Option<String>,
}

impl EventQuery {
    pub fn new(issue: impl Into<String>) -> Self {
        Self {
            issue: issue.into(),
            order: SortOrder::default(),
            limit: DEFAULT_PAGE_LIMIT,
            cursor: None,
        }
    }
}

pub struct BugsinkClient<T: Transport> {
    transport: T,
}

impl BugsinkClient<HttpTransport> {
    /// Build a client against the configured host. Fails if no API key is set.
    pub fn from_config(config: &Config) -> Result<Self> {
        config.validate()?;
        Ok(Self::new(HttpTransport::new(config)?))
    }
}

impl<T: Transport> BugsinkClient<T> {
    pub fn new(transport: T) -> Self {
        Self { transport }
    }

    // Teams

    pub fn teams_list(&self) -> Result<ListResult> {
        self.fetch_list(ApiRequest::get(endpoint("teams")))
    }

    pub fn team_get(&self, uuid: &str) -> Result<Value> {
        self.fetch_single(ApiRequest::get(member("teams", uuid)))
    }

    pub fn team_create(&self, team: &TeamFields) -> Result<Value> {
        if team.name.is_none() {
            return Err(BugsinkError::Argument("Name required".to_string()));
        }
        let body = serde_json::to_value(team)?;
        self.fetch_single(ApiRequest::post(endpoint("teams"), body))
    }

    pub fn team_update(&self, uuid: &str, team: &TeamFields) -> Result<Value> {
        let body = update_body(team)?;
        self.fetch_single(ApiRequest::patch(member("teams", uuid), body))
    }

    // Projects

    pub fn projects_list(&self, team: Option<&str>) -> Result<ListResult> {
        self.fetch_list(ApiRequest::get(endpoint("projects")).query_opt("team", team))
    }

    pub fn project_get(&self, id: u64) -> Result<Value> {
        self.fetch_single(ApiRequest::get(member("projects", id)))
    }

    pub fn project_create(&self, project: &NewProject) -> Result<Value> {
        if project.team.is_none() || project.fields.name.is_none() {
            return Err(BugsinkError::Argument(
                "Team and name required".to_string(),
            ));
        }
        let body = serde_json::to_value(project)?;
        self.fetch_single(ApiRequest::post(endpoint("projects"), body))
    }

    pub fn project_update(&self, id: u64, fields: &ProjectFields) -> Result<Value> {
        let body = update_body(fields)?;
        self.fetch_single(ApiRequest::patch(member("projects", id), body))
    }

    // Issues (read-only)

    pub fn issues_list(&self, query: &IssueQuery) -> Result<ListResult> {
        let request = ApiRequest::get(endpoint("issues"))
            .query("project", query.project)
            .query("sort", query.sort)
            .query("order", query.order)
            .query("limit", query.limit)
            .query_opt("cursor", query.cursor.as_deref());
        self.fetch_list(request)
    }

    /// Follow continuation cursors until the listing is exhausted.
    pub fn issues_list_all(&self, query: &IssueQuery) -> Result<ListResult> {
        let mut query = query.clone();
        self.collect_pages(query.cursor.clone(), |cursor| {
            query.cursor = cursor;
            self.issues_list(&query)
        })
    }

    pub fn issue_get(&self, uuid: &str) -> Result<Value> {
        self.fetch_single(ApiRequest::get(member("issues", uuid)))
    }

    // Events (read-only)

    pub fn events_list(&self, query: &EventQuery) -> Result<ListResult> {
        let request = ApiRequest::get(endpoint("events"))
            .query("issue", &query.issue)
            .query("order", query.order)
            .query("limit", query.limit)
            .query_opt("cursor", query.cursor.as_deref());
        self.fetch_list(request)
    }

    pub fn events_list_all(&self, query: &EventQuery) -> Result<ListResult> {
        let mut query = query.clone();
        self.collect_pages(query.cursor.clone(), |cursor| {
            query.cursor = cursor;
            self.events_list(&query)
        })
    }

    pub fn event_get(&self, uuid: &str) -> Result<Value> {
        self.fetch_single(ApiRequest::get(member("events", uuid)))
    }

    /// The stacktrace endpoint returns pre-formatted text, not JSON.
    pub fn event_stacktrace(&self, uuid: &str) -> Result<String> {
        let path = format!("{}stacktrace/", member("events", uuid));
        let response = self.execute(&ApiRequest::get(path))?;
        Ok(response.body)
    }

    // Releases

    pub fn releases_list(&self, project: u64) -> Result<ListResult> {
        self.fetch_list(ApiRequest::get(endpoint("releases")).query("project", project))
    }

    pub fn release_get(&self, uuid: &str) -> Result<Value> {
        self.fetch_single(ApiRequest::get(member("releases", uuid)))
    }

    pub fn release_create(&self, release: &NewRelease) -> Result<Value> {
        if release.project.is_none() || release.version.is_none() {
            return Err(BugsinkError::Argument(
                "Project and version required".to_string(),
            ));
        }
        let body = serde_json::to_value(release)?;
        self.fetch_single(ApiRequest::post(endpoint("releases"), body))
    }

    /// Check credentials and connectivity against the teams listing.
    pub fn test_connection(&self) -> Result<bool> {
        match self.execute(&ApiRequest::get(endpoint("teams"))) {
            Ok(_) => Ok(true),
            Err(err) => Err(err.context("Connection test failed").into()),
        }
    }

    fn fetch_list(&self, request: ApiRequest) -> Result<ListResult> {
        let response = self.execute(&request)?;
        Ok(normalize(parse_body(&response.body)))
    }

    fn fetch_single(&self, request: ApiRequest) -> Result<Value> {
        let response = self.execute(&request)?;
        Ok(normalize_single(parse_body(&response.body)))
    }

    fn collect_pages<F>(&self, start: Option<String>, mut fetch: F) -> Result<ListResult>
    where
        F: FnMut(Option<String>) -> Result<ListResult>,
    {
        let mut previous = start.clone();
        let mut result = fetch(start)?;
        while let Some(next) = result.next_cursor.take() {
            let token = cursor_token(&next);
            if previous.as_deref() == Some(token.as_str()) {
                return Err(ClientError::new(format!(
                    "Pagination did not advance: cursor {} was returned twice",
                    token
                ))
                .into());
            }
            previous = Some(token.clone());
            let page = fetch(Some(token))?;
            tracing::debug!(items = page.len(), "fetched next page");
            result.append(page.items);
            result.next_cursor = page.next_cursor;
        }
        Ok(result)
    }

    fn execute(&self, request: &ApiRequest) -> std::result::Result<RawResponse, ClientError> {
        let response = self.transport.send(request)?;
        tracing::debug!(
            method = request.method.as_str(),
            path = %request.path,
            status = response.status,
            "api call"
        );
        check_response(response)
    }
}

fn endpoint(resource: &str) -> String {
    format!("{}/{}/", API_PREFIX, resource)
}

fn member(resource: &str, id: impl fmt::Display) -> String {
    format!("{}/{}/{}/", API_PREFIX, resource, id)
}

fn update_body<S: Serialize>(fields: &S) -> Result<Value> {
    let body = serde_json::to_value(fields)?;
    if body.as_object().is_none_or(|m| m.is_empty()) {
        return Err(BugsinkError::Argument(
            "At least one field must be provided for update".to_string(),
        ));
    }
    Ok(body)
}

/// Empty bodies parse as null; non-JSON bodies are kept as a string.
fn parse_body(body: &str) -> Value {
    if body.trim().is_empty() {
        return Value::Null;
    }
    serde_json::from_str(body).unwrap_or_else(|_| Value::String(body.to_string()))
}

fn check_response(response: RawResponse) -> std::result::Result<RawResponse, ClientError> {
    if response.is_success() {
        return Ok(response);
    }

    let mut message = format!("HTTP {}", response.status);
    match serde_json::from_str::<Value>(&response.body) {
        Ok(Value::Null) => {}
        Ok(Value::String(s)) => message.push_str(&format!(": {}", s)),
        Ok(other) => message.push_str(&format!(": {}", other)),
        Err(_) if response.body.trim().is_empty() => {}
        Err(_) => message.push_str(&format!(": {}", response.body)),
    }

    Err(ClientError::with_status(
        message,
        response.status,
        response.body,
    ))
}
