use std::time::Duration;

use reqwest::blocking::{Client, Request};
use reqwest::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue};
use serde_json::Value;
use url::Url;

use crate::config::Config;
use crate::error::{BugsinkError, ClientError, Result};

const DEFAULT_TIMEOUT_DURATION: Duration = Duration::from_secs(30);
const JSON_MIME: &str = "application/json";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Patch,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Patch => "PATCH",
        }
    }

    fn to_reqwest(self) -> reqwest::Method {
        match self {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
            Method::Patch => reqwest::Method::PATCH,
        }
    }
}

/// One logical API call, relative to the configured host.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub method: Method,
    pub path: String,
    pub query: Vec<(String, String)>,
    pub body: Option<Value>,
}

impl ApiRequest {
    pub fn get(path: impl Into<String>) -> Self {
        Self {
            method: Method::Get,
            path: path.into(),
            query: Vec::new(),
            body: None,
        }
    }

    pub fn post(path: impl Into<String>, body: Value) -> Self {
        Self {
            method: Method::Post,
            path: path.into(),
            query: Vec::new(),
            body: Some(body),
        }
    }

    pub fn patch(path: impl Into<String>, body: Value) -> Self {
        Self {
            method: Method::Patch,
            path: path.into(),
            query: Vec::new(),
            body: Some(body),
        }
    }

    pub fn query(mut self, key: &str, value: impl ToString) -> Self {
        self.query.push((key.to_string(), value.to_string()));
        self
    }

    pub fn query_opt(self, key: &str, value: Option<impl ToString>) -> Self {
        match value {
            Some(v) => self.query(key, v),
            None => self,
        }
    }

    pub fn query_value(&self, key: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    pub status: u16,
    pub body: String,
}

impl RawResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Performs HTTP round trips for the API client.
pub trait Transport {
    fn send(&self, request: &ApiRequest) -> std::result::Result<RawResponse, ClientError>;
}

impl<T: Transport + ?Sized> Transport for &T {
    fn send(&self, request: &ApiRequest) -> std::result::Result<RawResponse, ClientError> {
        (**self).send(request)
    }
}

/// Blocking reqwest transport bound to one host and API key.
pub struct HttpTransport {
    base_url: Url,
    headers: HeaderMap,
    client: Client,
}

impl HttpTransport {
    pub fn new(config: &Config) -> Result<Self> {
        // reqwest is built without a default crypto provider.
        let _ = rustls::crypto::ring::default_provider().install_default();

        let base_url = base_url(config.host())?;

        let mut headers = HeaderMap::new();
        let auth = HeaderValue::from_str(&config.authorization_header())
            .map_err(|_| BugsinkError::Config("API key contains invalid characters".to_string()))?;
        headers.insert(AUTHORIZATION, auth);
        headers.insert(CONTENT_TYPE, HeaderValue::from_static(JSON_MIME));
        headers.insert(ACCEPT, HeaderValue::from_static(JSON_MIME));

        let client = Client::builder()
            .timeout(DEFAULT_TIMEOUT_DURATION)
            .build()
            .map_err(ClientError::from)?;

        Ok(Self {
            base_url,
            headers,
            client,
        })
    }

    pub fn url_for(&self, request: &ApiRequest) -> std::result::Result<Url, ClientError> {
        let mut url = self
            .base_url
            .join(request.path.trim_start_matches('/'))
            .map_err(|e| ClientError::new(format!("Invalid request path {}: {}", request.path, e)))?;
        if !request.query.is_empty() {
            url.query_pairs_mut().extend_pairs(request.query.iter());
        }
        Ok(url)
    }

    /// Assemble the outgoing request with auth and JSON headers attached.
    pub fn build(&self, request: &ApiRequest) -> std::result::Result<Request, ClientError> {
        let url = self.url_for(request)?;
        let builder = self
            .client
            .request(request.method.to_reqwest(), url)
            .headers(self.headers.clone());
        let builder = match &request.body {
            Some(body) => builder.json(body),
            None => builder,
        };
        Ok(builder.build()?)
    }
}

impl Transport for HttpTransport {
    fn send(&self, request: &ApiRequest) -> std::result::Result<RawResponse, ClientError> {
        let outgoing = self.build(request)?;
        tracing::debug!(method = request.method.as_str(), url = %outgoing.url(), "sending request");

        let response = self.client.execute(outgoing)?;
        let status = response.status().as_u16();
        let body = response.text()?;
        tracing::debug!(status, bytes = body.len(), "received response");

        Ok(RawResponse { status, body })
    }
}

/// Normalize the host so relative joins keep any path prefix.
fn base_url(host: &str) -> Result<Url> {
    let normalized = format!("{}/", host.trim_end_matches('/'));
    Url::parse(&normalized)
        .map_err(|e| BugsinkError::Config(format!("Invalid BUGSINK_HOST '{}': {}", host, e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{API_KEY_VAR, HOST_VAR, MapEnvironment};
    use tempfile::TempDir;

    fn transport_for(host: &str) -> HttpTransport {
        let dir = TempDir::new().unwrap();
        let env = MapEnvironment::new()
            .with(API_KEY_VAR, "test-key")
            .with(HOST_VAR, host);
        HttpTransport::new(&Config::resolve(&env, dir.path())).unwrap()
    }

    #[test]
    fn test_url_joins_path_and_query() {
        let transport = transport_for("https://bugs.example.com");
        let request = ApiRequest::get("/api/canonical/0/issues/")
            .query("project", 8)
            .query("sort", "last_seen");

        let url = transport.url_for(&request).unwrap();
        assert_eq!(
            url.as_str(),
            "https://bugs.example.com/api/canonical/0/issues/?project=8&sort=last_seen"
        );
    }

    #[test]
    fn test_url_keeps_host_path_prefix() {
        let transport = transport_for("https://example.com/bugsink/");
        let url = transport
            .url_for(&ApiRequest::get("/api/canonical/0/teams/"))
            .unwrap();
        assert_eq!(url.as_str(), "https://example.com/bugsink/api/canonical/0/teams/");
    }

    #[test]
    fn test_invalid_host_is_config_error() {
        let dir = TempDir::new().unwrap();
        let env = MapEnvironment::new()
            .with(API_KEY_VAR, "test-key")
            .with(HOST_VAR, "not a url");
        let result = HttpTransport::new(&Config::resolve(&env, dir.path()));
        assert!(matches!(result, Err(BugsinkError::Config(_))));
    }

    fn header<'a>(request: &'a Request, name: reqwest::header::HeaderName) -> &'a str {
        request.headers()[name].to_str().unwrap()
    }

    #[test]
    fn test_get_carries_auth_and_json_headers() {
        let transport = transport_for("https://bugs.example.com");
        let request = transport
            .build(&ApiRequest::get("/api/canonical/0/teams/"))
            .unwrap();

        assert_eq!(request.method(), &reqwest::Method::GET);
        assert_eq!(
            request.url().as_str(),
            "https://bugs.example.com/api/canonical/0/teams/"
        );
        assert_eq!(header(&request, AUTHORIZATION), "Bearer test-key");
        assert_eq!(header(&request, CONTENT_TYPE), "application/json");
        assert_eq!(header(&request, ACCEPT), "application/json");
        assert!(request.body().is_none());
    }

    #[test]
    fn test_post_encodes_body_as_json() {
        let transport = transport_for("https://bugs.example.com");
        let body = serde_json::json!({"name": "Core", "visibility": "hidden"});
        let request = transport
            .build(&ApiRequest::post("/api/canonical/0/teams/", body.clone()))
            .unwrap();

        assert_eq!(request.method(), &reqwest::Method::POST);
        assert_eq!(header(&request, AUTHORIZATION), "Bearer test-key");
        assert_eq!(header(&request, CONTENT_TYPE), "application/json");
        let bytes = request.body().and_then(|b| b.as_bytes()).unwrap();
        let sent: Value = serde_json::from_slice(bytes).unwrap();
        assert_eq!(sent, body);
    }

    #[test]
    fn test_patch_targets_member_url() {
        let transport = transport_for("https://bugs.example.com");
        let request = transport
            .build(&ApiRequest::patch(
                "/api/canonical/0/projects/8/",
                serde_json::json!({"alert_on_new_issue": false}),
            ))
            .unwrap();

        assert_eq!(request.method(), &reqwest::Method::PATCH);
        assert_eq!(
            request.url().as_str(),
            "https://bugs.example.com/api/canonical/0/projects/8/"
        );
        let bytes = request.body().and_then(|b| b.as_bytes()).unwrap();
        assert_eq!(bytes, br#"{"alert_on_new_issue":false}"#);
    }

    #[test]
    fn test_query_opt_skips_none() {
        let request = ApiRequest::get("/x/").query_opt("cursor", None::<String>);
        assert!(request.query.is_empty());
        let request = ApiRequest::get("/x/").query_opt("cursor", Some("c1"));
        assert_eq!(request.query_value("cursor"), Some("c1"));
    }
}
