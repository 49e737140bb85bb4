// Blocking HTTP client for the Group Project Manager API. Thin by design:
// verb helpers hand back the status code and the parsed JSON body, and the
// managers decide what each combination means. The client is rebuilt on
// every login so each session starts with a fresh cookie jar, the same way
// the server opens a new session per login.

use anyhow::Context;
use reqwest::blocking::{Client, RequestBuilder};
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use reqwest::Method;
use serde_json::Value;

use crate::domain::token::Token;
use crate::error::{Error, Result};

pub const DEFAULT_BASE_URL: &str = "http://localhost:8000/api/v1/";

/// Status + parsed body of one API call. `body` is `Null` when the server
/// sent nothing (204s, mostly).
#[derive(Debug, Clone)]
pub struct ApiResponse {
    pub status: u16,
    pub body: Value,
}

impl ApiResponse {
    /// Turn a non-success response into a `Remote` error carrying the
    /// server's detail text.
    pub fn into_remote_error(self) -> Error {
        Error::Remote {
            status: self.status,
            detail: error_detail(&self.body),
        }
    }
}

/// Render the server's error body into something readable. DRF-style
/// per-field mappings (`{"name": ["msg", ...]}`) become one line per field;
/// a plain `detail` string passes through.
pub fn error_detail(body: &Value) -> String {
    if let Some(detail) = body.get("detail").and_then(Value::as_str) {
        return detail.to_owned();
    }
    if let Some(map) = body.as_object() {
        let mut lines = Vec::new();
        for (field, messages) in map {
            let joined = match messages {
                Value::Array(items) => items
                    .iter()
                    .map(|m| m.as_str().map(str::to_owned).unwrap_or_else(|| m.to_string()))
                    .collect::<Vec<_>>()
                    .join(" "),
                other => other.to_string(),
            };
            lines.push(format!("- {field}: {joined}"));
        }
        if !lines.is_empty() {
            return lines.join("\n");
        }
    }
    if body.is_null() {
        "no detail provided".to_owned()
    } else {
        body.to_string()
    }
}

pub struct ApiClient {
    client: Client,
    base_url: String,
    token: Option<Token>,
}

impl ApiClient {
    /// Configure from the `GPM_API_URL` environment variable, defaulting to
    /// a local development server.
    pub fn from_env() -> anyhow::Result<Self> {
        let base_url = std::env::var("GPM_API_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.into());
        Self::new(base_url)
    }

    pub fn new(base_url: impl Into<String>) -> anyhow::Result<Self> {
        let mut base_url = base_url.into();
        if !base_url.ends_with('/') {
            base_url.push('/');
        }
        let client = Client::builder()
            .cookie_store(true)
            .build()
            .context("Failed to build HTTP client")?;
        Ok(ApiClient {
            client,
            base_url,
            token: None,
        })
    }

    /// Fresh client (and cookie jar) for a new login. Keeps base URL and
    /// drops any previous token.
    pub fn reset_session(&mut self) -> Result<()> {
        self.client = Client::builder().cookie_store(true).build()?;
        self.token = None;
        Ok(())
    }

    pub fn set_token(&mut self, token: Token) {
        self.token = Some(token);
    }

    pub fn clear_token(&mut self) {
        self.token = None;
    }

    pub fn has_token(&self) -> bool {
        self.token.is_some()
    }

    /// Staff claim from the current token; false when unauthenticated.
    pub fn is_staff(&self) -> bool {
        self.token.as_ref().map_or(false, Token::is_staff)
    }

    fn auth_headers(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();
        if let Some(token) = &self.token {
            let value = format!("Bearer {}", token.access());
            if let Ok(header) = HeaderValue::from_str(&value) {
                headers.insert(AUTHORIZATION, header);
            }
        }
        headers
    }

    fn send(&self, request: RequestBuilder) -> Result<ApiResponse> {
        let response = request.headers(self.auth_headers()).send()?;
        let status = response.status().as_u16();
        let body = response.json::<Value>().unwrap_or(Value::Null);
        Ok(ApiResponse { status, body })
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = format!("{}{}", self.base_url, path);
        self.client.request(method, url)
    }

    pub fn get(&self, path: &str) -> Result<ApiResponse> {
        self.send(self.request(Method::GET, path))
    }

    pub fn post(&self, path: &str, body: &Value) -> Result<ApiResponse> {
        self.send(self.request(Method::POST, path).json(body))
    }

    /// POST without a body (join, logout).
    pub fn post_empty(&self, path: &str) -> Result<ApiResponse> {
        self.send(self.request(Method::POST, path))
    }

    pub fn patch(&self, path: &str, body: &Value) -> Result<ApiResponse> {
        self.send(self.request(Method::PATCH, path).json(body))
    }

    pub fn delete(&self, path: &str) -> Result<ApiResponse> {
        self.send(self.request(Method::DELETE, path))
    }
}
