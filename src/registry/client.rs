//! HTTP client for the skill registry API.
//!
//! Endpoints used:
//! - `POST /api/skills/discover` — semantic search by intent
//! - `GET  /api/skills?slug=…`   — lookup by slug
//! - `GET  /api/skills/{id}`     — lookup by identifier
//! - `GET  /api/skills?…`        — filtered listing

use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderName, HeaderValue, CONTENT_TYPE};
use reqwest::{Client, Method};
use serde_json::{json, Value};
use tracing::debug;
use url::Url;

use super::types::{ListFilters, RawSkill, SkillPage};
use super::RegistryError;
use crate::config::RegistryConfig;

/// User-Agent header sent with requests.
const USER_AGENT: &str = concat!("ardf-mcp-server/", env!("CARGO_PKG_VERSION"));

/// Client for the skill registry.
///
/// Every request is bounded by the configured deadline; a request that
/// fails for any reason is reported once and never retried.
pub struct RegistryClient {
    client: Client,
    base_url: Url,
    timeout: Duration,
    connect_timeout: Duration,
}

impl RegistryClient {
    pub fn new(config: &RegistryConfig) -> anyhow::Result<Self> {
        let base_url = config.parsed_base_url()?;

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        // Configured headers win over the defaults above
        for (name, value) in &config.headers {
            let name = HeaderName::from_bytes(name.as_bytes())
                .map_err(|e| anyhow::anyhow!("Invalid registry header name '{name}': {e}"))?;
            let value = HeaderValue::from_str(value)
                .map_err(|e| anyhow::anyhow!("Invalid value for registry header '{name}': {e}"))?;
            headers.insert(name, value);
        }

        let client = Client::builder()
            .timeout(config.timeout())
            .connect_timeout(config.connect_timeout())
            .user_agent(USER_AGENT)
            .default_headers(headers)
            .build()?;

        Ok(Self {
            client,
            base_url,
            timeout: config.timeout(),
            connect_timeout: config.connect_timeout(),
        })
    }

    /// The registry base URL, as used for every request.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Sends a request and returns the parsed JSON body.
    ///
    /// Non-2xx responses become [`RegistryError::Rejected`] with the body
    /// text as detail; network failures and undecodable bodies become
    /// [`RegistryError::Transport`].
    pub async fn request(
        &self,
        method: Method,
        url: Url,
        body: Option<&Value>,
    ) -> Result<Value, RegistryError> {
        debug!("Registry request: {method} {url}");

        let mut request = self.client.request(method, url);
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await.map_err(|e| self.transport_error(e))?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            debug!("Registry rejected request ({status}): {detail}");
            return Err(RegistryError::Rejected {
                status: status.as_u16(),
                detail,
            });
        }

        response.json::<Value>().await.map_err(|e| self.transport_error(e))
    }

    /// Semantic search: the registry ranks skills against `intent`.
    pub async fn discover(&self, intent: &str, limit: u64) -> Result<SkillPage, RegistryError> {
        let url = self.endpoint(&["api", "skills", "discover"]);
        let body = json!({ "intent": intent, "limit": limit });
        let value = self.request(Method::POST, url, Some(&body)).await?;
        parse_page(value)
    }

    /// Lookup by slug. An unknown slug yields an empty page, not an error.
    pub async fn find_by_slug(&self, slug: &str) -> Result<SkillPage, RegistryError> {
        let mut url = self.endpoint(&["api", "skills"]);
        url.query_pairs_mut().append_pair("slug", slug);
        let value = self.request(Method::GET, url, None).await?;
        parse_page(value)
    }

    /// Lookup by registry identifier. Returns `None` when the registry
    /// answers with `null` or an empty object.
    pub async fn get_by_id(&self, id: &str) -> Result<Option<RawSkill>, RegistryError> {
        let url = self.endpoint(&["api", "skills", id]);
        let value = self.request(Method::GET, url, None).await?;
        match value {
            Value::Null => Ok(None),
            Value::Object(ref map) if map.is_empty() => Ok(None),
            Value::Object(_) => serde_json::from_value(value)
                .map(Some)
                .map_err(RegistryError::malformed),
            other => Err(RegistryError::malformed(format!(
                "expected a skill object, got {}",
                json_kind(&other)
            ))),
        }
    }

    /// Filtered listing.
    pub async fn list(&self, filters: &ListFilters) -> Result<SkillPage, RegistryError> {
        let url = self.list_url(filters);
        let value = self.request(Method::GET, url, None).await?;
        parse_page(value)
    }

    fn list_url(&self, filters: &ListFilters) -> Url {
        let mut url = self.endpoint(&["api", "skills"]);
        {
            let mut query = url.query_pairs_mut();
            for (key, value) in filters.query_pairs() {
                query.append_pair(key, &value);
            }
        }
        url
    }

    /// Appends percent-encoded path segments to the base URL,
    /// keeping any path prefix the base URL already has.
    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    fn transport_error(&self, err: reqwest::Error) -> RegistryError {
        if err.is_timeout() && err.is_connect() {
            RegistryError::ConnectTimeout(self.connect_timeout)
        } else if err.is_timeout() {
            RegistryError::Timeout(self.timeout)
        } else if err.is_decode() {
            RegistryError::malformed(err)
        } else {
            RegistryError::Transport {
                cause: err.to_string(),
            }
        }
    }
}

fn parse_page(value: Value) -> Result<SkillPage, RegistryError> {
    match value {
        Value::Object(_) => serde_json::from_value(value).map_err(RegistryError::malformed),
        other => Err(RegistryError::malformed(format!(
            "expected an object with a skills array, got {}",
            json_kind(&other)
        ))),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
