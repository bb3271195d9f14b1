//! HTTP client for the orchestration daemon
//!
//! A single request primitive, [`DaemonClient::perform`], plus thin typed
//! wrappers for the read endpoints. One attempt per call: no retries.

use reqwest::{Client, Method};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::{json, Value};
use std::time::Duration;
use tracing::{debug, instrument, warn};
use url::Url;

use super::error::{excerpt, ClientBuildError, DaemonError, DaemonResult, BODY_EXCERPT_LIMIT};
use super::types::{ActivityEntry, ProjectPath, TeamSnapshot, TeamSummary, TimelineEntry};

/// Characters of an unparseable body kept in a malformed-response error
const MALFORMED_EXCERPT_LIMIT: usize = 200;

/// Client for the daemon's HTTP API
#[derive(Debug, Clone)]
pub struct DaemonClient {
    client: Client,
    base_url: Url,
}

impl DaemonClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ClientBuildError> {
        let base_url =
            Url::parse(base_url.trim()).map_err(|source| ClientBuildError::InvalidUrl {
                url: base_url.to_string(),
                source,
            })?;
        if base_url.cannot_be_a_base() {
            return Err(ClientBuildError::NotABase(base_url.to_string()));
        }

        let client = Client::builder()
            .user_agent(concat!("teams-mcp/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()?;

        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Send one request to a fixed path and decode the JSON response.
    ///
    /// An empty 2xx body becomes `{"ok": true}`.
    pub async fn perform(
        &self,
        method: Method,
        path: &str,
        body: Option<&Value>,
    ) -> DaemonResult<Value> {
        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
        self.execute(method, &segments, &[], body).await
    }

    /// Segments are percent-encoded individually, so names may contain `/` or spaces
    #[instrument(skip(self, body), fields(base = %self.base_url))]
    async fn execute(
        &self,
        method: Method,
        segments: &[&str],
        query: &[(&str, u32)],
        body: Option<&Value>,
    ) -> DaemonResult<Value> {
        let path = format!("/{}", segments.join("/"));
        let url = self.endpoint(&path, segments)?;
        debug!("daemon request: {} {}", method, url);

        let mut request = self.client.request(method, url);
        if !query.is_empty() {
            request = request.query(query);
        }
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await.map_err(|e| {
            warn!(path = %path, error = %e, "daemon unreachable");
            DaemonError::Transport {
                path: path.clone(),
                reason: describe_transport_error(&e),
            }
        })?;

        let status = response.status();
        let text = response.text().await.map_err(|e| DaemonError::Transport {
            path: path.clone(),
            reason: describe_transport_error(&e),
        })?;

        if !status.is_success() {
            warn!(path = %path, status = status.as_u16(), "daemon rejected request");
            return Err(DaemonError::HttpStatus {
                path,
                status: status.as_u16(),
                body: excerpt(&text, BODY_EXCERPT_LIMIT),
            });
        }

        if text.trim().is_empty() {
            return Ok(json!({ "ok": true }));
        }

        serde_json::from_str(&text).map_err(|_| DaemonError::MalformedResponse {
            path,
            excerpt: excerpt(&text, MALFORMED_EXCERPT_LIMIT),
        })
    }

    fn endpoint(&self, path: &str, segments: &[&str]) -> DaemonResult<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| DaemonError::Transport {
                path: path.to_string(),
                reason: format!("base URL {} cannot carry a path", self.base_url),
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    pub async fn get(&self, path: &str) -> DaemonResult<Value> {
        self.perform(Method::GET, path, None).await
    }

    pub async fn post(&self, path: &str, body: &Value) -> DaemonResult<Value> {
        self.perform(Method::POST, path, Some(body)).await
    }

    /// POST a typed request body
    pub async fn send<B: Serialize>(&self, path: &str, body: &B) -> DaemonResult<Value> {
        let body = serde_json::to_value(body).map_err(|e| DaemonError::Transport {
            path: path.to_string(),
            reason: format!("could not encode request body: {}", e),
        })?;
        self.post(path, &body).await
    }

    /// GET `path` and decode into `T`; a shape mismatch counts as malformed
    pub async fn fetch<T: DeserializeOwned>(&self, path: &str) -> DaemonResult<T> {
        let value = self.get(path).await?;
        decode(path, value)
    }

    async fn read<T: DeserializeOwned>(
        &self,
        segments: &[&str],
        query: &[(&str, u32)],
    ) -> DaemonResult<T> {
        let value = self.execute(Method::GET, segments, query, None).await?;
        decode(&format!("/{}", segments.join("/")), value)
    }

    // ========================================================================
    // Read endpoints
    // ========================================================================

    pub async fn project_path(&self) -> DaemonResult<String> {
        let resp: ProjectPath = self.fetch("/project/absolute_path").await?;
        Ok(resp.path)
    }

    pub async fn teams(&self) -> DaemonResult<Vec<TeamSummary>> {
        self.fetch("/teams").await
    }

    pub async fn snapshot(&self, team: &str) -> DaemonResult<TeamSnapshot> {
        self.read(&["teams", team, "snapshot"], &[]).await
    }

    pub async fn activity(&self, team: &str, limit: u32) -> DaemonResult<Vec<ActivityEntry>> {
        self.read(&["teams", team, "activity"], &[("limit", limit)])
            .await
    }

    pub async fn timeline(
        &self,
        team: &str,
        member: &str,
        limit: u32,
    ) -> DaemonResult<Vec<TimelineEntry>> {
        self.read(
            &["teams", team, "members", member, "timeline"],
            &[("limit", limit)],
        )
        .await
    }
}

fn decode<T: DeserializeOwned>(path: &str, value: Value) -> DaemonResult<T> {
    serde_json::from_value(value.clone()).map_err(|e| DaemonError::MalformedResponse {
        path: path.to_string(),
        excerpt: format!("{}: {}", e, excerpt(&value.to_string(), MALFORMED_EXCERPT_LIMIT)),
    })
}

fn describe_transport_error(e: &reqwest::Error) -> String {
    if e.is_timeout() {
        format!("request timed out ({})", e)
    } else if e.is_connect() {
        format!("connection failed ({})", e)
    } else {
        e.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_segments_are_encoded_individually() {
        let client = DaemonClient::new("http://localhost:19277", Duration::from_secs(1)).unwrap();
        let url = client
            .endpoint("/teams/my team/x/snapshot", &["teams", "my team/x", "snapshot"])
            .unwrap();
        assert_eq!(url.as_str(), "http://localhost:19277/teams/my%20team%2Fx/snapshot");
    }

    #[test]
    fn test_base_path_prefix_kept() {
        let client =
            DaemonClient::new("http://localhost:19277/api/", Duration::from_secs(1)).unwrap();
        let url = client.endpoint("/teams", &["teams"]).unwrap();
        assert_eq!(url.as_str(), "http://localhost:19277/api/teams");
    }

    #[test]
    fn test_invalid_base_url_rejected() {
        let err = DaemonClient::new("not a url", Duration::from_secs(1)).unwrap_err();
        assert!(matches!(err, ClientBuildError::InvalidUrl { .. }));

        let err =
            DaemonClient::new("mailto:lead@example.com", Duration::from_secs(1)).unwrap_err();
        assert!(matches!(err, ClientBuildError::NotABase(_)));
    }

    #[tokio::test]
    async fn test_unreachable_daemon_is_transport_error() {
        // Port 9 (discard) is almost never listening
        let client = DaemonClient::new("http://127.0.0.1:9", Duration::from_secs(2)).unwrap();
        let err = client.get("/teams").await.unwrap_err();
        assert!(matches!(err, DaemonError::Transport { ref path, .. } if path == "/teams"));
    }
}
