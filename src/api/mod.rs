//! Property listing client.
//!
//! `PropertySource` is the seam the dashboard loads through. The HTTP
//! implementation talks to the backend's `/api/v1/properties` route; tests
//! plug in in-memory sources.

pub mod error;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

pub use error::ApiError;

/// Path of the listing route, relative to the configured base URL
const PROPERTIES_PATH: &str = "api/v1/properties";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Property {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub timezone: String,  // Stored only, never displayed
}

/// Response body of the listing route.
///
/// A body with no `data` key is an empty list, not an error. The backend
/// currently answers `{items, total}` so `items` is read as `data`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PropertyEnvelope {
    #[serde(default, alias = "items")]
    pub data: Option<Vec<Property>>,
}

impl PropertyEnvelope {
    pub fn into_list(self) -> Vec<Property> {
        self.data.unwrap_or_default()
    }
}

/// Anything that can list the current user's properties
#[async_trait]
pub trait PropertySource: Send + Sync {
    async fn list_properties(&self) -> Result<PropertyEnvelope, ApiError>;
}

/// Authenticated HTTP client for the backend
pub struct HttpPropertySource {
    client: reqwest::Client,
    url: reqwest::Url,
    token: Option<String>,
}

impl HttpPropertySource {
    pub fn new(base_url: &str, token: Option<String>, timeout: Duration) -> Result<Self, ApiError> {
        let url = properties_url(base_url)?;
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(ApiError::Transport)?;

        Ok(Self {
            client,
            url,
            token: token.filter(|t| !t.is_empty()),
        })
    }

    pub fn url(&self) -> &reqwest::Url {
        &self.url
    }
}

#[async_trait]
impl PropertySource for HttpPropertySource {
    async fn list_properties(&self) -> Result<PropertyEnvelope, ApiError> {
        let mut request = self.client.get(self.url.clone());
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        tracing::debug!(url = %self.url, "Requesting property list");
        let response = request.send().await.map_err(ApiError::Transport)?;

        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::Status { code: status.as_u16() });
        }

        response.json::<PropertyEnvelope>().await.map_err(|e| {
            if e.is_decode() {
                ApiError::Decode(e.to_string())
            } else {
                ApiError::Transport(e)
            }
        })
    }
}

/// Stand-in when the HTTP client cannot be built (bad URL, TLS setup).
/// Every load fails, so the dashboard shows its usual error state.
pub struct UnavailableSource {
    reason: String,
}

impl UnavailableSource {
    pub fn new(error: &ApiError) -> Self {
        Self { reason: error.to_string() }
    }
}

#[async_trait]
impl PropertySource for UnavailableSource {
    async fn list_properties(&self) -> Result<PropertyEnvelope, ApiError> {
        Err(ApiError::Unavailable(self.reason.clone()))
    }
}

/// Join the base URL with the listing route (trailing slashes tolerated)
fn properties_url(base_url: &str) -> Result<reqwest::Url, ApiError> {
    let joined = format!("{}/{}", base_url.trim().trim_end_matches('/'), PROPERTIES_PATH);
    reqwest::Url::parse(&joined).map_err(|e| ApiError::InvalidUrl {
        url: base_url.to_string(),
        reason: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    /// Serve exactly one canned HTTP response on a random local port
    async fn serve_once(status_line: &'static str, body: &'static str) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut buf = [0u8; 4096];
            let _ = socket.read(&mut buf).await;
            let response = format!(
                "HTTP/1.1 {}\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{}",
                status_line,
                body.len(),
                body
            );
            let _ = socket.write_all(response.as_bytes()).await;
            let _ = socket.shutdown().await;
        });

        format!("http://{}", addr)
    }

    #[test]
    fn test_envelope_with_data() {
        let body = r#"{"data":[{"id":"p1","name":"Alpha","timezone":"UTC"},{"id":"p2","name":"Beta","timezone":"Europe/Paris"}]}"#;
        let list = serde_json::from_str::<PropertyEnvelope>(body).unwrap().into_list();

        assert_eq!(list.len(), 2);
        assert_eq!(list[0].id, "p1");
        assert_eq!(list[1].timezone, "Europe/Paris");
    }

    #[test]
    fn test_envelope_missing_data_is_empty() {
        let list = serde_json::from_str::<PropertyEnvelope>("{}").unwrap().into_list();
        assert!(list.is_empty());

        let list = serde_json::from_str::<PropertyEnvelope>(r#"{"data":null}"#).unwrap().into_list();
        assert!(list.is_empty());
    }

    #[test]
    fn test_envelope_accepts_backend_items_shape() {
        let body = r#"{"items":[{"id":"p9","name":"Gamma","timezone":"UTC"}],"total":1}"#;
        let list = serde_json::from_str::<PropertyEnvelope>(body).unwrap().into_list();

        assert_eq!(list, vec![Property {
            id: "p9".to_string(),
            name: "Gamma".to_string(),
            timezone: "UTC".to_string(),
        }]);
    }

    #[test]
    fn test_missing_timezone_defaults_empty() {
        let body = r#"{"data":[{"id":"p1","name":"Alpha"}]}"#;
        let list = serde_json::from_str::<PropertyEnvelope>(body).unwrap().into_list();
        assert_eq!(list[0].timezone, "");
    }

    #[test]
    fn test_properties_url() {
        assert_eq!(
            properties_url("http://localhost:8000").unwrap().as_str(),
            "http://localhost:8000/api/v1/properties"
        );
        assert_eq!(
            properties_url("https://example.com/backend/").unwrap().as_str(),
            "https://example.com/backend/api/v1/properties"
        );
        assert!(matches!(properties_url("not a url"), Err(ApiError::InvalidUrl { .. })));
    }

    #[tokio::test]
    async fn test_unavailable_source_always_fails() {
        let error = HttpPropertySource::new("not a url", None, Duration::from_secs(5))
            .err()
            .unwrap();
        let source = UnavailableSource::new(&error);

        match source.list_properties().await {
            Err(ApiError::Unavailable(reason)) => assert!(reason.contains("not a url")),
            other => panic!("expected unavailable error, got {:?}", other.map(|e| e.into_list())),
        }
    }

    #[tokio::test]
    async fn test_http_source_lists_properties() {
        let base = serve_once("200 OK", r#"{"data":[{"id":"p1","name":"Alpha","timezone":"UTC"}]}"#).await;
        let source = HttpPropertySource::new(&base, Some("secret".into()), Duration::from_secs(5)).unwrap();

        let list = source.list_properties().await.unwrap().into_list();
        assert_eq!(list.len(), 1);
        assert_eq!(list[0].name, "Alpha");
    }

    #[tokio::test]
    async fn test_http_source_reports_status() {
        let base = serve_once("500 Internal Server Error", r#"{"detail":"Failed to load properties"}"#).await;
        let source = HttpPropertySource::new(&base, None, Duration::from_secs(5)).unwrap();

        match source.list_properties().await {
            Err(ApiError::Status { code }) => assert_eq!(code, 500),
            other => panic!("expected status error, got {:?}", other.map(|e| e.into_list())),
        }
    }

    #[tokio::test]
    async fn test_http_source_reports_malformed_body() {
        let base = serve_once("200 OK", "not json").await;
        let source = HttpPropertySource::new(&base, None, Duration::from_secs(5)).unwrap();

        assert!(matches!(source.list_properties().await, Err(ApiError::Decode(_))));
    }
}
