use async_trait::async_trait;
use parking_lot::RwLock;
use reqwest::header::CONTENT_TYPE;
use reqwest::Client;
use serde::Deserialize;
use thiserror::Error;

use crate::app::{ActionEnvelope, SESSION_HEADER};
use crate::config::ClientConfig;

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("Connection to {url} failed: {message}")]
    Connect { url: String, message: String },

    #[error("Server answered {status} for action '{action}'")]
    Status { action: String, status: u16 },

    #[error("Failed to read response body: {0}")]
    Body(String),
}

impl TransportError {
    /// The peer could not be reached at all, as opposed to answering badly.
    pub fn is_connectivity(&self) -> bool {
        matches!(self, TransportError::Connect { .. })
    }

    fn connect(url: &str, err: reqwest::Error) -> Self {
        TransportError::Connect {
            url: url.to_string(),
            message: err.to_string(),
        }
    }
}

/// Request/response channel for user actions.
#[async_trait]
pub trait ActionTransport: Send + Sync {
    /// Post an envelope and return the raw snapshot bytes.
    async fn post(&self, envelope: &ActionEnvelope) -> Result<Vec<u8>, TransportError>;
}

#[derive(Deserialize)]
struct SessionResponse {
    session: String,
}

/// reqwest-backed transport talking to a wiretree server.
pub struct HttpTransport {
    client: Client,
    base_url: String,
    session: RwLock<Option<String>>,
}

impl HttpTransport {
    pub fn new(base_url: impl Into<String>) -> Result<Self, TransportError> {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        let client = Client::builder()
            .build()
            .map_err(|e| TransportError::connect(&base_url, e))?;
        Ok(Self {
            client,
            base_url,
            session: RwLock::new(None),
        })
    }

    /// Transport for `client.base_url`.
    pub fn from_config(config: &ClientConfig) -> Result<Self, TransportError> {
        Self::new(config.base_url.as_str())
    }

    pub fn with_session(self, session: impl Into<String>) -> Self {
        *self.session.write() = Some(session.into());
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn client(&self) -> &Client {
        &self.client
    }

    pub fn session(&self) -> Option<String> {
        self.session.read().clone()
    }

    /// Ask the server for a fresh session and remember it.
    pub async fn open_session(&self) -> Result<String, TransportError> {
        let url = format!("{}/_session", self.base_url);
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| TransportError::connect(&url, e))?;
        if !response.status().is_success() {
            return Err(TransportError::Status {
                action: "_session".to_string(),
                status: response.status().as_u16(),
            });
        }
        let body: SessionResponse = response
            .json()
            .await
            .map_err(|e| TransportError::Body(e.to_string()))?;
        *self.session.write() = Some(body.session.clone());
        Ok(body.session)
    }

    pub fn action_url(&self, action: &str) -> String {
        format!("{}/_action/{}", self.base_url, action)
    }

    pub fn events_url(&self, session: &str) -> String {
        format!("{}/_events/{}", self.base_url, session)
    }
}

#[async_trait]
impl ActionTransport for HttpTransport {
    async fn post(&self, envelope: &ActionEnvelope) -> Result<Vec<u8>, TransportError> {
        let url = self.action_url(&envelope.action);
        let mut request = self
            .client
            .post(&url)
            .header(CONTENT_TYPE, "application/json")
            .json(envelope);
        if let Some(session) = self.session() {
            request = request.header(SESSION_HEADER, session);
        }

        let response = request
            .send()
            .await
            .map_err(|e| TransportError::connect(&url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(TransportError::Status {
                action: envelope.action.clone(),
                status: status.as_u16(),
            });
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| TransportError::Body(e.to_string()))?;
        Ok(body.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn urls_are_built_from_trimmed_base() {
        let transport = HttpTransport::new("http://127.0.0.1:8080/").unwrap();
        assert_eq!(transport.base_url(), "http://127.0.0.1:8080");
        assert_eq!(
            transport.action_url("toggle"),
            "http://127.0.0.1:8080/_action/toggle"
        );
        assert_eq!(
            transport.events_url("abc"),
            "http://127.0.0.1:8080/_events/abc"
        );
    }

    #[test]
    fn base_url_comes_from_client_config() {
        let config = ClientConfig {
            base_url: "http://10.0.0.2:9000/".to_string(),
            ..ClientConfig::default()
        };
        let transport = HttpTransport::from_config(&config).unwrap();
        assert_eq!(transport.events_url("s"), "http://10.0.0.2:9000/_events/s");
    }

    #[test]
    fn only_connect_failures_count_as_offline() {
        let offline = TransportError::Connect {
            url: "u".into(),
            message: "refused".into(),
        };
        let status = TransportError::Status {
            action: "a".into(),
            status: 500,
        };
        assert!(offline.is_connectivity());
        assert!(!status.is_connectivity());
        assert!(!TransportError::Body("x".into()).is_connectivity());
    }
}
