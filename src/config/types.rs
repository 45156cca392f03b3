use std::net::SocketAddr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Root configuration container.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub routing: RoutingConfig,
    #[serde(default)]
    pub client: ClientConfig,
}

/// HTTP server settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Bind address (host:port).
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,
    /// Interval between keep-alive comments on push streams (default: 15).
    #[serde(default = "default_keepalive_seconds")]
    pub keepalive_seconds: u64,
    /// Sessions without a push stream are dropped after this much
    /// inactivity (default: 600).
    #[serde(default = "default_session_ttl_seconds")]
    pub session_ttl_seconds: u64,
    /// Id of the element the app is mounted into.
    #[serde(default = "default_mount_id")]
    pub mount_id: String,
}

/// Route resolution settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoutingConfig {
    /// Redirect hops followed before giving up (default: 1).
    #[serde(default = "default_max_redirects")]
    pub max_redirects: usize,
}

/// Client runtime settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Quiet period before a debounced input is sent (default: 300).
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,
    /// Server the client talks to.
    #[serde(default = "default_base_url")]
    pub base_url: String,
}

fn default_bind_addr() -> String {
    "127.0.0.1:8080".to_string()
}

fn default_keepalive_seconds() -> u64 {
    15
}

fn default_session_ttl_seconds() -> u64 {
    600
}

fn default_mount_id() -> String {
    "app".to_string()
}

fn default_max_redirects() -> usize {
    1
}

fn default_debounce_ms() -> u64 {
    300
}

fn default_base_url() -> String {
    "http://127.0.0.1:8080".to_string()
}

impl ServerConfig {
    pub fn socket_addr(&self) -> Option<SocketAddr> {
        self.bind_addr.parse().ok()
    }

    pub fn keepalive(&self) -> Duration {
        Duration::from_secs(self.keepalive_seconds)
    }

    pub fn session_ttl(&self) -> Duration {
        Duration::from_secs(self.session_ttl_seconds)
    }
}

impl ClientConfig {
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: default_bind_addr(),
            keepalive_seconds: default_keepalive_seconds(),
            session_ttl_seconds: default_session_ttl_seconds(),
            mount_id: default_mount_id(),
        }
    }
}

impl Default for RoutingConfig {
    fn default() -> Self {
        Self {
            max_redirects: default_max_redirects(),
        }
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            debounce_ms: default_debounce_ms(),
            base_url: default_base_url(),
        }
    }
}
