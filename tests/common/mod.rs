//! Shared test utilities.

#![allow(dead_code, unused_imports)]

pub mod recording;

use std::net::{SocketAddr, TcpListener};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use tempfile::TempDir;
use wiretree::client::{MemoryDocument, MemoryHistory, Reconciler};
use wiretree::config::Config;
use wiretree::demo;
use wiretree::server::{ServerHandle, WiretreeServer};

/// Find an available port for testing.
pub fn free_port() -> u16 {
    let listener = TcpListener::bind("127.0.0.1:0").expect("Failed to bind to free port");
    listener.local_addr().unwrap().port()
}

/// Write `content` to a `config.toml` inside a fresh temp dir.
pub fn temp_config(content: &str) -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let config_path = temp_dir.path().join("config.toml");
    std::fs::write(&config_path, content).expect("Failed to write config");
    (temp_dir, config_path)
}

/// Wait for a server to become available.
pub async fn wait_for_server(addr: SocketAddr, timeout: Duration) -> bool {
    let start = std::time::Instant::now();
    while start.elapsed() < timeout {
        if tokio::net::TcpStream::connect(addr).await.is_ok() {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    false
}

/// Demo task board served on a free port.
pub struct DemoServer {
    pub addr: SocketAddr,
    pub handle: ServerHandle,
    pub store: Arc<wiretree::app::Store<demo::BoardReducer>>,
}

impl DemoServer {
    pub async fn start() -> Self {
        let mut config = Config::default();
        config.server.bind_addr = format!("127.0.0.1:{}", free_port());
        config.server.keepalive_seconds = 1;

        let store = Arc::new(demo::store());
        let mut server = WiretreeServer::new(demo::router().unwrap(), store.clone(), config);
        let addr = server.bind().await.expect("Failed to bind");
        let handle = server.handle();
        tokio::spawn(async move {
            let _ = server.run().await;
        });
        assert!(wait_for_server(addr, Duration::from_secs(2)).await);

        Self {
            addr,
            handle,
            store,
        }
    }

    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }
}

impl Drop for DemoServer {
    fn drop(&mut self) {
        self.handle.shutdown();
    }
}

/// Fresh reconciler over an empty `<div>` mount.
pub fn memory_reconciler() -> Reconciler<MemoryDocument> {
    let mut doc = MemoryDocument::new();
    let mount = wiretree::client::Document::create_element(&mut doc, "div");
    Reconciler::new(doc, mount)
}

pub fn memory_history() -> Arc<MemoryHistory> {
    Arc::new(MemoryHistory::new())
}
