//! HTTP surface: first-paint HTML, the action endpoint and the push
//! channel, served by axum.

mod connection;
mod context;
mod error;
mod handlers;
mod session;
mod shutdown;

pub use context::{AppContext, RenderedPage};
pub use error::ServerError;
pub use handlers::{HealthStatus, SessionCreated};
pub use session::{Session, SessionStore, StreamLease};
pub use shutdown::ShutdownManager;

use std::future::IntoFuture;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::routing::{get, post};
use axum::Router;
use tokio::net::TcpListener;

use crate::app::StateLayer;
use crate::config::Config;
use crate::router::Router as RouteTable;

use connection::ConnectionCounter;

/// Build the axum router. Exposed separately so tests can drive it
/// without binding a socket.
pub fn build_router(ctx: AppContext) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        .route("/_session", get(handlers::create_session))
        .route("/_action/{name}", post(handlers::action))
        .route("/_events/{session}", get(handlers::events))
        .route("/", get(handlers::index))
        .route("/{*path}", get(handlers::page))
        .with_state(ctx)
}

pub struct WiretreeServer {
    pub addr: SocketAddr,
    /// Bound by [`bind`](Self::bind), consumed by [`run`](Self::run).
    listener: Option<TcpListener>,
    ctx: AppContext,
}

impl WiretreeServer {
    pub fn new(routes: RouteTable, state: Arc<dyn StateLayer>, config: Config) -> Self {
        let addr = config
            .server
            .socket_addr()
            .unwrap_or_else(|| SocketAddr::from(([127, 0, 0, 1], 0)));
        Self {
            addr,
            listener: None,
            ctx: AppContext::new(routes, state, config),
        }
    }

    pub fn context(&self) -> &AppContext {
        &self.ctx
    }

    /// Bind now so the port is held before `run` is spawned. Returns the
    /// actual address, which matters when the configured port is 0.
    pub async fn bind(&mut self) -> std::io::Result<SocketAddr> {
        let listener = TcpListener::bind(self.addr).await?;
        self.addr = listener.local_addr()?;
        self.listener = Some(listener);
        Ok(self.addr)
    }

    pub fn handle(&self) -> ServerHandle {
        ServerHandle {
            shutdown: self.ctx.shutdown.clone(),
        }
    }

    pub async fn run(mut self) -> std::io::Result<()> {
        let listener = match self.listener.take() {
            Some(listener) => listener,
            None => TcpListener::bind(self.addr).await?,
        };
        let addr = listener.local_addr()?;
        tracing::info!(%addr, "wiretree listening");

        let shutdown = self.ctx.shutdown.clone();
        let app = build_router(self.ctx.clone());
        let make_service = ConnectionCounter::new(app.into_make_service(), shutdown.clone());

        let sweeper = tokio::spawn(sweep_sessions(
            self.ctx.sessions.clone(),
            shutdown.clone(),
            self.ctx.config.server.session_ttl(),
        ));

        let signal = shutdown.clone();
        axum::serve(listener, make_service)
            .with_graceful_shutdown(async move {
                if let Err(e) = signal.wait_for_shutdown().await {
                    tracing::error!(error = %e, "Signal handler failed, waiting for explicit shutdown");
                    signal.cancelled().await;
                }
            })
            .into_future()
            .await?;

        shutdown.wait_for_connections(Duration::from_secs(10)).await;
        sweeper.abort();
        Ok(())
    }
}

/// Periodically drop sessions that went idle without a push stream.
async fn sweep_sessions(sessions: Arc<SessionStore>, shutdown: Arc<ShutdownManager>, ttl: Duration) {
    let mut tick = tokio::time::interval(ttl);
    tick.tick().await;
    loop {
        tokio::select! {
            _ = tick.tick() => {
                sessions.sweep_idle(ttl);
            }
            _ = shutdown.cancelled() => break,
        }
    }
}

/// Cloneable trigger for stopping a running server.
#[derive(Clone)]
pub struct ServerHandle {
    shutdown: Arc<ShutdownManager>,
}

impl ServerHandle {
    pub fn shutdown(&self) {
        self.shutdown.signal_shutdown();
    }
}
