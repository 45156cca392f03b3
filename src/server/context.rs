use std::sync::Arc;

use crate::app::StateLayer;
use crate::config::Config;
use crate::render::{not_found_node, render_document, DocumentOptions, Snapshot};
use crate::router::{Followed, Resolution, Router};
use crate::view::ViewNode;

use super::error::ServerError;
use super::session::SessionStore;
use super::shutdown::ShutdownManager;

/// Outcome of rendering one path for one request.
#[derive(Debug, Clone)]
pub struct RenderedPage {
    /// Path that finally rendered, after redirects.
    pub path: String,
    pub tree: ViewNode,
    pub found: bool,
}

/// Shared state behind every handler.
#[derive(Clone)]
pub struct AppContext {
    pub router: Arc<Router>,
    pub state: Arc<dyn StateLayer>,
    pub sessions: Arc<SessionStore>,
    pub config: Arc<Config>,
    pub shutdown: Arc<ShutdownManager>,
}

impl AppContext {
    pub fn new(router: Router, state: Arc<dyn StateLayer>, config: Config) -> Self {
        Self {
            router: Arc::new(router),
            state,
            sessions: Arc::new(SessionStore::new()),
            config: Arc::new(config),
            shutdown: Arc::new(ShutdownManager::new()),
        }
    }

    /// Resolve `path` against the current model. Not-found and runaway
    /// redirect chains both render the not-found page.
    pub fn render_path(&self, path: &str) -> Result<RenderedPage, ServerError> {
        let model = self.state.view_model();
        let max_redirects = self.config.routing.max_redirects;

        match self.router.resolve_following(path, &model, max_redirects) {
            Ok(Followed {
                path,
                resolution: Resolution::Rendered(tree),
            }) => Ok(RenderedPage {
                path,
                tree,
                found: true,
            }),
            Ok(Followed { path, .. }) => Ok(RenderedPage {
                tree: not_found_node(&path),
                path,
                found: false,
            }),
            Err(err) if err.is_redirect_overflow() => {
                tracing::warn!(path = %path, error = %err, "Redirect chain abandoned");
                Ok(RenderedPage {
                    path: path.to_string(),
                    tree: not_found_node(path),
                    found: false,
                })
            }
            Err(err) => Err(err.into()),
        }
    }

    /// Wire snapshot for whatever the session currently shows. Action
    /// responses and push frames both come from here, so an echo of the
    /// same state is byte-identical.
    pub fn session_snapshot(&self, session: &str) -> Result<Vec<u8>, ServerError> {
        let path = self
            .sessions
            .path(session)
            .ok_or_else(|| ServerError::UnknownSession(session.to_string()))?;
        let page = self.render_path(&path)?;
        if page.path != path {
            self.sessions.set_path(session, &page.path);
        }
        Ok(Snapshot::from_tree(page.tree).to_bytes()?)
    }

    /// First paint: render the full document and, when the path exists,
    /// open a session for it. Not-found pages get no session.
    pub fn first_paint(&self, path: &str) -> Result<(RenderedPage, String), ServerError> {
        let page = self.render_path(path)?;
        let session = page.found.then(|| self.sessions.create(&page.path));
        let opts = DocumentOptions {
            mount_id: self.config.server.mount_id.clone(),
            session,
            ..DocumentOptions::default()
        };
        let html = render_document(page.tree.clone(), &opts)?;
        Ok((page, html))
    }
}
