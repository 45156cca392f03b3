use std::convert::Infallible;

use axum::extract::{Path, State};
use axum::http::header::CONTENT_TYPE;
use axum::http::{HeaderMap, StatusCode, Uri};
use axum::response::sse::{Event, KeepAlive, Sse};
use axum::response::{Html, IntoResponse, Response};
use axum::Json;
use futures::Stream;
use serde::Serialize;

use crate::app::{ActionEnvelope, NAVIGATE_ACTION, SESSION_HEADER};

use super::context::AppContext;
use super::error::ServerError;

#[derive(Debug, Serialize)]
pub struct HealthStatus {
    pub status: &'static str,
    pub service: &'static str,
}

#[derive(Debug, Serialize)]
pub struct SessionCreated {
    pub session: String,
}

pub async fn health() -> Json<HealthStatus> {
    Json(HealthStatus {
        status: "healthy",
        service: "wiretree",
    })
}

pub async fn create_session(State(ctx): State<AppContext>) -> Json<SessionCreated> {
    Json(SessionCreated {
        session: ctx.sessions.create("/"),
    })
}

pub async fn index(State(ctx): State<AppContext>) -> Result<Response, ServerError> {
    first_paint(&ctx, "/")
}

/// Routes see the raw, still-encoded path; params are decoded once, by
/// the router.
pub async fn page(State(ctx): State<AppContext>, uri: Uri) -> Result<Response, ServerError> {
    first_paint(&ctx, uri.path())
}

fn first_paint(ctx: &AppContext, path: &str) -> Result<Response, ServerError> {
    let (page, html) = ctx.first_paint(path)?;
    let status = if page.found {
        StatusCode::OK
    } else {
        StatusCode::NOT_FOUND
    };
    tracing::info!(path = %path, rendered = %page.path, status = status.as_u16(), "First paint");
    Ok((status, Html(html)).into_response())
}

/// `POST /_action/{name}`: apply the action, answer with the session's
/// new snapshot.
pub async fn action(
    State(ctx): State<AppContext>,
    Path(name): Path<String>,
    headers: HeaderMap,
    Json(envelope): Json<ActionEnvelope>,
) -> Result<Response, ServerError> {
    let session = headers
        .get(SESSION_HEADER)
        .and_then(|v| v.to_str().ok())
        .ok_or(ServerError::MissingSession)?
        .to_string();
    if !ctx.sessions.touch(&session) {
        return Err(ServerError::UnknownSession(session));
    }
    if envelope.action != name {
        return Err(ServerError::InvalidRequest(format!(
            "URL names action '{}' but body carries '{}'",
            name, envelope.action
        )));
    }

    match envelope.navigate_path() {
        Some(path) => {
            ctx.sessions.set_path(&session, path);
            tracing::debug!(session = %session, path = %path, "Navigated");
        }
        None if envelope.action == NAVIGATE_ACTION => {
            return Err(ServerError::InvalidRequest(
                "navigate requires a string 'path'".to_string(),
            ));
        }
        None => {
            let revision = ctx.state.dispatch(&envelope)?;
            tracing::info!(action = %envelope.action, revision, "Action applied");
        }
    }

    let bytes = ctx.session_snapshot(&session)?;
    Ok(([(CONTENT_TYPE, "application/json")], bytes).into_response())
}

/// `GET /_events/{session}`: one frame with the full snapshot now, then
/// one per state revision until the client leaves or the server stops.
/// The session ends when its last push stream closes.
pub async fn events(
    State(ctx): State<AppContext>,
    Path(session): Path<String>,
) -> Result<Sse<impl Stream<Item = Result<Event, Infallible>>>, ServerError> {
    let Some(lease) = ctx.sessions.open_stream(&session) else {
        return Err(ServerError::UnknownSession(session));
    };
    tracing::info!(session = %session, "Push stream opened");

    let keepalive = ctx.config.server.keepalive();
    let revisions = ctx.state.subscribe();
    let stream = futures::stream::unfold(
        (ctx, lease, revisions, true),
        |(ctx, lease, mut revisions, first)| async move {
            if !first {
                tokio::select! {
                    changed = revisions.changed() => {
                        if changed.is_err() {
                            return None;
                        }
                    }
                    _ = ctx.shutdown.cancelled() => return None,
                }
            }
            let _ = revisions.borrow_and_update();
            let event = snapshot_event(&ctx, lease.session());
            Some((Ok(event), (ctx, lease, revisions, false)))
        },
    );

    Ok(Sse::new(stream).keep_alive(KeepAlive::new().interval(keepalive)))
}

fn snapshot_event(ctx: &AppContext, session: &str) -> Event {
    match ctx.session_snapshot(session) {
        Ok(bytes) => Event::default().data(String::from_utf8_lossy(&bytes)),
        Err(err) => {
            tracing::warn!(session = %session, error = %err, "Push frame render failed");
            Event::default().comment("render-error")
        }
    }
}
