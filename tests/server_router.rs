//! In-process requests against the axum router, no socket involved.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;
use wiretree::app::SESSION_HEADER;
use wiretree::config::Config;
use wiretree::demo;
use wiretree::render::Snapshot;
use wiretree::router::{RouteDefinition, Router};
use wiretree::server::{build_router, AppContext};
use wiretree::view::ViewNode;

fn context() -> AppContext {
    AppContext::new(
        demo::router().unwrap(),
        Arc::new(demo::store()),
        Config::default(),
    )
}

async fn body_bytes(response: axum::response::Response) -> Vec<u8> {
    response.into_body().collect().await.unwrap().to_bytes().to_vec()
}

#[tokio::test]
async fn health_is_served() {
    let response = build_router(context())
        .oneshot(Request::get("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = serde_json::from_slice(&body_bytes(response).await).unwrap();
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
async fn first_paint_opens_a_session_for_the_rendered_path() {
    let ctx = context();
    let response = build_router(ctx.clone())
        .oneshot(Request::get("/archive/2023/jan").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(ctx.sessions.len(), 1);

    let html = String::from_utf8(body_bytes(response).await).unwrap();
    assert!(html.contains("data-key=\"task-list\""));
}

#[tokio::test]
async fn action_round_trip_updates_state() {
    let ctx = context();
    let session = ctx.sessions.create("/tasks");

    let request = Request::post("/_action/add")
        .header(header::CONTENT_TYPE, "application/json")
        .header(SESSION_HEADER, &session)
        .body(Body::from(
            json!({"action": "add", "payload": {"title": "Ship it"}}).to_string(),
        ))
        .unwrap();
    let response = build_router(ctx.clone()).oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let snapshot = Snapshot::from_slice(&body_bytes(response).await).unwrap();
    let wire = serde_json::to_string(&snapshot.root).unwrap();
    assert!(wire.contains("Ship it"));
    assert_eq!(ctx.state.revision(), 1);
}

#[tokio::test]
async fn mismatched_action_name_is_rejected() {
    let ctx = context();
    let session = ctx.sessions.create("/tasks");

    let request = Request::post("/_action/remove")
        .header(header::CONTENT_TYPE, "application/json")
        .header(SESSION_HEADER, &session)
        .body(Body::from(json!({"action": "add"}).to_string()))
        .unwrap();
    let response = build_router(ctx).oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body: Value = serde_json::from_slice(&body_bytes(response).await).unwrap();
    assert_eq!(body["error"]["type"], "invalid_request");
}

#[tokio::test]
async fn push_stream_for_unknown_session_is_404() {
    let response = build_router(context())
        .oneshot(Request::get("/_events/missing").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

fn tag_context() -> AppContext {
    let router = Router::new(vec![RouteDefinition::new("/tags/:name").page(|props| {
        Ok(ViewNode::new("p")
            .key("tag")
            .text(format!("[{}]", props.param("name").unwrap_or_default())))
    })])
    .unwrap();
    AppContext::new(router, Arc::new(demo::store()), Config::default())
}

async fn get_html(ctx: &AppContext, uri: &str) -> (StatusCode, String) {
    let response = build_router(ctx.clone())
        .oneshot(Request::get(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    (status, String::from_utf8(body_bytes(response).await).unwrap())
}

#[tokio::test]
async fn path_params_are_decoded_exactly_once() {
    let ctx = tag_context();

    let (status, html) = get_html(&ctx, "/tags/%2541").await;
    assert_eq!(status, StatusCode::OK);
    assert!(html.contains("[%41]"), "{html}");

    let (status, html) = get_html(&ctx, "/tags/a%2Fb").await;
    assert_eq!(status, StatusCode::OK);
    assert!(html.contains("[a/b]"), "{html}");
}

#[tokio::test]
async fn not_found_first_paint_opens_no_session() {
    let ctx = context();
    for _ in 0..20 {
        let (status, html) = get_html(&ctx, "/favicon.ico").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(!html.contains("wiretree-session"));
    }
    assert!(ctx.sessions.is_empty());
}

#[tokio::test]
async fn closing_the_push_stream_ends_the_session() {
    let ctx = context();
    let session = ctx.sessions.create("/tasks");

    let response = build_router(ctx.clone())
        .oneshot(
            Request::get(format!("/_events/{session}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert!(ctx.sessions.contains(&session));

    drop(response);
    assert!(!ctx.sessions.contains(&session));
}
