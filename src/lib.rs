//! Server-driven UI over plain view trees.
//!
//! ```text
//! state layer ──→ router ──→ render ──→ wire ──→ client reconciler
//!      ↑                                              │
//!      └──────────── action envelope ←── dispatcher ←─┘
//! ```
//!
//! - [`view`]: the canonical node format shared by server and client
//! - [`router`]: nested route/layout/guard resolution
//! - [`render`]: first-paint HTML and JSON wire snapshots
//! - [`client`]: keyed DOM reconciliation and the transport dispatcher
//! - [`server`]: axum host for the action endpoint and push channel

pub mod app;
pub mod client;
pub mod config;
pub mod demo;
pub mod logging;
pub mod render;
pub mod router;
pub mod server;
pub mod sse;
pub mod view;
