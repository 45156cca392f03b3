use std::sync::Arc;

use indexmap::IndexMap;
use serde_json::Value;

use crate::view::ViewNode;

/// Input handed to pages, layouts and guards: extracted params plus the
/// view model supplied by the state layer.
#[derive(Debug, Clone, Default)]
pub struct Props {
    /// Path parameters in pattern order.
    pub params: IndexMap<String, String>,
    pub model: Value,
}

impl Props {
    pub fn param(&self, name: &str) -> Option<&str> {
        self.params.get(name).map(String::as_str)
    }

    /// Top-level field of the view model.
    pub fn field(&self, name: &str) -> Option<&Value> {
        self.model.get(name)
    }
}

/// Outcome of a guard. Guards never signal control flow through errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardDecision {
    Allow,
    Redirect(String),
}

pub type PageFn = Arc<dyn Fn(&Props) -> anyhow::Result<ViewNode> + Send + Sync>;
/// Receives the already-wrapped inner tree as its children.
pub type LayoutFn = Arc<dyn Fn(ViewNode, &Props) -> anyhow::Result<ViewNode> + Send + Sync>;
pub type GuardFn = Arc<dyn Fn(&Props) -> anyhow::Result<GuardDecision> + Send + Sync>;

/// A route as declared by the application. Compiled by
/// [`Router::new`](super::Router::new); never consulted afterwards.
#[derive(Clone)]
pub struct RouteDefinition {
    pub(crate) pattern: String,
    pub(crate) page: Option<PageFn>,
    pub(crate) layout: Option<LayoutFn>,
    pub(crate) guard: Option<GuardFn>,
    pub(crate) redirect_to: Option<String>,
    pub(crate) children: Vec<RouteDefinition>,
}

impl RouteDefinition {
    pub fn new(pattern: impl Into<String>) -> Self {
        Self {
            pattern: pattern.into(),
            page: None,
            layout: None,
            guard: None,
            redirect_to: None,
            children: Vec::new(),
        }
    }

    pub fn page<F>(mut self, page: F) -> Self
    where
        F: Fn(&Props) -> anyhow::Result<ViewNode> + Send + Sync + 'static,
    {
        self.page = Some(Arc::new(page));
        self
    }

    pub fn layout<F>(mut self, layout: F) -> Self
    where
        F: Fn(ViewNode, &Props) -> anyhow::Result<ViewNode> + Send + Sync + 'static,
    {
        self.layout = Some(Arc::new(layout));
        self
    }

    pub fn guard<F>(mut self, guard: F) -> Self
    where
        F: Fn(&Props) -> anyhow::Result<GuardDecision> + Send + Sync + 'static,
    {
        self.guard = Some(Arc::new(guard));
        self
    }

    /// Static redirect. Children are not considered once this matches.
    pub fn redirect_to(mut self, target: impl Into<String>) -> Self {
        self.redirect_to = Some(target.into());
        self
    }

    pub fn child(mut self, child: RouteDefinition) -> Self {
        self.children.push(child);
        self
    }

    pub fn children(mut self, children: impl IntoIterator<Item = RouteDefinition>) -> Self {
        self.children.extend(children);
        self
    }

    pub fn pattern(&self) -> &str {
        &self.pattern
    }
}

impl std::fmt::Debug for RouteDefinition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RouteDefinition")
            .field("pattern", &self.pattern)
            .field("page", &self.page.is_some())
            .field("layout", &self.layout.is_some())
            .field("guard", &self.guard.is_some())
            .field("redirect_to", &self.redirect_to)
            .field("children", &self.children)
            .finish()
    }
}
