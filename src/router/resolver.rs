use std::collections::HashSet;

use indexmap::IndexMap;
use serde_json::Value;

use crate::render::render_boundary;
use crate::view::ViewNode;

use super::definition::{GuardDecision, GuardFn, LayoutFn, PageFn, Props, RouteDefinition};
use super::error::RouteError;
use super::pattern::{normalize_path, CompiledPattern};

/// One node of the compiled route tree.
struct CompiledRoute {
    pattern: String,
    matcher: CompiledPattern,
    page: Option<PageFn>,
    layout: Option<LayoutFn>,
    guard: Option<GuardFn>,
    redirect_to: Option<String>,
    children: Vec<CompiledRoute>,
}

impl CompiledRoute {
    fn compile(def: RouteDefinition) -> Result<Self, RouteError> {
        let matcher = CompiledPattern::compile(&def.pattern, !def.children.is_empty())?;
        let children = def
            .children
            .into_iter()
            .map(CompiledRoute::compile)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            pattern: def.pattern,
            matcher,
            page: def.page,
            layout: def.layout,
            guard: def.guard,
            redirect_to: def.redirect_to,
            children,
        })
    }
}

/// Structural match for a path, before guards or pages run.
#[derive(Clone, Default)]
pub struct RouteMatch {
    pub page: Option<PageFn>,
    pub params: IndexMap<String, String>,
    /// Outermost first.
    pub layouts: Vec<LayoutFn>,
    /// Outermost first, paired with the pattern that declared each guard.
    pub guards: Vec<(String, GuardFn)>,
    pub redirect_to: Option<String>,
}

impl std::fmt::Debug for RouteMatch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RouteMatch")
            .field("page", &self.page.is_some())
            .field("params", &self.params)
            .field("layouts", &self.layouts.len())
            .field("guards", &self.guards.len())
            .field("redirect_to", &self.redirect_to)
            .finish()
    }
}

/// Result of resolving one path.
#[derive(Debug, Clone, PartialEq)]
pub enum Resolution {
    Rendered(ViewNode),
    Redirect(String),
    /// The caller supplies the fallback page.
    NotFound,
}

/// Result of [`Router::resolve_following`]: the path that finally rendered
/// (or was not found) and its outcome. Never a redirect.
#[derive(Debug, Clone, PartialEq)]
pub struct Followed {
    pub path: String,
    pub resolution: Resolution,
}

/// Immutable, compiled route tree.
pub struct Router {
    routes: Vec<CompiledRoute>,
}

impl Router {
    /// Compile definitions once. The result is reused for every resolve.
    pub fn new(definitions: Vec<RouteDefinition>) -> Result<Self, RouteError> {
        let routes = definitions
            .into_iter()
            .map(CompiledRoute::compile)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { routes })
    }

    /// Depth-first structural match. The first matching sibling wins and
    /// children are preferred over the same level's page.
    pub fn match_path(&self, path: &str) -> Option<RouteMatch> {
        let path = normalize_path(path);
        let base = RouteMatch::default();
        self.routes
            .iter()
            .find_map(|route| match_route(route, &path, &base))
    }

    /// Match, run guards outer to inner, then render the page wrapped in
    /// its layouts (innermost first).
    pub fn resolve(&self, path: &str, model: &Value) -> Result<Resolution, RouteError> {
        let Some(matched) = self.match_path(path) else {
            return Ok(Resolution::NotFound);
        };

        let props = Props {
            params: matched.params,
            model: model.clone(),
        };

        for (pattern, guard) in &matched.guards {
            match guard(&props) {
                Ok(GuardDecision::Allow) => {}
                Ok(GuardDecision::Redirect(target)) => {
                    tracing::debug!(guard = %pattern, target = %target, "Guard redirected");
                    return Ok(Resolution::Redirect(target));
                }
                Err(source) => {
                    return Err(RouteError::Guard {
                        pattern: pattern.clone(),
                        source,
                    })
                }
            }
        }

        if let Some(target) = matched.redirect_to {
            return Ok(Resolution::Redirect(target));
        }

        let Some(page) = matched.page else {
            return Ok(Resolution::NotFound);
        };

        let mut tree = render_boundary("page", || page(&props));
        for layout in matched.layouts.iter().rev() {
            let inner = tree;
            tree = render_boundary("layout", || layout(inner, &props));
        }

        Ok(Resolution::Rendered(tree))
    }

    /// Resolve and follow redirects up to `max_redirects` hops.
    ///
    /// A chain that revisits a path is a [`RouteError::RedirectLoop`]; one
    /// that is longer than the cap is [`RouteError::TooManyRedirects`].
    pub fn resolve_following(
        &self,
        path: &str,
        model: &Value,
        max_redirects: usize,
    ) -> Result<Followed, RouteError> {
        let start = normalize_path(path);
        let mut current = start.clone();
        let mut visited = HashSet::from([current.clone()]);
        let mut hops = 0;

        loop {
            match self.resolve(&current, model)? {
                Resolution::Redirect(target) => {
                    let target = normalize_path(&target);
                    if !visited.insert(target.clone()) {
                        return Err(RouteError::RedirectLoop { path: target });
                    }
                    if hops == max_redirects {
                        return Err(RouteError::TooManyRedirects {
                            path: start,
                            limit: max_redirects,
                        });
                    }
                    hops += 1;
                    current = target;
                }
                resolution => {
                    return Ok(Followed {
                        path: current,
                        resolution,
                    })
                }
            }
        }
    }
}

fn match_route(route: &CompiledRoute, path: &str, outer: &RouteMatch) -> Option<RouteMatch> {
    let found = route.matcher.matches(path)?;

    let mut acc = outer.clone();
    acc.params.extend(found.params);
    if let Some(layout) = &route.layout {
        acc.layouts.push(layout.clone());
    }
    if let Some(guard) = &route.guard {
        acc.guards.push((route.pattern.clone(), guard.clone()));
    }

    if let Some(target) = &route.redirect_to {
        acc.redirect_to = Some(target.clone());
        return Some(acc);
    }

    if let Some(child_match) = route
        .children
        .iter()
        .find_map(|child| match_route(child, &found.remainder, &acc))
    {
        return Some(child_match);
    }

    // A page owns the path only when nothing is left over for children.
    if found.remainder == "/" {
        if let Some(page) = &route.page {
            acc.page = Some(page.clone());
            return Some(acc);
        }
    }

    None
}
