use thiserror::Error;

/// Errors raised while compiling or resolving routes.
///
/// "Not found" is deliberately absent: it is a normal
/// [`Resolution::NotFound`](super::Resolution::NotFound) value.
#[derive(Debug, Error)]
pub enum RouteError {
    #[error("Invalid route pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    /// A guard returned an error instead of allow/redirect.
    #[error("Guard on '{pattern}' failed: {source}")]
    Guard {
        pattern: String,
        #[source]
        source: anyhow::Error,
    },

    #[error("Redirect loop detected at '{path}'")]
    RedirectLoop { path: String },

    #[error("Redirect chain from '{path}' exceeded {limit} hop(s)")]
    TooManyRedirects { path: String, limit: usize },
}

impl RouteError {
    /// Redirect-chain errors fall back to not-found at the server boundary;
    /// everything else is a fault.
    pub fn is_redirect_overflow(&self) -> bool {
        matches!(
            self,
            RouteError::RedirectLoop { .. } | RouteError::TooManyRedirects { .. }
        )
    }
}
