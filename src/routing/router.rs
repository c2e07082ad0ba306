//! Route lookup and dispatch.
//!
//! # Responsibilities
//! - Store the ordered route table
//! - Look up the matching route for a request path
//! - Compute the rewritten upstream path
//!
//! # Design Decisions
//! - Immutable after construction (thread-safe without locks)
//! - O(n) path prefix scan in registration order; first match wins
//! - Explicit no-match rather than silent default

use crate::config::BackendKind;
use crate::routing::matcher::PathPrefixMatcher;

/// A static binding of an inbound path prefix to a backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Route {
    matcher: PathPrefixMatcher,
    backend: BackendKind,
    rewrite_prefix: String,
}

impl Route {
    pub fn new(
        path_prefix: impl Into<String>,
        backend: BackendKind,
        rewrite_prefix: impl Into<String>,
    ) -> Self {
        Self {
            matcher: PathPrefixMatcher::new(path_prefix),
            backend,
            rewrite_prefix: rewrite_prefix.into(),
        }
    }

    pub fn path_prefix(&self) -> &str {
        self.matcher.prefix()
    }

    pub fn backend(&self) -> BackendKind {
        self.backend
    }
}

/// Result of a successful route lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteMatch<'r> {
    pub route: &'r Route,
    /// Inbound path with the route prefix removed.
    pub suffix: String,
}

impl RouteMatch<'_> {
    /// Outbound path: rewrite prefix followed by the suffix, `/` if both are empty.
    pub fn upstream_path(&self) -> String {
        let path = format!("{}{}", self.route.rewrite_prefix, self.suffix);
        if path.is_empty() {
            "/".to_string()
        } else {
            path
        }
    }

    /// Outbound path with the raw query string appended unchanged.
    pub fn upstream_path_and_query(&self, query: Option<&str>) -> String {
        match query {
            Some(q) => format!("{}?{}", self.upstream_path(), q),
            None => self.upstream_path(),
        }
    }
}

/// Ordered, immutable route table.
#[derive(Debug, Clone)]
pub struct RouteTable {
    routes: Vec<Route>,
}

impl RouteTable {
    pub fn new(routes: Vec<Route>) -> Self {
        Self { routes }
    }

    /// The proxy's route set, most specific first.
    pub fn standard() -> Self {
        Self::new(vec![
            Route::new("/api/prom", BackendKind::Prometheus, "/api/prom"),
            Route::new("/prometheus", BackendKind::Prometheus, "/api/prom"),
            Route::new("/otlp", BackendKind::Otlp, "/otlp"),
            Route::new("/loki", BackendKind::Loki, "/loki"),
            Route::new("/tempo", BackendKind::Tempo, "/tempo"),
        ])
    }

    pub fn routes(&self) -> &[Route] {
        &self.routes
    }

    /// Find the first route whose prefix matches `path`.
    pub fn find(&self, path: &str) -> Option<RouteMatch<'_>> {
        self.routes.iter().find_map(|route| {
            route.matcher.strip(path).map(|suffix| RouteMatch {
                route,
                suffix: suffix.to_string(),
            })
        })
    }
}

impl Default for RouteTable {
    fn default() -> Self {
        Self::standard()
    }
}
