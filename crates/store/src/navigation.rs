//! Navigation state
//!
//! Routes, query strings and the [`Navigator`] seam the stores push
//! redirects through.

use std::fmt;
use std::sync::Arc;

use parking_lot::Mutex;
use tracing::info;
use url::form_urlencoded;

/// Route paths as constants for type safety
pub mod routes {
    pub const HOME: &str = "/";
    pub const GIGS: &str = "/gigs";
    pub const FESTIVALS: &str = "/festivals";
    pub const ARTISTS: &str = "/artists";
    pub const VENUES: &str = "/venues";
    pub const ATTENDEES: &str = "/attendees";
    pub const DASHBOARD: &str = "/dashboard";
}

/// Ordered query-string parameters.
///
/// Keys keep their first-seen position. A repeated key in a parsed query
/// string resolves to its first value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParams {
    pairs: Vec<(String, String)>,
}

impl QueryParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse an `application/x-www-form-urlencoded` query, with or without
    /// the leading `?`.
    pub fn parse(query: &str) -> Self {
        let query = query.strip_prefix('?').unwrap_or(query);
        let mut params = Self::new();
        for (key, value) in form_urlencoded::parse(query.as_bytes()).into_owned() {
            if params.get(&key).is_none() {
                params.pairs.push((key, value));
            }
        }
        params
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Set `key`, keeping its position if already present.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.pairs.iter_mut().find(|(k, _)| *k == key) {
            Some(pair) => pair.1 = value,
            None => self.pairs.push((key, value)),
        }
    }

    pub fn remove(&mut self, key: &str) {
        self.pairs.retain(|(k, _)| k != key);
    }

    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.set(key, value);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    /// Render without the leading `?`.
    pub fn to_query_string(&self) -> String {
        form_urlencoded::Serializer::new(String::new())
            .extend_pairs(self.pairs.iter())
            .finish()
    }
}

/// A path plus its query parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Route {
    pub path: String,
    pub query: QueryParams,
}

impl Route {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            query: QueryParams::new(),
        }
    }

    /// Parse `"/path?key=value"`.
    pub fn parse(route: &str) -> Self {
        match route.split_once('?') {
            Some((path, query)) => Self {
                path: path.to_string(),
                query: QueryParams::parse(query),
            },
            None => Self::new(route),
        }
    }

    #[must_use]
    pub fn with_query(mut self, query: QueryParams) -> Self {
        self.query = query;
        self
    }
}

impl Default for Route {
    fn default() -> Self {
        Self::new(routes::HOME)
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.query.is_empty() {
            write!(f, "{}", self.path)
        } else {
            write!(f, "{}?{}", self.path, self.query.to_query_string())
        }
    }
}

/// Where redirects and query updates are pushed.
pub trait Navigator: Send + Sync {
    fn push(&self, route: Route);

    fn current_route(&self) -> Route;

    fn current_query(&self) -> QueryParams {
        self.current_route().query
    }
}

/// Navigator holding its history in memory. Clones share the history.
#[derive(Debug, Clone)]
pub struct MemoryNavigator {
    history: Arc<Mutex<Vec<Route>>>,
}

impl MemoryNavigator {
    pub fn new(start: Route) -> Self {
        Self {
            history: Arc::new(Mutex::new(vec![start])),
        }
    }

    /// Every route visited, starting route first.
    pub fn history(&self) -> Vec<Route> {
        self.history.lock().clone()
    }

    /// Number of pushes since creation.
    pub fn push_count(&self) -> usize {
        self.history.lock().len().saturating_sub(1)
    }
}

impl Default for MemoryNavigator {
    fn default() -> Self {
        Self::new(Route::default())
    }
}

impl Navigator for MemoryNavigator {
    fn push(&self, route: Route) {
        info!(route = %route, "Navigating");
        self.history.lock().push(route);
    }

    fn current_route(&self) -> Route {
        self.history.lock().last().cloned().unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_route_constants_are_unique() {
        let all = [
            routes::HOME,
            routes::GIGS,
            routes::FESTIVALS,
            routes::ARTISTS,
            routes::VENUES,
            routes::ATTENDEES,
            routes::DASHBOARD,
        ];

        for (i, a) in all.iter().enumerate() {
            assert!(a.starts_with('/'));
            for b in &all[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn test_query_params_parse_and_render() {
        let params = QueryParams::parse("?search=red+hot&city=S%C3%A3o%20Paulo&search=ignored");

        assert_eq!(params.get("search"), Some("red hot"));
        assert_eq!(params.get("city"), Some("São Paulo"));
        assert_eq!(params.len(), 2);
        assert_eq!(params.to_query_string(), "search=red+hot&city=S%C3%A3o+Paulo");
    }

    #[test]
    fn test_query_params_set_keeps_position() {
        let mut params = QueryParams::parse("a=1&b=2");
        params.set("a", "3");
        params.set("c", "4");
        params.remove("b");

        assert_eq!(params.to_query_string(), "a=3&c=4");
    }

    #[test]
    fn test_route_parse_and_display() {
        let route = Route::parse("/gigs?view=table");
        assert_eq!(route.path, routes::GIGS);
        assert_eq!(route.query.get("view"), Some("table"));
        assert_eq!(route.to_string(), "/gigs?view=table");

        assert_eq!(Route::parse("/festivals").to_string(), "/festivals");
    }

    #[test]
    fn test_memory_navigator_tracks_history() {
        let navigator = MemoryNavigator::new(Route::new(routes::GIGS));
        assert_eq!(navigator.current_route().path, routes::GIGS);

        navigator.push(Route::new(routes::FESTIVALS));

        assert_eq!(navigator.push_count(), 1);
        assert_eq!(navigator.current_route().path, routes::FESTIVALS);
        assert!(navigator.current_query().is_empty());
    }
}
