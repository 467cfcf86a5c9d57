//! Two-way binding between one value and one query-string key.

use std::fmt;

use tracing::debug;

use crate::navigation::{Navigator, QueryParams};

type Transform<T> = Box<dyn Fn(&str) -> T + Send + Sync>;
type Serialize<T> = Box<dyn Fn(&T) -> String + Send + Sync>;

/// Keeps a value in sync with a single query key.
///
/// Loading decodes the key's value, or falls back to the initial value
/// when the key is absent. Storing encodes the value; a blank encoding
/// removes the key. Nothing is pushed when the key would not change.
pub struct QuerySync<T> {
    key: String,
    initial: T,
    transform: Transform<T>,
    serialize: Serialize<T>,
}

impl<T> fmt::Debug for QuerySync<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QuerySync").field("key", &self.key).finish()
    }
}

impl<T: Clone> QuerySync<T> {
    pub fn new(
        key: impl Into<String>,
        initial: T,
        transform: impl Fn(&str) -> T + Send + Sync + 'static,
        serialize: impl Fn(&T) -> String + Send + Sync + 'static,
    ) -> Self {
        Self {
            key: key.into(),
            initial,
            transform: Box::new(transform),
            serialize: Box::new(serialize),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Decode the value from `params`.
    pub fn load_from(&self, params: &QueryParams) -> T {
        match params.get(&self.key) {
            Some(raw) => (self.transform)(raw),
            None => self.initial.clone(),
        }
    }

    /// Decode the value from the navigator's current query.
    pub fn load(&self, navigator: &dyn Navigator) -> T {
        self.load_from(&navigator.current_query())
    }

    /// Query parameters after writing `value` into `params`.
    pub fn apply(&self, params: &QueryParams, value: &T) -> QueryParams {
        let encoded = (self.serialize)(value);
        let mut next = params.clone();
        if encoded.trim().is_empty() {
            next.remove(&self.key);
        } else {
            next.set(self.key.clone(), encoded);
        }
        next
    }

    /// Write `value` into the current route's query.
    ///
    /// Returns whether a navigation was pushed.
    pub fn store(&self, navigator: &dyn Navigator, value: &T) -> bool {
        let route = navigator.current_route();
        let next = self.apply(&route.query, value);

        if next.get(&self.key) == route.query.get(&self.key) {
            debug!(key = %self.key, "Query value unchanged");
            return false;
        }

        navigator.push(route.with_query(next));
        true
    }
}

impl QuerySync<String> {
    /// Binding for a plain text value.
    pub fn text(key: impl Into<String>, initial: impl Into<String>) -> Self {
        Self::new(key, initial.into(), str::to_string, String::clone)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::navigation::{MemoryNavigator, Route};

    fn navigator(route: &str) -> MemoryNavigator {
        MemoryNavigator::new(Route::parse(route))
    }

    #[test]
    fn test_load_uses_initial_when_absent() {
        let sync = QuerySync::text("genre", "all");
        assert_eq!(sync.load(&navigator("/gigs")), "all");
        assert_eq!(sync.load(&navigator("/gigs?genre=jazz")), "jazz");
    }

    #[test]
    fn test_store_sets_key() {
        let nav = navigator("/gigs?page=2");
        let sync = QuerySync::text("genre", "");

        assert!(sync.store(&nav, &"jazz".to_string()));

        assert_eq!(nav.current_route().to_string(), "/gigs?page=2&genre=jazz");
    }

    #[test]
    fn test_store_empty_removes_key() {
        let nav = navigator("/gigs?genre=jazz&page=2");
        let sync = QuerySync::text("genre", "");

        assert!(sync.store(&nav, &String::new()));

        assert_eq!(nav.current_route().to_string(), "/gigs?page=2");
    }

    #[test]
    fn test_store_unchanged_does_not_push() {
        let nav = navigator("/gigs?genre=jazz");
        let sync = QuerySync::text("genre", "");

        assert!(!sync.store(&nav, &"jazz".to_string()));
        assert!(!sync.store(&navigator("/gigs"), &String::new()));
        assert_eq!(nav.push_count(), 0);
    }

    #[test]
    fn test_load_store_load_is_stable() {
        let nav = navigator("/gigs?page=3");
        let sync = QuerySync::new(
            "page",
            1u32,
            |raw| raw.parse().unwrap_or(1),
            |page| page.to_string(),
        );

        let first = sync.load(&nav);
        assert!(!sync.store(&nav, &first));
        assert_eq!(sync.load(&nav), first);
        assert_eq!(first, 3);
    }

    #[test]
    fn test_custom_codec() {
        let nav = navigator("/gigs?ids=a,b");
        let sync = QuerySync::new(
            "ids",
            Vec::<String>::new(),
            |raw| raw.split(',').map(str::to_string).collect(),
            |ids| ids.join(","),
        );

        assert_eq!(sync.load(&nav), vec!["a".to_string(), "b".to_string()]);

        assert!(sync.store(&nav, &Vec::new()));
        assert!(nav.current_query().is_empty());
    }
}
