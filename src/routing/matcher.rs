//! Route matching logic.
//!
//! # Responsibilities
//! - Match path prefix (case-sensitive)
//! - Return the remaining suffix on a match
//!
//! # Design Decisions
//! - Prefix must end on a path-segment boundary
//! - Path matching is case-sensitive
//! - No regex to guarantee O(n) matching

/// Matches the request path prefix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathPrefixMatcher {
    prefix: String,
}

impl PathPrefixMatcher {
    /// Create a new path prefix matcher. A trailing `/` on the prefix is ignored.
    pub fn new(prefix: impl Into<String>) -> Self {
        let mut prefix = prefix.into();
        while prefix.len() > 1 && prefix.ends_with('/') {
            prefix.pop();
        }
        Self { prefix }
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Removes the prefix from `path`, returning the remainder.
    ///
    /// `/loki` strips `/loki/api/v1/push` to `/api/v1/push` and `/loki` to
    /// the empty string, but does not match `/lokix`.
    pub fn strip<'p>(&self, path: &'p str) -> Option<&'p str> {
        let rest = path.strip_prefix(self.prefix.as_str())?;
        if rest.is_empty() || rest.starts_with('/') {
            Some(rest)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_path_matcher() {
        let matcher = PathPrefixMatcher::new("/prometheus");

        assert_eq!(
            matcher.strip("/prometheus/api/v1/query"),
            Some("/api/v1/query")
        );
        assert_eq!(matcher.strip("/prometheus"), Some(""));
        assert_eq!(matcher.strip("/prometheus/"), Some("/"));
        assert_eq!(matcher.strip("/prometheusx/api"), None);
        assert_eq!(matcher.strip("/images"), None);
    }

    #[test]
    fn test_case_sensitive() {
        let matcher = PathPrefixMatcher::new("/loki");
        assert_eq!(matcher.strip("/Loki/push"), None);
    }

    #[test]
    fn test_trailing_slash_normalized() {
        let matcher = PathPrefixMatcher::new("/tempo/");
        assert_eq!(matcher.prefix(), "/tempo");
        assert_eq!(matcher.strip("/tempo/api/traces/1"), Some("/api/traces/1"));
    }
}
