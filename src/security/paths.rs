//! Inbound path screening.
//!
//! The outbound path is the route's rewrite prefix followed by the inbound
//! suffix, byte for byte. A `.` or `..` segment in the suffix would let a
//! backend that resolves dot segments serve a path outside that prefix with
//! the injected credentials, so such paths never reach routing.

/// True if any segment of `path` is `.` or `..`, percent-encoded or not.
///
/// Backslashes count as separators, since some servers treat them as `/`.
pub fn has_dot_segment(path: &str) -> bool {
    path.split(|c| c == '/' || c == '\\').any(is_dot_segment)
}

fn is_dot_segment(segment: &str) -> bool {
    let decoded = segment.replace("%2e", ".").replace("%2E", ".");
    decoded == "." || decoded == ".."
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_paths_pass() {
        assert!(!has_dot_segment("/loki/api/v1/push"));
        assert!(!has_dot_segment("/api/prom/api/v1/query"));
        assert!(!has_dot_segment("/"));
        assert!(!has_dot_segment(""));
    }

    #[test]
    fn dots_inside_segments_pass() {
        assert!(!has_dot_segment("/tempo/api/v2/search/tag/service.name/values"));
        assert!(!has_dot_segment("/loki/.hidden"));
        assert!(!has_dot_segment("/loki/..."));
        assert!(!has_dot_segment("/loki/a..b"));
    }

    #[test]
    fn dot_segments_are_caught() {
        assert!(has_dot_segment("/loki/../admin/secret"));
        assert!(has_dot_segment("/api/prom/./push"));
        assert!(has_dot_segment("/loki/.."));
        assert!(has_dot_segment("/tempo/api/."));
    }

    #[test]
    fn encoded_and_backslash_forms_are_caught() {
        assert!(has_dot_segment("/loki/%2e%2e/admin"));
        assert!(has_dot_segment("/loki/%2E%2E/admin"));
        assert!(has_dot_segment("/loki/.%2e/admin"));
        assert!(has_dot_segment("/loki/%2e/push"));
        assert!(has_dot_segment("/loki\\..\\admin"));
    }
}
