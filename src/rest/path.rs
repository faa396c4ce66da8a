//! Path building for Clarityboard resources.
//!
//! Resource and method paths are templates with `{name}` placeholders.
//! [`interpolate`] fills them from URL data and [`join_path`] joins the base
//! path, the resource path and the method path with single slashes.
//!
//! # Example
//!
//! ```rust
//! use clarityboard::rest::{interpolate, join_path};
//! use std::collections::BTreeMap;
//!
//! let mut url_data = BTreeMap::new();
//! url_data.insert("id".to_string(), "abc123".to_string());
//!
//! let method_path = interpolate("/{id}", &url_data);
//! assert_eq!(join_path(&["/v/", "dashboards", &method_path]), "/v/dashboards/abc123");
//! ```

use std::collections::BTreeMap;

/// Replaces every `{name}` placeholder in `template` with the URI-encoded
/// value of `name` in `url_data`.
///
/// Placeholders without a value become empty. Unterminated braces are left
/// as they are.
///
/// # Example
///
/// ```rust
/// use clarityboard::rest::interpolate;
/// use std::collections::BTreeMap;
///
/// let mut url_data = BTreeMap::new();
/// url_data.insert("id".to_string(), "a b".to_string());
///
/// assert_eq!(interpolate("dashboards/{id}", &url_data), "dashboards/a%20b");
/// assert_eq!(interpolate("dashboards/{missing}", &url_data), "dashboards/");
/// ```
#[must_use]
#[allow(clippy::implicit_hasher)]
pub fn interpolate(template: &str, url_data: &BTreeMap<String, String>) -> String {
    let mut result = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        let Some(close) = rest[open..].find('}') else {
            break;
        };
        let name = &rest[open + 1..open + close];

        result.push_str(&rest[..open]);
        if let Some(value) = url_data.get(name) {
            result.push_str(&urlencoding::encode(value));
        }
        rest = &rest[open + close + 1..];
    }

    result.push_str(rest);
    result
}

/// Joins path segments into one absolute path.
///
/// Empty segments and `.` are dropped, so leading, trailing and doubled
/// slashes in the inputs collapse to single separators.
#[must_use]
pub fn join_path(segments: &[&str]) -> String {
    let parts: Vec<&str> = segments
        .iter()
        .flat_map(|segment| segment.split('/'))
        .filter(|part| !part.is_empty() && *part != ".")
        .collect();

    format!("/{}", parts.join("/"))
}

/// Returns the names of the placeholders in `template`, in order.
#[must_use]
pub fn placeholders(template: &str) -> Vec<&str> {
    let mut names = Vec::new();
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        let Some(close) = rest[open..].find('}') else {
            break;
        };
        names.push(&rest[open + 1..open + close]);
        rest = &rest[open + close + 1..];
    }

    names
}

#[cfg(test)]
mod tests {
    use super::*;

    fn data(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect()
    }

    #[test]
    fn test_interpolate_single_placeholder() {
        assert_eq!(
            interpolate("/{id}", &data(&[("id", "abc123")])),
            "/abc123"
        );
    }

    #[test]
    fn test_interpolate_multiple_placeholders() {
        let result = interpolate(
            "dashboards/{dashboard}/widgets/{id}",
            &data(&[("dashboard", "d1"), ("id", "w2")]),
        );
        assert_eq!(result, "dashboards/d1/widgets/w2");
    }

    #[test]
    fn test_interpolate_encodes_values() {
        assert_eq!(
            interpolate("{id}", &data(&[("id", "a/b?c")])),
            "a%2Fb%3Fc"
        );
    }

    #[test]
    fn test_interpolate_leaves_unterminated_brace() {
        assert_eq!(interpolate("a/{id", &data(&[("id", "x")])), "a/{id");
    }

    #[test]
    fn test_interpolate_without_placeholders() {
        assert_eq!(interpolate("records/groups", &BTreeMap::new()), "records/groups");
    }

    #[test]
    fn test_join_path_collapses_slashes() {
        assert_eq!(join_path(&["/v/", "dashboards", ""]), "/v/dashboards");
        assert_eq!(join_path(&["/v/", "dashboards", "/abc"]), "/v/dashboards/abc");
        assert_eq!(join_path(&["/v/", "dashboards", "abc"]), "/v/dashboards/abc");
        assert_eq!(join_path(&["/v//", "/records/groups/", "./"]), "/v/records/groups");
    }

    #[test]
    fn test_join_path_of_nothing_is_root() {
        assert_eq!(join_path(&[]), "/");
        assert_eq!(join_path(&["", "/"]), "/");
    }

    #[test]
    fn test_placeholders_in_order() {
        assert_eq!(placeholders("a/{x}/b/{y}"), vec!["x", "y"]);
        assert!(placeholders("records").is_empty());
    }
}
