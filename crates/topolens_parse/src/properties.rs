//! In-document property directives.
//!
//! A description may carry `//properties key=value;key2=value2` lines.
//! They never affect the graph; renderers read them as display settings.

use serde::Serialize;
use std::collections::BTreeMap;

/// Prefix of a directive line (after trimming)
pub const DIRECTIVE_PREFIX: &str = "//properties ";

/// Key/value settings collected from directive lines, sorted by key
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Properties(BTreeMap<String, String>);

impl Properties {
    /// Create an empty property set
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse the body of a directive (the text after the prefix)
    ///
    /// Pairs that do not split into exactly one key and one value are skipped.
    #[must_use]
    pub fn parse_pairs(body: &str) -> Self {
        let mut props = Self::new();
        for pair in body.split(';') {
            let parts: Vec<&str> = pair.split('=').collect();
            if let [key, value] = parts.as_slice() {
                props.set(key.trim(), value.trim());
            }
        }
        props
    }

    /// Set a property, replacing any previous value
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.0.insert(key.into(), value.into());
    }

    /// Get a property
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    /// Get a property or the given default
    #[must_use]
    pub fn get_or<'a>(&'a self, key: &str, default: &'a str) -> &'a str {
        self.get(key).unwrap_or(default)
    }

    /// Get a boolean property; missing or unparsable values yield the default
    #[must_use]
    pub fn flag(&self, key: &str, default: bool) -> bool {
        self.get(key)
            .and_then(|value| value.to_ascii_lowercase().parse().ok())
            .unwrap_or(default)
    }

    /// Merge another set into this one; its values win
    pub fn merge(&mut self, other: Properties) {
        self.0.extend(other.0);
    }

    /// Number of properties
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Check if there are no properties
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate key/value pairs in key order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Render as a single directive line
    #[must_use]
    pub fn to_directive(&self) -> String {
        let body = self
            .iter()
            .map(|(k, v)| format!("{}={}", k, v))
            .collect::<Vec<_>>()
            .join(";");
        format!("{}{}", DIRECTIVE_PREFIX, body)
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Properties {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut props = Self::new();
        for (k, v) in iter {
            props.set(k, v);
        }
        props
    }
}

/// Replace every directive line of `script` with a single leading directive
///
/// Non-directive lines are kept verbatim and in order.
#[must_use]
pub fn replace_properties(script: &str, properties: &Properties) -> String {
    let mut result = properties.to_directive();
    for line in script.lines() {
        if !line.trim().starts_with(DIRECTIVE_PREFIX) {
            result.push('\n');
            result.push_str(line);
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_pairs() {
        let props = Properties::parse_pairs(" layout.horiz = true ; edge.ortho=false;broken;a=b=c");
        assert_eq!(props.len(), 2);
        assert_eq!(props.get("layout.horiz"), Some("true"));
        assert_eq!(props.get("edge.ortho"), Some("false"));
        assert_eq!(props.get("broken"), None);
        assert_eq!(props.get("a"), None);
    }

    #[test]
    fn test_get_or_and_flag() {
        let props: Properties = [("group.topics", "FALSE"), ("group.stores", "maybe")]
            .into_iter()
            .collect();
        assert_eq!(props.get_or("missing", "dflt"), "dflt");
        assert!(!props.flag("group.topics", true));
        assert!(props.flag("group.stores", true));
        assert!(!props.flag("missing", false));
    }

    #[test]
    fn test_merge_later_wins() {
        let mut props = Properties::parse_pairs("a=1;b=2");
        props.merge(Properties::parse_pairs("b=3"));
        assert_eq!(props.get("a"), Some("1"));
        assert_eq!(props.get("b"), Some("3"));
    }

    #[test]
    fn test_to_directive_sorted() {
        let props = Properties::parse_pairs("z=1;a=2");
        assert_eq!(props.to_directive(), "//properties a=2;z=1");
    }

    #[test]
    fn test_replace_properties() {
        let script = "//properties old=1\nTopologies:\n  //properties other=2\n   Sub-topology: 0";
        let props = Properties::parse_pairs("layout.horiz=true");
        let replaced = replace_properties(script, &props);
        assert_eq!(
            replaced,
            "//properties layout.horiz=true\nTopologies:\n   Sub-topology: 0"
        );
        assert_eq!(replaced.matches(DIRECTIVE_PREFIX).count(), 1);
    }
}
