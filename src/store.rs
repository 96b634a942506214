//! Nested key-path store.
//!
//! [`ConfigTree`] is a mapping keyed by dot-separated paths that transparently
//! manages an underlying nested tree of [`serde_json::Value`]s. Single-segment
//! and dotted access share one addressing scheme: `get("database.port")` walks
//! into the `database` subtree, while `get("database")` synthesizes a snapshot
//! of the whole section.
//!
//! Invariant: no key is simultaneously a leaf and a subtree prefix. Setting
//! `a.b` when `a` currently holds a leaf destructively replaces `a` with a
//! subtree.

use serde::Serialize;
use serde_json::{Map, Value};

/// Separator for nested key paths.
pub const PATH_SEPARATOR: char = '.';

/// A mutable configuration tree with dot-path access.
///
/// Values are either scalars (string, integer, float, boolean), sequences, or
/// nested subtrees. Later writes silently overwrite earlier ones at the same
/// path.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ConfigTree {
    root: Map<String, Value>,
}

impl ConfigTree {
    /// Create an empty tree.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a tree from a JSON value.
    ///
    /// Object keys containing the path separator are expanded into nested
    /// subtrees, so `{"database.port": 5432}` and `{"database": {"port": 5432}}`
    /// produce the same tree. Non-object input yields an empty tree.
    pub fn from_value(value: Value) -> Self {
        let mut tree = Self::new();
        if let Value::Object(map) = value {
            for (key, val) in map {
                tree.absorb(&key, val);
            }
        }
        tree
    }

    /// Build a tree from flat `(dotted path, value)` entries.
    ///
    /// Inverse of [`ConfigTree::flatten`] for trees whose key names contain no
    /// path separator characters.
    pub fn from_flat(entries: impl IntoIterator<Item = (String, Value)>) -> Self {
        let mut tree = Self::new();
        for (path, value) in entries {
            tree.set(&path, value);
        }
        tree
    }

    /// Recursively merge a value in at `path`, expanding nested objects and
    /// dotted keys into subtree writes.
    fn absorb(&mut self, path: &str, value: Value) {
        match value {
            // An empty object still claims its key as an (empty) subtree.
            Value::Object(map) if map.is_empty() => self.set(path, Value::Object(Map::new())),
            Value::Object(map) => {
                for (key, val) in map {
                    self.absorb(&format!("{path}{PATH_SEPARATOR}{key}"), val);
                }
            }
            leaf => self.set(path, leaf),
        }
    }

    /// Look up a value by path.
    ///
    /// If `path` addresses a leaf, the leaf is returned. If it addresses a
    /// subtree, a snapshot of that subtree is returned (a clone, not a live
    /// reference). Returns `None` when no leaf or subtree exists at the path.
    pub fn get(&self, path: &str) -> Option<Value> {
        let (first, rest) = split_first(path);
        let mut node = self.root.get(first)?;
        for segment in rest {
            node = node.as_object()?.get(segment)?;
        }
        // Cloning gives subtree lookups snapshot semantics.
        Some(node.clone())
    }

    /// Look up a value, falling back to `default` when the path is absent.
    pub fn get_or(&self, path: &str, default: Value) -> Value {
        self.get(path).unwrap_or(default)
    }

    /// Set a value at a dot-separated path, creating intermediate subtrees.
    ///
    /// If an intermediate segment currently holds a non-subtree value it is
    /// destructively replaced with an empty subtree. Never fails on type
    /// conflicts.
    pub fn set(&mut self, path: &str, value: Value) {
        let segments: Vec<&str> = path.split(PATH_SEPARATOR).collect();
        let Some((last, intermediate)) = segments.split_last() else {
            return;
        };

        let mut current = &mut self.root;
        for segment in intermediate {
            let entry = current
                .entry(segment.to_string())
                .or_insert_with(|| Value::Object(Map::new()));
            if !entry.is_object() {
                *entry = Value::Object(Map::new());
            }
            current = match entry {
                Value::Object(map) => map,
                _ => unreachable!(),
            };
        }
        current.insert(last.to_string(), value);
    }

    /// Whether `path` addresses a leaf exactly.
    ///
    /// Section prefixes do not match: `contains_key("database")` is false when
    /// `database` only exists as a subtree of leaves.
    pub fn contains_key(&self, path: &str) -> bool {
        matches!(self.get(path), Some(value) if !value.is_object())
    }

    /// Retrieve the section under `prefix` as a flat snapshot mapping.
    ///
    /// Returns `None` when `prefix` addresses a leaf or nothing at all: given
    /// `d = 3`, `section("d")` is `None`, not a stray `3`.
    pub fn section(&self, prefix: &str) -> Option<Map<String, Value>> {
        match self.get(prefix) {
            Some(Value::Object(map)) => Some(map),
            _ => None,
        }
    }

    /// Enumerate every leaf dotted-path currently in the tree.
    pub fn leaf_paths(&self) -> Vec<String> {
        self.flatten().into_iter().map(|(path, _)| path).collect()
    }

    /// Flatten the tree into `(dotted path, leaf value)` entries.
    pub fn flatten(&self) -> Vec<(String, Value)> {
        let mut entries = Vec::new();
        collect_leaves(&self.root, None, &mut entries);
        entries
    }

    /// Snapshot the full nested tree as a JSON value.
    pub fn to_value(&self) -> Value {
        Value::Object(self.root.clone())
    }

    /// Borrow the underlying nested map.
    pub fn as_map(&self) -> &Map<String, Value> {
        &self.root
    }

    /// Whether the tree holds no keys at all.
    pub fn is_empty(&self) -> bool {
        self.root.is_empty()
    }
}

/// Split a path into its first segment and the remaining segments.
fn split_first(path: &str) -> (&str, std::str::Split<'_, char>) {
    let mut segments = path.split(PATH_SEPARATOR);
    let first = segments.next().unwrap_or(path);
    (first, segments)
}

fn collect_leaves(map: &Map<String, Value>, prefix: Option<&str>, out: &mut Vec<(String, Value)>) {
    for (key, value) in map {
        let path = match prefix {
            Some(prefix) => format!("{prefix}{PATH_SEPARATOR}{key}"),
            None => key.clone(),
        };
        match value {
            Value::Object(child) => collect_leaves(child, Some(&path), out),
            leaf => out.push((path, leaf.clone())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_get_leaf_and_section() {
        let tree = ConfigTree::from_value(json!({
            "a.b": 1,
            "a.c": 2,
            "d": 3,
        }));

        assert_eq!(tree.get("a.b"), Some(json!(1)));
        assert_eq!(tree.get("d"), Some(json!(3)));
        assert_eq!(tree.get("a"), Some(json!({"b": 1, "c": 2})));
        assert_eq!(tree.get("missing"), None);
        assert_eq!(tree.get("a.missing"), None);
    }

    #[test]
    fn test_section_excludes_leaves() {
        let tree = ConfigTree::from_value(json!({"a.b": 1, "a.c": 2, "d": 3}));

        let section = tree.section("a").unwrap();
        assert_eq!(section.get("b"), Some(&json!(1)));
        assert_eq!(section.get("c"), Some(&json!(2)));

        // A leaf is not a section.
        assert!(tree.section("d").is_none());
        assert!(tree.section("nonexistent").is_none());
    }

    #[test]
    fn test_section_is_snapshot_not_live_view() {
        let mut tree = ConfigTree::from_value(json!({"a.b": 1}));
        let snapshot = tree.section("a").unwrap();
        tree.set("a.b", json!(99));
        assert_eq!(snapshot.get("b"), Some(&json!(1)));
    }

    #[test]
    fn test_contains_only_matches_leaves() {
        let tree = ConfigTree::from_value(json!({"a.b": 1, "d": 3}));
        assert!(tree.contains_key("a.b"));
        assert!(tree.contains_key("d"));
        assert!(!tree.contains_key("a"));
        assert!(!tree.contains_key("missing"));
    }

    #[test]
    fn test_set_creates_intermediate_subtrees() {
        let mut tree = ConfigTree::new();
        tree.set("x.y.z", json!(42));
        assert_eq!(tree.get("x.y.z"), Some(json!(42)));
        assert_eq!(tree.get("x.y"), Some(json!({"z": 42})));
    }

    #[test]
    fn test_set_replaces_leaf_with_subtree() {
        let mut tree = ConfigTree::new();
        tree.set("a", json!("leaf"));
        tree.set("a.b", json!(1));
        assert_eq!(tree.get("a.b"), Some(json!(1)));
        assert_eq!(tree.get("a"), Some(json!({"b": 1})));
    }

    #[test]
    fn test_later_writes_overwrite() {
        let mut tree = ConfigTree::new();
        tree.set("k", json!("v1"));
        tree.set("k", json!("v2"));
        assert_eq!(tree.get("k"), Some(json!("v2")));
    }

    #[test]
    fn test_nested_and_dotted_input_equivalent() {
        let dotted = ConfigTree::from_value(json!({"server.port": 8080, "server.host": "localhost"}));
        let nested = ConfigTree::from_value(json!({"server": {"port": 8080, "host": "localhost"}}));
        assert_eq!(dotted, nested);
    }

    #[test]
    fn test_flatten_unflatten_roundtrip() {
        let tree = ConfigTree::from_value(json!({
            "llm": {"models": ["gpt-4"], "temperature": 0.0},
            "database": {"host": "localhost", "port": 5432},
            "simple_key": "value",
        }));

        let rebuilt = ConfigTree::from_flat(tree.flatten());
        assert_eq!(rebuilt, tree);
    }

    #[test]
    fn test_empty_object_defaults_are_preserved() {
        let tree = ConfigTree::from_value(json!({"x": {}, "a": {"b": {}}, "k": 1}));
        assert_eq!(tree.get("x"), Some(json!({})));
        assert_eq!(tree.get("a.b"), Some(json!({})));
        assert_eq!(tree.to_value(), json!({"x": {}, "a": {"b": {}}, "k": 1}));
    }

    #[test]
    fn test_serializes_as_plain_object() {
        let tree = ConfigTree::from_value(json!({"a.b": 1, "d": "x"}));
        assert_eq!(
            serde_json::to_value(&tree).unwrap(),
            json!({"a": {"b": 1}, "d": "x"})
        );
    }

    #[test]
    fn test_leaf_paths() {
        let tree = ConfigTree::from_value(json!({"a.b": 1, "a.c": 2, "d": 3}));
        let mut paths = tree.leaf_paths();
        paths.sort();
        assert_eq!(paths, vec!["a.b", "a.c", "d"]);
    }
}
