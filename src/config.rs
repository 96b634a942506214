//! The resolved configuration handle.
//!
//! [`Config`] is the immutable view handed out after setup: dotted-path
//! lookups, typed getters, section snapshots, and project-relative path
//! helpers. It holds the fully merged tree; nothing mutates it after the
//! initialization gate publishes it.

use crate::store::ConfigTree;
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Resolved, read-only configuration.
#[derive(Debug, Clone)]
pub struct Config {
    tree: ConfigTree,
    project_root: PathBuf,
    initialized_by: String,
}

impl Config {
    pub(crate) fn new(tree: ConfigTree, project_root: PathBuf, initialized_by: String) -> Self {
        Self {
            tree,
            project_root,
            initialized_by,
        }
    }

    /// Look up a value by dotted path.
    ///
    /// Returns the leaf value, or a snapshot of the section when the path is
    /// a subtree prefix, or `None`.
    pub fn get(&self, key: &str) -> Option<Value> {
        self.tree.get(key)
    }

    /// Look up a value, falling back to `default` when absent.
    pub fn get_or(&self, key: &str, default: Value) -> Value {
        self.tree.get_or(key, default)
    }

    /// Look up a string leaf.
    pub fn get_str(&self, key: &str) -> Option<String> {
        match self.tree.get(key)? {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// Look up an integer leaf.
    pub fn get_i64(&self, key: &str) -> Option<i64> {
        self.tree.get(key)?.as_i64()
    }

    /// Look up a floating-point leaf. Integer values are widened.
    pub fn get_f64(&self, key: &str) -> Option<f64> {
        self.tree.get(key)?.as_f64()
    }

    /// Look up a boolean leaf.
    pub fn get_bool(&self, key: &str) -> Option<bool> {
        self.tree.get(key)?.as_bool()
    }

    /// Look up a sequence leaf.
    pub fn get_array(&self, key: &str) -> Option<Vec<Value>> {
        match self.tree.get(key)? {
            Value::Array(items) => Some(items),
            _ => None,
        }
    }

    /// Whether `key` addresses a leaf exactly (section prefixes do not match).
    pub fn contains(&self, key: &str) -> bool {
        self.tree.contains_key(key)
    }

    /// Snapshot of all leaves under a common dotted prefix.
    pub fn section(&self, name: &str) -> Option<Map<String, Value>> {
        self.tree.section(name)
    }

    /// Borrow the underlying configuration tree.
    ///
    /// The tree serializes as a plain nested JSON object, which is how the
    /// inspection binary prints it.
    pub fn as_tree(&self) -> &ConfigTree {
        &self.tree
    }

    /// Snapshot of the full nested configuration tree.
    pub fn to_map(&self) -> Map<String, Value> {
        self.tree.as_map().clone()
    }

    /// Snapshot of the configuration as flat `dotted path -> leaf` entries.
    pub fn to_flat_map(&self) -> BTreeMap<String, Value> {
        self.tree.flatten().into_iter().collect()
    }

    /// The resolved project root directory.
    pub fn project_root(&self) -> &Path {
        &self.project_root
    }

    /// Source location (`file:line`) of the call that initialized this
    /// configuration. Retained for diagnostics.
    pub fn initialized_by(&self) -> &str {
        &self.initialized_by
    }

    /// Derive a project-relative directory path for an arbitrary category:
    /// `<project_root>/<category>[/<filename>]`.
    ///
    /// `path_for("cache", Some("session.json"))` yields
    /// `<project_root>/cache/session.json`.
    pub fn path_for(&self, category: &str, filename: Option<&str>) -> PathBuf {
        let mut path = self.project_root.join(category);
        if let Some(filename) = filename {
            path.push(filename);
        }
        path
    }

    /// `<project_root>/data[/<filename>]`.
    pub fn data_path(&self, filename: Option<&str>) -> PathBuf {
        self.path_for("data", filename)
    }

    /// `<project_root>/logs[/<filename>]`.
    pub fn logs_path(&self, filename: Option<&str>) -> PathBuf {
        self.path_for("logs", filename)
    }
}
