//! File override loader.
//!
//! Reads a minimal `KEY=VALUE` line format into a flat string map and applies
//! it to a [`ConfigTree`]. Unlike environment overrides, every file key is
//! applied, even ones absent from the defaults: file contents are explicit,
//! intentional configuration, not ambient process state.

use crate::coerce::coerce;
use crate::env::PROJECT_ROOT_KEY;
use crate::store::ConfigTree;
use serde_json::Value;
use std::collections::BTreeMap;
use std::path::Path;
use tracing::{debug, info, warn};

/// Default override filename, looked up in the project root.
pub const DEFAULT_ENV_FILE: &str = ".env.zero_config";

/// Parse `KEY=VALUE` content into a flat string map.
///
/// Blank lines and lines starting with `#` are ignored, as are lines with no
/// `=`. Keys are lowercased and any `__` sequence is normalized to the path
/// separator so file keys and environment-derived keys share one addressing
/// scheme. One layer of surrounding single or double quotes is stripped from
/// values.
pub fn parse_env_content(content: &str) -> BTreeMap<String, String> {
    let mut entries = BTreeMap::new();
    for line in content.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let Some((key, value)) = line.split_once('=') else {
            debug!(line = %line, "skipping line without '='");
            continue;
        };
        let key = key.trim().to_lowercase().replace("__", ".");
        let value = strip_quotes(value.trim()).to_string();
        entries.insert(key, value);
    }
    entries
}

/// Read and parse one override file.
///
/// Returns `None` when the file does not exist or cannot be read; the caller
/// decides whether that is worth a warning.
pub fn read_env_file(path: &Path) -> Option<BTreeMap<String, String>> {
    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(err) => {
            debug!(path = %path.display(), error = %err, "override file not readable");
            return None;
        }
    };
    let entries = parse_env_content(&content);
    info!(
        path = %path.display(),
        count = entries.len(),
        "loaded override file"
    );
    Some(entries)
}

/// Collect override entries from the implicit default file plus explicitly
/// named files, in ascending priority order.
///
/// Later files' keys overwrite earlier files' keys for the same path. The
/// implicit default file is silently treated as empty when absent; explicitly
/// named files that cannot be read are logged as warnings and skipped.
pub fn collect_file_overrides(
    default_file: Option<&Path>,
    explicit_files: &[impl AsRef<Path>],
) -> BTreeMap<String, String> {
    let mut merged = BTreeMap::new();

    if let Some(path) = default_file {
        if path.exists() {
            if let Some(entries) = read_env_file(path) {
                merged.extend(entries);
            }
        }
    }

    for path in explicit_files {
        let path = path.as_ref();
        match read_env_file(path) {
            Some(entries) => merged.extend(entries),
            None => warn!(path = %path.display(), "override file not found, skipping"),
        }
    }

    merged
}

/// Apply flat file overrides to the tree.
///
/// Keys already present are coerced against the existing value; new keys are
/// stored as raw strings with no coercion. The project-root key is immune to
/// file overrides, which breaks the circular dependency between the file
/// location and the root it is relative to.
pub fn apply_file_overrides(tree: &mut ConfigTree, entries: &BTreeMap<String, String>) {
    for (key, raw) in entries {
        if key == PROJECT_ROOT_KEY {
            debug!("ignoring project_root entry in override file");
            continue;
        }
        match tree.get(key) {
            Some(current) if !current.is_object() => {
                debug!(key = %key, "file override");
                tree.set(key, coerce(raw, &current));
            }
            _ => {
                debug!(key = %key, "file override (new key, stored as string)");
                tree.set(key, Value::String(raw.clone()));
            }
        }
    }
}

/// Strip one layer of surrounding single or double quotes.
fn strip_quotes(value: &str) -> &str {
    let bytes = value.as_bytes();
    if bytes.len() >= 2 {
        let (first, last) = (bytes[0], bytes[bytes.len() - 1]);
        if first == last && (first == b'"' || first == b'\'') {
            return &value[1..value.len() - 1];
        }
    }
    value
}
