//! Environment override resolver.
//!
//! Applies process-environment overrides onto a [`ConfigTree`] in a single
//! pass bounded by the number of *known* configuration keys, not the size of
//! the process environment. Each known dotted path is mapped to its
//! double-underscore spelling (`database.port` -> `DATABASE__PORT`) and
//! checked directly; unrelated environment variables are never inspected, so
//! false-positive matches cannot happen.

use crate::coerce::coerce;
use crate::store::{ConfigTree, PATH_SEPARATOR};
use tracing::debug;

/// Reserved key holding the resolved project root. It is resolved through its
/// own higher-precedence channel and must never be mutated by this pass.
pub const PROJECT_ROOT_KEY: &str = "project_root";

/// Compute the environment-variable spelling for a dotted config path.
///
/// Each segment is uppercased verbatim and segments are joined with a double
/// underscore, so single underscores inside a segment survive:
/// `llm.max_tokens` -> `LLM__MAX_TOKENS`. This is the exact inverse of the
/// file loader's key lowercasing, so file keys and environment variables
/// address the same paths.
pub fn env_var_name(path: &str) -> String {
    path.split(PATH_SEPARATOR)
        .map(str::to_ascii_uppercase)
        .collect::<Vec<_>>()
        .join("__")
}

/// Apply process-environment overrides to the tree.
///
/// For every known leaf path whose derived spelling is present in the
/// environment, the raw value is coerced against the tree's current value at
/// that path and written back. Keys absent from the tree are untouched.
pub fn apply_env_overrides(tree: &mut ConfigTree) {
    apply_env_overrides_with(tree, |name| std::env::var(name).ok());
}

/// Same as [`apply_env_overrides`], with an injectable environment lookup.
pub fn apply_env_overrides_with(
    tree: &mut ConfigTree,
    lookup: impl Fn(&str) -> Option<String>,
) {
    for path in tree.leaf_paths() {
        if path == PROJECT_ROOT_KEY {
            continue;
        }
        let name = env_var_name(&path);
        let Some(raw) = lookup(&name) else {
            continue;
        };
        if let Some(current) = tree.get(&path) {
            debug!(var = %name, key = %path, "environment override");
            tree.set(&path, coerce(&raw, &current));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::collections::HashMap;

    fn fake_env(vars: &[(&str, &str)]) -> HashMap<String, String> {
        vars.iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn apply(tree: &mut ConfigTree, vars: &[(&str, &str)]) {
        let env = fake_env(vars);
        apply_env_overrides_with(tree, |name| env.get(name).cloned());
    }

    #[test]
    fn test_env_var_name_spelling() {
        assert_eq!(env_var_name("database.port"), "DATABASE__PORT");
        assert_eq!(env_var_name("llm.max_tokens"), "LLM__MAX_TOKENS");
        assert_eq!(env_var_name("simple_key"), "SIMPLE_KEY");
        // Segments are uppercased verbatim; no underscores are invented
        // inside a segment.
        assert_eq!(env_var_name("llm.maxTokens"), "LLM__MAXTOKENS");
    }

    #[test]
    fn test_typed_overrides() {
        let mut tree = ConfigTree::from_value(json!({
            "database.host": "localhost",
            "database.port": 5432,
        }));
        apply(&mut tree, &[("DATABASE__PORT", "3306")]);

        assert_eq!(tree.get("database.port"), Some(json!(3306)));
        assert_eq!(tree.get("database.host"), Some(json!("localhost")));
    }

    #[test]
    fn test_unrelated_vars_cause_no_spurious_overrides() {
        let mut tree = ConfigTree::from_value(json!({"timeout": 30}));
        let before = tree.clone();
        apply(
            &mut tree,
            &[("PATH", "/usr/bin"), ("HOME", "/home/x"), ("UNRELATED__KEY", "v")],
        );
        assert_eq!(tree, before);
    }

    #[test]
    fn test_list_override_from_array_literal() {
        let mut tree = ConfigTree::from_value(json!({"models": []}));
        apply(&mut tree, &[("MODELS", r#"["gpt-4","claude-3"]"#)]);
        assert_eq!(tree.get("models"), Some(json!(["gpt-4", "claude-3"])));
    }

    #[test]
    fn test_string_override_not_split() {
        let mut tree = ConfigTree::from_value(json!({"welcome_message": ""}));
        apply(&mut tree, &[("WELCOME_MESSAGE", "Hello, welcome!")]);
        assert_eq!(tree.get("welcome_message"), Some(json!("Hello, welcome!")));
    }

    #[test]
    fn test_project_root_key_is_skipped() {
        let mut tree = ConfigTree::from_value(json!({"project_root": "/detected"}));
        apply(&mut tree, &[("PROJECT_ROOT", "/somewhere/else")]);
        assert_eq!(tree.get("project_root"), Some(json!("/detected")));
    }

    #[test]
    fn test_bool_overrides_in_both_directions() {
        let mut tree = ConfigTree::from_value(json!({
            "single.bool_true": true,
            "single.bool_false": false,
        }));
        apply(
            &mut tree,
            &[("SINGLE__BOOL_TRUE", "false"), ("SINGLE__BOOL_FALSE", "true")],
        );
        assert_eq!(tree.get("single.bool_true"), Some(json!(false)));
        assert_eq!(tree.get("single.bool_false"), Some(json!(true)));
    }
}
