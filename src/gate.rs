//! Process-wide initialization gate.
//!
//! The first successful [`Setup::apply`] wins; later unforced calls are
//! logged no-ops. This is the mechanism that prevents one package's
//! configuration from silently overwriting another's when several crates in
//! one process all try to initialize. A `force(true)` setup deliberately
//! re-runs the whole merge and replaces the published configuration.
//!
//! Setup itself never fails: malformed override values degrade through the
//! coercion fallbacks and missing files are warnings. The merged tree is
//! assembled completely before it is published, so readers never observe
//! partial state.
//!
//! Concurrent first-call races from multiple threads are not part of the
//! contract; callers embedding this in a multi-threaded host should serialize
//! setup externally.

use crate::config::Config;
use crate::env::{PROJECT_ROOT_KEY, apply_env_overrides};
use crate::env_file::{DEFAULT_ENV_FILE, apply_file_overrides, collect_file_overrides};
use crate::error::ConfigError;
use crate::root::resolve_project_root;
use crate::store::ConfigTree;
use serde_json::Value;
use std::panic::Location;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use tracing::{debug, info};

/// The process-wide initialization record.
static STATE: Mutex<Option<Arc<Config>>> = Mutex::new(None);

fn lock_state() -> std::sync::MutexGuard<'static, Option<Arc<Config>>> {
    // A panic while holding the lock poisons it; the record itself is always
    // either fully published or absent, so recovering is safe.
    STATE.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Builder for the one-time environment setup.
///
/// Merge priority, lowest to highest: defaults, process environment
/// variables, env files. The project root is resolved through its own channel
/// (`PROJECT_ROOT` environment variable, then marker auto-detection) and is
/// immune to file overrides.
#[derive(Debug, Clone, Default)]
pub struct Setup {
    defaults: Option<Value>,
    env_files: Vec<PathBuf>,
    start_dir: Option<PathBuf>,
    force: bool,
}

impl Setup {
    /// Start a setup with empty defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Supply the default configuration tree.
    ///
    /// Accepts nested objects, dotted keys, or a mix; `{"database.port": 5432}`
    /// and `{"database": {"port": 5432}}` are equivalent. The runtime type of
    /// each default leaf becomes the coercion hint for overrides of that key.
    pub fn with_defaults(mut self, defaults: Value) -> Self {
        self.defaults = Some(defaults);
        self
    }

    /// Add an override file, repeatable. Files are applied in the order given;
    /// later files win for the same key. The implicit
    /// `<project_root>/.env.zero_config` file is always consulted first.
    pub fn with_env_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.env_files.push(path.into());
        self
    }

    /// Start project-root auto-detection from this directory instead of the
    /// current working directory.
    pub fn with_start_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.start_dir = Some(dir.into());
        self
    }

    /// Re-run setup even when already initialized, replacing the published
    /// configuration wholesale. Not recommended outside of tests and tools.
    pub fn force(mut self, force: bool) -> Self {
        self.force = force;
        self
    }

    /// Perform the merge and publish the configuration.
    ///
    /// When already initialized and not forced, this is a no-op returning the
    /// existing configuration; both the original initializer's identity and
    /// the current caller's identity are logged.
    #[track_caller]
    pub fn apply(self) -> Arc<Config> {
        let caller = Location::caller();
        let caller_id = format!("{}:{}", caller.file(), caller.line());

        let mut state = lock_state();
        if let Some(existing) = state.as_ref() {
            if !self.force {
                info!(
                    initialized_by = %existing.initialized_by(),
                    subsequent_call_from = %caller_id,
                    "configuration already initialized, skipping re-initialization"
                );
                return Arc::clone(existing);
            }
            debug!(caller = %caller_id, "forced re-initialization");
        }

        let config = Arc::new(self.resolve(caller_id));
        info!(
            project_root = %config.project_root().display(),
            initialized_by = %config.initialized_by(),
            "environment setup complete"
        );
        *state = Some(Arc::clone(&config));
        config
    }

    /// Run the full merge pipeline. Infallible by design: every input problem
    /// degrades to a logged fallback.
    fn resolve(self, caller_id: String) -> Config {
        let project_root = resolve_project_root(self.start_dir.as_deref());

        // 1. Defaults.
        let mut tree = match self.defaults {
            Some(defaults) => ConfigTree::from_value(defaults),
            None => ConfigTree::new(),
        };

        // 2. Process environment, bounded by the known keys.
        apply_env_overrides(&mut tree);

        // 3. Env files, implicit default file first, then explicit ones.
        let default_file = project_root.join(DEFAULT_ENV_FILE);
        let entries = collect_file_overrides(Some(&default_file), &self.env_files);
        apply_file_overrides(&mut tree, &entries);

        // The root key is written last so no override source can shadow it.
        tree.set(
            PROJECT_ROOT_KEY,
            Value::String(project_root.to_string_lossy().into_owned()),
        );

        Config::new(tree, project_root, caller_id)
    }
}

/// Initialize the process configuration with the given defaults.
///
/// Convenience wrapper over [`Setup`]; an unforced second call is a logged
/// no-op.
#[track_caller]
pub fn setup_environment(defaults: Value) -> Arc<Config> {
    Setup::new().with_defaults(defaults).apply()
}

/// Fetch the process configuration.
///
/// Fails with [`ConfigError::NotInitialized`] before the first successful
/// setup; never silently returns an empty configuration.
pub fn get_config() -> Result<Arc<Config>, ConfigError> {
    lock_state()
        .as_ref()
        .map(Arc::clone)
        .ok_or(ConfigError::NotInitialized)
}

/// Whether setup has completed.
pub fn is_initialized() -> bool {
    lock_state().is_some()
}

/// Source location (`file:line`) of the call that initialized the process
/// configuration, or `None` before setup.
pub fn initialization_info() -> Option<String> {
    lock_state()
        .as_ref()
        .map(|config| config.initialized_by().to_string())
}

/// Force the gate back to the uninitialized state.
///
/// Exists for isolated test runs only; not part of the production contract.
#[doc(hidden)]
pub fn reset_for_testing() {
    *lock_state() = None;
}
