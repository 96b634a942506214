//! Zero-friction configuration loader.
//!
//! Merges caller-supplied defaults, process environment variables, and
//! `.env`-style override files into a single queryable configuration, with
//! automatic project-root detection and type coercion driven by each
//! default's runtime type.
//!
//! ```no_run
//! use serde_json::json;
//! use zero_config::{Setup, get_config};
//!
//! Setup::new()
//!     .with_defaults(json!({
//!         "database.host": "localhost",
//!         "database.port": 5432,
//!     }))
//!     .apply();
//!
//! let config = get_config().unwrap();
//! assert_eq!(config.get_str("database.host").as_deref(), Some("localhost"));
//! ```
//!
//! With `DATABASE__PORT=3306` in the environment, `database.port` resolves to
//! the integer `3306`; malformed overrides degrade to documented fallbacks
//! instead of failing.

pub mod cli;
pub mod coerce;
pub mod config;
pub mod env;
pub mod env_file;
pub mod error;
pub mod gate;
pub mod root;
pub mod store;

pub use coerce::{ValueKind, coerce};
pub use config::Config;
pub use env_file::DEFAULT_ENV_FILE;
pub use error::{ConfigError, Result};
pub use gate::{
    Setup, get_config, initialization_info, is_initialized, reset_for_testing, setup_environment,
};
pub use root::{PROJECT_ROOT_ENV, find_project_root};
pub use store::ConfigTree;
