//! Project-root resolution.
//!
//! The project root is resolved once per setup through its own channel: the
//! `PROJECT_ROOT` environment variable wins outright, otherwise the filesystem
//! is walked upward from the start directory looking for well-known project
//! markers. File override sources can never change the root, since the file
//! location itself depends on it.

use std::path::{Component, Path, PathBuf};
use tracing::debug;

/// Reserved environment variable selecting the project root directly.
pub const PROJECT_ROOT_ENV: &str = "PROJECT_ROOT";

/// Marker files and directories identifying a project root, checked in order.
/// The first ancestor directory containing any marker wins.
pub const ROOT_MARKERS: &[&str] = &[
    ".git",
    "pyproject.toml",
    "setup.py",
    "requirements.txt",
    "poetry.lock",
    "uv.lock",
    "package.json",
    "Cargo.toml",
    "go.mod",
    "pom.xml",
    "build.gradle",
    ".env",
];

/// Resolve the project root: `PROJECT_ROOT` environment override first, else
/// marker-based auto-detection from `start_dir` (or the current directory).
pub fn resolve_project_root(start_dir: Option<&Path>) -> PathBuf {
    if let Ok(value) = std::env::var(PROJECT_ROOT_ENV) {
        let root = absolutize(Path::new(&value));
        debug!(root = %root.display(), "project root from PROJECT_ROOT");
        return root;
    }
    find_project_root(start_dir)
}

/// Auto-detect the project root by walking upward from `start` looking for
/// [`ROOT_MARKERS`]. Falls back to the current working directory when no
/// ancestor matches.
pub fn find_project_root(start: Option<&Path>) -> PathBuf {
    let start = match start {
        Some(path) => absolutize(path),
        None => current_dir(),
    };
    let start = if start.is_file() {
        start.parent().map(Path::to_path_buf).unwrap_or(start)
    } else {
        start
    };

    let mut current = start.as_path();
    loop {
        if let Some(marker) = marker_in(current) {
            debug!(root = %current.display(), marker = %marker, "project root detected");
            return current.to_path_buf();
        }
        match current.parent() {
            Some(parent) if parent != current => current = parent,
            _ => break,
        }
    }

    current_dir()
}

/// The first marker present in `dir`, if any.
pub fn marker_in(dir: &Path) -> Option<&'static str> {
    ROOT_MARKERS
        .iter()
        .copied()
        .find(|marker| dir.join(marker).exists())
}

/// Make a path absolute against the current working directory and resolve
/// `.` and `..` components, without touching the filesystem.
pub fn absolutize(path: &Path) -> PathBuf {
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        current_dir().join(path)
    };
    normalize_components(&absolute)
}

fn current_dir() -> PathBuf {
    std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."))
}

/// Resolve `.` and `..` path components lexically.
fn normalize_components(path: &Path) -> PathBuf {
    let mut components = Vec::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if let Some(Component::Normal(_)) = components.last() {
                    components.pop();
                } else {
                    components.push(Component::ParentDir);
                }
            }
            other => components.push(other),
        }
    }
    components.iter().collect()
}
