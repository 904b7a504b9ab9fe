//! Centralized path helpers for config and data directories.

use std::path::PathBuf;

use crate::core::app;

/// Project directories (config, data) from the standard platform locations.
pub fn project_dirs() -> Option<directories::ProjectDirs> {
    directories::ProjectDirs::from("sg", app::VENDOR, app::NAME)
}

/// Override data dir via env var; used by tests to keep state out of $HOME.
fn data_dir_override() -> Option<PathBuf> {
    std::env::var("NALA_TEST_DATA_DIR").ok().map(PathBuf::from)
}

/// Data directory for conversations (~/.local/share/nala-tutor/conversations/).
pub fn conversations_dir() -> Option<PathBuf> {
    if let Some(p) = data_dir_override() {
        return Some(p.join("conversations"));
    }
    project_dirs().map(|d| d.data_dir().join("conversations"))
}

/// File holding the learning-style profile.
pub fn profile_file() -> Option<PathBuf> {
    if let Some(p) = data_dir_override() {
        return Some(p.join("profile.json"));
    }
    project_dirs().map(|d| d.data_dir().join("profile.json"))
}
