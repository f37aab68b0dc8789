//! Default values for bulk-clone configuration.
//!
//! This module provides centralized default values used across the
//! configuration layers, ensuring consistency and avoiding duplication.

use std::path::PathBuf;

/// Number of repositories synchronized at once unless configured otherwise.
pub const DEFAULT_CONCURRENCY: usize = 25;

/// Prefix shared by every environment variable the tool reads.
pub const ENV_PREFIX: &str = "BULK_CLONE_";

/// File name of the ignore list inside the config directory.
pub const IGNORE_FILE_NAME: &str = "bulk-clone-ignore";

/// Returns the default directory repositories are cloned into.
///
/// This is `~/bulk-clone`, falling back to `bulk-clone` in the current
/// directory when no home directory can be determined.
pub fn default_clone_root() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("bulk-clone")
}

/// Returns the directory holding the config file and the ignore list.
///
/// Uses the platform-appropriate config directory:
/// - Linux: `~/.config/bulk-clone` (XDG Base Directory)
/// - macOS: `~/Library/Application Support/bulk-clone`
/// - Windows: `{FOLDERID_RoamingAppData}\bulk-clone`
pub fn default_config_dir() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from(".bulk-clone"))
        .join("bulk-clone")
}

/// Returns the config file read when none is given explicitly.
pub fn default_config_file() -> PathBuf {
    default_config_dir().join("conf.yaml")
}

/// Returns the ignore list read when none is configured.
pub fn default_ignore_file() -> PathBuf {
    default_config_dir().join(IGNORE_FILE_NAME)
}
