//! Configuration, log and artifact paths
//!
//! Uses the directories crate for platform-appropriate locations:
//! - Linux: `~/.config/parabank-e2e/`
//! - macOS: `~/Library/Application Support/parabank-e2e/`
//! - Windows: `%APPDATA%\parabank-e2e\`

use std::io;
use std::path::{Path, PathBuf};

/// Application name used for directory lookups
const APP_NAME: &str = "parabank-e2e";

/// Default directory for screenshots, relative to the working directory
pub const DEFAULT_SCREENSHOT_DIR: &str = "screenshots";

/// Get the configuration directory path
pub fn config_dir() -> Option<PathBuf> {
    directories::ProjectDirs::from("", "", APP_NAME).map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the configuration file
pub fn config_path() -> Option<PathBuf> {
    config_dir().map(|dir| dir.join("config.toml"))
}

/// Get the path to the log directory
pub fn log_dir() -> Option<PathBuf> {
    directories::ProjectDirs::from("", "", APP_NAME).map(|dirs| dirs.data_dir().join("logs"))
}

/// Ensure a directory exists, creating parents as needed
pub fn ensure_dir(dir: &Path) -> io::Result<()> {
    if !dir.exists() {
        std::fs::create_dir_all(dir)?;
    }
    Ok(())
}

/// Turn a caller-supplied screenshot name into a safe file stem
///
/// Anything outside `[A-Za-z0-9_-]` becomes `-`, so names cannot walk out
/// of the screenshot directory.
pub fn sanitize_file_stem(name: &str) -> String {
    let stem: String = name
        .trim()
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '-'
            }
        })
        .collect();

    if stem.is_empty() {
        "screenshot".to_string()
    } else {
        stem
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_path_is_toml() {
        if let Some(path) = config_path() {
            assert!(path.ends_with("config.toml"));
        }
    }

    #[test]
    fn test_sanitize_keeps_plain_names() {
        assert_eq!(sanitize_file_stem("parabank-login-page"), "parabank-login-page");
        assert_eq!(sanitize_file_stem("dash_board2"), "dash_board2");
    }

    #[test]
    fn test_sanitize_blocks_traversal() {
        assert_eq!(sanitize_file_stem("../etc/passwd"), "---etc-passwd");
        assert_eq!(sanitize_file_stem("   "), "screenshot");
    }
}
