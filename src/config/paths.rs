//! Cross-platform directory path resolution
//!
//! - Linux/macOS: XDG Base Directory specification (~/.config, ~/.local/share)
//! - Windows: Known Folder API (AppData\Roaming, AppData\Local)

use std::path::{Path, PathBuf};

const APP_NAME: &str = "operand-view";

/// Configuration directory
///
/// Checks OPERAND_VIEW_CONFIG_DIR first, then falls back to:
/// - Unix (Linux/macOS): XDG_CONFIG_HOME/operand-view or ~/.config/operand-view
/// - Windows: %APPDATA%\operand-view\config
pub fn config_dir() -> PathBuf {
    std::env::var("OPERAND_VIEW_CONFIG_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            #[cfg(windows)]
            {
                use directories::ProjectDirs;
                ProjectDirs::from("", "", APP_NAME)
                    .map(|dirs| dirs.config_dir().to_path_buf())
                    .unwrap_or_else(|| PathBuf::from(".").join(".config").join(APP_NAME))
            }
            #[cfg(not(windows))]
            {
                use directories::BaseDirs;
                std::env::var("XDG_CONFIG_HOME")
                    .map(PathBuf::from)
                    .unwrap_or_else(|_| {
                        BaseDirs::new()
                            .map(|dirs| dirs.home_dir().join(".config"))
                            .unwrap_or_else(|| PathBuf::from(".").join(".config"))
                    })
                    .join(APP_NAME)
            }
        })
}

/// Data directory, holding per-cluster overrides
///
/// Checks OPERAND_VIEW_DATA_DIR first, then XDG_DATA_HOME or the platform default.
pub fn data_dir() -> PathBuf {
    std::env::var("OPERAND_VIEW_DATA_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            #[cfg(windows)]
            {
                use directories::ProjectDirs;
                ProjectDirs::from("", "", APP_NAME)
                    .map(|dirs| dirs.data_dir().to_path_buf())
                    .unwrap_or_else(|| {
                        PathBuf::from(".")
                            .join(".local")
                            .join("share")
                            .join(APP_NAME)
                    })
            }
            #[cfg(not(windows))]
            {
                use directories::BaseDirs;
                std::env::var("XDG_DATA_HOME")
                    .map(PathBuf::from)
                    .unwrap_or_else(|_| {
                        BaseDirs::new()
                            .map(|dirs| dirs.home_dir().join(".local").join("share"))
                            .unwrap_or_else(|| PathBuf::from(".").join(".local").join("share"))
                    })
                    .join(APP_NAME)
            }
        })
}

pub fn root_config_path() -> PathBuf {
    config_dir().join("config.yaml")
}

/// `<data>/clusters/<cluster>[/<context>]`
pub fn cluster_config_dir(cluster: &str, context: Option<&str>) -> PathBuf {
    let mut path = data_dir().join("clusters").join(cluster);
    if let Some(ctx) = context {
        path = path.join(ctx);
    }
    path
}

pub fn cluster_config_path(cluster: &str, context: Option<&str>) -> PathBuf {
    cluster_config_dir(cluster, context).join("config.yaml")
}

/// Create a directory and its parents if missing
pub fn ensure_dir(path: &Path) -> std::io::Result<()> {
    if !path.exists() {
        std::fs::create_dir_all(path)?;
    }
    Ok(())
}
