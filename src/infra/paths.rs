// src/infra/paths.rs — Config and data locations
//
// All paths respect the POKERPAL_HOME environment variable for isolation.
// When POKERPAL_HOME is set, config, credentials and logs live under it.
// When unset, config uses ~/.pokerpal/ and logs use XDG_DATA_HOME/pokerpal.

use directories::{BaseDirs, ProjectDirs};
use std::path::PathBuf;

/// Returns the POKERPAL_HOME override, if set.
fn pokerpal_home() -> Option<PathBuf> {
    std::env::var_os("POKERPAL_HOME").map(PathBuf::from)
}

/// Configuration directory: $POKERPAL_HOME/ or ~/.pokerpal/
pub fn config_dir() -> PathBuf {
    if let Some(home) = pokerpal_home() {
        return home;
    }
    match BaseDirs::new() {
        Some(base) => base.home_dir().join(".pokerpal"),
        None => PathBuf::from(".pokerpal"),
    }
}

/// Data directory: $POKERPAL_HOME/data/ or ~/.local/share/pokerpal/
pub fn data_dir() -> PathBuf {
    if let Some(home) = pokerpal_home() {
        return home.join("data");
    }
    match ProjectDirs::from("", "", "pokerpal") {
        Some(dirs) => dirs.data_local_dir().to_path_buf(),
        None => config_dir().join("data"),
    }
}

/// Chat transcript / log directory
pub fn log_dir() -> PathBuf {
    data_dir().join("logs")
}

/// Credentials directory
pub fn credentials_dir() -> PathBuf {
    config_dir().join("credentials")
}

/// Config file path
pub fn config_file_path() -> PathBuf {
    config_dir().join("config.toml")
}
