//! Path helpers for the cinelist data directory.
//!
//! Everything the client writes lives in a single directory: the persisted
//! session token and, when enabled, the exported trace file.

use std::path::{Path, PathBuf};

/// Environment variable overriding the data directory.
pub const DATA_DIR_ENV: &str = "CINELIST_DATA_DIR";

const SESSION_FILE: &str = "session.json";
const TRACE_FILE: &str = "cinelist-otlp.json";

/// Returns the data directory for cinelist storage.
///
/// Resolution order:
/// 1. `$CINELIST_DATA_DIR`
/// 2. `$XDG_DATA_HOME/cinelist`
/// 3. `$HOME/.local/share/cinelist`
/// 4. `./.cinelist` as a last resort
#[must_use]
pub fn get_data_dir() -> PathBuf {
    if let Some(dir) = non_empty_env(DATA_DIR_ENV) {
        return PathBuf::from(expand_tilde(&dir));
    }
    if let Some(xdg) = non_empty_env("XDG_DATA_HOME") {
        return PathBuf::from(xdg).join("cinelist");
    }
    non_empty_env("HOME").map_or_else(
        || PathBuf::from(".cinelist"),
        |home| PathBuf::from(home).join(".local").join("share").join("cinelist"),
    )
}

/// Location of the persisted session token inside `data_dir`.
#[must_use]
pub fn session_file(data_dir: &Path) -> PathBuf {
    data_dir.join(SESSION_FILE)
}

/// Location of the OTLP JSON trace export inside `data_dir`.
#[must_use]
pub fn trace_file(data_dir: &Path) -> PathBuf {
    data_dir.join(TRACE_FILE)
}

/// Expands a leading `~` to the user's home directory.
///
/// Paths without a leading tilde, and all paths when `$HOME` is unset, are
/// returned unchanged.
///
/// # Examples
///
/// ```
/// use cinelist::infrastructure::expand_tilde;
///
/// assert_eq!(expand_tilde("/absolute/path"), "/absolute/path");
/// assert_eq!(expand_tilde("relative/~"), "relative/~");
/// ```
#[must_use]
pub fn expand_tilde(path: &str) -> String {
    let Some(home) = non_empty_env("HOME") else {
        return path.to_string();
    };
    if path == "~" {
        home
    } else if let Some(rest) = path.strip_prefix("~/") {
        format!("{}/{rest}", home.trim_end_matches('/'))
    } else {
        path.to_string()
    }
}

fn non_empty_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}
