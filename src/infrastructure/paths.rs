//! Default locations for configuration and trace data.
//!
//! Both follow the platform conventions exposed by `dirs` (XDG on Linux, `Library`
//! on macOS, `AppData` on Windows). When the platform directory cannot be
//! determined, a relative `.tweetline` directory is used instead.

use std::path::PathBuf;

const APP_DIR: &str = "tweetline";

/// Name of the configuration file inside [`config_dir`].
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Directory holding trace files, e.g. `~/.local/share/tweetline`.
#[must_use]
pub fn data_dir() -> PathBuf {
    dirs::data_dir().map_or_else(fallback_dir, |d| d.join(APP_DIR))
}

/// Directory holding the configuration file, e.g. `~/.config/tweetline`.
#[must_use]
pub fn config_dir() -> PathBuf {
    dirs::config_dir().map_or_else(fallback_dir, |d| d.join(APP_DIR))
}

/// The default configuration file, `<config_dir>/tweetline/config.toml`.
#[must_use]
pub fn config_path() -> PathBuf {
    config_dir().join(CONFIG_FILE_NAME)
}

/// Expands a leading `~` to the home directory. Other paths are returned as-is.
///
/// # Examples
///
/// ```
/// use tweetline::infrastructure::expand_tilde;
/// use std::path::PathBuf;
///
/// assert_eq!(expand_tilde("/var/log"), PathBuf::from("/var/log"));
/// if let Some(home) = dirs::home_dir() {
///     assert_eq!(expand_tilde("~/traces"), home.join("traces"));
/// }
/// ```
#[must_use]
pub fn expand_tilde(path: &str) -> PathBuf {
    let home = dirs::home_dir();
    match (path, home) {
        ("~", Some(home)) => home,
        (p, Some(home)) if p.starts_with("~/") => home.join(&p[2..]),
        (p, _) => PathBuf::from(p),
    }
}

fn fallback_dir() -> PathBuf {
    PathBuf::from(".").join(format!(".{APP_DIR}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_path_ends_with_app_file() {
        let path = config_path();
        assert!(path.ends_with("tweetline/config.toml") || path.ends_with(".tweetline/config.toml"));
    }

    #[test]
    fn data_dir_is_app_specific() {
        let dir = data_dir();
        let last = dir.file_name().and_then(|n| n.to_str()).unwrap();
        assert!(last == "tweetline" || last == ".tweetline");
    }

    #[test]
    fn absolute_paths_are_untouched() {
        assert_eq!(expand_tilde("/tmp/x"), PathBuf::from("/tmp/x"));
        assert_eq!(expand_tilde("relative/x"), PathBuf::from("relative/x"));
    }
}
