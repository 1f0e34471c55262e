//! Locating `config.toml`.
//!
//! Lookup order: the `--dir` override, then `$XDG_CONFIG_HOME/cinedex`,
//! then `$HOME/.config/cinedex`. Empty environment values count as unset.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use anyhow::{Result, bail};

/// Config file name inside the config directory.
const CONFIG_FILE: &str = "config.toml";

/// Application directory name under the XDG config root.
const APP_DIR: &str = "cinedex";

/// Resolves the config file path from `dir` and the process environment.
///
/// # Errors
///
/// Returns an error when `dir` is `None` and neither `XDG_CONFIG_HOME`
/// nor `HOME` is set.
pub fn resolve_config_path(dir: Option<&PathBuf>) -> Result<PathBuf> {
    config_path_from(
        dir.map(PathBuf::as_path),
        std::env::var_os("XDG_CONFIG_HOME"),
        std::env::var_os("HOME"),
    )
}

fn config_path_from(
    dir: Option<&Path>,
    xdg_config_home: Option<OsString>,
    home: Option<OsString>,
) -> Result<PathBuf> {
    if let Some(dir) = dir {
        return Ok(dir.join(CONFIG_FILE));
    }
    let non_empty = |value: Option<OsString>| value.filter(|v| !v.is_empty());

    let root = match (non_empty(xdg_config_home), non_empty(home)) {
        (Some(xdg), _) => PathBuf::from(xdg),
        (None, Some(home)) => PathBuf::from(home).join(".config"),
        (None, None) => bail!("cannot locate config: neither XDG_CONFIG_HOME nor HOME is set"),
    };
    Ok(root.join(APP_DIR).join(CONFIG_FILE))
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    #[test]
    fn test_dir_override_wins() {
        // Arrange
        let dir = PathBuf::from("/srv/cinedex");

        // Act
        let path = config_path_from(
            Some(&dir),
            Some(OsString::from("/xdg")),
            Some(OsString::from("/home/u")),
        )
        .unwrap();

        // Assert
        assert_eq!(path, PathBuf::from("/srv/cinedex/config.toml"));
    }

    #[test]
    fn test_xdg_config_home_before_home() {
        // Arrange & Act
        let path = config_path_from(
            None,
            Some(OsString::from("/xdg")),
            Some(OsString::from("/home/u")),
        )
        .unwrap();

        // Assert
        assert_eq!(path, PathBuf::from("/xdg/cinedex/config.toml"));
    }

    #[test]
    fn test_home_fallback_and_empty_xdg() {
        // Arrange & Act
        let path = config_path_from(
            None,
            Some(OsString::new()),
            Some(OsString::from("/home/u")),
        )
        .unwrap();

        // Assert
        assert_eq!(path, PathBuf::from("/home/u/.config/cinedex/config.toml"));
    }

    #[test]
    fn test_no_location_is_error() {
        // Arrange & Act
        let result = config_path_from(None, None, Some(OsString::new()));

        // Assert
        assert!(result.is_err());
    }
}
