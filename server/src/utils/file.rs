//! Path helpers for user-supplied directories

use std::path::PathBuf;

/// Expand a user-supplied path to an absolute path.
///
/// `~` and `~/...` resolve against the home directory; anything relative
/// (including bare names) resolves against the current working directory.
/// Empty input yields the current working directory.
pub fn expand_path(path: &str) -> PathBuf {
    let path = path.trim();
    let cwd = || std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));

    if path.is_empty() {
        return cwd();
    }

    let expanded = match (path, dirs::home_dir()) {
        ("~", Some(home)) => home,
        (p, Some(home)) if p.starts_with("~/") => home.join(&p[2..]),
        (p, _) => PathBuf::from(p),
    };

    if expanded.is_relative() {
        cwd().join(expanded)
    } else {
        expanded
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expand_path_absolute_unchanged() {
        assert_eq!(expand_path("/srv/parkspot"), PathBuf::from("/srv/parkspot"));
    }

    #[test]
    fn test_expand_path_relative_becomes_absolute() {
        let result = expand_path("./.parkspot");
        assert!(result.is_absolute());
        assert!(result.ends_with(".parkspot"));

        let result = expand_path("spots.db");
        assert!(result.is_absolute());
        assert!(result.ends_with("spots.db"));
    }

    #[test]
    fn test_expand_path_tilde() {
        let result = expand_path("~/.parkspot");
        assert!(!result.to_string_lossy().contains('~'));
        assert!(result.ends_with(".parkspot"));

        if let Some(home) = dirs::home_dir() {
            assert_eq!(expand_path("~"), home);
        }
    }

    #[test]
    fn test_expand_path_trims_and_handles_empty() {
        assert_eq!(expand_path("  /data  "), PathBuf::from("/data"));
        assert!(expand_path("").is_absolute());
    }
}
