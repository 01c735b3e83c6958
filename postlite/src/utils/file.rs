//! Path helpers

use std::path::{Path, PathBuf};

/// Expand a leading `~` to the home directory.
///
/// Other paths, including relative ones, are returned unchanged and
/// resolve against the working directory when opened.
pub fn expand_home(path: &Path) -> PathBuf {
    let Ok(rest) = path.strip_prefix("~") else {
        return path.to_path_buf();
    };
    match dirs::home_dir() {
        Some(home) if rest.as_os_str().is_empty() => home,
        Some(home) => home.join(rest),
        None => path.to_path_buf(),
    }
}
