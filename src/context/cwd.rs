//! Working directory tracking.
//!
//! Directory changes must happen in this process: the execution side runs
//! commands in a subprocess, where a chdir would not survive.

use std::env;
use std::io;
use std::path::Path;

#[derive(Clone, Debug, Default)]
pub struct CurrentDir {
    pub path: String,
}

impl CurrentDir {
    /// Capture the current working directory from the process.
    pub fn capture() -> Self {
        let path = env::current_dir()
            .map(|p| p.to_string_lossy().into_owned())
            .unwrap_or_else(|_| ".".to_string());
        Self { path }
    }

    /// The final path component, used for the prompt.
    pub fn base_name(&self) -> &str {
        Path::new(&self.path)
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or(&self.path)
    }
}

/// Change this process's working directory, expanding a leading `~`.
pub fn change_dir(path: &str) -> io::Result<()> {
    env::set_current_dir(expand_home(path))
}

/// Expand a leading `~` (alone or followed by a separator) to the home
/// directory. Anything else is returned unchanged.
pub fn expand_home(path: &str) -> String {
    if let Some(rest) = path.strip_prefix('~') {
        if rest.is_empty() || rest.starts_with('/') || rest.starts_with('\\') {
            if let Some(home) = dirs::home_dir() {
                return format!("{}{}", home.display(), rest);
            }
        }
    }
    path.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expand_home_alone_and_with_path() {
        if let Some(home) = dirs::home_dir() {
            assert_eq!(expand_home("~"), home.display().to_string());
            assert_eq!(
                expand_home("~/projects"),
                format!("{}/projects", home.display())
            );
        }
    }

    #[test]
    fn test_expand_home_leaves_other_paths_alone() {
        assert_eq!(expand_home("/tmp"), "/tmp");
        assert_eq!(expand_home("relative/dir"), "relative/dir");
        // A tilde that is not a path prefix is not expanded.
        assert_eq!(expand_home("~user/files"), "~user/files");
        assert_eq!(expand_home("a~b"), "a~b");
    }

    #[test]
    fn test_base_name() {
        let dir = CurrentDir {
            path: "/home/user/projects".to_string(),
        };
        assert_eq!(dir.base_name(), "projects");
    }
}
