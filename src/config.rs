//! Credential storage.
//!
//! The API key lives in a flat `KEY=value` file under the install
//! directory, read once at startup and rewritten by the setup flow.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context as _, Result};

/// Key name in the credential file.
pub const API_KEY_NAME: &str = "GEMINI_API_KEY";

const ENV_FILE: &str = ".env";

/// Everything psbridge writes to disk (credentials, logs) lives here.
/// `!uninstall` removes this directory.
pub fn install_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".psbridge")
}

pub struct KeyStore {
    path: PathBuf,
}

impl KeyStore {
    pub fn open_default() -> Self {
        Self {
            path: install_dir().join(ENV_FILE),
        }
    }

    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Read the stored API key, if any. Blank lines and `#` comments are
    /// skipped; only the first `=` splits key from value.
    pub fn load(&self) -> Option<String> {
        let contents = fs::read_to_string(&self.path).ok()?;
        for line in contents.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            if let Some((key, value)) = line.split_once('=') {
                if key == API_KEY_NAME && !value.is_empty() {
                    return Some(value.to_string());
                }
            }
        }
        None
    }

    pub fn save(&self, api_key: &str) -> Result<()> {
        ensure_parent_dir(&self.path)?;
        fs::write(&self.path, format!("{API_KEY_NAME}={api_key}\n"))
            .with_context(|| format!("Failed to write credential file: {}", self.path.display()))
    }
}

fn ensure_parent_dir(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_save_then_load_round_trip() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = KeyStore::at(dir.path().join(".env"));

        store.save("abc123").expect("save");
        assert_eq!(store.load(), Some("abc123".to_string()));
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = KeyStore::at(dir.path().join(".env"));
        assert_eq!(store.load(), None);
    }

    #[test]
    fn test_load_skips_comments_and_foreign_keys() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join(".env");
        fs::write(
            &path,
            "# generated by setup\nOTHER_KEY=nope\nGEMINI_API_KEY=real-key\n",
        )
        .expect("write");

        assert_eq!(KeyStore::at(&path).load(), Some("real-key".to_string()));
    }

    #[test]
    fn test_value_with_equals_survives() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join(".env");
        fs::write(&path, "GEMINI_API_KEY=ab=cd==\n").expect("write");

        assert_eq!(KeyStore::at(&path).load(), Some("ab=cd==".to_string()));
    }

    #[test]
    fn test_empty_value_is_no_key() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join(".env");
        fs::write(&path, "GEMINI_API_KEY=\n").expect("write");

        assert_eq!(KeyStore::at(&path).load(), None);
    }

    #[test]
    fn test_save_creates_parent_directory() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = KeyStore::at(dir.path().join("nested/.env"));

        store.save("k").expect("save");
        assert_eq!(store.load(), Some("k".to_string()));
    }
}
