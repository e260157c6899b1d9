//! Evernote data directory discovery.
//!
//! Locates the per-account directory holding `Evernote.sql` and `content/`.

use std::path::{Path, PathBuf};

use crate::domain::config::DATABASE_FILE;
use crate::domain::{AppError, Result};

/// Evernote's data root, relative to the home directory.
const EVERNOTE_DATA_PATH: &str = "Library/Application Support/Evernote/data";

/// Account used when none is configured and none can be discovered.
pub const DEFAULT_ACCOUNT: &str = "101370";

/// Discovers Evernote's data root under the user's home directory.
///
/// # Errors
/// Returns error if home directory cannot be determined or Evernote is not installed.
pub fn find_evernote_data_root() -> Result<PathBuf> {
    let home = dirs::home_dir().ok_or_else(|| AppError::Config {
        message: "Could not determine home directory".into(),
    })?;

    let root = home.join(EVERNOTE_DATA_PATH);
    if root.is_dir() {
        tracing::debug!("Found Evernote data at: {}", root.display());
        return Ok(root);
    }

    Err(AppError::Config {
        message: format!(
            "Evernote data directory not found at {}. Use --data-dir to point at an account directory",
            root.display()
        ),
    })
}

/// Lists account directories under `root` that contain a metadata database,
/// sorted by path.
#[must_use]
pub fn find_accounts(root: &Path) -> Vec<PathBuf> {
    let mut accounts = Vec::new();

    match std::fs::read_dir(root) {
        Ok(entries) => {
            for entry in entries.filter_map(std::result::Result::ok) {
                let path = entry.path();
                if path.join(DATABASE_FILE).is_file() {
                    tracing::debug!("Found Evernote account: {}", path.display());
                    accounts.push(path);
                }
            }
        }
        Err(e) => {
            tracing::warn!("Failed to read Evernote data directory: {}", e);
        }
    }

    accounts.sort();
    accounts
}

/// Picks the account directory inside `root`.
///
/// An explicit account wins; otherwise the first discovered account, then
/// the historical default.
#[must_use]
pub fn resolve_account_dir(root: &Path, account: Option<&str>) -> PathBuf {
    if let Some(account) = account {
        return root.join(account);
    }

    find_accounts(root).into_iter().next().unwrap_or_else(|| {
        tracing::info!("No account discovered, falling back to {}", DEFAULT_ACCOUNT);
        root.join(DEFAULT_ACCOUNT)
    })
}

/// Resolves the account data directory from an explicit path or the
/// platform default location.
///
/// # Errors
/// Returns error if no explicit path is given and Evernote's data root cannot be found.
pub fn resolve_data_dir(explicit: Option<PathBuf>, account: Option<&str>) -> Result<PathBuf> {
    match explicit {
        Some(dir) => Ok(dir),
        None => {
            let root = find_evernote_data_root()?;
            Ok(resolve_account_dir(&root, account))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_explicit_data_dir_wins() {
        let dir = resolve_data_dir(Some(PathBuf::from("/tmp/acct")), Some("999")).unwrap();
        assert_eq!(dir, PathBuf::from("/tmp/acct"));
    }

    #[test]
    fn test_explicit_account() {
        let root = tempdir().unwrap();
        assert_eq!(
            resolve_account_dir(root.path(), Some("555")),
            root.path().join("555")
        );
    }

    #[test]
    fn test_discovers_first_account_with_database() {
        let root = tempdir().unwrap();
        fs::create_dir_all(root.path().join("100")).unwrap();
        for account in ["300", "200"] {
            let dir = root.path().join(account);
            fs::create_dir_all(&dir).unwrap();
            fs::write(dir.join(DATABASE_FILE), b"").unwrap();
        }

        assert_eq!(
            find_accounts(root.path()),
            vec![root.path().join("200"), root.path().join("300")]
        );
        assert_eq!(resolve_account_dir(root.path(), None), root.path().join("200"));
    }

    #[test]
    fn test_falls_back_to_default_account() {
        let root = tempdir().unwrap();
        assert_eq!(
            resolve_account_dir(root.path(), None),
            root.path().join(DEFAULT_ACCOUNT)
        );
    }
}
