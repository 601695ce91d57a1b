//! Store configuration and notebook defaults.

use std::path::{Path, PathBuf};
use std::time::Duration;

/// File extension of notebook databases.
pub const NOTEBOOK_FILE_EXTENSION: &str = "cnb";
/// Title given to a freshly initialized notebook.
pub const DEFAULT_NOTEBOOK_TITLE: &str = "New Notebook";
/// Column added to a freshly initialized notebook.
pub const DEFAULT_COLUMN_NAME: &str = "New Column";

const DEFAULT_BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Connection settings applied on every store call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    /// How long a call waits on a locked notebook file before failing.
    pub busy_timeout: Duration,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            busy_timeout: DEFAULT_BUSY_TIMEOUT,
        }
    }
}

/// Builds `<dir>/<stem>.cnb`, replacing any extension already on `stem`.
pub fn notebook_file_path(dir: impl AsRef<Path>, stem: &str) -> PathBuf {
    dir.as_ref()
        .join(stem)
        .with_extension(NOTEBOOK_FILE_EXTENSION)
}

#[cfg(test)]
mod tests {
    use super::{notebook_file_path, StoreConfig};
    use std::path::Path;
    use std::time::Duration;

    #[test]
    fn default_busy_timeout_is_five_seconds() {
        assert_eq!(StoreConfig::default().busy_timeout, Duration::from_secs(5));
    }

    #[test]
    fn notebook_file_path_uses_cnb_extension() {
        let path = notebook_file_path("/tmp/notes", "Trip Plans");
        assert_eq!(path, Path::new("/tmp/notes/Trip Plans.cnb"));

        let replaced = notebook_file_path("/tmp/notes", "old.sqlite");
        assert_eq!(replaced, Path::new("/tmp/notes/old.cnb"));
    }
}
