//! Executable lookup on a search path.

use std::ffi::{OsStr, OsString};
use std::path::{Path, PathBuf};

use cinder_shared::constants::envs;
use cinder_shared::{CinderError, CinderResult};

/// Finds executables by name.
pub trait ToolLocator: Send + Sync {
    /// Full path of `tool`, or `None` if it is not available.
    fn locate(&self, tool: &str) -> Option<PathBuf>;

    /// Like [`locate`](Self::locate), failing with [`CinderError::ToolNotFound`].
    fn require(&self, tool: &str) -> CinderResult<PathBuf> {
        self.locate(tool)
            .ok_or_else(|| CinderError::ToolNotFound(tool.to_string()))
    }
}

/// Ordered list of directories searched for executables, like `PATH`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchPath {
    dirs: Vec<PathBuf>,
}

impl SearchPath {
    /// Parse a colon-separated directory list. Empty entries are skipped.
    pub fn new(path: impl AsRef<OsStr>) -> Self {
        Self {
            dirs: std::env::split_paths(path.as_ref())
                .filter(|dir| !dir.as_os_str().is_empty())
                .collect(),
        }
    }

    /// Search path of the current process (`PATH`).
    pub fn from_env() -> Self {
        Self::new(std::env::var_os(envs::PATH).unwrap_or_default())
    }

    pub fn dirs(&self) -> &[PathBuf] {
        &self.dirs
    }

    /// Rebuild the colon-separated form.
    pub fn to_os_string(&self) -> OsString {
        std::env::join_paths(&self.dirs).unwrap_or_default()
    }
}

impl ToolLocator for SearchPath {
    fn locate(&self, tool: &str) -> Option<PathBuf> {
        for dir in &self.dirs {
            let candidate = dir.join(tool);
            tracing::trace!("Looking for {:?} at {:?}", tool, candidate);
            if is_executable(&candidate) {
                tracing::debug!(tool, path = %candidate.display(), "Found tool");
                return Some(candidate);
            }
        }

        tracing::debug!(tool, dirs = ?self.dirs, "Tool not found on search path");
        None
    }
}

#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;

    std::fs::metadata(path)
        .map(|m| m.is_file() && m.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

#[cfg(not(unix))]
fn is_executable(path: &Path) -> bool {
    path.is_file()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::os::unix::fs::PermissionsExt;
    use tempfile::TempDir;

    fn write_tool(dir: &Path, name: &str, mode: u32) -> PathBuf {
        let path = dir.join(name);
        fs::write(&path, "#!/bin/sh\n").unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(mode)).unwrap();
        path
    }

    #[test]
    fn test_search_path_parsing_skips_empty_entries() {
        let path = SearchPath::new("/usr/local/bin::/usr/bin:");
        assert_eq!(
            path.dirs(),
            &[PathBuf::from("/usr/local/bin"), PathBuf::from("/usr/bin")]
        );
        assert_eq!(path.to_os_string(), OsString::from("/usr/local/bin:/usr/bin"));
    }

    #[test]
    fn test_locate_first_match_wins() {
        let first = TempDir::new().unwrap();
        let second = TempDir::new().unwrap();
        write_tool(second.path(), "rbd", 0o755);
        let expected = write_tool(first.path(), "rbd", 0o755);

        let path = SearchPath::new(std::env::join_paths([first.path(), second.path()]).unwrap());
        assert_eq!(path.locate("rbd"), Some(expected));
    }

    #[test]
    fn test_locate_skips_non_executable_and_dirs() {
        let dir = TempDir::new().unwrap();
        write_tool(dir.path(), "file", 0o644);
        fs::create_dir(dir.path().join("mkfs.ext4")).unwrap();

        let path = SearchPath::new(dir.path());
        assert_eq!(path.locate("file"), None);
        assert_eq!(path.locate("mkfs.ext4"), None);
    }

    #[test]
    fn test_require_names_missing_tool() {
        let path = SearchPath::new("");
        let err = path.require("rbd").unwrap_err();
        assert!(matches!(err, CinderError::ToolNotFound(ref tool) if tool == "rbd"));
    }
}
