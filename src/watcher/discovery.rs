//! Session path discovery utilities.
//!
//! Locates the project directories to watch and the session files inside
//! them.

use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use super::error::WatcherError;

/// File suffix of Claude Code session logs.
pub const SESSION_FILE_SUFFIX: &str = ".jsonl";

/// Default projects directory: `~/.claude/projects`.
///
/// Returns `None` if the home directory cannot be determined.
#[must_use]
pub fn default_projects_dir() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".claude").join("projects"))
}

/// Whether `path` names a session log file.
#[must_use]
pub fn is_session_file(path: &Path) -> bool {
    path.file_name()
        .and_then(|name| name.to_str())
        .is_some_and(|name| name.ends_with(SESSION_FILE_SUFFIX))
}

/// Resolve the directories to watch under `base`.
///
/// Without a filter the whole base directory is watched. With a filter,
/// every immediate subdirectory whose name matches the glob `*<filter>*`
/// is returned, sorted. Returned paths are canonical so they line up with
/// the paths reported by the file watcher.
///
/// # Errors
///
/// Returns an error if `base` cannot be read or the filter is not a valid
/// glob fragment.
pub fn resolve_watch_dirs(base: &Path, filter: Option<&str>) -> Result<Vec<PathBuf>, WatcherError> {
    let base = base.canonicalize()?;

    let Some(filter) = filter else {
        return Ok(vec![base]);
    };

    let pattern =
        glob::Pattern::new(&format!("*{filter}*")).map_err(|source| WatcherError::InvalidFilter {
            filter: filter.to_string(),
            source,
        })?;

    let mut dirs: Vec<PathBuf> = std::fs::read_dir(&base)?
        .filter_map(Result::ok)
        .filter(|entry| entry.path().is_dir())
        .filter(|entry| {
            entry
                .file_name()
                .to_str()
                .is_some_and(|name| pattern.matches(name))
        })
        .map(|entry| entry.path())
        .collect();

    dirs.sort();
    tracing::debug!(base = %base.display(), filter, matched = dirs.len(), "Resolved watch directories");
    Ok(dirs)
}

/// Find every session file below `dir`, recursively, sorted by path.
///
/// Unreadable entries are skipped.
#[must_use]
pub fn find_session_files(dir: &Path) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = WalkDir::new(dir)
        .follow_links(true)
        .into_iter()
        .filter_map(|entry| match entry {
            Ok(e) => Some(e),
            Err(e) => {
                tracing::debug!(error = %e, "Skipping unreadable entry");
                None
            }
        })
        .filter(|e| e.file_type().is_file() && is_session_file(e.path()))
        .map(walkdir::DirEntry::into_path)
        .collect();

    files.sort();
    files
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn make_projects() -> TempDir {
        let temp = TempDir::new().unwrap();
        for name in ["-home-user-georgia", "-home-user-atlanta", "-srv-georgia-api"] {
            std::fs::create_dir(temp.path().join(name)).unwrap();
        }
        std::fs::write(temp.path().join("georgia-notes.txt"), "").unwrap();
        temp
    }

    #[test]
    fn test_is_session_file() {
        assert!(is_session_file(Path::new("/tmp/abc.jsonl")));
        assert!(!is_session_file(Path::new("/tmp/abc.json")));
        assert!(!is_session_file(Path::new("/tmp/abc.jsonl.bak")));
        assert!(!is_session_file(Path::new("/")));
    }

    #[test]
    fn test_default_projects_dir() {
        if let Some(dir) = default_projects_dir() {
            assert!(dir.ends_with(".claude/projects"));
        }
    }

    #[test]
    fn test_resolve_without_filter_watches_base() {
        let temp = make_projects();
        let dirs = resolve_watch_dirs(temp.path(), None).unwrap();
        assert_eq!(dirs, vec![temp.path().canonicalize().unwrap()]);
    }

    #[test]
    fn test_resolve_with_filter_matches_substring_dirs_only() {
        let temp = make_projects();
        let dirs = resolve_watch_dirs(temp.path(), Some("georgia")).unwrap();

        let names: Vec<String> = dirs
            .iter()
            .map(|d| d.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["-home-user-georgia", "-srv-georgia-api"]);
    }

    #[test]
    fn test_resolve_with_unmatched_filter_is_empty() {
        let temp = make_projects();
        assert!(resolve_watch_dirs(temp.path(), Some("boston"))
            .unwrap()
            .is_empty());
    }

    #[test]
    fn test_resolve_invalid_filter() {
        let temp = make_projects();
        let result = resolve_watch_dirs(temp.path(), Some("[oops"));
        assert!(matches!(result, Err(WatcherError::InvalidFilter { .. })));
    }

    #[test]
    fn test_resolve_missing_base() {
        let result = resolve_watch_dirs(Path::new("/nonexistent/projects-12345"), None);
        assert!(matches!(result, Err(WatcherError::Io(_))));
    }

    #[test]
    fn test_find_session_files_recursive_and_sorted() {
        let temp = TempDir::new().unwrap();
        let nested = temp.path().join("proj").join("subagents");
        std::fs::create_dir_all(&nested).unwrap();
        std::fs::write(temp.path().join("proj").join("b.jsonl"), "").unwrap();
        std::fs::write(temp.path().join("proj").join("a.jsonl"), "").unwrap();
        std::fs::write(nested.join("agent-1.jsonl"), "").unwrap();
        std::fs::write(temp.path().join("proj").join("notes.md"), "").unwrap();

        let files = find_session_files(temp.path());

        assert_eq!(
            files,
            vec![
                temp.path().join("proj").join("a.jsonl"),
                temp.path().join("proj").join("b.jsonl"),
                nested.join("agent-1.jsonl"),
            ]
        );
    }
}
