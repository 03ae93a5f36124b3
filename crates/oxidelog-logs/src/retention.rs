//! Log file retention management
//!
//! Keeps at most `max_files` entries whose name starts with the active
//! file's base name. The active file itself counts toward that total.

use oxidelog_core::Result;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

/// A directory entry that belongs to the rotated set
#[derive(Debug, Clone)]
pub struct LogFile {
    pub path: PathBuf,
    pub name: String,
    pub modified: SystemTime,
}

/// Outcome of a cleanup pass
#[derive(Debug, Default)]
pub struct CleanupReport {
    pub deleted: Vec<PathBuf>,
    pub failed: Vec<(PathBuf, io::Error)>,
}

impl CleanupReport {
    pub fn is_empty(&self) -> bool {
        self.deleted.is_empty() && self.failed.is_empty()
    }
}

/// Collect entries in `dir` whose name starts with `prefix`, oldest first.
///
/// Every kind of entry counts, so a same-prefix directory takes a slot and
/// shows up as a failed deletion. Entries are ordered by modification time,
/// ties broken by name. The entry named exactly `prefix` (the active file)
/// always sorts last.
pub fn collect_log_files(dir: &Path, prefix: &str) -> Result<Vec<LogFile>> {
    let mut files = Vec::new();

    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let name = entry.file_name().to_string_lossy().into_owned();
        if !name.starts_with(prefix) {
            continue;
        }

        let metadata = match entry.metadata() {
            Ok(metadata) => metadata,
            Err(_) => continue,
        };

        files.push(LogFile {
            path: entry.path(),
            name,
            modified: metadata.modified().unwrap_or(SystemTime::UNIX_EPOCH),
        });
    }

    files.sort_by(|a, b| {
        (a.name == prefix, a.modified, &a.name).cmp(&(b.name == prefix, b.modified, &b.name))
    });

    Ok(files)
}

/// The leading files to delete so that `keep` remain
pub fn excess_files(files: &[LogFile], keep: usize) -> &[LogFile] {
    if files.len() <= keep {
        return &[];
    }
    &files[..files.len() - keep]
}

/// Delete the oldest same-prefix files in `dir` until `keep` remain.
///
/// A failed deletion is recorded and does not stop the others. Only a
/// failure to list the directory is returned as an error.
pub fn cleanup_old_files(dir: &Path, prefix: &str, keep: usize) -> Result<CleanupReport> {
    let files = collect_log_files(dir, prefix)?;
    let mut report = CleanupReport::default();

    for file in excess_files(&files, keep) {
        match fs::remove_file(&file.path) {
            Ok(()) => report.deleted.push(file.path.clone()),
            Err(e) => report.failed.push((file.path.clone(), e)),
        }
    }

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use std::io::Write;
    use std::time::Duration;
    use tempfile::TempDir;

    fn create_log_file(dir: &Path, name: &str, age_secs: u64) -> PathBuf {
        let path = dir.join(name);
        let mut file = File::create(&path).unwrap();
        file.write_all(b"test").unwrap();
        file.set_modified(SystemTime::now() - Duration::from_secs(age_secs))
            .unwrap();
        path
    }

    #[test]
    fn test_cleanup_nonexistent_dir() {
        let result = cleanup_old_files(Path::new("/nonexistent/path/for/testing"), "app.log", 5);
        assert!(result.is_err());
    }

    #[test]
    fn test_cleanup_under_limit_does_nothing() {
        let temp_dir = TempDir::new().unwrap();
        create_log_file(temp_dir.path(), "app.log", 0);
        create_log_file(temp_dir.path(), "app.log.1", 60);

        let report = cleanup_old_files(temp_dir.path(), "app.log", 2).unwrap();
        assert!(report.is_empty());
        assert_eq!(fs::read_dir(temp_dir.path()).unwrap().count(), 2);
    }

    #[test]
    fn test_cleanup_deletes_oldest_first() {
        let temp_dir = TempDir::new().unwrap();
        let dir = temp_dir.path();

        create_log_file(dir, "app.log", 0);
        let oldest = create_log_file(dir, "app.log.3", 300);
        let older = create_log_file(dir, "app.log.2", 200);
        create_log_file(dir, "app.log.1", 100);
        create_log_file(dir, "app.log.gz", 50);

        let report = cleanup_old_files(dir, "app.log", 3).unwrap();

        assert_eq!(report.deleted, vec![oldest.clone(), older.clone()]);
        assert!(report.failed.is_empty());
        assert!(!oldest.exists());
        assert!(!older.exists());
        assert!(dir.join("app.log").exists());
        assert!(dir.join("app.log.1").exists());
        assert!(dir.join("app.log.gz").exists());
    }

    #[test]
    fn test_cleanup_never_picks_active_file_first() {
        let temp_dir = TempDir::new().unwrap();
        let dir = temp_dir.path();

        // The active file is older than its siblings but still survives
        create_log_file(dir, "app.log", 1000);
        create_log_file(dir, "app.log.1", 10);
        create_log_file(dir, "app.log.2", 20);

        let report = cleanup_old_files(dir, "app.log", 1).unwrap();
        assert_eq!(report.deleted.len(), 2);
        assert!(dir.join("app.log").exists());
    }

    #[test]
    fn test_cleanup_ignores_non_matching_files() {
        let temp_dir = TempDir::new().unwrap();
        let dir = temp_dir.path();

        create_log_file(dir, "app.log", 0);
        create_log_file(dir, "app.log.1", 100);
        let other = create_log_file(dir, "other.log", 500);

        let report = cleanup_old_files(dir, "app.log", 1).unwrap();
        assert_eq!(report.deleted, vec![dir.join("app.log.1")]);
        assert!(other.exists());
    }

    #[test]
    fn test_cleanup_failure_does_not_stop_other_deletions() {
        let temp_dir = TempDir::new().unwrap();
        let dir = temp_dir.path();

        create_log_file(dir, "app.log.2", 300);
        create_log_file(dir, "app.log.1", 200);
        fs::create_dir(dir.join("app.log.d")).unwrap();
        create_log_file(dir, "app.log", 0);

        let report = cleanup_old_files(dir, "app.log", 1).unwrap();

        assert_eq!(report.deleted, vec![dir.join("app.log.2"), dir.join("app.log.1")]);
        assert_eq!(report.failed.len(), 1);
        assert_eq!(report.failed[0].0, dir.join("app.log.d"));
        assert!(dir.join("app.log.d").is_dir());
        assert!(dir.join("app.log").exists());
    }

    #[test]
    fn test_collect_orders_ties_by_name() {
        let temp_dir = TempDir::new().unwrap();
        let dir = temp_dir.path();

        let stamp = SystemTime::now() - Duration::from_secs(100);
        for name in ["app.log.b", "app.log.a"] {
            let file = File::create(dir.join(name)).unwrap();
            file.set_modified(stamp).unwrap();
        }

        let names: Vec<String> = collect_log_files(dir, "app.log")
            .unwrap()
            .into_iter()
            .map(|f| f.name)
            .collect();
        assert_eq!(names, vec!["app.log.a".to_string(), "app.log.b".to_string()]);
    }

    #[test]
    fn test_excess_files() {
        let now = SystemTime::now();
        let files: Vec<LogFile> = (0..4)
            .map(|i| LogFile {
                path: PathBuf::from(format!("app.log.{}", i)),
                name: format!("app.log.{}", i),
                modified: now,
            })
            .collect();

        assert_eq!(excess_files(&files, 4).len(), 0);
        assert_eq!(excess_files(&files, 10).len(), 0);
        let excess = excess_files(&files, 1);
        assert_eq!(excess.len(), 3);
        assert_eq!(excess[0].name, "app.log.0");
    }
}
