//! Day-rotated file handler with gzip archives
//!
//! Records for logger `name` go to `{dir}/{name}.log`. The first write on a later calendar
//! day compresses that file into `{dir}/{name}/{YYYY-MM-DD}.log.gz`, named for the day it
//! covered, and starts a fresh one. Only the newest archives are kept.

use crate::core::error::{LoggerError, Result};
use chrono::{DateTime, Local, NaiveDate};
use parking_lot::Mutex;
use std::fs::{self, File, OpenOptions};
use std::io::{self, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::SystemTime;

pub const ARCHIVE_EXTENSION: &str = "log.gz";

/// How many archived days survive a rotation
///
/// # Examples
///
/// ```
/// use alert_logger::handlers::RetentionPolicy;
///
/// let policy = RetentionPolicy::new().with_max_archives(30);
/// assert_eq!(policy.max_archives, 30);
/// assert_eq!(RetentionPolicy::default().max_archives, 7);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetentionPolicy {
    pub max_archives: usize,
}

impl Default for RetentionPolicy {
    fn default() -> Self {
        Self { max_archives: 7 }
    }
}

impl RetentionPolicy {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use = "builder methods return a new value and do not modify the original"]
    pub fn with_max_archives(mut self, count: usize) -> Self {
        self.max_archives = count;
        self
    }
}

struct RotationState {
    writer: Option<BufWriter<File>>,
    /// Calendar day the active file covers
    day: NaiveDate,
}

pub struct RotatingFileHandler {
    active_path: PathBuf,
    archive_dir: PathBuf,
    retention: RetentionPolicy,
    state: Mutex<RotationState>,
}

impl RotatingFileHandler {
    /// Create `dir` if needed and open `{dir}/{logger_name}.log` for appending
    ///
    /// # Errors
    ///
    /// Returns error if the directory cannot be created or the file cannot be opened
    pub fn new(dir: impl AsRef<Path>, logger_name: &str) -> Result<Self> {
        Self::with_retention(dir, logger_name, RetentionPolicy::default())
    }

    pub fn with_retention(
        dir: impl AsRef<Path>,
        logger_name: &str,
        retention: RetentionPolicy,
    ) -> Result<Self> {
        let dir = dir.as_ref();
        if logger_name.is_empty() || logger_name.contains(|c: char| c == '/' || c == '\\') {
            return Err(LoggerError::config(
                "RotatingFileHandler",
                format!("logger name '{}' cannot be used as a file name", logger_name),
            ));
        }

        fs::create_dir_all(dir).map_err(|e| {
            LoggerError::io_operation(
                "create log directory",
                format!("Failed to create directory '{}'", dir.display()),
                e,
            )
        })?;

        let active_path = dir.join(format!("{}.log", logger_name));
        let file = open_append(&active_path)?;

        let metadata = file.metadata().map_err(|e| {
            LoggerError::file_handler(
                active_path.display().to_string(),
                format!("Cannot access file metadata: {}", e),
            )
        })?;
        // an existing file covers the day it was last written
        let modified = metadata.modified().unwrap_or_else(|_| SystemTime::now());
        let day = DateTime::<Local>::from(modified).date_naive();

        Ok(Self {
            archive_dir: dir.join(logger_name),
            active_path,
            retention,
            state: Mutex::new(RotationState {
                writer: Some(BufWriter::new(file)),
                day,
            }),
        })
    }

    /// Append `line`, rotating first when `day` is later than the day the active file covers
    ///
    /// A failed rotation keeps the uncompressed file, still writes the line, and returns
    /// the rotation error. The next write retries the rotation.
    pub fn write(&self, day: NaiveDate, line: &str) -> Result<()> {
        let mut state = self.state.lock();

        let mut rotation_error = None;
        if day > state.day {
            if let Err(e) = self.rotate(&mut state, day) {
                eprintln!("[WARN] Log rotation failed: {}. Continuing with current file.", e);
                rotation_error = Some(e);
            }
        }

        if state.writer.is_none() {
            state.writer = Some(BufWriter::new(open_append(&self.active_path)?));
        }
        if let Some(ref mut writer) = state.writer {
            writer
                .write_all(line.as_bytes())
                .and_then(|()| writer.write_all(b"\n"))
                .and_then(|()| writer.flush())
                .map_err(|e| {
                    LoggerError::file_handler(
                        self.active_path.display().to_string(),
                        format!("Failed to write log entry: {}", e),
                    )
                })?;
        }

        match rotation_error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    fn rotate(&self, state: &mut RotationState, new_day: NaiveDate) -> Result<()> {
        if let Some(mut writer) = state.writer.take() {
            writer.flush().map_err(|e| {
                LoggerError::file_rotation(
                    self.active_path.display().to_string(),
                    format!("Failed to flush before rotation: {}", e),
                )
            })?;
        }

        let archive = self.archive_path(state.day);
        if self.active_path.exists() {
            self.compress_file(&archive)?;
        }

        // compression succeeded, so the truncated file loses nothing
        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(&self.active_path)
            .map_err(|e| {
                LoggerError::file_rotation(
                    self.active_path.display().to_string(),
                    format!("Failed to create new log file: {}", e),
                )
            })?;
        state.writer = Some(BufWriter::new(file));
        state.day = new_day;

        self.prune_archives();
        Ok(())
    }

    /// Gzip the active file into `archive`, going through a temporary file so a partial
    /// archive never takes the final name. The source is removed only after the archive
    /// is complete.
    fn compress_file(&self, archive: &Path) -> Result<()> {
        let source = &self.active_path;
        let temp_path = archive.with_extension("gz.tmp");

        let result = (|| -> io::Result<()> {
            fs::create_dir_all(&self.archive_dir)?;
            let input = File::open(source)?;
            let mut reader = BufReader::with_capacity(64 * 1024, input);
            let output = BufWriter::with_capacity(64 * 1024, File::create(&temp_path)?);
            let mut encoder = flate2::write::GzEncoder::new(output, flate2::Compression::default());
            io::copy(&mut reader, &mut encoder)?;
            encoder.finish()?.flush()?;
            fs::rename(&temp_path, archive)
        })();

        if let Err(e) = result {
            let _ = fs::remove_file(&temp_path);
            return Err(LoggerError::file_rotation(
                source.display().to_string(),
                format!("Failed to archive into '{}': {}", archive.display(), e),
            ));
        }

        if let Err(e) = fs::remove_file(source) {
            eprintln!(
                "[WARN] Archived {} but failed to remove it: {}",
                source.display(),
                e
            );
        }
        Ok(())
    }

    /// Delete the oldest archives beyond the retention count
    fn prune_archives(&self) {
        let mut archives = self.archives();
        if archives.len() <= self.retention.max_archives {
            return;
        }

        let excess = archives.len() - self.retention.max_archives;
        for old in archives.drain(..excess) {
            if let Err(e) = fs::remove_file(&old) {
                eprintln!("[WARN] Failed to remove old archive {}: {}", old.display(), e);
            }
        }
    }

    /// Archived files, oldest first
    pub fn archives(&self) -> Vec<PathBuf> {
        let Ok(entries) = fs::read_dir(&self.archive_dir) else {
            return Vec::new();
        };

        let suffix = format!(".{}", ARCHIVE_EXTENSION);
        let mut archives: Vec<PathBuf> = entries
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .filter(|path| {
                path.file_name()
                    .and_then(|name| name.to_str())
                    .is_some_and(|name| name.ends_with(&suffix))
            })
            .collect();
        // YYYY-MM-DD names sort chronologically
        archives.sort();
        archives
    }

    pub fn archive_path(&self, day: NaiveDate) -> PathBuf {
        self.archive_dir
            .join(format!("{}.{}", day.format("%Y-%m-%d"), ARCHIVE_EXTENSION))
    }

    pub fn path(&self) -> &Path {
        &self.active_path
    }

    pub fn archive_dir(&self) -> &Path {
        &self.archive_dir
    }

    pub fn retention(&self) -> RetentionPolicy {
        self.retention
    }

    /// Day the active file currently covers
    pub fn current_day(&self) -> NaiveDate {
        self.state.lock().day
    }

    pub fn flush(&self) -> Result<()> {
        if let Some(ref mut writer) = self.state.lock().writer {
            writer.flush().map_err(|e| {
                LoggerError::file_handler(
                    self.active_path.display().to_string(),
                    format!("Failed to flush: {}", e),
                )
            })?;
        }
        Ok(())
    }
}

fn open_append(path: &Path) -> Result<File> {
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|e| {
            LoggerError::file_handler(path.display().to_string(), format!("Failed to open: {}", e))
        })
}

impl Drop for RotatingFileHandler {
    fn drop(&mut self) {
        if let Some(mut writer) = self.state.get_mut().writer.take() {
            let _ = writer.flush();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Days;
    use flate2::read::GzDecoder;
    use std::io::Read;
    use tempfile::tempdir;

    fn read_archive(path: &Path) -> String {
        let mut content = String::new();
        GzDecoder::new(File::open(path).unwrap())
            .read_to_string(&mut content)
            .unwrap();
        content
    }

    #[test]
    fn test_creates_directory_and_file() {
        let dir = tempdir().unwrap();
        let log_dir = dir.path().join("nested").join("logs");

        let handler = RotatingFileHandler::new(&log_dir, "app").unwrap();
        assert_eq!(handler.path(), log_dir.join("app.log"));
        assert!(handler.path().exists());
        assert_eq!(handler.current_day(), Local::now().date_naive());
        assert_eq!(handler.retention().max_archives, 7);
    }

    #[test]
    fn test_unusable_directory_is_fatal() {
        let dir = tempdir().unwrap();
        let blocker = dir.path().join("not_a_dir");
        fs::write(&blocker, "").unwrap();

        let err = RotatingFileHandler::new(blocker.join("logs"), "app").err().unwrap();
        assert!(matches!(err, LoggerError::IoOperation { .. }));
    }

    #[test]
    fn test_rejects_path_like_names() {
        let dir = tempdir().unwrap();
        assert!(RotatingFileHandler::new(dir.path(), "../escape").is_err());
        assert!(RotatingFileHandler::new(dir.path(), "").is_err());
    }

    #[test]
    fn test_same_day_appends() {
        let dir = tempdir().unwrap();
        let handler = RotatingFileHandler::new(dir.path(), "app").unwrap();
        let today = handler.current_day();

        handler.write(today, "one").unwrap();
        handler.write(today, "two").unwrap();

        assert_eq!(fs::read_to_string(handler.path()).unwrap(), "one\ntwo\n");
        assert!(handler.archives().is_empty());
    }

    #[test]
    fn test_rotation_archives_previous_day() {
        let dir = tempdir().unwrap();
        let handler = RotatingFileHandler::new(dir.path(), "app").unwrap();
        let today = handler.current_day();
        let tomorrow = today + Days::new(1);

        handler.write(today, "yesterday's line").unwrap();
        handler.write(tomorrow, "today's line").unwrap();

        let archive = dir.path().join("app").join(format!("{}.log.gz", today.format("%Y-%m-%d")));
        assert_eq!(handler.archives(), vec![archive.clone()]);
        assert_eq!(read_archive(&archive), "yesterday's line\n");
        assert_eq!(fs::read_to_string(handler.path()).unwrap(), "today's line\n");
        assert_eq!(handler.current_day(), tomorrow);
        assert!(!archive.with_extension("gz.tmp").exists());
    }

    #[test]
    fn test_earlier_day_never_rotates_backwards() {
        let dir = tempdir().unwrap();
        let handler = RotatingFileHandler::new(dir.path(), "app").unwrap();
        let today = handler.current_day();

        handler.write(today - Days::new(1), "late straggler").unwrap();
        assert!(handler.archives().is_empty());
        assert_eq!(handler.current_day(), today);
    }

    #[test]
    fn test_retention_keeps_newest_archives() {
        let dir = tempdir().unwrap();
        let handler = RotatingFileHandler::new(dir.path(), "app").unwrap();
        let start = handler.current_day();

        for offset in 0..10u64 {
            handler
                .write(start + Days::new(offset), &format!("day {}", offset))
                .unwrap();
        }

        let archives = handler.archives();
        assert_eq!(archives.len(), 7);
        // days 0..=8 were archived, 0..=1 pruned
        assert_eq!(archives[0], handler.archive_path(start + Days::new(2)));
        assert_eq!(archives[6], handler.archive_path(start + Days::new(8)));
        assert_eq!(read_archive(&archives[6]), "day 8\n");
    }

    #[test]
    fn test_failed_compression_keeps_source() {
        let dir = tempdir().unwrap();
        let handler = RotatingFileHandler::new(dir.path(), "app").unwrap();
        let today = handler.current_day();
        handler.write(today, "precious").unwrap();

        // a plain file where the archive directory should go
        fs::write(handler.archive_dir(), "blocker").unwrap();

        let err = handler.write(today + Days::new(1), "after").unwrap_err();
        assert!(matches!(err, LoggerError::FileRotationError { .. }));
        assert_eq!(handler.current_day(), today);
        assert_eq!(
            fs::read_to_string(handler.path()).unwrap(),
            "precious\nafter\n"
        );

        // once the obstacle is gone the next write rotates
        fs::remove_file(handler.archive_dir()).unwrap();
        handler.write(today + Days::new(1), "recovered").unwrap();
        let archive = handler.archive_path(today);
        assert_eq!(read_archive(&archive), "precious\nafter\n");
        assert_eq!(fs::read_to_string(handler.path()).unwrap(), "recovered\n");
    }

    #[test]
    fn test_retention_policy_builder() {
        let policy = RetentionPolicy::new().with_max_archives(3);
        assert_eq!(policy.max_archives, 3);
    }
}
