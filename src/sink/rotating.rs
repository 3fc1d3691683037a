//! Size-based rotating file sink.
//!
//! # States
//! - Active: lines are appended to `path`
//! - Rotating: backups shift up and `path` is replaced by an empty file
//!
//! # State Transitions
//! ```text
//! Active → Rotating: file non-empty and current_size + len(line) > max_bytes
//! Rotating → Active: new file opened at `path`, current_size = 0
//! ```
//!
//! # Design Decisions
//! - Rotate-then-write runs under one mutex; Rotating is never observable
//! - Rotation is disabled when `max_bytes` or `backup_count` is zero
//! - An empty file is never rotated, so an oversized line does not produce an
//!   empty backup
//! - The oldest backup (`path.<backup_count>`) is deleted before shifting

use std::ffi::OsString;
use std::fs::{self, File, OpenOptions};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use crate::observability::metrics;
use crate::sink::Sink;

struct FileState {
    writer: Option<BufWriter<File>>,
    current_size: u64,
}

/// Appends lines to a file, rotating it to `path.1` … `path.N` when it grows
/// past `max_bytes`.
pub struct RotatingFileSink {
    path: PathBuf,
    max_bytes: u64,
    backup_count: u32,
    state: Mutex<FileState>,
}

impl RotatingFileSink {
    /// Open (or create) `path` in append mode.
    ///
    /// Fails if the parent directory does not exist or is not writable.
    pub fn open(path: impl Into<PathBuf>, max_bytes: u64, backup_count: u32) -> io::Result<Self> {
        let path = path.into();
        let (file, current_size) = open_append(&path)?;
        Ok(Self {
            path,
            max_bytes,
            backup_count,
            state: Mutex::new(FileState {
                writer: Some(BufWriter::new(file)),
                current_size,
            }),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn max_bytes(&self) -> u64 {
        self.max_bytes
    }

    pub fn backup_count(&self) -> u32 {
        self.backup_count
    }

    /// Path of backup number `index` (`app.log` → `app.log.<index>`).
    pub fn backup_path(&self, index: u32) -> PathBuf {
        let mut name = OsString::from(self.path.as_os_str());
        name.push(format!(".{index}"));
        PathBuf::from(name)
    }

    /// Bytes written to the active file, including what it held when opened.
    pub fn current_size(&self) -> u64 {
        self.state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .current_size
    }

    fn should_rotate(&self, current_size: u64, incoming: u64) -> bool {
        self.max_bytes > 0
            && self.backup_count > 0
            && current_size > 0
            && current_size + incoming > self.max_bytes
    }

    fn ensure_open(&self, state: &mut FileState) -> io::Result<()> {
        if state.writer.is_none() {
            let (file, size) = open_append(&self.path)?;
            state.writer = Some(BufWriter::new(file));
            state.current_size = size;
        }
        Ok(())
    }

    fn rotate(&self, state: &mut FileState) -> io::Result<()> {
        if let Some(mut writer) = state.writer.take() {
            writer.flush()?;
        }

        remove_if_exists(&self.backup_path(self.backup_count))?;
        for index in (2..=self.backup_count).rev() {
            let source = self.backup_path(index - 1);
            if source.exists() {
                fs::rename(&source, self.backup_path(index))?;
            }
        }
        if self.path.exists() {
            fs::rename(&self.path, self.backup_path(1))?;
        }

        let (file, size) = open_append(&self.path)?;
        state.writer = Some(BufWriter::new(file));
        state.current_size = size;

        metrics::record_rotation(&self.path.display().to_string());
        tracing::debug!(
            path = %self.path.display(),
            backup_count = self.backup_count,
            "Rotated log file"
        );
        Ok(())
    }
}

impl std::fmt::Debug for RotatingFileSink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RotatingFileSink")
            .field("path", &self.path)
            .field("max_bytes", &self.max_bytes)
            .field("backup_count", &self.backup_count)
            .finish_non_exhaustive()
    }
}

impl Sink for RotatingFileSink {
    fn write(&self, line: &str) -> io::Result<()> {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        self.ensure_open(&mut state)?;

        let incoming = line.len() as u64 + 1;
        if self.should_rotate(state.current_size, incoming) {
            self.rotate(&mut state)?;
        }

        let Some(writer) = state.writer.as_mut() else {
            return Err(io::Error::other("log file is not open"));
        };
        writer.write_all(line.as_bytes())?;
        writer.write_all(b"\n")?;
        writer.flush()?;
        state.current_size += incoming;
        Ok(())
    }

    fn flush(&self) -> io::Result<()> {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        match state.writer.as_mut() {
            Some(writer) => writer.flush(),
            None => Ok(()),
        }
    }
}

fn open_append(path: &Path) -> io::Result<(File, u64)> {
    let file = OpenOptions::new().create(true).append(true).open(path)?;
    let size = file.metadata()?.len();
    Ok((file, size))
}

fn remove_if_exists(path: &Path) -> io::Result<()> {
    match fs::remove_file(path) {
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_appends_and_tracks_size() {
        let dir = tempdir().unwrap();
        let sink = RotatingFileSink::open(dir.path().join("app.log"), 1024, 2).unwrap();

        sink.write("hello").unwrap();
        sink.write("world").unwrap();

        assert_eq!(sink.current_size(), 12);
        let content = fs::read_to_string(sink.path()).unwrap();
        assert_eq!(content, "hello\nworld\n");
    }

    #[test]
    fn test_size_starts_from_existing_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("app.log");
        fs::write(&path, "previous run\n").unwrap();

        let sink = RotatingFileSink::open(&path, 1024, 2).unwrap();
        assert_eq!(sink.current_size(), 13);
    }

    #[test]
    fn test_rotates_once_at_crossing_write() {
        let dir = tempdir().unwrap();
        // Each line is 10 bytes including the terminator.
        let sink = RotatingFileSink::open(dir.path().join("app.log"), 25, 3).unwrap();

        sink.write("line-0001").unwrap();
        sink.write("line-0002").unwrap();
        assert!(!sink.backup_path(1).exists());

        sink.write("line-0003").unwrap();
        assert_eq!(fs::read_to_string(sink.backup_path(1)).unwrap(), "line-0001\nline-0002\n");
        assert_eq!(fs::read_to_string(sink.path()).unwrap(), "line-0003\n");
        assert_eq!(sink.current_size(), 10);
        assert!(!sink.backup_path(2).exists());
    }

    #[test]
    fn test_exact_fit_does_not_rotate() {
        let dir = tempdir().unwrap();
        let sink = RotatingFileSink::open(dir.path().join("app.log"), 20, 1).unwrap();

        sink.write("line-0001").unwrap();
        sink.write("line-0002").unwrap();

        assert_eq!(sink.current_size(), 20);
        assert!(!sink.backup_path(1).exists());
    }

    #[test]
    fn test_oversized_line_into_empty_file_does_not_rotate() {
        let dir = tempdir().unwrap();
        let sink = RotatingFileSink::open(dir.path().join("app.log"), 4, 2).unwrap();

        sink.write("much longer than four bytes").unwrap();
        assert!(!sink.backup_path(1).exists());

        sink.write("next").unwrap();
        assert!(sink.backup_path(1).exists());
        assert_eq!(fs::read_to_string(sink.path()).unwrap(), "next\n");
    }

    #[test]
    fn test_zero_backup_count_disables_rotation() {
        let dir = tempdir().unwrap();
        let sink = RotatingFileSink::open(dir.path().join("app.log"), 5, 0).unwrap();

        for _ in 0..5 {
            sink.write("abcdef").unwrap();
        }
        assert_eq!(sink.current_size(), 35);
        assert!(!sink.backup_path(1).exists());
    }

    #[test]
    fn test_missing_directory_fails_to_open() {
        let dir = tempdir().unwrap();
        let result = RotatingFileSink::open(dir.path().join("missing/app.log"), 10, 1);
        assert!(result.is_err());
    }

    #[test]
    fn test_backup_path_appends_index() {
        let dir = tempdir().unwrap();
        let sink = RotatingFileSink::open(dir.path().join("app.log"), 10, 1).unwrap();
        assert_eq!(sink.backup_path(3), dir.path().join("app.log.3"));
    }
}
