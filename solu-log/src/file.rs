//! Rotating file sink.
//!
//! # Rotation
//! ```text
//! write(bytes)
//!     → (re)open <dir>/<filename> if the writer is file-less
//!     → now > deadline?            rotate, backup suffix = deadline, recompute deadline
//!     → size > 0 and size + len > max_size?
//!                                  rotate, backup suffix = now
//!     → append bytes, size += written
//! ```
//!
//! Rotation is checked on the write path only. A writer that receives no writes
//! after its deadline keeps the old file until the next write arrives.
//!
//! Rotating renames the active file to `<filename>-<YYYYmmddHHMMSS>` and opens a
//! fresh file at the original path. If any step fails the writer is left without
//! an open file and the next write reopens it.

use crate::error::Result;
use crate::metrics::{self, Outcome};
use crate::rotation::{next_deadline, RotationPolicy};
use crate::sink::Sink;
use chrono::{DateTime, Local};
use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Format of the timestamp suffix of backup files.
pub const BACKUP_TIMESTAMP_FORMAT: &str = "%Y%m%d%H%M%S";

/// Mutable part of the writer, only touched while holding the lock.
#[derive(Debug)]
struct FileState {
    file: Option<File>,
    size: u64,
    deadline: Option<DateTime<Local>>,
}

/// Size- and calendar-rotated log file.
///
/// All writes, rotations and syncs on one writer are serialized by a single
/// mutex. The writer is not `Clone`; share it as `Arc<FileWriter>` or
/// `Arc<dyn Sink>`.
#[derive(Debug)]
pub struct FileWriter {
    dir: PathBuf,
    filename: String,
    max_size: u64,
    policy: RotationPolicy,
    state: Mutex<FileState>,
}

impl FileWriter {
    /// Create the directory, open the file in append mode and compute the first
    /// rotation deadline. `max_size == 0` disables size rotation.
    pub fn new(
        dir: impl Into<PathBuf>,
        filename: impl Into<String>,
        max_size: u64,
        policy: RotationPolicy,
    ) -> Result<Self> {
        let writer = Self {
            dir: dir.into(),
            filename: filename.into(),
            max_size,
            policy,
            state: Mutex::new(FileState {
                file: None,
                size: 0,
                deadline: next_deadline(&Local::now(), policy),
            }),
        };

        fs::create_dir_all(&writer.dir)?;
        {
            let mut state = writer.lock();
            state.file = Some(writer.open_file()?);
        }

        tracing::debug!(
            path = %writer.path().display(),
            max_size = writer.max_size,
            rotate = %writer.policy,
            "log file opened"
        );
        Ok(writer)
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn filename(&self) -> &str {
        &self.filename
    }

    /// Path of the active log file.
    pub fn path(&self) -> PathBuf {
        self.dir.join(&self.filename)
    }

    pub fn max_size(&self) -> u64 {
        self.max_size
    }

    pub fn policy(&self) -> RotationPolicy {
        self.policy
    }

    /// Bytes written since the active file was last (re)opened.
    pub fn size(&self) -> u64 {
        self.lock().size
    }

    /// Next time-based rotation, `None` when rotating by size only.
    pub fn deadline(&self) -> Option<DateTime<Local>> {
        self.lock().deadline
    }

    pub fn is_open(&self) -> bool {
        self.lock().file.is_some()
    }

    /// Append `buf`, rotating first when the deadline passed or the write would
    /// exceed the maximum size.
    pub fn write(&self, buf: &[u8]) -> io::Result<usize> {
        let mut state = self.lock();
        let result = self.write_locked(&mut state, buf, Local::now());
        metrics::record_file_write(Outcome::of(&result));
        if let Err(ref e) = result {
            tracing::warn!(path = %self.path().display(), error = %e, "log file write failed");
        }
        result
    }

    /// Rotate now, using the current time as the backup suffix.
    pub fn rotate(&self) -> io::Result<()> {
        let mut state = self.lock();
        self.rotate_locked(&mut state, Local::now())
    }

    /// Flush the active file to stable storage.
    pub fn sync(&self) -> io::Result<()> {
        let state = self.lock();
        match state.file {
            Some(ref file) => file.sync_all(),
            None => Ok(()),
        }
    }

    /// Sync and release the file handle. The writer stays usable; the next write
    /// reopens the file.
    pub fn close(&self) -> io::Result<()> {
        let mut state = self.lock();
        match state.file.take() {
            Some(file) => file.sync_all(),
            None => Ok(()),
        }
    }

    fn write_locked(&self, state: &mut FileState, buf: &[u8], now: DateTime<Local>) -> io::Result<usize> {
        if state.file.is_none() {
            fs::create_dir_all(&self.dir)?;
            state.file = Some(self.open_file()?);
            state.size = 0;
        }

        if let Some(deadline) = state.deadline {
            if now > deadline {
                self.rotate_locked(state, deadline)?;
                state.deadline = next_deadline(&now, self.policy);
            }
        }

        // An empty file takes the write whole, however large.
        if self.max_size > 0 && state.size > 0 && state.size + buf.len() as u64 > self.max_size {
            self.rotate_locked(state, now)?;
        }

        let file = state
            .file
            .as_mut()
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "log file is not open"))?;

        let mut written = 0;
        while written < buf.len() {
            match file.write(&buf[written..]) {
                Ok(0) => {
                    state.size += written as u64;
                    return Err(io::Error::new(io::ErrorKind::WriteZero, "failed to write log record"));
                }
                Ok(n) => written += n,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
                Err(e) => {
                    state.size += written as u64;
                    return Err(e);
                }
            }
        }
        state.size += written as u64;
        Ok(written)
    }

    fn rotate_locked(&self, state: &mut FileState, stamp: DateTime<Local>) -> io::Result<()> {
        let result = self.rename_and_reopen(state, stamp);
        metrics::record_file_rotate(Outcome::of(&result));
        match result {
            Ok(backup) => {
                tracing::debug!(
                    path = %self.path().display(),
                    backup = %backup.display(),
                    "log file rotated"
                );
                Ok(())
            }
            Err(e) => {
                tracing::warn!(path = %self.path().display(), error = %e, "log file rotation failed");
                Err(e)
            }
        }
    }

    fn rename_and_reopen(&self, state: &mut FileState, stamp: DateTime<Local>) -> io::Result<PathBuf> {
        if let Some(file) = state.file.take() {
            file.sync_all()?;
        }

        let backup = self.backup_path(stamp);
        fs::rename(self.path(), &backup)?;

        state.file = Some(self.open_file()?);
        state.size = 0;
        Ok(backup)
    }

    /// `<filename>-<stamp>`, with `.1`, `.2`, ... appended while that name is taken.
    fn backup_path(&self, stamp: DateTime<Local>) -> PathBuf {
        let base = format!("{}-{}", self.filename, stamp.format(BACKUP_TIMESTAMP_FORMAT));
        let mut candidate = self.dir.join(&base);
        let mut n = 1;
        while candidate.exists() {
            candidate = self.dir.join(format!("{}.{}", base, n));
            n += 1;
        }
        candidate
    }

    fn open_file(&self) -> io::Result<File> {
        OpenOptions::new().create(true).append(true).open(self.path())
    }

    fn lock(&self) -> MutexGuard<'_, FileState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    #[cfg(test)]
    fn set_deadline(&self, deadline: Option<DateTime<Local>>) {
        self.lock().deadline = deadline;
    }
}

impl Sink for FileWriter {
    fn name(&self) -> &str {
        &self.filename
    }

    fn write(&self, buf: &[u8]) -> io::Result<usize> {
        FileWriter::write(self, buf)
    }

    fn sync(&self) -> io::Result<()> {
        FileWriter::sync(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use tempfile::TempDir;

    fn backups(dir: &Path, filename: &str) -> Vec<String> {
        let prefix = format!("{}-", filename);
        let mut names: Vec<String> = fs::read_dir(dir)
            .unwrap()
            .filter_map(|e| e.ok())
            .map(|e| e.file_name().to_string_lossy().into_owned())
            .filter(|n| n.starts_with(&prefix))
            .collect();
        names.sort();
        names
    }

    #[test]
    fn test_new_creates_directory_and_file() {
        let tmp = TempDir::new().unwrap();
        let dir = tmp.path().join("nested").join("logs");

        let writer = FileWriter::new(&dir, "app.log", 0, RotationPolicy::None).unwrap();

        assert!(dir.is_dir());
        assert!(writer.path().is_file());
        assert!(writer.deadline().is_none());
        assert_eq!(writer.size(), 0);
    }

    #[test]
    fn test_time_rotation_uses_deadline_as_suffix() {
        let tmp = TempDir::new().unwrap();
        let writer = FileWriter::new(tmp.path(), "app.log", 0, RotationPolicy::Hourly).unwrap();
        writer.write(b"before").unwrap();

        let past = Local::now() - Duration::hours(2);
        writer.set_deadline(Some(past));
        writer.write(b"after").unwrap();

        let expected = format!("app.log-{}", past.format(BACKUP_TIMESTAMP_FORMAT));
        assert_eq!(backups(tmp.path(), "app.log"), vec![expected.clone()]);
        assert_eq!(fs::read(tmp.path().join(expected)).unwrap(), b"before");
        assert_eq!(fs::read(writer.path()).unwrap(), b"after");
        assert_eq!(writer.size(), 5);
        assert!(writer.deadline().unwrap() > Local::now());
    }

    #[test]
    fn test_zero_length_write_still_rotates_on_deadline() {
        let tmp = TempDir::new().unwrap();
        let writer = FileWriter::new(tmp.path(), "app.log", 0, RotationPolicy::Daily).unwrap();
        writer.write(b"old").unwrap();
        writer.set_deadline(Some(Local::now() - Duration::seconds(1)));

        assert_eq!(writer.write(b"").unwrap(), 0);

        assert_eq!(backups(tmp.path(), "app.log").len(), 1);
        assert_eq!(writer.size(), 0);
    }

    #[test]
    fn test_deadline_rotation_then_oversized_write_rotates_once() {
        let tmp = TempDir::new().unwrap();
        let writer = FileWriter::new(tmp.path(), "app.log", 10, RotationPolicy::Daily).unwrap();
        writer.write(b"old").unwrap();
        writer.set_deadline(Some(Local::now() - Duration::seconds(1)));

        let big = [b'x'; 25];
        assert_eq!(writer.write(&big).unwrap(), 25);

        let names = backups(tmp.path(), "app.log");
        assert_eq!(names.len(), 1);
        assert_eq!(fs::read(tmp.path().join(&names[0])).unwrap(), b"old");
        assert_eq!(fs::read(writer.path()).unwrap(), big);
        assert_eq!(writer.size(), 25);
    }

    #[test]
    fn test_backup_name_collision_gets_counter() {
        let tmp = TempDir::new().unwrap();
        let writer = FileWriter::new(tmp.path(), "app.log", 0, RotationPolicy::None).unwrap();
        let stamp = Local::now();

        let mut state = writer.lock();
        writer.rotate_locked(&mut state, stamp).unwrap();
        writer.rotate_locked(&mut state, stamp).unwrap();
        drop(state);

        let base = format!("app.log-{}", stamp.format(BACKUP_TIMESTAMP_FORMAT));
        assert_eq!(backups(tmp.path(), "app.log"), vec![base.clone(), format!("{}.1", base)]);
    }

    #[test]
    fn test_failed_rotation_leaves_writer_file_less_then_recovers() {
        let tmp = TempDir::new().unwrap();
        let writer = FileWriter::new(tmp.path(), "app.log", 0, RotationPolicy::None).unwrap();
        fs::remove_file(writer.path()).unwrap();

        assert!(writer.rotate().is_err());
        assert!(!writer.is_open());

        assert_eq!(writer.write(b"again").unwrap(), 5);
        assert!(writer.is_open());
        assert_eq!(fs::read(writer.path()).unwrap(), b"again");
    }

    #[test]
    fn test_close_then_write_reopens() {
        let tmp = TempDir::new().unwrap();
        let writer = FileWriter::new(tmp.path(), "app.log", 0, RotationPolicy::None).unwrap();
        writer.write(b"one").unwrap();

        writer.close().unwrap();
        assert!(!writer.is_open());
        writer.sync().unwrap();

        writer.write(b"two").unwrap();
        assert_eq!(fs::read(writer.path()).unwrap(), b"onetwo");
        assert_eq!(writer.size(), 3);
    }
}
