//! Size-rotated line writer for the trace file.
//!
//! Every exported batch is one line. When the live file grows past the size limit
//! it is renamed to `<stem>.json.<n>` and a fresh file is started; only the newest
//! few backups are kept.

use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// Rotate once the live file is larger than this (10 MB).
pub const MAX_FILE_SIZE_BYTES: u64 = 10 * 1024 * 1024;

/// Backups retained after rotation.
pub const MAX_BACKUP_FILES: usize = 3;

/// Appends lines to a file, rotating it by size.
///
/// The handle is opened lazily on the first write, so construction never fails.
/// Writes are serialized through an internal mutex.
pub struct FileWriter {
    file_path: PathBuf,
    max_bytes: u64,
    max_backups: usize,
    state: Mutex<WriterState>,
}

#[derive(Default)]
struct WriterState {
    file: Option<File>,
    /// Monotonic suffix for the next backup name.
    next_backup: u64,
}

impl FileWriter {
    #[must_use]
    pub fn new(file_path: PathBuf) -> Self {
        Self::with_limits(file_path, MAX_FILE_SIZE_BYTES, MAX_BACKUP_FILES)
    }

    #[must_use]
    pub fn with_limits(file_path: PathBuf, max_bytes: u64, max_backups: usize) -> Self {
        Self {
            file_path,
            max_bytes,
            max_backups,
            state: Mutex::new(WriterState::default()),
        }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.file_path
    }

    /// Writes `line` plus a newline and flushes.
    ///
    /// # Errors
    ///
    /// Returns an error if rotation, opening, or writing fails, or if the lock was
    /// poisoned by a panicking writer.
    pub fn write_line(&self, line: &str) -> io::Result<()> {
        let mut state = self
            .state
            .lock()
            .map_err(|e| io::Error::other(format!("writer lock poisoned: {e}")))?;

        self.rotate_if_needed(&mut state)?;

        if state.file.is_none() {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(&self.file_path)?;
            state.file = Some(file);
        }

        let file = state
            .file
            .as_mut()
            .ok_or_else(|| io::Error::other("trace file not open"))?;
        writeln!(file, "{line}")?;
        file.flush()
    }

    fn rotate_if_needed(&self, state: &mut WriterState) -> io::Result<()> {
        let Ok(metadata) = fs::metadata(&self.file_path) else {
            return Ok(());
        };
        if metadata.len() <= self.max_bytes {
            return Ok(());
        }

        state.file = None;
        let suffix = self.next_suffix(state);
        let backup = self.file_path.with_extension(format!("json.{suffix}"));
        fs::rename(&self.file_path, &backup)?;
        self.prune_backups()
    }

    /// Seconds since the epoch, bumped past the previous suffix so two rotations in
    /// the same second do not collide.
    fn next_suffix(&self, state: &mut WriterState) -> u64 {
        let now = chrono::Utc::now().timestamp().max(0).unsigned_abs();
        let suffix = now.max(state.next_backup);
        state.next_backup = suffix + 1;
        suffix
    }

    fn backups(&self) -> io::Result<Vec<(u64, PathBuf)>> {
        let parent = self
            .file_path
            .parent()
            .ok_or_else(|| io::Error::other("trace file has no parent directory"))?;
        let prefix = self
            .file_path
            .file_stem()
            .and_then(|s| s.to_str())
            .map(|stem| format!("{stem}.json."))
            .ok_or_else(|| io::Error::other("trace file name is not valid UTF-8"))?;

        Ok(fs::read_dir(parent)?
            .filter_map(std::result::Result::ok)
            .filter_map(|entry| {
                let path = entry.path();
                let suffix = path
                    .file_name()?
                    .to_str()?
                    .strip_prefix(&prefix)?
                    .parse::<u64>()
                    .ok()?;
                Some((suffix, path))
            })
            .collect())
    }

    fn prune_backups(&self) -> io::Result<()> {
        let mut backups = self.backups()?;
        backups.sort_by(|a, b| b.0.cmp(&a.0));
        for (_, old) in backups.iter().skip(self.max_backups) {
            if let Err(e) = fs::remove_file(old) {
                tracing::debug!(path = %old.display(), error = %e, "failed to remove old trace backup");
            }
        }
        Ok(())
    }
}

impl std::fmt::Debug for FileWriter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileWriter")
            .field("file_path", &self.file_path)
            .field("max_bytes", &self.max_bytes)
            .field("max_backups", &self.max_backups)
            .finish_non_exhaustive()
    }
}
