//! Dated, size-rolled request log files.
//!
//! Files are named `<dd-MM-yyyy>-Request-Response.log` using the UTC+05:30
//! date. Once a file would grow past the size limit, writing continues in
//! `<dd-MM-yyyy>-Request-Response_001.log`, then `_002`, and so on. A new
//! date starts again from the unsuffixed name.

use chrono::{DateTime, Utc};
use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use super::{LogSink, SinkResult};
use crate::error::ServiceError;
use crate::timestamp::{format_local, FILE_DATE_FORMAT};

const FILE_STEM: &str = "Request-Response";
const SEPARATOR_WIDTH: usize = 50;

/// Appends each line followed by a dashed separator to the current log file.
///
/// Writes are synchronous and serialized by a mutex, so `append` blocks the
/// calling task for the duration of one file write.
#[derive(Debug)]
pub struct RollingFileSink {
    dir: PathBuf,
    max_bytes: u64,
    active: Mutex<Option<ActiveFile>>,
}

#[derive(Debug)]
struct ActiveFile {
    date: String,
    sequence: u32,
    file: File,
    written: u64,
}

impl RollingFileSink {
    /// Create a sink writing under `dir`, creating the directory if needed.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::SinkError`] if `dir` cannot be created.
    pub fn new(dir: impl Into<PathBuf>, max_bytes: u64) -> SinkResult<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir).map_err(|e| {
            ServiceError::sink(
                format!("cannot create log directory {}", dir.display()),
                Some(Box::new(e)),
            )
        })?;

        Ok(Self {
            dir,
            max_bytes,
            active: Mutex::new(None),
        })
    }

    /// Directory the sink writes into.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the file for `date` and roll `sequence`.
    #[must_use]
    pub fn file_path(&self, date: &str, sequence: u32) -> PathBuf {
        let name = if sequence == 0 {
            format!("{date}-{FILE_STEM}.log")
        } else {
            format!("{date}-{FILE_STEM}_{sequence:03}.log")
        };
        self.dir.join(name)
    }

    fn append_at(&self, line: &str, now: DateTime<Utc>) -> SinkResult<()> {
        let entry = format!("{line}\n{}\n", "-".repeat(SEPARATOR_WIDTH));
        let entry_len = entry.len() as u64;
        let date = format_local(now, FILE_DATE_FORMAT);

        let mut guard = self.active.lock().unwrap_or_else(PoisonError::into_inner);

        let needs_open = match guard.as_ref() {
            None => Some(0),
            Some(active) if active.date != date => Some(0),
            Some(active) if active.written > 0 && active.written + entry_len > self.max_bytes => {
                Some(active.sequence + 1)
            }
            Some(_) => None,
        };

        if let Some(first_sequence) = needs_open {
            *guard = Some(self.open(&date, first_sequence, entry_len)?);
        }

        let Some(active) = guard.as_mut() else {
            return Err(ServiceError::sink("no active log file", None));
        };

        if let Err(e) = active.file.write_all(entry.as_bytes()) {
            // A partial write still occupies the file.
            active.written = active
                .file
                .metadata()
                .map_or(active.written + entry_len, |meta| meta.len());
            return Err(ServiceError::sink(
                "failed to write request log entry",
                Some(Box::new(e)),
            ));
        }
        active.written += entry_len;

        Ok(())
    }

    /// Open the first file at or after `sequence` that still has room.
    ///
    /// Files left over from an earlier run are appended to, not truncated.
    fn open(&self, date: &str, mut sequence: u32, entry_len: u64) -> SinkResult<ActiveFile> {
        loop {
            let path = self.file_path(date, sequence);
            let existing = fs::metadata(&path).map_or(0, |meta| meta.len());

            if existing == 0 || existing + entry_len <= self.max_bytes {
                let file = OpenOptions::new()
                    .create(true)
                    .append(true)
                    .open(&path)
                    .map_err(|e| {
                        ServiceError::sink(
                            format!("cannot open log file {}", path.display()),
                            Some(Box::new(e)),
                        )
                    })?;

                return Ok(ActiveFile {
                    date: date.to_owned(),
                    sequence,
                    file,
                    written: existing,
                });
            }

            sequence += 1;
        }
    }
}

impl LogSink for RollingFileSink {
    fn append(&self, line: &str) -> SinkResult<()> {
        self.append_at(line, Utc::now())
    }
}
