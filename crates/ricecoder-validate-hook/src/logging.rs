//! Daily file logging
//!
//! The hook runs inside a host that owns stdout and stderr, so progress is
//! logged to files instead: one file per calendar day named `YYYY-MM-DD.log`,
//! one line per event formatted as `[YYYY-MM-DD HH:MM:SS] <message>`.
//!
//! Every write also prunes log files whose file-name date is older than the
//! retention window. Several hook processes may append to the same day's file
//! at once; each line is a single append-mode write and no locking is done.
//!
//! [`init_logging`] installs a `tracing` subscriber that writes through
//! [`DailyLogWriter`], so the rest of the crate just uses `tracing` macros.

use std::fmt;
use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use chrono::{Local, NaiveDate, NaiveDateTime};
use tracing::{Event, Subscriber};
use tracing_subscriber::fmt::format::Writer;
use tracing_subscriber::fmt::{FmtContext, FormatEvent, FormatFields, MakeWriter};
use tracing_subscriber::registry::LookupSpan;

use crate::config::Settings;
use crate::error::{HookError, Result};

/// Timestamp format at the start of each log line
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Date format of log file names
pub const FILE_DATE_FORMAT: &str = "%Y-%m-%d";

const LOG_EXTENSION: &str = "log";

/// Appends lines to the current day's log file and prunes old files
#[derive(Debug, Clone)]
pub struct DailyLogWriter {
    dir: PathBuf,
    retention_days: u32,
}

impl DailyLogWriter {
    /// Create a writer for `dir`, creating the directory if needed
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created.
    pub fn new(dir: impl Into<PathBuf>, retention_days: u32) -> Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(Self {
            dir,
            retention_days,
        })
    }

    /// Log directory
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the log file for a given day
    pub fn file_for(&self, date: NaiveDate) -> PathBuf {
        self.dir
            .join(format!("{}.{}", date.format(FILE_DATE_FORMAT), LOG_EXTENSION))
    }

    /// Append already formatted bytes to today's file, then prune
    pub fn append(&self, bytes: &[u8]) -> io::Result<()> {
        self.append_at(bytes, Local::now().naive_local())
    }

    /// Append bytes to the file for `now`'s day, then prune relative to `now`
    pub fn append_at(&self, bytes: &[u8], now: NaiveDateTime) -> io::Result<()> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(self.file_for(now.date()))?;
        file.write_all(bytes)?;

        self.prune(now)?;
        Ok(())
    }

    /// Delete log files dated before the retention window
    ///
    /// A file is deleted when midnight of its file-name date is earlier than
    /// `now` minus the retention window. Files whose names are not dates are
    /// left alone. A window reaching past the earliest representable date
    /// keeps everything. Returns the number of deleted files.
    pub fn prune(&self, now: NaiveDateTime) -> io::Result<usize> {
        let Some(cutoff) = chrono::Duration::try_days(i64::from(self.retention_days))
            .and_then(|window| now.checked_sub_signed(window))
        else {
            return Ok(0);
        };
        let mut deleted = 0;

        for entry in fs::read_dir(&self.dir)? {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) != Some(LOG_EXTENSION) {
                continue;
            }

            let Some(date) = path
                .file_stem()
                .and_then(|stem| stem.to_str())
                .and_then(|stem| NaiveDate::parse_from_str(stem, FILE_DATE_FORMAT).ok())
            else {
                continue;
            };

            let Some(midnight) = date.and_hms_opt(0, 0, 0) else {
                continue;
            };

            if midnight < cutoff {
                // Another hook process may have removed it already
                match fs::remove_file(&path) {
                    Ok(()) => deleted += 1,
                    Err(e) if e.kind() == io::ErrorKind::NotFound => {}
                    Err(e) => return Err(e),
                }
            }
        }

        Ok(deleted)
    }
}

/// Buffers one formatted event and appends it on drop
pub struct DailyLogLine<'a> {
    writer: &'a DailyLogWriter,
    buffer: Vec<u8>,
}

impl Write for DailyLogLine<'_> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.buffer.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        if self.buffer.is_empty() {
            return Ok(());
        }
        let result = self.writer.append(&self.buffer);
        self.buffer.clear();
        result
    }
}

impl Drop for DailyLogLine<'_> {
    fn drop(&mut self) {
        // Logging must never take the hook down
        let _ = self.flush();
    }
}

impl<'a> MakeWriter<'a> for DailyLogWriter {
    type Writer = DailyLogLine<'a>;

    fn make_writer(&'a self) -> Self::Writer {
        DailyLogLine {
            writer: self,
            buffer: Vec::new(),
        }
    }
}

/// Event format `[YYYY-MM-DD HH:MM:SS] message key=value ...`
#[derive(Debug, Clone, Copy, Default)]
pub struct LineFormat;

impl<S, N> FormatEvent<S, N> for LineFormat
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        ctx: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &Event<'_>,
    ) -> fmt::Result {
        write!(writer, "[{}] ", Local::now().format(TIMESTAMP_FORMAT))?;
        ctx.field_format().format_fields(writer.by_ref(), event)?;
        writeln!(writer)
    }
}

/// Resolve the log directory against the hook directory
pub fn log_dir(settings: &Settings, hook_dir: &Path) -> PathBuf {
    if settings.log_dir.is_absolute() {
        settings.log_dir.clone()
    } else {
        hook_dir.join(&settings.log_dir)
    }
}

/// Install the global tracing subscriber writing to daily log files
///
/// # Errors
///
/// Returns an error if the log directory cannot be created.
pub fn init_logging(settings: &Settings, hook_dir: &Path) -> Result<()> {
    let writer = DailyLogWriter::new(log_dir(settings, hook_dir), settings.log_retention_days)?;

    tracing_subscriber::fmt()
        .with_max_level(settings.tracing_level())
        .with_ansi(false)
        .event_format(LineFormat)
        .with_writer(writer)
        .try_init()
        .map_err(|e| HookError::IoError(io::Error::new(io::ErrorKind::Other, e.to_string())))
}

#[cfg(test)]
mod tests {
    use chrono::NaiveTime;

    use super::*;

    fn at(date: &str, time: &str) -> NaiveDateTime {
        NaiveDateTime::new(
            NaiveDate::parse_from_str(date, FILE_DATE_FORMAT).unwrap(),
            NaiveTime::parse_from_str(time, "%H:%M:%S").unwrap(),
        )
    }

    #[test]
    fn test_file_name_is_date() {
        let dir = tempfile::tempdir().unwrap();
        let writer = DailyLogWriter::new(dir.path(), 5).unwrap();
        let date = NaiveDate::from_ymd_opt(2026, 3, 7).unwrap();

        assert_eq!(writer.file_for(date), dir.path().join("2026-03-07.log"));
    }

    #[test]
    fn test_new_creates_directory() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("hooks").join("logs");
        DailyLogWriter::new(&nested, 5).unwrap();
        assert!(nested.is_dir());
    }

    #[test]
    fn test_append_accumulates_lines() {
        let dir = tempfile::tempdir().unwrap();
        let writer = DailyLogWriter::new(dir.path(), 5).unwrap();
        let now = at("2026-10-17", "09:30:00");

        writer.append_at(b"[2026-10-17 09:30:00] Tool: Edit\n", now).unwrap();
        writer.append_at(b"[2026-10-17 09:30:00] FilePath: a.php\n", now).unwrap();

        let content = fs::read_to_string(dir.path().join("2026-10-17.log")).unwrap();
        assert_eq!(
            content,
            "[2026-10-17 09:30:00] Tool: Edit\n[2026-10-17 09:30:00] FilePath: a.php\n"
        );
    }

    #[test]
    fn test_append_prunes_old_files() {
        let dir = tempfile::tempdir().unwrap();
        let writer = DailyLogWriter::new(dir.path(), 5).unwrap();

        for name in ["2026-10-01.log", "2026-10-11.log", "2026-10-13.log", "2026-10-16.log"] {
            fs::write(dir.path().join(name), "old\n").unwrap();
        }

        writer.append_at(b"line\n", at("2026-10-17", "12:00:00")).unwrap();

        assert!(!dir.path().join("2026-10-01.log").exists());
        // Midnight of the 11th is more than five days before noon on the 17th
        assert!(!dir.path().join("2026-10-11.log").exists());
        assert!(dir.path().join("2026-10-13.log").exists());
        assert!(dir.path().join("2026-10-16.log").exists());
        assert!(dir.path().join("2026-10-17.log").exists());
    }

    #[test]
    fn test_prune_ignores_foreign_files() {
        let dir = tempfile::tempdir().unwrap();
        let writer = DailyLogWriter::new(dir.path(), 1).unwrap();

        fs::write(dir.path().join("notes.log"), "keep").unwrap();
        fs::write(dir.path().join("2001-01-01.txt"), "keep").unwrap();
        fs::write(dir.path().join("2001-01-01.log"), "drop").unwrap();

        let deleted = writer.prune(at("2026-10-17", "00:00:01")).unwrap();

        assert_eq!(deleted, 1);
        assert!(dir.path().join("notes.log").exists());
        assert!(dir.path().join("2001-01-01.txt").exists());
    }

    #[test]
    fn test_huge_retention_keeps_files() {
        let dir = tempfile::tempdir().unwrap();
        let writer = DailyLogWriter::new(dir.path(), u32::MAX).unwrap();
        fs::write(dir.path().join("2001-01-01.log"), "old\n").unwrap();

        writer.append_at(b"line\n", at("2026-10-17", "12:00:00")).unwrap();
        writer.append(b"line\n").unwrap();

        assert!(dir.path().join("2001-01-01.log").exists());
        assert!(dir.path().join("2026-10-17.log").exists());
    }

    #[test]
    fn test_make_writer_appends_on_drop() {
        let dir = tempfile::tempdir().unwrap();
        let writer = DailyLogWriter::new(dir.path(), 5).unwrap();

        {
            let mut line = writer.make_writer();
            line.write_all(b"[ts] first ").unwrap();
            line.write_all(b"part\n").unwrap();
        }

        let today = Local::now().date_naive();
        let content = fs::read_to_string(writer.file_for(today)).unwrap();
        assert_eq!(content, "[ts] first part\n");
    }

    #[test]
    fn test_log_dir_resolution() {
        let mut settings = Settings::default();
        assert_eq!(
            log_dir(&settings, Path::new("/opt/app/hooks")),
            PathBuf::from("/opt/app/hooks/logs")
        );

        settings.log_dir = PathBuf::from("/var/log/validate-code");
        assert_eq!(
            log_dir(&settings, Path::new("/opt/app/hooks")),
            PathBuf::from("/var/log/validate-code")
        );
    }
}
