// src/infra/logger.rs — Structured logging with tracing
//
// Compact stderr output plus an optional plain-text daily log file that
// keeps the chat transcript (`pokerpal_<date>.log`). The file is switched
// to the new day's name on the first write after midnight.

use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use chrono::NaiveDate;
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

/// Install the global subscriber. `RUST_LOG` takes precedence over `level`.
/// Returns the path of today's log file when file logging is on.
pub fn init_logging(level: &str, log_dir: Option<&Path>) -> anyhow::Result<Option<PathBuf>> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let (file_layer, log_path) = match log_dir {
        Some(dir) => {
            std::fs::create_dir_all(dir)?;
            let today = chrono::Local::now().date_naive();
            let file = DailyLogFile::open(dir, today)?;
            let path = file.path_for(today);
            let layer = fmt::layer()
                .with_ansi(false)
                .with_target(false)
                .with_writer(file);
            (Some(layer), Some(path))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).compact())
        .with(file_layer)
        .try_init()?;

    Ok(log_path)
}

/// Daily log file name.
pub fn log_file_name(date: NaiveDate) -> String {
    format!("pokerpal_{}.log", date.format("%Y-%m-%d"))
}

/// Append-only log file that follows the local date.
pub struct DailyLogFile {
    dir: PathBuf,
    current: Mutex<OpenLog>,
}

struct OpenLog {
    date: NaiveDate,
    file: File,
}

impl DailyLogFile {
    pub fn open(dir: &Path, today: NaiveDate) -> io::Result<Self> {
        let file = append_to(&dir.join(log_file_name(today)))?;
        Ok(Self {
            dir: dir.to_path_buf(),
            current: Mutex::new(OpenLog { date: today, file }),
        })
    }

    pub fn path_for(&self, date: NaiveDate) -> PathBuf {
        self.dir.join(log_file_name(date))
    }

    fn write_on(&self, today: NaiveDate, buf: &[u8]) -> io::Result<usize> {
        let mut log = self.current.lock().unwrap_or_else(|e| e.into_inner());
        if log.date != today {
            log.file = append_to(&self.path_for(today))?;
            log.date = today;
        }
        log.file.write_all(buf)?;
        Ok(buf.len())
    }
}

fn append_to(path: &Path) -> io::Result<File> {
    OpenOptions::new().create(true).append(true).open(path)
}

impl Write for &DailyLogFile {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.write_on(chrono::Local::now().date_naive(), buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        let mut log = self.current.lock().unwrap_or_else(|e| e.into_inner());
        log.file.flush()
    }
}

impl<'a> MakeWriter<'a> for DailyLogFile {
    type Writer = &'a DailyLogFile;

    fn make_writer(&'a self) -> Self::Writer {
        self
    }
}
