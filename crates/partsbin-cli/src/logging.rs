//! Daily error log under `<data-dir>/Logs/`
//!
//! Records go to `Logs/errors_<YYYY-MM-DD>.log`. The file is only created when
//! the first record is written, so clean runs leave no trace. With
//! `--verbose` info records are kept too and everything is echoed on stderr.

use chrono::Local;
use log::{LevelFilter, Log, Metadata, Record};
use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

enum Target {
    Pending,
    Open(File),
    Unavailable,
}

/// `log` backend writing to the daily error file
pub struct FileLogger {
    dir: PathBuf,
    level: LevelFilter,
    echo: bool,
    target: Mutex<Target>,
}

impl FileLogger {
    #[must_use]
    pub fn new(dir: PathBuf, verbose: bool) -> Self {
        Self {
            dir,
            level: if verbose {
                LevelFilter::Info
            } else {
                LevelFilter::Error
            },
            echo: verbose,
            target: Mutex::new(Target::Pending),
        }
    }
}

impl Log for FileLogger {
    fn enabled(&self, metadata: &Metadata<'_>) -> bool {
        metadata.level() <= self.level && metadata.target().starts_with("partsbin")
    }

    fn log(&self, record: &Record<'_>) {
        if !self.enabled(record.metadata()) {
            return;
        }

        let line = format!(
            "{} - {} - {}",
            Local::now().format("%Y-%m-%d %H:%M:%S%.3f"),
            record.level(),
            record.args()
        );
        if self.echo {
            eprintln!("{line}");
        }

        let mut target = self.target.lock().unwrap_or_else(PoisonError::into_inner);
        if matches!(*target, Target::Pending) {
            *target = match open_log_file(&self.dir) {
                Ok(file) => Target::Open(file),
                Err(e) => {
                    eprintln!("[LOG] cannot open log file in {}: {e}", self.dir.display());
                    Target::Unavailable
                }
            };
        }
        if let Target::Open(file) = &mut *target {
            if let Err(e) = writeln!(file, "{line}") {
                eprintln!("[LOG] failed to write log: {e}");
            }
        }
    }

    fn flush(&self) {
        let mut target = self.target.lock().unwrap_or_else(PoisonError::into_inner);
        if let Target::Open(file) = &mut *target {
            let _ = file.flush();
        }
    }
}

fn log_file_path(dir: &Path) -> PathBuf {
    dir.join(format!("errors_{}.log", Local::now().format("%Y-%m-%d")))
}

fn open_log_file(dir: &Path) -> std::io::Result<File> {
    fs::create_dir_all(dir)?;
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_file_path(dir))
}

/// Install the file logger and a panic hook that logs before reporting
pub fn init(dir: PathBuf, verbose: bool) {
    let logger = FileLogger::new(dir, verbose);
    let level = logger.level;
    match log::set_boxed_logger(Box::new(logger)) {
        Ok(()) => log::set_max_level(level),
        Err(e) => eprintln!("[LOG] logger already installed: {e}"),
    }

    std::panic::set_hook(Box::new(|info| {
        log::error!("uncaught panic: {info}");
        log::logger().flush();
        eprintln!("Fatal error: an unexpected error occurred.\n{info}");
    }));
}
