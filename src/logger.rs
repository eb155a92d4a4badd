// This file implements the application's logging system.
// It provides macros for the console log levels (INFO, SUCCESS, WARN, ERROR, CRITICAL, DEBUG)
// and a `Logger` capability that is handed to the configuration store and the
// synchronizer, so they never reach for a global logger themselves.

use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering}; // For thread-safe, atomic control of the debug flag.
use std::sync::mpsc::{self, RecvTimeoutError};
use std::sync::{Arc, Mutex, OnceLock, PoisonError};
use std::thread::JoinHandle;
use std::time::Duration;

/// How often the background thread drains the log buffer into the log file.
pub const DEFAULT_FLUSH_INTERVAL: Duration = Duration::from_secs(5);

// `log_info!` for general application progress and informational messages.
#[macro_export]
macro_rules! log_info {
    ($($arg:tt)*) => (eprintln!("{} {}", colored::Colorize::bright_blue("[INFO]"), format!($($arg)*)));
}

// `log_success!` for operations that completed the way the operator wanted.
#[macro_export]
macro_rules! log_success {
    ($($arg:tt)*) => (eprintln!("{} {}", colored::Colorize::bright_green("[SUCCESS]"), format!($($arg)*)));
}

// `log_warn!` for non-critical issues or noteworthy conditions.
#[macro_export]
macro_rules! log_warn {
    ($($arg:tt)*) => (eprintln!("{} {}", colored::Colorize::bright_yellow("[WARN]"), format!($($arg)*)));
}

// `log_error!` for errors requiring attention.
#[macro_export]
macro_rules! log_error {
    ($($arg:tt)*) => (eprintln!("{} {}", colored::Colorize::bright_red("[ERROR]"), format!($($arg)*)));
}

// `log_critical!` for failures the operator must not miss: white text on red.
#[macro_export]
macro_rules! log_critical {
    ($($arg:tt)*) => (eprintln!("{} {}", colored::Colorize::on_red(colored::Colorize::white("[CRITICAL]")), format!($($arg)*)));
}

// `log_debug!` for detailed internal application tracing.
// Messages are only printed if debug mode is enabled via `is_debug_enabled()`.
#[macro_export]
macro_rules! log_debug {
    ($($arg:tt)*) => {
        if $crate::logger::is_debug_enabled() {
           eprintln!("{} {}", colored::Colorize::dimmed("[DEBUG]"), format!($($arg)*));
        }
    };
}

// Global flag to control debug logging, ensured to be initialized once.
static DEBUG_ENABLED: OnceLock<AtomicBool> = OnceLock::new();

/// Initializes the console logger, setting the global debug mode.
/// This function should be called once at application startup.
///
/// # Arguments
/// * `debug`: If `true`, enables debug logging; otherwise debug lines are suppressed.
pub fn init(debug: bool) {
    DEBUG_ENABLED
        .get_or_init(|| AtomicBool::new(debug)) // Initialize if not already set.
        .store(debug, Ordering::Relaxed); // Update the flag with the provided debug value.

    log_debug!("Logger initialized in DEBUG mode");
}

/// Checks if debug logging is currently enabled.
/// Used primarily by the `log_debug!` macro.
pub fn is_debug_enabled() -> bool {
    DEBUG_ENABLED
        .get() // Attempt to retrieve the AtomicBool.
        .map(|f| f.load(Ordering::Relaxed)) // Load its value if present.
        .unwrap_or(false) // Default to false if `init` was never called.
}

/// The five severity channels the configuration engine reports through.
///
/// Ordered by severity so a minimum level can filter out the chattier channels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
    Info,
    Success,
    Warning,
    Error,
    Critical,
}

impl LogLevel {
    /// The tag written in front of every buffered log file line.
    pub fn tag(self) -> &'static str {
        match self {
            LogLevel::Info => "INFO",
            LogLevel::Success => "SUCCESS",
            LogLevel::Warning => "WARNING",
            LogLevel::Error => "ERROR",
            LogLevel::Critical => "CRITICAL",
        }
    }
}

/// Leveled, fire-and-forget message sink.
///
/// The store and the synchronizer receive an `Arc<dyn Logger>`; the host binary
/// owns the concrete logger and decides where the lines end up.
pub trait Logger: Send + Sync {
    /// Emits one preformatted message on the given channel.
    fn log(&self, level: LogLevel, message: &str);

    fn info(&self, message: &str) {
        self.log(LogLevel::Info, message);
    }

    fn success(&self, message: &str) {
        self.log(LogLevel::Success, message);
    }

    fn warning(&self, message: &str) {
        self.log(LogLevel::Warning, message);
    }

    fn error(&self, message: &str) {
        self.log(LogLevel::Error, message);
    }

    fn critical(&self, message: &str) {
        self.log(LogLevel::Critical, message);
    }
}

/// Console logger with an optional, periodically flushed log file.
///
/// Every accepted message is printed immediately through the colored macros and,
/// when a log file is configured, appended (uncolored and timestamped) to an
/// in-memory buffer. A background thread drains that buffer into the file every
/// flush interval; whatever is left is flushed when the logger is dropped.
pub struct VisualLogger {
    min_level: LogLevel,
    buffer: Arc<Mutex<Vec<String>>>,
    log_file: Option<PathBuf>,
    stop_tx: Option<mpsc::Sender<()>>,
    flusher: Option<JoinHandle<()>>,
}

impl VisualLogger {
    /// Creates a console-only logger.
    pub fn new(min_level: LogLevel) -> Self {
        Self {
            min_level,
            buffer: Arc::new(Mutex::new(Vec::new())),
            log_file: None,
            stop_tx: None,
            flusher: None,
        }
    }

    /// Creates a logger that also buffers its lines into `log_file`,
    /// flushing every `flush_interval`.
    pub fn with_log_file(min_level: LogLevel, log_file: PathBuf, flush_interval: Duration) -> Self {
        let buffer = Arc::new(Mutex::new(Vec::new()));
        let (stop_tx, stop_rx) = mpsc::channel::<()>();

        let thread_buffer = Arc::clone(&buffer);
        let thread_path = log_file.clone();
        let flusher = std::thread::spawn(move || {
            loop {
                match stop_rx.recv_timeout(flush_interval) {
                    Err(RecvTimeoutError::Timeout) => {
                        if let Err(e) = flush_buffer(&thread_buffer, &thread_path) {
                            log_error!(
                                "There was a problem writing the log buffer to {}: {}",
                                thread_path.display(),
                                e
                            );
                        }
                    }
                    // Stop requested or the logger is gone.
                    _ => break,
                }
            }
        });

        Self {
            min_level,
            buffer,
            log_file: Some(log_file),
            stop_tx: Some(stop_tx),
            flusher: Some(flusher),
        }
    }

    /// Writes everything buffered so far to the log file right away.
    pub fn flush(&self) -> io::Result<()> {
        match &self.log_file {
            Some(path) => flush_buffer(&self.buffer, path),
            None => Ok(()),
        }
    }

    /// Number of lines waiting for the next flush.
    #[cfg(test)]
    pub fn pending_lines(&self) -> usize {
        self.buffer.lock().unwrap_or_else(PoisonError::into_inner).len()
    }
}

impl Logger for VisualLogger {
    fn log(&self, level: LogLevel, message: &str) {
        if level < self.min_level {
            return;
        }

        match level {
            LogLevel::Info => log_info!("{}", message),
            LogLevel::Success => log_success!("{}", message),
            LogLevel::Warning => log_warn!("{}", message),
            LogLevel::Error => log_error!("{}", message),
            LogLevel::Critical => log_critical!("{}", message),
        }

        if self.log_file.is_some() {
            let line = format!(
                "{} [{}] {}",
                chrono::Local::now().format("%Y-%m-%d %H:%M:%S%.3f"),
                level.tag(),
                message
            );
            self.buffer
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .push(line);
        }
    }
}

impl Drop for VisualLogger {
    fn drop(&mut self) {
        // Dropping the sender wakes the flusher immediately.
        self.stop_tx.take();
        if let Some(handle) = self.flusher.take() {
            let _ = handle.join();
        }
        if let Err(e) = self.flush() {
            log_error!("Failed to flush remaining log lines: {}", e);
        }
    }
}

/// Drains `buffer` and appends its lines to `path`.
///
/// On a write failure the drained lines are put back in front of anything
/// logged meanwhile, so the next flush retries them.
fn flush_buffer(buffer: &Mutex<Vec<String>>, path: &Path) -> io::Result<()> {
    let lines = std::mem::take(&mut *buffer.lock().unwrap_or_else(PoisonError::into_inner));
    if lines.is_empty() {
        return Ok(());
    }

    let result = (|| {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let mut file = OpenOptions::new().create(true).append(true).open(path)?;
        for line in &lines {
            writeln!(file, "{}", line)?;
        }
        file.flush()
    })();

    if result.is_err() {
        let mut guard = buffer.lock().unwrap_or_else(PoisonError::into_inner);
        let newer = std::mem::replace(&mut *guard, lines);
        guard.extend(newer);
    }
    result
}

/// Logger that just remembers what it was told. Used by the tests to assert on
/// which channel a condition was reported through.
#[cfg(test)]
#[derive(Default)]
pub struct MemoryLogger {
    entries: Mutex<Vec<(LogLevel, String)>>,
}

#[cfg(test)]
impl MemoryLogger {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// True when some message on `level` contains `needle`.
    pub fn has(&self, level: LogLevel, needle: &str) -> bool {
        self.entries
            .lock()
            .unwrap()
            .iter()
            .any(|(l, m)| *l == level && m.contains(needle))
    }

    pub fn count(&self, level: LogLevel) -> usize {
        self.entries
            .lock()
            .unwrap()
            .iter()
            .filter(|(l, _)| *l == level)
            .count()
    }
}

#[cfg(test)]
impl Logger for MemoryLogger {
    fn log(&self, level: LogLevel, message: &str) {
        self.entries.lock().unwrap().push((level, message.to_string()));
    }
}
