//! Logging layer for the Galaxy3D camera subsystem
//!
//! Camera code reports user-visible events (mode switches, rejected script
//! requests, configuration problems) through this channel. It never fails and
//! never interrupts the frame.
//!
//! - Pluggable sink via the [`Logger`] trait
//! - Severity levels with a global minimum severity filter
//! - Colored console output through [`DefaultLogger`]
//! - File and line information for ERROR entries

use colored::*;
use std::sync::{OnceLock, RwLock};
use std::time::SystemTime;
use chrono::{DateTime, Local};

/// Sink for camera log entries.
///
/// # Example
///
/// ```no_run
/// use galaxy_3d_camera::galaxy3d::log::{Logger, LogEntry};
///
/// struct OverlayLogger;
///
/// impl Logger for OverlayLogger {
///     fn log(&self, entry: &LogEntry) {
///         // Push entry.message to the in-game console...
///     }
/// }
/// ```
pub trait Logger: Send + Sync {
    /// Handle one entry
    fn log(&self, entry: &LogEntry);
}

/// One log record
#[derive(Debug, Clone)]
pub struct LogEntry {
    /// Severity level
    pub severity: LogSeverity,

    /// Creation time
    pub timestamp: SystemTime,

    /// Emitting component (e.g., "galaxy3d::CameraHandler", "galaxy3d::SpringController")
    pub source: String,

    /// Message text
    pub message: String,

    /// Source file (ERROR entries only)
    pub file: Option<&'static str>,

    /// Source line (ERROR entries only)
    pub line: Option<u32>,
}

/// Log severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogSeverity {
    /// Per-frame detail (transition steps, clamps)
    Trace,

    /// Development information
    Debug,

    /// User-visible events such as mode switches
    Info,

    /// Rejected requests and recoverable configuration problems
    Warn,

    /// Internal inconsistencies, reported with file:line
    Error,
}

/// Console logger with colored severities
///
/// Format:
/// - Normal: `[timestamp] [SEVERITY] [source] message`
/// - Error: `[timestamp] [ERROR] [source] message (file:line)`
pub struct DefaultLogger;

impl Logger for DefaultLogger {
    fn log(&self, entry: &LogEntry) {
        let datetime: DateTime<Local> = entry.timestamp.into();
        let timestamp = datetime.format("%Y-%m-%d %H:%M:%S%.3f").to_string();

        let severity_str = match entry.severity {
            LogSeverity::Trace => "TRACE".bright_black(),
            LogSeverity::Debug => "DEBUG".cyan(),
            LogSeverity::Info => "INFO ".green(),
            LogSeverity::Warn => "WARN ".yellow(),
            LogSeverity::Error => "ERROR".red().bold(),
        };

        let source = entry.source.bright_blue();

        match (entry.file, entry.line) {
            (Some(file), Some(line)) => println!(
                "[{}] [{}] [{}] {} ({}:{})",
                timestamp, severity_str, source, entry.message, file, line
            ),
            _ => println!(
                "[{}] [{}] [{}] {}",
                timestamp, severity_str, source, entry.message
            ),
        }
    }
}

// ===== GLOBAL LOG HUB =====

struct LogState {
    logger: Box<dyn Logger>,
    min_severity: LogSeverity,
}

static LOG_STATE: OnceLock<RwLock<LogState>> = OnceLock::new();

fn log_state() -> &'static RwLock<LogState> {
    LOG_STATE.get_or_init(|| {
        RwLock::new(LogState {
            logger: Box::new(DefaultLogger),
            min_severity: LogSeverity::Trace,
        })
    })
}

/// Process-wide log hub used by the `engine_*` macros.
///
/// Only the log sink is global; camera state itself lives in the explicit
/// [`CameraHandler`](crate::galaxy3d::CameraHandler) context object.
pub struct Log;

impl Log {
    /// Replace the current sink
    pub fn set_logger<L: Logger + 'static>(logger: L) {
        if let Ok(mut state) = log_state().write() {
            state.logger = Box::new(logger);
        }
    }

    /// Restore [`DefaultLogger`] and the Trace minimum severity
    pub fn reset_logger() {
        if let Ok(mut state) = log_state().write() {
            state.logger = Box::new(DefaultLogger);
            state.min_severity = LogSeverity::Trace;
        }
    }

    /// Drop every entry below `severity`
    pub fn set_min_severity(severity: LogSeverity) {
        if let Ok(mut state) = log_state().write() {
            state.min_severity = severity;
        }
    }

    /// Current minimum severity
    pub fn min_severity() -> LogSeverity {
        log_state()
            .read()
            .map(|state| state.min_severity)
            .unwrap_or(LogSeverity::Trace)
    }

    /// Log without location (engine_trace!/debug!/info!/warn!)
    pub fn log(severity: LogSeverity, source: &str, message: String) {
        Self::dispatch(severity, source, message, None, None);
    }

    /// Log with file:line (engine_error!)
    pub fn log_detailed(
        severity: LogSeverity,
        source: &str,
        message: String,
        file: &'static str,
        line: u32,
    ) {
        Self::dispatch(severity, source, message, Some(file), Some(line));
    }

    fn dispatch(
        severity: LogSeverity,
        source: &str,
        message: String,
        file: Option<&'static str>,
        line: Option<u32>,
    ) {
        if let Ok(state) = log_state().read() {
            if severity < state.min_severity {
                return;
            }
            state.logger.log(&LogEntry {
                severity,
                timestamp: SystemTime::now(),
                source: source.to_string(),
                message,
                file,
                line,
            });
        }
    }
}

// ===== LOGGING MACROS =====

/// Log a TRACE message
///
/// ```no_run
/// # use galaxy_3d_camera::engine_trace;
/// # let tween = 0.5_f32;
/// engine_trace!("galaxy3d::CameraHandler", "tween {:.3}", tween);
/// ```
#[macro_export]
macro_rules! engine_trace {
    ($source:expr, $($arg:tt)*) => {
        $crate::galaxy3d::Log::log(
            $crate::galaxy3d::log::LogSeverity::Trace,
            $source,
            format!($($arg)*)
        )
    };
}

/// Log a DEBUG message
#[macro_export]
macro_rules! engine_debug {
    ($source:expr, $($arg:tt)*) => {
        $crate::galaxy3d::Log::log(
            $crate::galaxy3d::log::LogSeverity::Debug,
            $source,
            format!($($arg)*)
        )
    };
}

/// Log an INFO message
///
/// ```no_run
/// # use galaxy_3d_camera::engine_info;
/// # let name = "orbit";
/// engine_info!("galaxy3d::CameraHandler", "Switching to {} camera", name);
/// ```
#[macro_export]
macro_rules! engine_info {
    ($source:expr, $($arg:tt)*) => {
        $crate::galaxy3d::Log::log(
            $crate::galaxy3d::log::LogSeverity::Info,
            $source,
            format!($($arg)*)
        )
    };
}

/// Log a WARN message
#[macro_export]
macro_rules! engine_warn {
    ($source:expr, $($arg:tt)*) => {
        $crate::galaxy3d::Log::log(
            $crate::galaxy3d::log::LogSeverity::Warn,
            $source,
            format!($($arg)*)
        )
    };
}

/// Log an ERROR message with file:line information
#[macro_export]
macro_rules! engine_error {
    ($source:expr, $($arg:tt)*) => {
        $crate::galaxy3d::Log::log_detailed(
            $crate::galaxy3d::log::LogSeverity::Error,
            $source,
            format!($($arg)*),
            file!(),
            line!()
        )
    };
}

#[cfg(test)]
#[path = "log_tests.rs"]
mod tests;
