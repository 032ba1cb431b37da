use parking_lot::Mutex;
/// Debug logging for term-drawer
///
/// The drawer runs from a tmux key binding, so stdout and stderr are usually
/// not visible. Log records go to a file instead:
/// `term_drawer_debug.log` in the system temp directory.
///
/// The level comes from `--log-level` when given, otherwise from the
/// DEBUG_LEVEL environment variable:
/// - 0 or unset: No logging
/// - 1: Errors only
/// - 2: Info level (state decisions, moves)
/// - 3: Debug level (geometry, config, registry)
/// - 4: Trace level (every tmux command)
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::PathBuf;
use std::sync::OnceLock;
use std::time::{SystemTime, UNIX_EPOCH};

/// Debug level configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum DebugLevel {
    Off = 0,
    Error = 1,
    Info = 2,
    Debug = 3,
    Trace = 4,
}

impl DebugLevel {
    fn from_env() -> Self {
        match std::env::var("DEBUG_LEVEL") {
            Ok(val) => Self::parse(&val),
            Err(_) => DebugLevel::Off,
        }
    }

    fn parse(value: &str) -> Self {
        match value.trim().parse::<u8>() {
            Ok(1) => DebugLevel::Error,
            Ok(2) => DebugLevel::Info,
            Ok(3) => DebugLevel::Debug,
            Ok(4) => DebugLevel::Trace,
            _ => DebugLevel::Off,
        }
    }

    pub fn to_level_filter(self) -> log::LevelFilter {
        match self {
            DebugLevel::Off => log::LevelFilter::Off,
            DebugLevel::Error => log::LevelFilter::Error,
            DebugLevel::Info => log::LevelFilter::Info,
            DebugLevel::Debug => log::LevelFilter::Debug,
            DebugLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

/// Path of the debug log file.
pub fn log_path() -> PathBuf {
    std::env::temp_dir().join("term_drawer_debug.log")
}

struct FileLogger {
    level: log::LevelFilter,
    file: Mutex<Option<File>>,
}

impl FileLogger {
    fn open(level: log::LevelFilter) -> Self {
        // Appended: every toggle is its own short-lived process.
        let file = OpenOptions::new()
            .append(true)
            .create(true)
            .open(log_path())
            .ok();
        Self {
            level,
            file: Mutex::new(file),
        }
    }
}

impl log::Log for FileLogger {
    fn enabled(&self, metadata: &log::Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &log::Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let line = format!(
            "[{}] [{:<5}] [{}] [pid {}] {}\n",
            get_timestamp(),
            record.level(),
            record.target(),
            std::process::id(),
            record.args()
        );
        if let Some(file) = self.file.lock().as_mut() {
            // Silently drop records if the file can't be written
            let _ = file.write_all(line.as_bytes());
        }
    }

    fn flush(&self) {
        if let Some(file) = self.file.lock().as_mut() {
            let _ = file.flush();
        }
    }
}

static LOGGER: OnceLock<FileLogger> = OnceLock::new();

fn get_timestamp() -> String {
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default();
    format!("{}.{:06}", now.as_secs(), now.subsec_micros())
}

/// Resolve the effective level: the CLI flag wins over DEBUG_LEVEL.
pub fn effective_level(cli_level: Option<log::LevelFilter>) -> log::LevelFilter {
    cli_level.unwrap_or_else(|| DebugLevel::from_env().to_level_filter())
}

/// Route `log` records to the debug log file.
///
/// Does nothing when the effective level is `Off`. Safe to call more than
/// once; only the first call installs the logger.
pub fn init_log_bridge(cli_level: Option<log::LevelFilter>) {
    let level = effective_level(cli_level);
    if level == log::LevelFilter::Off {
        return;
    }

    let logger = LOGGER.get_or_init(|| FileLogger::open(level));
    if log::set_logger(logger).is_ok() {
        log::set_max_level(logger.level);
        log::info!(
            "term-drawer {} started (level={})",
            crate::VERSION,
            logger.level
        );
    }
}
