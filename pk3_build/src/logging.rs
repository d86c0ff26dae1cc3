use std::fmt;
use std::sync::{Mutex, MutexGuard, OnceLock};

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
        };
        write!(f, "{}", label)
    }
}

type Logger = Box<dyn Fn(LogLevel, &str) + Send + Sync + 'static>;

struct LogState {
    logger: Logger,
    max_level: LogLevel,
}

fn default_logger(level: LogLevel, message: &str) {
    eprintln!("[{}] {}", level, message);
}

fn state_cell() -> &'static Mutex<LogState> {
    static STATE: OnceLock<Mutex<LogState>> = OnceLock::new();
    STATE.get_or_init(|| {
        Mutex::new(LogState {
            logger: Box::new(default_logger),
            max_level: LogLevel::Info,
        })
    })
}

fn lock_state() -> MutexGuard<'static, LogState> {
    match state_cell().lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    }
}

pub fn set_logger(logger: impl Fn(LogLevel, &str) + Send + Sync + 'static) {
    lock_state().logger = Box::new(logger);
}

/// Messages less severe than `level` are dropped.
pub fn set_max_level(level: LogLevel) {
    lock_state().max_level = level;
}

pub fn log(level: LogLevel, message: impl AsRef<str>) {
    let guard = lock_state();
    if level > guard.max_level {
        return;
    }
    (guard.logger)(level, message.as_ref());
}

pub fn error(message: impl AsRef<str>) {
    log(LogLevel::Error, message);
}

pub fn warn(message: impl AsRef<str>) {
    log(LogLevel::Warn, message);
}

pub fn info(message: impl AsRef<str>) {
    log(LogLevel::Info, message);
}

pub fn debug(message: impl AsRef<str>) {
    log(LogLevel::Debug, message);
}
