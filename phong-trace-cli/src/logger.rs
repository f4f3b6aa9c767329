use std::time::{SystemTime, UNIX_EPOCH};

/// A minimal `log::Log` implementation that writes directly to stderr.
/// Unlike a GUI front end, a CLI has nowhere to buffer log entries for
/// later display, so every record is formatted and flushed immediately.
struct StderrLogger;

impl log::Log for StderrLogger {
    fn enabled(&self, metadata: &log::Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &log::Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let elapsed_ms = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis())
            .unwrap_or(0);
        eprintln!("[{elapsed_ms} {} {}] {}", record.level(), record.target(), record.args());
    }

    fn flush(&self) {}
}

static LOGGER: StderrLogger = StderrLogger;

/// Installs the global logger at the given level. Called once from `main`.
pub fn init(level: log::LevelFilter) -> Result<(), log::SetLoggerError> {
    log::set_max_level(level);
    log::set_logger(&LOGGER)
}
