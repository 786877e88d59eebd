mod calendar;
mod diff;
mod duration;
mod interval;
mod zone;

/// A type alias we use for tests that would rather use `?` than unwrap.
type Result = std::result::Result<(), calends::Error>;

static LOGGER: Logger = Logger(());

/// A simple logger that writes messages from this crate to stderr.
///
/// Tests that want to see log output call `Logger::init()` and run with
/// `--features logging -- --nocapture`.
#[derive(Debug)]
struct Logger(());

impl Logger {
    /// Installs this logger. This returns an error if some other logger has
    /// already been installed, which is fine to ignore in tests.
    #[allow(dead_code)]
    fn init() -> std::result::Result<(), log::SetLoggerError> {
        log::set_logger(&LOGGER)?;
        log::set_max_level(log::LevelFilter::Trace);
        Ok(())
    }
}

impl log::Log for Logger {
    fn enabled(&self, metadata: &log::Metadata<'_>) -> bool {
        metadata.target().starts_with("calends")
    }

    fn log(&self, record: &log::Record<'_>) {
        if !self.enabled(record.metadata()) {
            return;
        }
        match (record.file(), record.line()) {
            (Some(file), Some(line)) => {
                eprintln!(
                    "{}|{}|{}:{}: {}",
                    record.level(),
                    record.target(),
                    file,
                    line,
                    record.args()
                );
            }
            (Some(file), None) => {
                eprintln!(
                    "{}|{}|{}: {}",
                    record.level(),
                    record.target(),
                    file,
                    record.args()
                );
            }
            _ => {
                eprintln!(
                    "{}|{}: {}",
                    record.level(),
                    record.target(),
                    record.args()
                );
            }
        }
    }

    fn flush(&self) {}
}
