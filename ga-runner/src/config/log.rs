use env_logger::Env;
use log::SetLoggerError;

const DEFAULT_FILTER: &str = "info";

/// Installs the global logger, filtered by `RUST_LOG` and `info` otherwise.
pub fn init() -> Result<(), SetLoggerError> {
    env_logger::Builder::from_env(Env::default().default_filter_or(DEFAULT_FILTER)).try_init()
}
