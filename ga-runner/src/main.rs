use std::process::ExitCode;

use config::app::AppConfig;
use log::{error, info};

mod config;
mod error;
mod reporter;
mod session;

fn main() -> ExitCode {
    if let Err(e) = config::log::init() {
        eprintln!("Logger already initialized: {e}");
    }

    let result = AppConfig::new().and_then(|app_config| {
        info!("Starting breeding session with {app_config:?}");
        session::run(&app_config)
    });

    match result {
        Ok(summary) => {
            info!(
                "Stopped after {} generation(s) ({}), best fitness {}: {}",
                summary.outcome.generations,
                summary.outcome.stop_reason,
                summary.best_fitness,
                summary.best
            );
            ExitCode::SUCCESS
        }
        Err(err) => {
            error!("{}", err);
            ExitCode::FAILURE
        }
    }
}
