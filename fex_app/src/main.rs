//! `fex` - opens the shell window and runs until it is closed.

mod app;
mod cli;

use std::process::ExitCode;

use fex_window::config::{APP_NAME, APP_VERSION};
use fex_window::foundation::logging;
use log::LevelFilter;

use crate::app::ShellApp;

fn install_panic_hook() {
    let default_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        if let Some(location) = info.location() {
            log::error!("Panic at {}:{}:{}", location.file(), location.line(), location.column());
        }
        default_hook(info);
    }));
}

fn main() -> ExitCode {
    install_panic_hook();

    let args = cli::parse();

    let config = match cli::resolve_config(&args) {
        Ok(config) => config,
        Err(e) => {
            let _ = logging::init(args.log_level.unwrap_or(LevelFilter::Info));
            log::error!("Failed to load configuration: {}", e);
            return ExitCode::FAILURE;
        }
    };

    if let Err(e) = logging::init(config.logging.level) {
        eprintln!("Logger already initialized: {e}");
    }

    log::info!("Starting {} {}", APP_NAME, APP_VERSION);

    let mut app = match ShellApp::new(&config) {
        Ok(app) => app,
        Err(e) => {
            log::error!("Failed to initialize window: {}", e);
            return ExitCode::FAILURE;
        }
    };

    match app.run() {
        Ok(()) => {
            log::info!("{} shut down cleanly", APP_NAME);
            ExitCode::SUCCESS
        }
        Err(e) => {
            log::error!("Main loop failed: {}", e);
            ExitCode::FAILURE
        }
    }
}
