//! Logging utilities
//!
//! The shell logs through the `log` facade. The binary installs one
//! process-wide `env_logger` instance at startup; library code never
//! initializes logging on its own.

use std::io::Write;

pub use log::{debug, error, info, trace, warn, LevelFilter, SetLoggerError};

/// Initialize the logging system
///
/// `level` is the default filter; a `RUST_LOG` variable in the environment
/// takes precedence. Lines look like
/// `[2026-10-19T12:00:00Z] INFO context.rs:120 - Window initialized`.
/// Fails if a logger was already installed for this process.
pub fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
    env_logger::Builder::new()
        .filter_level(level)
        .parse_env(env_logger::Env::default())
        .format(|buf, record| {
            writeln!(
                buf,
                "[{}] {} {}:{} - {}",
                buf.timestamp_seconds(),
                record.level(),
                short_file_name(record.file().unwrap_or("?")),
                record.line().unwrap_or(0),
                record.args()
            )
        })
        .try_init()
}

fn short_file_name(path: &str) -> &str {
    path.rsplit(['/', '\\']).next().unwrap_or(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_file_name_strips_directories() {
        assert_eq!(short_file_name("crates/fex_window/src/window/context.rs"), "context.rs");
        assert_eq!(short_file_name("src\\main.rs"), "main.rs");
        assert_eq!(short_file_name("lib.rs"), "lib.rs");
    }

    #[test]
    fn test_second_init_is_reported_not_fatal() {
        let _ = init(LevelFilter::Debug);
        assert!(init(LevelFilter::Info).is_err());
    }
}
