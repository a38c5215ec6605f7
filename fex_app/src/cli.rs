use std::path::PathBuf;

use clap::Parser;
use fex_window::config::{Config, ConfigError, ShellConfig};
use log::LevelFilter;

/// FEX - a minimal X11 window shell.
#[derive(Parser, Debug)]
#[command(name = "fex", version, about)]
pub struct Args {
    /// Config file (.toml or .ron).
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Window width in pixels.
    #[arg(long)]
    pub width: Option<i32>,

    /// Window height in pixels.
    #[arg(long)]
    pub height: Option<i32>,

    /// Window x position.
    #[arg(long, allow_negative_numbers = true)]
    pub x: Option<i32>,

    /// Window y position.
    #[arg(long, allow_negative_numbers = true)]
    pub y: Option<i32>,

    /// Window title.
    #[arg(short, long)]
    pub title: Option<String>,

    /// Pin the window to its requested size.
    #[arg(long)]
    pub fixed_size: bool,

    /// Log level override (off, error, warn, info, debug, trace).
    #[arg(long)]
    pub log_level: Option<LevelFilter>,

    /// Target frames per second for the main loop.
    #[arg(long)]
    pub fps: Option<u32>,
}

pub fn parse() -> Args {
    Args::parse()
}

/// Defaults, then the config file, then command line flags.
pub fn resolve_config(args: &Args) -> Result<ShellConfig, ConfigError> {
    let mut config = match &args.config {
        Some(path) => ShellConfig::load_from_file(path)?,
        None => ShellConfig::default(),
    };

    if let Some(width) = args.width {
        config.window.width = width;
    }
    if let Some(height) = args.height {
        config.window.height = height;
    }
    if let Some(x) = args.x {
        config.window.x = x;
    }
    if let Some(y) = args.y {
        config.window.y = y;
    }
    if let Some(title) = &args.title {
        config.window.title.clone_from(title);
    }
    if args.fixed_size {
        config.window.resizable = false;
    }
    if let Some(level) = args.log_level {
        config.logging.level = level;
    }
    if let Some(fps) = args.fps {
        config.frame.target_fps = fps;
    }

    Ok(config)
}
