//! Foundation module - Core utilities shared by the shell and its callers
//!
//! - Logging setup
//! - Frame timing

pub mod logging;
pub mod time;
