//! Logging utilities.
//!
//! The engine only talks to the `log` facade. `init_logging` installs
//! `env_logger` for applications that have no logger of their own.

mod init;

pub use init::{init_logging, LoggingConfig};