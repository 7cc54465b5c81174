//! Async facade over the `git` and `hub` command-line tools.
//!
//! A [`Git`] client is bound to one working directory and one environment.
//! Operations build an argument vector, run the binary, and return stdout.
//! Failures carry git's raw stderr, and [`GitError::failure`] maps that text
//! onto an [`ErrorKind`] (or hands it back untouched when nothing matches).

pub mod config;
pub mod env;
pub mod git;
pub mod hub;

pub use config::{ClientConfig, ConfigError};
pub use env::AmbientEnv;
pub use git::{classify, CommandOutput, ErrorKind, Git, GitError, GitFailure};

/// Installs an `env_logger` honouring `RUST_LOG`, defaulting to `info`.
///
/// Safe to call more than once; later calls are no-ops.
pub fn init_logging() {
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .try_init();
}
