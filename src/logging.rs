//! Logger setup for the binary
//!
//! The library only talks to the `log` facade. Output defaults to `warn`
//! and honours `RUST_LOG`. A log file keeps records out of the terminal UI.

use env_logger::{Builder, Env, Target};
use std::fs::OpenOptions;
use std::io;
use std::path::Path;

/// Install the global logger. Call once, before the terminal is taken over.
pub fn init_logging(log_file: Option<&Path>) -> io::Result<()> {
    let mut builder = Builder::from_env(Env::default().default_filter_or("warn"));

    if let Some(path) = log_file {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        builder.target(Target::Pipe(Box::new(file)));
    }

    builder.try_init().map_err(io::Error::other)
}
