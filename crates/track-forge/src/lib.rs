//! Track Forge - Command line application
//!
//! A thin batch shell around `track-forge-lib`: it parses the command line,
//! sets up logging, reads and writes GPX files and reports results.

mod app;
mod cli;
mod logging;

pub use app::settings::{Command, InputOutput, PolicyArg, Settings};
pub use app::{CliError, run};
pub use logging::setup_logging;
