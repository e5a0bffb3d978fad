//! CLI module.
//!
//! Argument parsing, version display, the health check and Ctrl-C
//! handling. `main` parses the arguments first and only builds a runtime
//! for the chat and check modes:
//!
//! ```ignore
//! use streamchat::cli::{parse_args, CliCommand};
//!
//! match parse_args(std::env::args()) {
//!     CliCommand::Version => println!("{}", streamchat::cli::version_line()),
//!     CliCommand::Invalid(msg) => eprintln!("Error: {}", msg),
//!     CliCommand::Check(opts) | CliCommand::Chat(opts) => { /* ... */ }
//! }
//! ```

pub mod args;
pub mod check;
pub mod interrupt;
pub mod version;

pub use args::{parse_args, CliCommand, CliOptions, USAGE};
pub use check::health_report;
pub use interrupt::{until_ctrl_c, until_interrupted};
pub use version::{version_line, VERSION};

use crate::config::ClientConfig;

impl CliOptions {
    /// Apply the command-line overrides on top of `config`.
    pub fn apply(&self, config: ClientConfig) -> ClientConfig {
        match &self.base_url {
            Some(url) => config.with_base_url(url.trim()),
            None => config,
        }
    }
}
