//! Command-line argument parsing.

/// Options shared by the chat and check modes.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CliOptions {
    /// Backend address overriding the environment and the default
    pub base_url: Option<String>,
    /// Log at debug level unless `RUST_LOG` says otherwise
    pub verbose: bool,
}

/// Parsed CLI command to execute.
#[derive(Debug, Clone, PartialEq)]
pub enum CliCommand {
    /// Show version information
    Version,
    /// Probe the backend health endpoint and exit
    Check(CliOptions),
    /// Interactive chat (default)
    Chat(CliOptions),
    /// Arguments could not be understood
    Invalid(String),
}

/// Parse command-line arguments and return the command to run.
///
/// The first item is the program name and is skipped.
///
/// # Examples
///
/// ```
/// use streamchat::cli::args::{parse_args, CliCommand, CliOptions};
///
/// let args = vec!["streamchat".to_string(), "--base-url".to_string(), "http://h:1".to_string()];
/// assert_eq!(
///     parse_args(args.into_iter()),
///     CliCommand::Chat(CliOptions { base_url: Some("http://h:1".to_string()), verbose: false })
/// );
/// ```
pub fn parse_args<I>(args: I) -> CliCommand
where
    I: Iterator<Item = String>,
{
    let mut options = CliOptions::default();
    let mut check = false;
    let mut args = args.skip(1);

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--version" | "-V" => return CliCommand::Version,
            "--verbose" | "-v" => options.verbose = true,
            "--check" => check = true,
            "--base-url" => match args.next() {
                Some(url) if !url.trim().is_empty() => options.base_url = Some(url),
                _ => return CliCommand::Invalid("--base-url requires a value".to_string()),
            },
            other => {
                if let Some(url) = other.strip_prefix("--base-url=") {
                    if url.trim().is_empty() {
                        return CliCommand::Invalid("--base-url requires a value".to_string());
                    }
                    options.base_url = Some(url.to_string());
                } else {
                    return CliCommand::Invalid(format!("unknown argument: {}", other));
                }
            }
        }
    }

    if check {
        CliCommand::Check(options)
    } else {
        CliCommand::Chat(options)
    }
}

/// Usage text printed for invalid arguments.
pub const USAGE: &str = "usage: streamchat [--base-url URL] [--verbose] [--check] [--version]";
