use std::io::Write;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use color_eyre::Result;
use tokio::io::{AsyncBufReadExt, BufReader};

use streamchat::adapters::ReqwestHttpClient;
use streamchat::api::ChatApi;
use streamchat::cli::{health_report, parse_args, until_ctrl_c, version_line, CliCommand, USAGE};
use streamchat::config::ClientConfig;
use streamchat::logging;
use streamchat::session::ChatClient;
use streamchat::traits::ChatEvents;

/// Prints the conversation to the terminal.
///
/// Replies are streamed to stdout as deltas; notices go to stderr.
#[derive(Default)]
struct TerminalPrinter {
    printed: Mutex<usize>,
}

impl TerminalPrinter {
    fn printed(&self) -> std::sync::MutexGuard<'_, usize> {
        self.printed
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// End the current reply line, if one was started.
    fn end_reply(&self) {
        let mut printed = self.printed();
        if *printed > 0 {
            println!();
        }
        *printed = 0;
    }
}

impl ChatEvents for TerminalPrinter {
    fn on_user_message(&self, _text: &str) {
        *self.printed() = 0;
    }

    fn on_assistant_token_appended(&self, partial_text: &str) {
        let mut printed = self.printed();
        if let Some(delta) = partial_text.get(*printed..) {
            print!("{}", delta);
            let _ = std::io::stdout().flush();
        }
        *printed = partial_text.len();
    }

    fn on_assistant_message_finalized(&self, _full_text: &str) {
        self.end_reply();
    }

    fn on_error(&self, message: &str) {
        eprintln!("Error: {}", message);
    }

    fn on_assistant_message_withdrawn(&self) {
        self.end_reply();
        eprintln!("[reply withdrawn]");
    }

    fn on_conversation_reset(&self) {
        eprintln!("New conversation started. Type /new to restart, /quit to exit.");
    }
}

async fn run_check(config: ClientConfig) -> Result<()> {
    let http = Arc::new(ReqwestHttpClient::from_config(&config)?);
    let api = ChatApi::new(http, config);
    let result = api.health().await;
    println!("{}", health_report(&api.config().base_url, result)?);
    Ok(())
}

async fn run_chat(config: ClientConfig) -> Result<()> {
    let http = Arc::new(ReqwestHttpClient::from_config(&config)?);
    let printer = Arc::new(TerminalPrinter::default());
    let client = ChatClient::new(http, config, printer.clone());

    // Failure is reported through on_error; /new retries.
    if until_ctrl_c(client.reset()).await.is_none() {
        return Ok(());
    }

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        print!("> ");
        std::io::stdout().flush()?;

        let line = match until_ctrl_c(lines.next_line()).await {
            Some(line) => line?,
            None => {
                println!();
                break;
            }
        };
        let Some(line) = line else {
            break;
        };

        match line.trim() {
            "" => continue,
            "/quit" => break,
            "/new" => {
                if until_ctrl_c(client.reset()).await.is_none() {
                    eprintln!("[cancelled]");
                }
            }
            text => match until_ctrl_c(client.submit(text)).await {
                Some(Err(e)) if e.is_rejection() => eprintln!("Error: {}", e.user_message()),
                Some(_) => {}
                None => {
                    printer.end_reply();
                    eprintln!("[cancelled]");
                }
            },
        }
    }

    Ok(())
}

fn main() -> Result<()> {
    let (options, check) = match parse_args(std::env::args()) {
        CliCommand::Version => {
            println!("{}", version_line());
            return Ok(());
        }
        CliCommand::Invalid(message) => {
            eprintln!("Error: {}", message);
            eprintln!("{}", USAGE);
            std::process::exit(2);
        }
        CliCommand::Check(options) => (options, true),
        CliCommand::Chat(options) => (options, false),
    };

    color_eyre::install()?;
    logging::init(options.verbose);

    let config = options.apply(ClientConfig::from_env());
    tracing::debug!(base_url = %config.base_url, "Starting");

    let runtime = tokio::runtime::Runtime::new()?;
    let result = if check {
        runtime.block_on(run_check(config))
    } else {
        runtime.block_on(run_chat(config))
    };
    // A pending stdin read would otherwise hold shutdown until Enter.
    runtime.shutdown_timeout(Duration::from_millis(100));
    result
}
