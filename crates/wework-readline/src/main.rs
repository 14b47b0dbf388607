use std::borrow::Cow::{self, Borrowed, Owned};
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context as _, Result};
use clap::Parser;
use colored::Colorize;
use rustyline::completion::{Completer, Pair};
use rustyline::highlight::Highlighter;
use rustyline::hint::Hinter;
use rustyline::validate::Validator;
use rustyline::{Context, Editor, Helper};
use tracing_subscriber::EnvFilter;

use wework_application::{ChatWidget, SubmitOutcome};
use wework_core::config::{RagBackend, WidgetConfig};
use wework_interaction::{LegacySupportClient, RagApiClient, ResponseResolver};

mod commands;
mod terminal_view;
mod transcript;

use commands::Command;
use terminal_view::TerminalView;

#[derive(Parser)]
#[command(name = "wework-chat")]
#[command(about = "WeWork support chat in the terminal", long_about = None)]
struct Cli {
    /// RAG service preset (gemini or gpt4o)
    #[arg(long)]
    backend: Option<RagBackend>,

    /// Root URL of the RAG service; overrides --backend
    #[arg(long)]
    base_url: Option<String>,

    /// Membership tier sent with every query
    #[arg(long)]
    membership_type: Option<String>,

    /// Config file to use instead of ~/.config/wework-chat/config.toml
    #[arg(long)]
    config: Option<PathBuf>,

    /// Write the conversation as HTML to this path on exit
    #[arg(long)]
    transcript: Option<PathBuf>,

    /// Emit diagnostics as JSON lines
    #[arg(long)]
    log_json: bool,
}

impl Cli {
    /// Flags win over environment, environment over file, file over defaults.
    fn load_config(&self) -> Result<WidgetConfig> {
        let mut config = match &self.config {
            Some(path) => {
                let mut config = WidgetConfig::from_file(path)?;
                config.apply_env();
                config
            }
            None => WidgetConfig::load()?,
        };

        if let Some(backend) = self.backend {
            config = config.with_backend(backend);
        }
        if let Some(base_url) = &self.base_url {
            config.base_url = base_url.clone();
        }
        if let Some(membership_type) = &self.membership_type {
            config.membership_type = membership_type.clone();
        }
        Ok(config)
    }
}

/// Diagnostics go to stderr so they never mix with the transcript on stdout.
fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

/// Rustyline helper driven by the slash-command table.
#[derive(Clone, Copy, Default)]
struct CliHelper;

impl Helper for CliHelper {}

impl Completer for CliHelper {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &Context<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        let candidates = commands::completions(&line[..pos])
            .into_iter()
            .map(|name| Pair {
                display: name.to_string(),
                replacement: name.to_string(),
            })
            .collect();
        Ok((0, candidates))
    }
}

impl Highlighter for CliHelper {
    /// Known commands in cyan, unrecognised ones in red, chat text untouched.
    fn highlight<'l>(&self, line: &'l str, _pos: usize) -> Cow<'l, str> {
        if !line.starts_with('/') {
            return Borrowed(line);
        }
        let (name, rest) = line.split_at(line.find(' ').unwrap_or(line.len()));
        let name = if commands::is_known(name) {
            name.bright_cyan()
        } else {
            name.red()
        };
        Owned(format!("{name}{rest}"))
    }

    fn highlight_hint<'h>(&self, hint: &'h str) -> Cow<'h, str> {
        Owned(hint.bright_black().to_string())
    }

    fn highlight_char(&self, line: &str, _pos: usize, _forced: bool) -> bool {
        line.starts_with('/')
    }
}

impl Hinter for CliHelper {
    type Hint = String;

    fn hint(&self, line: &str, pos: usize, _ctx: &Context<'_>) -> Option<String> {
        commands::hint(&line[..pos])
    }
}

impl Validator for CliHelper {}

async fn print_history(widget: &ChatWidget<TerminalView>) {
    for message in widget.messages().await {
        println!(
            "{} {}",
            format!("[{} {}]", message.timestamp().format("%H:%M:%S"), message.sender()).bright_black(),
            message.content()
        );
    }
}

async fn print_health(rag: &RagApiClient) {
    match rag.health().await {
        Ok(report) => println!(
            "{}",
            format!(
                "{}: {} (rag initialized: {})",
                report.service, report.status, report.rag_initialized
            )
            .bright_green()
        ),
        Err(err) => println!("{}", format!("Health check failed: {err}").red()),
    }
}

async fn print_status(rag: &RagApiClient) {
    match rag.status().await {
        Ok(status) => println!(
            "{}",
            format!(
                "{}: ready for queries: {}, rag initialized: {}",
                status.service, status.ready_for_queries, status.rag_initialized
            )
            .bright_green()
        ),
        Err(err) => println!("{}", format!("Status check failed: {err}").red()),
    }
}

/// Terminal host for the WeWork chat widget.
///
/// Reads lines with rustyline, feeds them to the widget controller through a
/// `TerminalView`, and handles the slash commands that stand in for the
/// widget's buttons.
#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.log_json);

    // ===== Backend Initialization =====
    let config = cli.load_config().context("Failed to load configuration")?;
    let rag = Arc::new(RagApiClient::from_config(&config));
    let legacy = LegacySupportClient::from_config(&config);
    tracing::info!(url = %rag.chat_url(), membership = %config.membership_type, "chat backend configured");

    println!("{}", "=== WeWork Chat ===".bright_magenta().bold());
    println!(
        "{}",
        "Type a message, '/' for commands, or 'quit' to exit.".bright_black()
    );
    println!();

    let resolver = ResponseResolver::new(rag.clone());
    let widget = ChatWidget::new(resolver, TerminalView::new(), config.greeting.as_str());
    widget.toggle().await;

    // ===== REPL Setup =====
    let mut rl = Editor::new()?;
    rl.set_helper(Some(CliHelper));

    // ===== Main REPL Loop =====
    loop {
        let readline = rl.readline(">> ");

        match readline {
            Ok(line) => {
                if line.trim().is_empty() {
                    continue;
                }
                let _ = rl.add_history_entry(&line);

                match commands::parse(&line) {
                    Command::Quit => {
                        println!("{}", "Goodbye!".bright_green());
                        break;
                    }
                    Command::Open => {
                        if !widget.with_view(|view| view.is_visible()).await {
                            widget.toggle().await;
                        }
                    }
                    Command::Close => {
                        if widget.with_view(|view| view.is_visible()).await {
                            widget.toggle().await;
                        }
                    }
                    Command::Reset => {
                        if !widget.reset().await {
                            println!("{}", "Still waiting for a reply.".yellow());
                        }
                    }
                    Command::History => print_history(&widget).await,
                    Command::Health => print_health(&rag).await,
                    Command::Status => print_status(&rag).await,
                    Command::Legacy(text) => match &legacy {
                        Some(client) if !text.is_empty() => {
                            let reply = client.send_to_api(&text).await;
                            println!("{}", reply.to_string().bright_black());
                        }
                        Some(_) => println!("{}", "Usage: /legacy <description>".yellow()),
                        None => println!(
                            "{}",
                            "Legacy API is not configured (set WEWORK_LEGACY_ENDPOINT and WEWORK_LEGACY_API_KEY)."
                                .yellow()
                        ),
                    },
                    Command::Unknown(name) => {
                        println!("{}", format!("Unknown command: {name}").bright_black());
                    }
                    Command::Chat(text) => {
                        if !widget.with_view(|view| view.is_visible()).await {
                            println!("{}", "Chat is closed. Type /open first.".bright_black());
                            continue;
                        }
                        widget.with_view(|view| view.set_input(text)).await;
                        if let SubmitOutcome::Ignored(reason) = widget.send_current_input().await {
                            tracing::debug!(?reason, "input ignored");
                        }
                    }
                }
            }
            Err(rustyline::error::ReadlineError::Interrupted) => {
                println!("{}", "CTRL-C detected. Type 'quit' to exit.".yellow());
            }
            Err(rustyline::error::ReadlineError::Eof) => {
                println!("{}", "CTRL-D detected. Exiting...".bright_green());
                break;
            }
            Err(err) => {
                eprintln!("{}", format!("Error: {:?}", err).red());
                break;
            }
        }
    }

    if let Some(path) = &cli.transcript {
        transcript::write(path, &widget.messages().await)?;
        println!("{}", format!("Transcript saved to {}", path.display()).bright_black());
    }

    Ok(())
}
