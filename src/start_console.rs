//! Startup helpers for the `calliope` console binary.
//!
//! Wires both services over one HTTP backend and drives them from a
//! line-oriented prompt. This is an exercise harness for the engines, not
//! a product UI.

use std::io::{BufRead, Write};
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Context;

use crate::backend::client::{AgentBackend, ContactsBackend, HttpBackend};
use crate::contacts::record::ContactField;
use crate::contacts::service::ContactService;
use crate::conversation::service::ConversationService;
use crate::conversation::turn::ConversationTurn;
use crate::core::config::ConsoleConfig;
use crate::notify::{ConfirmPrompt, Notice, NoticeSeverity, NoticeSink};

/// Run the console (used by the `calliope` binary).
///
/// # Returns
/// `ExitCode::SUCCESS` on a clean exit, `1` on failure.
#[must_use]
pub fn run() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .init();

    tracing::info!("Starting Calliope console v{}", env!("CARGO_PKG_VERSION"));

    let config = ConsoleConfig::from_env();
    tracing::info!("Backend endpoint: {}", config.base_url);

    let backend = match HttpBackend::new(&config) {
        Ok(backend) => Arc::new(backend),
        Err(e) => {
            tracing::error!("Failed to create backend client: {e}");
            return ExitCode::from(1);
        }
    };

    let rt = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            tracing::error!("Failed to create runtime: {e}");
            return ExitCode::from(1);
        }
    };

    if let Err(e) = rt.block_on(repl(backend)) {
        tracing::error!("Console error: {e}");
        return ExitCode::from(1);
    }

    ExitCode::SUCCESS
}

/// Notice sink printing to the terminal.
struct StdoutNotices;

impl NoticeSink for StdoutNotices {
    fn publish(&self, notice: Notice) {
        match notice.severity {
            NoticeSeverity::Success => println!("ok: {}", notice.text),
            NoticeSeverity::Error => println!("error: {}", notice.text),
        }
    }
}

/// Confirmation prompt reading y/N from the terminal.
struct StdinConfirm;

impl ConfirmPrompt for StdinConfirm {
    fn confirm(&self, message: &str) -> bool {
        print!("{message} [y/N] ");
        let _ = std::io::stdout().flush();
        let mut answer = String::new();
        if std::io::stdin().lock().read_line(&mut answer).is_err() {
            return false;
        }
        matches!(answer.trim(), "y" | "Y" | "yes")
    }
}

const HELP: &str = "\
plain text        send a message to the agent
/contacts         show the contact edit buffer
/reload           re-fetch contacts, discarding unsaved edits
/add              append a blank contact row
/edit I FIELD V   set FIELD (name|description|email) of row I to V
/delete NAME      delete the contact named NAME (asks first)
/save             submit the edit buffer wholesale
/quit             exit";

async fn repl(backend: Arc<HttpBackend>) -> anyhow::Result<()> {
    let conversation = ConversationService::new(Arc::clone(&backend) as Arc<dyn AgentBackend>);
    let contacts = ContactService::new(
        backend as Arc<dyn ContactsBackend>,
        Arc::new(StdoutNotices),
        Arc::new(StdinConfirm),
    );

    if contacts.load().await.is_err() {
        println!("(contacts unavailable; conversation still works)");
    }

    println!("Calliope console. /help for commands.");
    let stdin = std::io::stdin();
    loop {
        print!("> ");
        std::io::stdout().flush().context("flushing prompt")?;

        let mut line = String::new();
        let read = stdin
            .lock()
            .read_line(&mut line)
            .context("reading input")?;
        if read == 0 {
            break;
        }
        let line = line.trim();

        match line.split_once(' ').map_or((line, ""), |(a, b)| (a, b)) {
            ("", _) => {}
            ("/quit", _) => break,
            ("/help", _) => println!("{HELP}"),
            ("/contacts", _) => {
                for (index, row) in contacts.rows_snapshot().await.iter().enumerate() {
                    println!(
                        "{index:>3}  {} | {} | {}",
                        row.record.name, row.record.description, row.record.email
                    );
                }
            }
            ("/reload", _) => {
                let _ = contacts.load().await;
            }
            ("/add", _) => {
                let _ = contacts.append_blank_row().await;
            }
            ("/edit", rest) => match parse_edit(rest) {
                Some((index, field, value)) => {
                    if let Err(e) = contacts.edit_at(index, field, value).await {
                        println!("error: {e}");
                    }
                }
                None => println!("usage: /edit INDEX FIELD VALUE"),
            },
            ("/delete", name) if !name.is_empty() => {
                let _ = contacts.request_delete(name.trim()).await;
            }
            ("/save", _) => {
                let _ = contacts.submit().await;
            }
            (command, _) if command.starts_with('/') => {
                println!("unknown command {command}; /help for commands");
            }
            _ => {
                let _ = conversation.send(line).await;
                if let Some(turn) = conversation.snapshot().await.last() {
                    print_turn(turn);
                }
            }
        }
    }

    Ok(())
}

fn parse_edit(rest: &str) -> Option<(usize, ContactField, String)> {
    let mut parts = rest.splitn(3, ' ');
    let index = parts.next()?.parse().ok()?;
    let field = parts.next()?.parse().ok()?;
    let value = parts.next().unwrap_or("").to_string();
    Some((index, field, value))
}

fn print_turn(turn: &ConversationTurn) {
    println!("[{}] {}", turn.role, turn.body.as_text().unwrap_or("…"));
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_edit() {
        let (index, field, value) = parse_edit("2 email carol@example.com").unwrap();
        assert_eq!(index, 2);
        assert_eq!(field, ContactField::Email);
        assert_eq!(value, "carol@example.com");
    }

    #[test]
    fn test_parse_edit_value_may_contain_spaces() {
        let (_, field, value) = parse_edit("0 description knows the billing system").unwrap();
        assert_eq!(field, ContactField::Description);
        assert_eq!(value, "knows the billing system");
    }

    #[test]
    fn test_parse_edit_rejects_garbage() {
        assert!(parse_edit("").is_none());
        assert!(parse_edit("x email a@b").is_none());
        assert!(parse_edit("1 phone 555").is_none());
    }
}
