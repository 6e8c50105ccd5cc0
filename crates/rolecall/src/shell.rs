// SPDX-FileCopyrightText: 2026 Blufio Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `rolecall shell` command implementation.
//!
//! Interactive REPL: plain lines go to the simulated customer, lines starting
//! with `/` are commands. Replies stream to stdout through [`TerminalSink`].

use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;

use colored::Colorize;
use rolecall_agent::{DisplaySink, Reply, ReplySource, RoleplayEngine, TRANSCRIPT_FILE_NAME};
use rolecall_config::RolecallConfig;
use rolecall_core::{
    Audience, ConversationStore, ConversationSummary, ProviderAdapter, RolecallError, Role,
    Segment,
};
use rolecall_gemini::GeminiProvider;
use rolecall_persona::{Signals, recommend};
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use tracing::{debug, info};

use crate::history::{open_store, print_listing, resolve_ref, write_transcript};

/// A parsed line of shell input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellInput {
    Message(String),
    Command(ShellCommand),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellCommand {
    Opener(Audience),
    Audience(Audience),
    Segment(Segment),
    New,
    History,
    Open(String),
    Delete(String),
    Export(Option<PathBuf>),
    Catalog,
    Help,
    Quit,
    /// Unknown command or bad argument; carries the message to print.
    Invalid(String),
}

const HELP: &str = "\
commands:
  /opener parent|student   let the customer open the call
  /audience parent|student switch the customer persona
  /segment sd|smp|sma      switch the school level
  /new                     start a new conversation
  /history                 list saved conversations
  /open <n|id>             load a saved conversation
  /delete <n|id>           delete a saved conversation
  /export [path]           write the transcript as Markdown
  /catalog                 show product suggestions for the segment
  /help                    show this help
  /quit                    exit";

/// Parses one line. Returns `None` for blank input.
pub fn parse_input(line: &str) -> Option<ShellInput> {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return None;
    }
    let Some(command) = trimmed.strip_prefix('/') else {
        return Some(ShellInput::Message(trimmed.to_string()));
    };

    let mut parts = command.splitn(2, char::is_whitespace);
    let name = parts.next().unwrap_or_default().to_ascii_lowercase();
    let arg = parts.next().map(str::trim).filter(|a| !a.is_empty());

    let parsed = match (name.as_str(), arg) {
        ("opener", Some(a)) => parse_audience(a).map_or_else(ShellCommand::Invalid, ShellCommand::Opener),
        ("audience", Some(a)) => {
            parse_audience(a).map_or_else(ShellCommand::Invalid, ShellCommand::Audience)
        }
        ("segment", Some(s)) => s
            .parse::<Segment>()
            .map(ShellCommand::Segment)
            .unwrap_or_else(|_| ShellCommand::Invalid(format!("unknown segment '{s}' (sd, smp, sma)"))),
        ("opener" | "audience" | "segment", None) => {
            ShellCommand::Invalid(format!("/{name} needs an argument, see /help"))
        }
        ("new", _) => ShellCommand::New,
        ("history", _) => ShellCommand::History,
        ("open", Some(r)) => ShellCommand::Open(r.to_string()),
        ("delete", Some(r)) => ShellCommand::Delete(r.to_string()),
        ("open" | "delete", None) => ShellCommand::Invalid(format!("usage: /{name} <n|id>")),
        ("export", path) => ShellCommand::Export(path.map(PathBuf::from)),
        ("catalog", _) => ShellCommand::Catalog,
        ("help", _) => ShellCommand::Help,
        ("quit" | "exit", _) => ShellCommand::Quit,
        _ => ShellCommand::Invalid(format!("unknown command '/{name}', see /help")),
    };
    Some(ShellInput::Command(parsed))
}

fn parse_audience(arg: &str) -> Result<Audience, String> {
    arg.parse::<Audience>()
        .map_err(|_| format!("unknown audience '{arg}' (parent, student)"))
}

/// Prints a streamed reply as a growing line under a speaker label.
pub struct TerminalSink {
    label: String,
    shown: String,
}

impl TerminalSink {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            shown: String::new(),
        }
    }

    fn set_label(&mut self, label: impl Into<String>) {
        self.label = label.into();
    }
}

impl DisplaySink for TerminalSink {
    fn render(&mut self, text: &str) {
        let text = text.trim_start();
        let mut out = std::io::stdout().lock();
        if self.shown.is_empty() && !text.is_empty() {
            let _ = write!(out, "{} ", format!("{}:", self.label).cyan().bold());
        }
        // Later renders extend earlier ones; a shorter render only trims whitespace.
        if let Some(delta) = text.strip_prefix(self.shown.as_str()) {
            let _ = write!(out, "{delta}");
            self.shown = text.to_string();
        }
        let _ = out.flush();
    }

    fn complete(&mut self) {
        if !self.shown.is_empty() {
            println!();
        }
        self.shown.clear();
    }

    fn abandon(&mut self) {
        if !self.shown.is_empty() {
            println!();
            println!("{}", "(reply interrupted, retrying)".dimmed());
        }
        self.shown.clear();
    }
}

fn customer_label(audience: Audience) -> String {
    format!("Customer ({audience})")
}

/// Runs the `rolecall shell` interactive REPL.
pub async fn run_shell(
    config: RolecallConfig,
    audience: Option<Audience>,
    segment: Option<Segment>,
) -> Result<(), RolecallError> {
    let provider: Arc<dyn ProviderAdapter> =
        Arc::new(GeminiProvider::new(&config).inspect_err(|_| {
            eprintln!(
                "error: Gemini API key required. Set gemini.api_key in config or one of {}",
                rolecall_gemini::API_KEY_ENV_VARS.join(", ")
            );
        })?);

    let storage = open_store(&config).await?;
    let store = storage
        .clone()
        .map(|s| s as Arc<dyn ConversationStore>);

    let banner = config.agent.name.clone();
    let mut engine = RoleplayEngine::new(config, provider, store);
    if let Some(audience) = audience {
        engine.set_audience(audience);
    }
    if let Some(segment) = segment {
        engine.set_segment(segment);
    }
    info!(
        audience = %engine.session().audience(),
        segment = %engine.session().segment(),
        history = engine.has_store(),
        "shell started"
    );

    let mut rl = DefaultEditor::new()
        .map_err(|e| RolecallError::Internal(format!("failed to initialize readline: {e}")))?;

    println!("{}", banner.bold().green());
    print_persona(&engine);
    println!("Type {} for commands, {} to exit.\n", "/help".yellow(), "/quit".yellow());

    let mut sink = TerminalSink::new(customer_label(engine.session().bot_persona()));
    let mut listing: Vec<ConversationSummary> = Vec::new();
    let prompt = format!("{}> ", "rolecall".green());

    loop {
        match rl.readline(&prompt) {
            Ok(line) => {
                let Some(input) = parse_input(&line) else {
                    continue;
                };
                let _ = rl.add_history_entry(line.trim());

                let result = match input {
                    ShellInput::Message(text) => {
                        sink.set_label(customer_label(engine.session().bot_persona()));
                        engine.submit_user(&text, &mut sink).await.map(report)
                    }
                    ShellInput::Command(ShellCommand::Quit) => break,
                    ShellInput::Command(command) => {
                        run_command(&mut engine, &mut sink, &mut listing, command).await
                    }
                };
                if let Err(e) = result {
                    eprintln!("{}: {e}", "error".red());
                }
            }
            Err(ReadlineError::Interrupted) => {
                // Ctrl+C
                break;
            }
            Err(ReadlineError::Eof) => {
                // Ctrl+D
                break;
            }
            Err(e) => {
                eprintln!("{}: {e}", "error".red());
                break;
            }
        }
    }

    if let Some(storage) = storage {
        storage.close().await?;
    }
    if let Some((allocated, resident)) = heap_stats() {
        debug!(
            allocated_kb = allocated / 1024,
            resident_kb = resident / 1024,
            "shell memory usage at exit"
        );
    }
    println!("{}", "goodbye".dimmed());
    Ok(())
}

/// Allocated and resident heap bytes from jemalloc.
#[cfg(not(target_env = "msvc"))]
fn heap_stats() -> Option<(usize, usize)> {
    // Stats are cached until the epoch advances.
    tikv_jemalloc_ctl::epoch::advance().ok()?;
    let allocated = tikv_jemalloc_ctl::stats::allocated::read().ok()?;
    let resident = tikv_jemalloc_ctl::stats::resident::read().ok()?;
    Some((allocated, resident))
}

#[cfg(target_env = "msvc")]
fn heap_stats() -> Option<(usize, usize)> {
    None
}

fn report(reply: Option<Reply>) {
    if reply.is_some_and(|r| r.source == ReplySource::Diagnostic) {
        println!("{}", "(no model produced text)".dimmed());
    }
}

async fn run_command(
    engine: &mut RoleplayEngine,
    sink: &mut TerminalSink,
    listing: &mut Vec<ConversationSummary>,
    command: ShellCommand,
) -> Result<(), RolecallError> {
    match command {
        ShellCommand::Opener(audience) => {
            sink.set_label(customer_label(audience));
            engine.trigger_opener(audience, sink).await.map(report)?;
        }
        ShellCommand::Audience(audience) => {
            engine.set_audience(audience);
            print_persona(engine);
        }
        ShellCommand::Segment(segment) => {
            engine.set_segment(segment);
            print_persona(engine);
        }
        ShellCommand::New => {
            engine.new_session();
            println!("{}", "new conversation".dimmed());
        }
        ShellCommand::History => {
            *listing = engine.list_conversations().await?;
            print_listing(listing);
        }
        ShellCommand::Open(reference) => {
            let id = resolve_ref(&reference, listing);
            engine.open_conversation(&id).await?;
            print_persona(engine);
            print_messages(engine);
        }
        ShellCommand::Delete(reference) => {
            let id = resolve_ref(&reference, listing);
            if engine.delete_conversation(&id).await? {
                listing.retain(|s| s.id != id);
                println!("deleted {id}");
            } else {
                return Err(RolecallError::ConversationNotFound { id });
            }
        }
        ShellCommand::Export(path) => {
            let path = path.unwrap_or_else(|| PathBuf::from(TRANSCRIPT_FILE_NAME));
            write_transcript(&path, &engine.export_markdown())?;
            println!("transcript written to {}", path.display());
        }
        ShellCommand::Catalog => {
            let segment = engine.session().segment();
            for rec in recommend(segment, &Signals::default()) {
                println!(
                    "{} {} ({})",
                    format!("[{}]", rec.score).dimmed(),
                    rec.item.name.bold(),
                    rec.item.features.join(", ")
                );
            }
        }
        ShellCommand::Help => println!("{HELP}"),
        ShellCommand::Invalid(message) => eprintln!("{}", message.yellow()),
        ShellCommand::Quit => {}
    }
    Ok(())
}

fn print_persona(engine: &RoleplayEngine) {
    let session = engine.session();
    println!(
        "{}",
        format!("persona: {} · {}", session.audience(), session.segment()).dimmed()
    );
}

fn print_messages(engine: &RoleplayEngine) {
    let label = customer_label(engine.session().bot_persona());
    for message in engine.session().visible_messages() {
        match message.role {
            Role::User => println!("{} {}", "You:".green().bold(), message.content),
            Role::Assistant => println!("{} {}", format!("{label}:").cyan().bold(), message.content),
        }
    }
}
