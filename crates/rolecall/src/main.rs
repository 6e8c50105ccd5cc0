// SPDX-FileCopyrightText: 2026 Blufio Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! rolecall - telesales role-play practice against a model-played customer.
//!
//! This is the binary entry point.

#[cfg(not(target_env = "msvc"))]
use tikv_jemallocator::Jemalloc;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: Jemalloc = Jemalloc;

mod history;
mod redact;
mod shell;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use colored::Colorize;
use rolecall_config::RolecallConfig;
use rolecall_core::{Audience, RolecallError, Segment};

/// rolecall - telesales role-play simulator.
#[derive(Parser, Debug)]
#[command(name = "rolecall", version, about, long_about = None)]
struct Cli {
    /// Path to a TOML config file (defaults to the XDG and local lookup).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Start an interactive role-play session (default).
    Shell {
        /// Customer persona: parent or student.
        #[arg(long)]
        audience: Option<Audience>,
        /// School level: sd, smp or sma.
        #[arg(long)]
        segment: Option<Segment>,
    },
    /// Inspect or delete saved conversations.
    History {
        #[command(subcommand)]
        action: HistoryAction,
    },
    /// Write a saved conversation as a Markdown transcript.
    Export {
        /// Conversation id.
        id: String,
        /// Output file.
        #[arg(long, short)]
        output: Option<PathBuf>,
    },
    /// Print the effective configuration with secrets masked.
    Config,
}

#[derive(Subcommand, Debug)]
enum HistoryAction {
    /// List saved conversations, most recent first.
    List,
    /// Print a saved conversation as Markdown.
    Show { id: String },
    /// Delete a saved conversation.
    Delete { id: String },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let loaded = match &cli.config {
        Some(path) => rolecall_config::load_and_validate_path(path),
        None => rolecall_config::load_and_validate(),
    };
    let config = match loaded {
        Ok(config) => config,
        Err(errors) => {
            rolecall_config::render_errors(&errors);
            std::process::exit(1);
        }
    };

    init_tracing(&config.agent.log_level);

    if let Err(e) = run(cli.command, config.clone()).await {
        let secrets: Vec<&str> = config.gemini.api_key.as_deref().into_iter().collect();
        eprintln!("{}: {}", "error".red(), redact::redact(&e.to_string(), &secrets));
        std::process::exit(1);
    }
}

async fn run(command: Option<Commands>, config: RolecallConfig) -> Result<(), RolecallError> {
    match command {
        None => shell::run_shell(config, None, None).await,
        Some(Commands::Shell { audience, segment }) => {
            shell::run_shell(config, audience, segment).await
        }
        Some(Commands::History { action }) => match action {
            HistoryAction::List => history::run_list(&config).await,
            HistoryAction::Show { id } => history::run_show(&config, &id).await,
            HistoryAction::Delete { id } => history::run_delete(&config, &id).await,
        },
        Some(Commands::Export { id, output }) => history::run_export(&config, &id, output).await,
        Some(Commands::Config) => {
            let printed = toml::to_string_pretty(&redact::masked_config(&config))
                .map_err(|e| RolecallError::Internal(format!("failed to render config: {e}")))?;
            println!("{printed}");
            Ok(())
        }
    }
}

/// Logs go to stderr so they never interleave with streamed replies.
fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("rolecall={log_level},warn")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_names(false)
        .with_writer(std::io::stderr)
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    #[cfg(not(target_env = "msvc"))]
    fn jemalloc_is_active() {
        use tikv_jemalloc_ctl::{epoch, stats};
        epoch::advance().unwrap();
        let allocated = stats::allocated::read().unwrap();
        assert!(allocated > 0, "jemalloc should report non-zero allocation");
    }

    #[test]
    fn binary_loads_config_defaults() {
        let config = rolecall_config::load_and_validate_str("").expect("defaults should be valid");
        assert_eq!(config.agent.name, "RG Telesales Role-Play");
        assert_eq!(config.display.batch_chars, 160);
    }

    #[test]
    fn cli_parses_shell_persona_flags() {
        let cli = Cli::try_parse_from(["rolecall", "shell", "--audience", "student", "--segment", "sma"])
            .unwrap();
        match cli.command {
            Some(Commands::Shell { audience, segment }) => {
                assert_eq!(audience, Some(Audience::Student));
                assert_eq!(segment, Some(Segment::Sma));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn cli_parses_export_and_global_config() {
        let cli = Cli::try_parse_from([
            "rolecall", "export", "abc", "-o", "call.md", "--config", "/tmp/r.toml",
        ])
        .unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("/tmp/r.toml")));
        assert!(matches!(
            cli.command,
            Some(Commands::Export { ref id, output: Some(_) }) if id == "abc"
        ));
    }
}
