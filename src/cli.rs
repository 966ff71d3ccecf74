//! CLI command definitions. The binary at `src/bin/obot.rs` parses this and
//! dispatches; the thin CLI surface renders errors, the core itself never
//! prints.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "obot",
    about = "Local-first agentic orchestrator",
    version = env!("CARGO_PKG_VERSION"),
    after_help = "Logs are written to: ~/.local/share/obot/logs/"
)]
pub struct Cli {
    /// Path to config file
    #[arg(short, long, global = true, help = "Path to config file")]
    pub config: Option<PathBuf>,

    /// Workspace root (defaults to the current directory)
    #[arg(short, long, global = true, help = "Workspace root")]
    pub workspace: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, global = true, help = "Enable verbose output")]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run a task through the orchestrator to completion
    Run {
        /// Task description
        task: String,

        /// Resume an existing session instead of starting a new one
        #[arg(long)]
        session: Option<String>,
    },

    /// Session inspection
    Sessions {
        #[command(subcommand)]
        action: SessionCommand,
    },

    /// Record a checkpoint against an existing session
    Checkpoint {
        /// Session id to checkpoint
        session: String,

        /// Checkpoint name
        name: String,

        /// VCS revision to attach, if any
        #[arg(long)]
        revision: Option<String>,
    },

    /// Show the effective configuration
    Config,
}

#[derive(Subcommand)]
pub enum SessionCommand {
    /// List known sessions
    List,

    /// Show a single session's summary
    Show {
        /// Session id
        id: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_run_with_task() {
        let cli = Cli::parse_from(["obot", "run", "add a greeting function"]);
        match cli.command {
            Command::Run { task, session } => {
                assert_eq!(task, "add a greeting function");
                assert!(session.is_none());
            }
            _ => panic!("expected Run"),
        }
    }

    #[test]
    fn parses_sessions_list() {
        let cli = Cli::parse_from(["obot", "sessions", "list"]);
        assert!(matches!(cli.command, Command::Sessions { action: SessionCommand::List }));
    }

    #[test]
    fn parses_checkpoint() {
        let cli = Cli::parse_from(["obot", "checkpoint", "sess-1", "before-refactor"]);
        match cli.command {
            Command::Checkpoint { session, name, revision } => {
                assert_eq!(session, "sess-1");
                assert_eq!(name, "before-refactor");
                assert!(revision.is_none());
            }
            _ => panic!("expected Checkpoint"),
        }
    }

    #[test]
    fn global_config_flag_precedes_subcommand() {
        let cli = Cli::parse_from(["obot", "-c", "/tmp/obot.yaml", "config"]);
        assert_eq!(cli.config, Some(PathBuf::from("/tmp/obot.yaml")));
    }
}
