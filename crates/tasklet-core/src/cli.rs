use std::io::IsTerminal;
use std::path::PathBuf;

use anyhow::anyhow;
use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use crate::task::{FilterMode, TaskId};

#[derive(Parser, Debug, Clone)]
#[command(
    name = "tasklet",
    version,
    about = "Tasklet: a local task list kept in durable key-value slots"
)]
pub struct GlobalCli {
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[arg(short = 'q', long = "quiet", action = ArgAction::Count, global = true)]
    pub quiet: u8,

    #[arg(long = "config")]
    pub config: Option<PathBuf>,

    #[arg(long = "data")]
    pub data: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Append a task; words are joined with single spaces.
    Add {
        #[arg(required = true, num_args = 1..)]
        text: Vec<String>,
    },
    /// Flip a task between active and completed.
    Toggle { id: TaskId },
    Delete { id: TaskId },
    List {
        #[arg(long, short = 'f', default_value_t = FilterMode::All)]
        filter: FilterMode,
    },
    Theme {
        #[arg(value_enum, default_value_t = ThemeAction::Show)]
        action: ThemeAction,
    },
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThemeAction {
    Show,
    Toggle,
    Light,
    Dark,
}

impl Default for Command {
    fn default() -> Self {
        Self::List {
            filter: FilterMode::All,
        }
    }
}

/// Filter used when `RUST_LOG` is unset. Verbosity raises only this
/// workspace's targets; dependencies stay at `warn`.
fn default_directive(verbose: u8, quiet: u8) -> &'static str {
    match (quiet, verbose) {
        (2.., _) => "error",
        (1, _) => "warn",
        (0, 0) => "warn",
        (0, 1) => "warn,tasklet_core=info,tasklet_cli=info",
        (0, 2) => "warn,tasklet_core=debug,tasklet_cli=debug",
        (0, _) => "info,tasklet_core=trace,tasklet_cli=trace",
    }
}

pub fn init_tracing(verbose: u8, quiet: u8) -> anyhow::Result<()> {
    let directive = default_directive(verbose, quiet);
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(directive))
        .map_err(|e| anyhow!("invalid RUST_LOG / log filter: {e}"))?;

    let init_result = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(verbose >= 2)
        .with_ansi(std::io::stderr().is_terminal())
        .try_init();

    if let Err(err) = init_result {
        debug!(error = %err, "tracing subscriber already set, continuing");
    }

    Ok(())
}
