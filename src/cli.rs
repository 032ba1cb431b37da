//! Command-line interface for term-drawer.
//!
//! The binary takes no subcommands: every invocation is one toggle. The
//! options only select which tmux server to talk to and how much to log.

use clap::Parser;

/// term-drawer - Toggle a drawer pane in the current tmux window
#[derive(Debug, Parser)]
#[command(name = "term-drawer")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// tmux server socket name (passed to tmux as `-L`); also keeps a
    /// separate pane registry per socket
    #[arg(short = 'L', long, value_name = "NAME")]
    pub socket: Option<String>,

    /// Set debug log level (overrides DEBUG_LEVEL)
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevelArg>,
}

/// Log level argument for CLI
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum LogLevelArg {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevelArg {
    /// Convert to `log::LevelFilter`
    pub fn to_level_filter(self) -> log::LevelFilter {
        match self {
            LogLevelArg::Off => log::LevelFilter::Off,
            LogLevelArg::Error => log::LevelFilter::Error,
            LogLevelArg::Warn => log::LevelFilter::Warn,
            LogLevelArg::Info => log::LevelFilter::Info,
            LogLevelArg::Debug => log::LevelFilter::Debug,
            LogLevelArg::Trace => log::LevelFilter::Trace,
        }
    }
}

/// Options the toggle runs with
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RuntimeOptions {
    /// tmux socket name, `None` for the default server
    pub socket: Option<String>,
    /// Log level override from CLI
    pub log_level: Option<log::LevelFilter>,
}

impl From<Cli> for RuntimeOptions {
    fn from(cli: Cli) -> Self {
        Self {
            socket: cli.socket.filter(|s| !s.is_empty()),
            log_level: cli.log_level.map(LogLevelArg::to_level_filter),
        }
    }
}

/// Parse the process arguments.
///
/// `--help` and `--version` (and usage errors) exit here through clap.
pub fn process_cli() -> RuntimeOptions {
    Cli::parse().into()
}
