mod shell;
mod terminal;

use anyhow::Result;
use clap::Parser;
use std::io;
use std::sync::Once;
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt};

use crate::domain::KindFilter;

pub use shell::{LoopControl, Session};
pub use terminal::TerminalPresenter;

/// Environment variable holding a tracing filter directive, e.g. `TALLY_LOG=debug`.
pub const LOG_ENV: &str = "TALLY_LOG";

static TRACING_INIT: Once = Once::new();

/// Tally - a tiny income/expense ledger
#[derive(Parser, Debug)]
#[command(name = "tally")]
#[command(about = "Record income and expenses for this session and keep a running balance")]
#[command(version)]
pub struct Cli {
    /// Initial filter: all, income, expense
    #[arg(long, default_value = "all", value_parser = shell::parse_filter)]
    pub filter: KindFilter,

    /// Currency symbol used when listing entries
    #[arg(long, default_value = "$")]
    pub currency: String,

    /// Answer yes to every confirmation prompt
    #[arg(short = 'y', long)]
    pub yes: bool,

    /// Enable debug logging on stderr
    #[arg(short, long)]
    pub verbose: bool,

    /// Do not print the banner or the input prompt
    #[arg(short, long)]
    pub quiet: bool,
}

/// Settings for one session, resolved from the command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionConfig {
    pub filter: KindFilter,
    pub currency_symbol: String,
    pub assume_yes: bool,
    pub quiet: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            filter: KindFilter::All,
            currency_symbol: "$".to_string(),
            assume_yes: false,
            quiet: false,
        }
    }
}

impl From<&Cli> for SessionConfig {
    fn from(cli: &Cli) -> Self {
        Self {
            filter: cli.filter,
            currency_symbol: cli.currency.clone(),
            assume_yes: cli.yes,
            quiet: cli.quiet,
        }
    }
}

/// Install the global tracing subscriber. Safe to call more than once.
pub fn init_tracing(verbose: bool) {
    TRACING_INIT.call_once(|| {
        let default_directive = if verbose { "tally=debug" } else { "tally=warn" };
        let filter = EnvFilter::try_from_env(LOG_ENV)
            .unwrap_or_else(|_| EnvFilter::new(default_directive));

        fmt()
            .with_env_filter(filter)
            .with_writer(io::stderr)
            .with_target(false)
            .init();
    });
}

impl Cli {
    pub fn run(self) -> Result<()> {
        init_tracing(self.verbose);

        let config = SessionConfig::from(&self);
        info!(filter = %config.filter, "starting session");

        let stdin = io::stdin();
        let stdout = io::stdout();
        let mut session = Session::new(&config, stdin.lock(), stdout.lock());
        session.run()
    }
}
