use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use shell_words::split;
use std::fs::File;
use std::io::{BufRead, BufWriter, Write};
use std::path::PathBuf;
use tracing::{debug, warn};

use crate::application::{DisplayOptions, EntryForm, Outcome, Presenter, ViewAdapter};
use crate::domain::{Kind, KindFilter, format_cents, parse_cents};
use crate::io::Exporter;

use super::SessionConfig;
use super::terminal::TerminalPresenter;

const PROMPT: &str = "> ";

// One line of session input, parsed with the same machinery as the binary's flags.
#[derive(Parser, Debug)]
#[command(no_binary_name = true, about = "Ledger commands. A bare amount is shorthand for `add`.")]
struct ShellLine {
    #[command(subcommand)]
    command: ShellCommand,
}

#[derive(Subcommand, Debug)]
enum ShellCommand {
    /// Record an entry: add <amount> [income|expense] [description...]
    Add {
        /// Amount (e.g., "50.00" or "50")
        #[arg(allow_hyphen_values = true)]
        amount: String,

        /// Optional kind followed by the description
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        rest: Vec<String>,
    },

    /// Change which entries are listed
    Filter {
        /// all, income or expense
        #[arg(value_parser = parse_filter)]
        filter: KindFilter,
    },

    /// Show the current view
    List,

    /// Show the balance
    Balance,

    /// Show income and expense totals
    Summary,

    /// Remove every entry (asks for confirmation)
    Clear,

    /// Write the current view as CSV or JSON
    Export {
        /// Format: csv, json
        #[arg(default_value = "csv", value_parser = ["csv", "json"])]
        format: String,

        /// Output file (the terminal if omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// End the session
    #[command(alias = "exit")]
    Quit,
}

pub(super) fn parse_filter(s: &str) -> Result<KindFilter, String> {
    KindFilter::from_str(s).ok_or_else(|| {
        format!(
            "Invalid filter '{}'. Valid filters: all, income, expense",
            s
        )
    })
}

/// Whether the session should keep reading input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopControl {
    Continue,
    Exit,
}

/// An interactive ledger session over a reader/writer pair.
pub struct Session<R: BufRead, W: Write> {
    view: ViewAdapter<TerminalPresenter<R, W>>,
    quiet: bool,
}

impl<R: BufRead, W: Write> Session<R, W> {
    pub fn new(config: &SessionConfig, input: R, output: W) -> Self {
        let presenter = TerminalPresenter::new(input, output).with_assume_yes(config.assume_yes);
        let view = ViewAdapter::new(presenter)
            .with_filter(config.filter)
            .with_options(DisplayOptions {
                currency_symbol: config.currency_symbol.clone(),
            });

        Self {
            view,
            quiet: config.quiet,
        }
    }

    pub fn view(&self) -> &ViewAdapter<TerminalPresenter<R, W>> {
        &self.view
    }

    pub fn into_output(self) -> W {
        let Self { view, .. } = self;
        let presenter: TerminalPresenter<R, W> = view.into_presenter();
        presenter.into_output()
    }

    /// Read and execute lines until `quit` or end of input.
    pub fn run(&mut self) -> Result<()> {
        if !self.quiet {
            self.view
                .presenter_mut()
                .println("tally: type `help` for commands, `quit` to leave")?;
        }

        loop {
            if !self.quiet {
                self.view.presenter_mut().prompt(PROMPT)?;
            }

            let Some(line) = self.view.presenter_mut().read_line()? else {
                debug!("end of input");
                break;
            };

            if self.handle_line(&line)? == LoopControl::Exit {
                break;
            }
        }

        Ok(())
    }

    /// Execute a single line of input.
    pub fn handle_line(&mut self, line: &str) -> Result<LoopControl> {
        let mut tokens = match split(line) {
            Ok(tokens) => tokens,
            Err(err) => {
                self.view
                    .presenter_mut()
                    .notify(&format!("Could not parse line: {}", err))?;
                return Ok(LoopControl::Continue);
            }
        };

        if tokens.is_empty() {
            return Ok(LoopControl::Continue);
        }

        // A bare amount submits the form, like pressing Enter in the amount field
        if parse_cents(&tokens[0]).is_ok() {
            tokens.insert(0, "add".to_string());
        }

        let parsed = match ShellLine::try_parse_from(&tokens) {
            Ok(parsed) => parsed,
            Err(err) => {
                let rendered = err.render().to_string();
                self.view.presenter_mut().notify(rendered.trim_end())?;
                return Ok(LoopControl::Continue);
            }
        };

        self.dispatch(parsed.command)
    }

    fn dispatch(&mut self, command: ShellCommand) -> Result<LoopControl> {
        match command {
            ShellCommand::Add { amount, rest } => {
                let (kind, description) = split_kind(rest);
                let mut form = EntryForm::new(amount, kind).with_description(description);
                if let Outcome::Added(tx) = self.view.submit(&mut form)? {
                    debug!(kind = %tx.kind, amount_cents = tx.amount_cents, "entry added");
                }
            }

            ShellCommand::Filter { filter } => {
                self.view.set_filter(filter)?;
            }

            ShellCommand::List => {
                self.view.refresh()?;
            }

            ShellCommand::Balance => {
                let balance = format_cents(self.view.service().balance());
                self.view
                    .presenter_mut()
                    .println(format!("Balance: {}", balance))?;
            }

            ShellCommand::Summary => {
                let summary = self.view.service().summary();
                let presenter = self.view.presenter_mut();
                presenter.println(format!(
                    "Income:   {:>12}  ({} entries)",
                    format_cents(summary.income_total),
                    summary.income_count
                ))?;
                presenter.println(format!(
                    "Expenses: {:>12}  ({} entries)",
                    format_cents(summary.expense_total),
                    summary.expense_count
                ))?;
                presenter.println(format!("Balance:  {:>12}", format_cents(summary.balance)))?;
            }

            ShellCommand::Clear => {
                self.view.clear_all()?;
            }

            ShellCommand::Export { format, output } => {
                if let Err(err) = self.export(&format, output) {
                    warn!(error = %err, "export failed");
                    self.view
                        .presenter_mut()
                        .notify(&format!("Export failed: {:#}", err))?;
                }
            }

            ShellCommand::Quit => return Ok(LoopControl::Exit),
        }

        Ok(LoopControl::Continue)
    }

    fn export(&mut self, format: &str, output: Option<PathBuf>) -> Result<()> {
        let filter = self.view.filter();
        let exporter = Exporter::new(self.view.service());

        match output {
            Some(path) => {
                let file = File::create(&path)
                    .with_context(|| format!("Failed to create {}", path.display()))?;
                let mut writer = BufWriter::new(file);
                let count = match format {
                    "json" => exporter.export_json(filter, &mut writer)?,
                    _ => exporter.export_csv(filter, &mut writer)?,
                };
                writer.flush()?;
                self.view.presenter_mut().println(format!(
                    "Exported {} transaction(s) to {}",
                    count,
                    path.display()
                ))?;
            }
            None => {
                let mut buffer = Vec::new();
                match format {
                    "json" => exporter.export_json(filter, &mut buffer)?,
                    _ => exporter.export_csv(filter, &mut buffer)?,
                };
                self.view.presenter_mut().write_all(&buffer)?;
            }
        }

        Ok(())
    }
}

/// Split the words after the amount into a kind and a description.
/// The kind is only taken from the first word; it defaults to income.
/// A `--` separator before the kind or the description is dropped.
fn split_kind(mut words: Vec<String>) -> (Kind, String) {
    strip_separator(&mut words);
    let kind = words.first().and_then(|word| Kind::from_str(word));
    match kind {
        Some(kind) => {
            words.remove(0);
            strip_separator(&mut words);
            (kind, words.join(" "))
        }
        None => {
            if let Some(word) = words.first() {
                warn!(word = %word, "no kind given, recording as income");
            }
            (Kind::default(), words.join(" "))
        }
    }
}

fn strip_separator(words: &mut Vec<String>) {
    if words.first().is_some_and(|word| word == "--") {
        words.remove(0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn session(config: SessionConfig) -> Session<Cursor<Vec<u8>>, Vec<u8>> {
        Session::new(&config, Cursor::new(Vec::new()), Vec::new())
    }

    fn quiet() -> SessionConfig {
        SessionConfig {
            quiet: true,
            ..SessionConfig::default()
        }
    }

    #[test]
    fn test_split_kind() {
        assert_eq!(
            split_kind(vec!["expense".into(), "Lunch".into(), "out".into()]),
            (Kind::Expense, "Lunch out".to_string())
        );
        assert_eq!(
            split_kind(vec!["Paycheck".into()]),
            (Kind::Income, "Paycheck".to_string())
        );
        assert_eq!(split_kind(vec![]), (Kind::Income, String::new()));
    }

    #[test]
    fn test_split_kind_drops_separator() {
        assert_eq!(
            split_kind(vec!["expense".into(), "--".into(), "x".into()]),
            (Kind::Expense, "x".to_string())
        );
        assert_eq!(
            split_kind(vec!["--".into(), "-1 fee".into()]),
            (Kind::Income, "-1 fee".to_string())
        );
    }

    #[test]
    fn test_add_with_separator_description() {
        let mut s = session(quiet());
        s.handle_line("add 5 expense -- x").unwrap();

        let tx = &s.view().service().transactions()[0];
        assert_eq!(tx.kind, Kind::Expense);
        assert_eq!(tx.description.as_deref(), Some("x"));
    }

    #[test]
    fn test_help_is_user_facing() {
        let mut s = session(quiet());
        assert_eq!(s.handle_line("help").unwrap(), LoopControl::Continue);

        let out = String::from_utf8(s.into_output()).unwrap();
        assert!(out.contains("Ledger commands."));
        assert!(!out.contains("same machinery"));
        assert!(out.contains("add"));
    }

    #[test]
    fn test_handle_add_and_balance() {
        let mut s = session(quiet());
        s.handle_line("add 100 income Salary").unwrap();
        s.handle_line("add 30 expense \"Weekly groceries\"").unwrap();
        s.handle_line("balance").unwrap();

        assert_eq!(s.view().service().len(), 2);
        let out = String::from_utf8(s.into_output()).unwrap();
        assert!(out.contains("Weekly groceries"));
        assert!(out.contains("- $30.00"));
        assert!(out.ends_with("Balance: 70.00\n"));
    }

    #[test]
    fn test_bare_amount_adds() {
        let mut s = session(quiet());
        s.handle_line("12.5 expense").unwrap();
        s.handle_line("-5").unwrap();

        assert_eq!(s.view().service().len(), 1);
        assert_eq!(s.view().service().balance(), -1250);
        let out = String::from_utf8(s.into_output()).unwrap();
        assert!(out.contains("Please enter a valid positive number for amount."));
    }

    #[test]
    fn test_unknown_command_keeps_session() {
        let mut s = session(quiet());
        assert_eq!(s.handle_line("frobnicate").unwrap(), LoopControl::Continue);
        assert_eq!(s.handle_line("filter weekly").unwrap(), LoopControl::Continue);
        assert_eq!(s.handle_line("add 'unbalanced").unwrap(), LoopControl::Continue);
        assert_eq!(s.handle_line("exit").unwrap(), LoopControl::Exit);
    }

    #[test]
    fn test_filter_changes_view() {
        let mut s = session(quiet());
        s.handle_line("add 100 income").unwrap();
        s.handle_line("add 30 expense").unwrap();
        s.handle_line("filter income").unwrap();

        assert_eq!(s.view().filter(), KindFilter::Income);
        let out = String::from_utf8(s.into_output()).unwrap();
        let last_render = out.rsplit("Showing: ").next().unwrap();
        assert!(last_render.starts_with("income"));
        assert!(!last_render.contains("- $30.00"));
    }
}
