use anyhow::Result;
use serde::Serialize;
use tracing::debug;

use crate::domain::{Kind, KindFilter, Transaction, format_cents};

use super::{AppError, LedgerService};

pub const INVALID_AMOUNT_MESSAGE: &str = "Please enter a valid positive number for amount.";
pub const NOTHING_TO_CLEAR_MESSAGE: &str = "There are no transactions to clear.";
pub const CLEAR_CONFIRMATION: &str = "Are you sure you want to clear all transactions?";
pub const NO_DESCRIPTION: &str = "(No description)";

/// The surface a view adapter draws on.
///
/// `render` receives the complete state to display; implementations should
/// not keep anything between calls. `notify` shows a one-off message and
/// `confirm` asks a yes/no question.
pub trait Presenter {
    fn render(&mut self, model: &RenderModel) -> Result<()>;
    fn notify(&mut self, message: &str) -> Result<()>;
    fn confirm(&mut self, question: &str) -> Result<bool>;
}

/// One display row of the filtered list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DisplayRow {
    pub description: String,
    pub kind: Kind,
    pub amount: String,
}

/// Everything a presenter needs to draw the ledger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenderModel {
    pub filter: KindFilter,
    pub rows: Vec<DisplayRow>,
    /// Balance of the whole ledger, independent of the filter
    pub balance: String,
}

/// Display options for the render model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayOptions {
    pub currency_symbol: String,
}

impl Default for DisplayOptions {
    fn default() -> Self {
        Self {
            currency_symbol: "$".to_string(),
        }
    }
}

impl DisplayOptions {
    /// "+ $12.00" for income, "- $12.00" for expense.
    pub fn format_amount(&self, transaction: &Transaction) -> String {
        let sign = match transaction.kind {
            Kind::Income => '+',
            Kind::Expense => '-',
        };
        format!(
            "{} {}{}",
            sign,
            self.currency_symbol,
            format_cents(transaction.amount_cents)
        )
    }

    pub fn row(&self, transaction: &Transaction) -> DisplayRow {
        DisplayRow {
            description: transaction
                .description
                .clone()
                .unwrap_or_else(|| NO_DESCRIPTION.to_string()),
            kind: transaction.kind,
            amount: self.format_amount(transaction),
        }
    }
}

/// The entry form: amount text, optional description and the kind selector.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EntryForm {
    pub amount: String,
    pub description: String,
    pub kind: Kind,
}

impl EntryForm {
    pub fn new(amount: impl Into<String>, kind: Kind) -> Self {
        Self {
            amount: amount.into(),
            description: String::new(),
            kind,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Empty the text fields. The kind selector keeps its value.
    pub fn reset(&mut self) {
        self.amount.clear();
        self.description.clear();
    }
}

/// What happened to a user action.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Added(Transaction),
    Cleared,
    /// The user declined the confirmation prompt
    Cancelled,
    /// The action was refused and the user was told why
    Rejected(AppError),
    Rendered,
}

/// Translates user actions into ledger mutations and ledger state into a
/// render model. Owns the ledger but no presentation state beyond the filter.
pub struct ViewAdapter<P: Presenter> {
    service: LedgerService,
    presenter: P,
    filter: KindFilter,
    options: DisplayOptions,
}

impl<P: Presenter> ViewAdapter<P> {
    pub fn new(presenter: P) -> Self {
        Self::with_service(LedgerService::new(), presenter)
    }

    pub fn with_service(service: LedgerService, presenter: P) -> Self {
        Self {
            service,
            presenter,
            filter: KindFilter::All,
            options: DisplayOptions::default(),
        }
    }

    pub fn with_options(mut self, options: DisplayOptions) -> Self {
        self.options = options;
        self
    }

    pub fn with_filter(mut self, filter: KindFilter) -> Self {
        self.filter = filter;
        self
    }

    pub fn service(&self) -> &LedgerService {
        &self.service
    }

    pub fn presenter(&self) -> &P {
        &self.presenter
    }

    pub fn presenter_mut(&mut self) -> &mut P {
        &mut self.presenter
    }

    pub fn into_presenter(self) -> P {
        self.presenter
    }

    pub fn filter(&self) -> KindFilter {
        self.filter
    }

    pub fn options(&self) -> &DisplayOptions {
        &self.options
    }

    /// Build the render model for the current state.
    pub fn model(&self) -> RenderModel {
        RenderModel {
            filter: self.filter,
            rows: self
                .service
                .filtered(self.filter)
                .map(|tx| self.options.row(tx))
                .collect(),
            balance: format_cents(self.service.balance()),
        }
    }

    /// Re-render the current state.
    pub fn refresh(&mut self) -> Result<Outcome> {
        let model = self.model();
        debug!(filter = %model.filter, rows = model.rows.len(), "render");
        self.presenter.render(&model)?;
        Ok(Outcome::Rendered)
    }

    /// Submit the entry form. On success the form's text fields are emptied.
    pub fn submit(&mut self, form: &mut EntryForm) -> Result<Outcome> {
        let description = Some(form.description.clone());
        match self.service.add(&form.amount, form.kind, description) {
            Ok(transaction) => {
                form.reset();
                self.refresh()?;
                Ok(Outcome::Added(transaction))
            }
            Err(err @ AppError::InvalidAmount(_)) => {
                debug!(amount = %form.amount, "rejected amount");
                self.presenter.notify(INVALID_AMOUNT_MESSAGE)?;
                Ok(Outcome::Rejected(err))
            }
            Err(err) => Err(err.into()),
        }
    }

    pub fn set_filter(&mut self, filter: KindFilter) -> Result<Outcome> {
        self.filter = filter;
        self.refresh()
    }

    /// Clear the ledger after asking the presenter for confirmation.
    pub fn clear_all(&mut self) -> Result<Outcome> {
        let presenter = &mut self.presenter;
        let mut prompt_error = None;

        let result = self
            .service
            .clear(|| match presenter.confirm(CLEAR_CONFIRMATION) {
                Ok(answer) => answer,
                Err(err) => {
                    prompt_error = Some(err);
                    false
                }
            });

        if let Some(err) = prompt_error {
            return Err(err);
        }

        match result {
            Ok(true) => {
                self.refresh()?;
                Ok(Outcome::Cleared)
            }
            Ok(false) => Ok(Outcome::Cancelled),
            Err(err @ AppError::NothingToClear) => {
                self.presenter.notify(NOTHING_TO_CLEAR_MESSAGE)?;
                Ok(Outcome::Rejected(err))
            }
            Err(err) => Err(err.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Recorder {
        renders: Vec<RenderModel>,
        notices: Vec<String>,
        answer: bool,
        questions: usize,
    }

    impl Presenter for Recorder {
        fn render(&mut self, model: &RenderModel) -> Result<()> {
            self.renders.push(model.clone());
            Ok(())
        }

        fn notify(&mut self, message: &str) -> Result<()> {
            self.notices.push(message.to_string());
            Ok(())
        }

        fn confirm(&mut self, _question: &str) -> Result<bool> {
            self.questions += 1;
            Ok(self.answer)
        }
    }

    #[test]
    fn test_format_amount() {
        let options = DisplayOptions::default();
        let income = Transaction::new(1200, Kind::Income);
        let expense = Transaction::new(5, Kind::Expense);

        assert_eq!(options.format_amount(&income), "+ $12.00");
        assert_eq!(options.format_amount(&expense), "- $0.05");
    }

    #[test]
    fn test_row_without_description() {
        let row = DisplayOptions::default().row(&Transaction::new(100, Kind::Income));
        assert_eq!(row.description, NO_DESCRIPTION);
    }

    #[test]
    fn test_submit_resets_form_and_renders() {
        let mut view = ViewAdapter::new(Recorder::default());
        let mut form = EntryForm::new("42.5", Kind::Expense).with_description("Books");

        let outcome = view.submit(&mut form).unwrap();

        assert!(matches!(outcome, Outcome::Added(ref tx) if tx.amount_cents == 4250));
        assert_eq!(form.amount, "");
        assert_eq!(form.description, "");
        assert_eq!(form.kind, Kind::Expense);
        let model = view.presenter().renders.last().unwrap();
        assert_eq!(model.balance, "-42.50");
        assert_eq!(model.rows[0].amount, "- $42.50");
    }

    #[test]
    fn test_submit_invalid_keeps_form() {
        let mut view = ViewAdapter::new(Recorder::default());
        let mut form = EntryForm::new("abc", Kind::Income);

        let outcome = view.submit(&mut form).unwrap();

        assert!(matches!(outcome, Outcome::Rejected(AppError::InvalidAmount(_))));
        assert_eq!(form.amount, "abc");
        assert_eq!(view.presenter().notices, vec![INVALID_AMOUNT_MESSAGE]);
        assert!(view.presenter().renders.is_empty());
    }

    #[test]
    fn test_clear_all_empty_notifies_without_asking() {
        let mut view = ViewAdapter::new(Recorder::default());

        let outcome = view.clear_all().unwrap();

        assert_eq!(outcome, Outcome::Rejected(AppError::NothingToClear));
        assert_eq!(view.presenter().questions, 0);
        assert_eq!(view.presenter().notices, vec![NOTHING_TO_CLEAR_MESSAGE]);
    }

    #[test]
    fn test_balance_ignores_filter() {
        let mut view = ViewAdapter::new(Recorder::default());
        view.submit(&mut EntryForm::new("100", Kind::Income)).unwrap();
        view.submit(&mut EntryForm::new("30", Kind::Expense)).unwrap();

        view.set_filter(KindFilter::Expense).unwrap();

        let model = view.presenter().renders.last().unwrap();
        assert_eq!(model.filter, KindFilter::Expense);
        assert_eq!(model.rows.len(), 1);
        assert_eq!(model.balance, "70.00");
    }
}
