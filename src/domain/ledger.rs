use serde::{Deserialize, Serialize};

use super::{Cents, Kind, Transaction};

/// Which transactions a view shows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KindFilter {
    #[default]
    All,
    Income,
    Expense,
}

impl KindFilter {
    pub fn as_str(&self) -> &'static str {
        match self {
            KindFilter::All => "all",
            KindFilter::Income => "income",
            KindFilter::Expense => "expense",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "all" => Some(KindFilter::All),
            "income" => Some(KindFilter::Income),
            "expense" => Some(KindFilter::Expense),
            _ => None,
        }
    }

    pub fn matches(&self, kind: Kind) -> bool {
        match self {
            KindFilter::All => true,
            KindFilter::Income => kind == Kind::Income,
            KindFilter::Expense => kind == Kind::Expense,
        }
    }
}

impl std::fmt::Display for KindFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Compute the balance from a list of transactions.
/// Balance = sum of income - sum of expenses, saturating at the `Cents` range
pub fn compute_balance(transactions: &[Transaction]) -> Cents {
    transactions
        .iter()
        .fold(0, |balance: Cents, tx| balance.saturating_add(tx.signed_amount()))
}

/// Total of `kind` after appending `amount_cents`, or `None` if it would not fit in `Cents`.
pub fn checked_kind_total(
    transactions: &[Transaction],
    kind: Kind,
    amount_cents: Cents,
) -> Option<Cents> {
    transactions
        .iter()
        .filter(|tx| tx.kind == kind)
        .try_fold(amount_cents, |total, tx| total.checked_add(tx.amount_cents))
}

/// Transactions matching `filter`, in insertion order.
pub fn filter_transactions(
    transactions: &[Transaction],
    filter: KindFilter,
) -> impl Iterator<Item = &Transaction> + Clone {
    transactions.iter().filter(move |tx| filter.matches(tx.kind))
}

/// Totals per kind plus the resulting balance.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerSummary {
    pub income_total: Cents,
    pub expense_total: Cents,
    pub balance: Cents,
    pub income_count: usize,
    pub expense_count: usize,
}

pub fn summarize(transactions: &[Transaction]) -> LedgerSummary {
    let mut summary = LedgerSummary::default();

    for tx in transactions {
        match tx.kind {
            Kind::Income => {
                summary.income_total = summary.income_total.saturating_add(tx.amount_cents);
                summary.income_count += 1;
            }
            Kind::Expense => {
                summary.expense_total = summary.expense_total.saturating_add(tx.amount_cents);
                summary.expense_count += 1;
            }
        }
    }

    summary.balance = summary.income_total - summary.expense_total;
    summary
}
