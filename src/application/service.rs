use tracing::{debug, info};

use crate::domain::{
    Cents, Kind, KindFilter, LedgerSummary, Transaction, checked_kind_total, compute_balance,
    filter_transactions, parse_cents, summarize,
};

use super::AppError;

/// Application service owning the in-memory ledger.
/// This is the primary interface for any client (view adapter, CLI, tests).
///
/// Transactions are kept in insertion order. The only mutations are `add`
/// (append) and `clear` (remove everything).
#[derive(Debug, Default)]
pub struct LedgerService {
    transactions: Vec<Transaction>,
}

impl LedgerService {
    /// Create an empty ledger.
    pub fn new() -> Self {
        Self::default()
    }

    // ========================
    // Mutations
    // ========================

    /// Record a new transaction from user-entered amount text.
    pub fn add(
        &mut self,
        amount: &str,
        kind: Kind,
        description: Option<String>,
    ) -> Result<Transaction, AppError> {
        let amount_cents = parse_cents(amount)?;
        self.add_cents(amount_cents, kind, description)
    }

    /// Record a new transaction from an amount already in cents.
    pub fn add_cents(
        &mut self,
        amount_cents: Cents,
        kind: Kind,
        description: Option<String>,
    ) -> Result<Transaction, AppError> {
        if amount_cents <= 0 {
            return Err(AppError::InvalidAmount(
                "Amount must be positive".to_string(),
            ));
        }

        // Per-kind totals must stay representable so the balance never overflows
        if checked_kind_total(&self.transactions, kind, amount_cents).is_none() {
            return Err(AppError::InvalidAmount(
                "Amount would overflow the ledger total".to_string(),
            ));
        }

        let mut transaction = Transaction::new(amount_cents, kind);
        if let Some(desc) = description {
            transaction = transaction.with_description(desc);
        }

        self.transactions.push(transaction.clone());
        info!(
            kind = %transaction.kind,
            amount_cents,
            position = self.transactions.len(),
            "recorded transaction"
        );
        Ok(transaction)
    }

    /// Remove every transaction once `confirm` agrees.
    ///
    /// Returns `Ok(true)` when the ledger was cleared and `Ok(false)` when the
    /// confirmation was declined. `confirm` is never called on an empty ledger.
    pub fn clear<F>(&mut self, confirm: F) -> Result<bool, AppError>
    where
        F: FnOnce() -> bool,
    {
        if self.transactions.is_empty() {
            return Err(AppError::NothingToClear);
        }

        if !confirm() {
            debug!("clear declined");
            return Ok(false);
        }

        let removed = self.transactions.len();
        self.transactions.clear();
        info!(removed, "cleared ledger");
        Ok(true)
    }

    // ========================
    // Queries
    // ========================

    /// Current balance: income minus expenses. Recomputed on every call.
    pub fn balance(&self) -> Cents {
        compute_balance(&self.transactions)
    }

    /// Transactions matching `filter`, in insertion order.
    pub fn filtered(
        &self,
        filter: KindFilter,
    ) -> impl Iterator<Item = &Transaction> + Clone + '_ {
        filter_transactions(&self.transactions, filter)
    }

    pub fn summary(&self) -> LedgerSummary {
        summarize(&self.transactions)
    }

    pub fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }

    pub fn len(&self) -> usize {
        self.transactions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transactions.is_empty()
    }
}
