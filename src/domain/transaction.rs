use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::Cents;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Kind {
    /// Money coming in, adds to the balance
    #[default]
    Income,
    /// Money going out, subtracts from the balance
    Expense,
}

impl Kind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Kind::Income => "income",
            Kind::Expense => "expense",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "income" => Some(Kind::Income),
            "expense" => Some(Kind::Expense),
            _ => None,
        }
    }

    /// Sign applied to an amount of this kind when computing the balance.
    pub fn sign(&self) -> Cents {
        match self {
            Kind::Income => 1,
            Kind::Expense => -1,
        }
    }
}

impl std::fmt::Display for Kind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A single recorded income or expense entry.
/// Transactions are immutable; the only way to get rid of one is clearing the whole ledger.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// Amount in cents (always positive)
    pub amount_cents: Cents,
    pub kind: Kind,
    pub description: Option<String>,
    /// When the entry was recorded in this session
    pub recorded_at: DateTime<Utc>,
}

impl Transaction {
    pub fn new(amount_cents: Cents, kind: Kind) -> Self {
        assert!(amount_cents > 0, "Transaction amount must be positive");
        Self {
            amount_cents,
            kind,
            description: None,
            recorded_at: Utc::now(),
        }
    }

    /// Attach a description. Blank text is treated as no description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        let description = description.into();
        let trimmed = description.trim();
        self.description = if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        };
        self
    }

    /// Amount with the kind's sign applied.
    pub fn signed_amount(&self) -> Cents {
        self.kind.sign() * self.amount_cents
    }

    pub fn is_income(&self) -> bool {
        self.kind == Kind::Income
    }
}
