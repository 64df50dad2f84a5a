use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::io::Write;

use crate::application::LedgerService;
use crate::domain::{KindFilter, Transaction, format_cents};

/// Snapshot of the current view for JSON export
#[derive(Debug, Clone, Serialize)]
pub struct ViewSnapshot<'a> {
    pub exported_at: DateTime<Utc>,
    pub filter: KindFilter,
    /// Balance of the whole ledger, as displayed
    pub balance: String,
    pub transactions: Vec<&'a Transaction>,
}

/// Exporter for writing the session's transactions out in various formats
pub struct Exporter<'a> {
    service: &'a LedgerService,
}

impl<'a> Exporter<'a> {
    pub fn new(service: &'a LedgerService) -> Self {
        Self { service }
    }

    /// Export transactions matching `filter` to CSV. Returns the number of rows written.
    pub fn export_csv<W: Write>(&self, filter: KindFilter, writer: W) -> Result<usize> {
        let mut csv_writer = csv::Writer::from_writer(writer);

        csv_writer.write_record(["index", "kind", "amount", "description", "recorded_at"])?;

        let mut count = 0;
        for (index, tx) in self
            .service
            .transactions()
            .iter()
            .enumerate()
            .filter(|(_, tx)| filter.matches(tx.kind))
        {
            csv_writer.write_record([
                (index + 1).to_string(),
                tx.kind.to_string(),
                format_cents(tx.amount_cents),
                tx.description.clone().unwrap_or_default(),
                tx.recorded_at.to_rfc3339(),
            ])?;
            count += 1;
        }

        csv_writer.flush()?;
        Ok(count)
    }

    /// Export transactions matching `filter` to pretty-printed JSON.
    pub fn export_json<W: Write>(&self, filter: KindFilter, mut writer: W) -> Result<usize> {
        let snapshot = ViewSnapshot {
            exported_at: Utc::now(),
            filter,
            balance: format_cents(self.service.balance()),
            transactions: self.service.filtered(filter).collect(),
        };

        serde_json::to_writer_pretty(&mut writer, &snapshot)?;
        writeln!(writer)?;
        Ok(snapshot.transactions.len())
    }
}
