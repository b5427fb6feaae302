use crate::domain::transaction::Transaction;
use crate::error::Result;
use rust_decimal::Decimal;
use serde::Serialize;
use std::io::Write;

#[derive(Serialize)]
struct TransactionRow<'a> {
    order_id: &'a str,
    intent: &'a str,
    status: &'a str,
    amount: Decimal,
    currency: &'a str,
    payer_id: Option<&'a str>,
    email: Option<&'a str>,
    authorization_id: Option<&'a str>,
    capture_id: Option<&'a str>,
    refund_id: Option<&'a str>,
    date_created: String,
}

impl<'a> From<&'a Transaction> for TransactionRow<'a> {
    fn from(tx: &'a Transaction) -> Self {
        Self {
            order_id: &tx.order_id,
            intent: tx.intent.as_str(),
            status: tx.status.as_str(),
            amount: tx.amount,
            currency: &tx.currency,
            payer_id: tx.payer_id.as_deref(),
            email: tx.email.as_deref(),
            authorization_id: tx.authorization_id.as_deref(),
            capture_id: tx.capture_id.as_deref(),
            refund_id: tx.refund_id.as_deref(),
            date_created: tx.date_created.to_rfc3339(),
        }
    }
}

/// Writes transactions as CSV, one row per gateway order.
pub struct TransactionWriter<W: Write> {
    writer: csv::Writer<W>,
}

impl<W: Write> TransactionWriter<W> {
    pub fn new(sink: W) -> Self {
        Self {
            writer: csv::Writer::from_writer(sink),
        }
    }

    pub fn write_transactions<'a, I>(&mut self, transactions: I) -> Result<()>
    where
        I: IntoIterator<Item = &'a Transaction>,
    {
        let mut written = false;
        for tx in transactions {
            self.writer.serialize(TransactionRow::from(tx))?;
            written = true;
        }
        // Keep the header even for an empty listing.
        if !written {
            self.writer.write_record([
                "order_id",
                "intent",
                "status",
                "amount",
                "currency",
                "payer_id",
                "email",
                "authorization_id",
                "capture_id",
                "refund_id",
                "date_created",
            ])?;
        }
        self.writer.flush()?;
        Ok(())
    }
}
