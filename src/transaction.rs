//! Transactions, and the log recording them in arrival order.
use crate::core::{required, CustomerId, Row, TxId};
use crate::{ProcessError, ProcessResult};
use serde::{Deserialize, Serialize};

/// A single purchase. The customer it refers to is not required to exist.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct Transaction {
    pub transaction_id: TxId,
    pub customer_id: CustomerId,
    pub amount: f64,
    pub date: String,
    pub category: String,
}

impl Transaction {
    /// Build a [Transaction] out of a raw row, `index` is only used for error reporting.
    pub fn from_row(row: &Row, index: usize) -> ProcessResult<Self> {
        let amount = required(row, "amount", index)?;
        let amount = amount
            .trim()
            .parse::<f64>()
            .map_err(|err| ProcessError::MalformedRow {
                row: index,
                reason: format!("invalid amount '{}': {}", amount, err),
            })
            .and_then(|value: f64| {
                // NaN or infinite amounts would poison every total they are folded into
                if value.is_finite() {
                    Ok(value)
                } else {
                    Err(ProcessError::MalformedRow {
                        row: index,
                        reason: format!("invalid amount '{}': not a finite number", amount),
                    })
                }
            })?;
        Ok(Self {
            transaction_id: required(row, "transaction_id", index)?.into(),
            customer_id: required(row, "customer_id", index)?.into(),
            amount,
            date: required(row, "date", index)?.to_owned(),
            category: required(row, "category", index)?.to_owned(),
        })
    }
}

/// An append-only log of transactions, kept in input order.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct TransactionLog(Vec<Transaction>);

impl TransactionLog {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn append(&mut self, tx: Transaction) {
        self.0.push(tx)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Transaction> {
        self.0.iter()
    }

    /// Sum of all logged amounts, whether or not their customer was known.
    pub fn total_amount(&self) -> f64 {
        self.0.iter().map(|tx| tx.amount).sum()
    }
}
