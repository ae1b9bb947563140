//! Core types shared by the loading, aggregation and export stages.

use serde::{Deserialize, Serialize};

/// A single input row, as read from a delimited source: column name to raw cell text.
pub type Row = std::collections::HashMap<String, String>;

/// Customers are identified by an opaque string, unique within a customer store.
#[derive(Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize, Serialize)]
#[serde(transparent)]
pub struct CustomerId(pub String);

impl std::fmt::Display for CustomerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

impl From<&str> for CustomerId {
    fn from(id: &str) -> Self {
        Self(id.to_owned())
    }
}

/// Transactions carry an identifier, which is *not* required to be unique.
#[derive(Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize, Serialize)]
#[serde(transparent)]
pub struct TxId(pub String);

impl std::fmt::Display for TxId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

impl From<&str> for TxId {
    fn from(id: &str) -> Self {
        Self(id.to_owned())
    }
}

/// Fetch a required column out of a [Row], reporting its absence as a malformed row.
pub(crate) fn required<'a>(
    row: &'a Row,
    field: &'static str,
    index: usize,
) -> crate::ProcessResult<&'a str> {
    row.get(field)
        .map(String::as_str)
        .ok_or(crate::ProcessError::MalformedRow {
            row: index,
            reason: format!("missing field '{}'", field),
        })
}

/// Render a float so that a decimal point is always present, e.g: `0.0` or `10.5`.
pub(crate) fn format_float(value: f64) -> String {
    format!("{:?}", value)
}
