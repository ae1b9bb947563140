//! Report payloads and export formats.

use crate::customer::{CustomerEntry, CustomerStore};
use crate::metrics::Metrics;
use crate::transaction::TransactionLog;
use crate::{ProcessError, ProcessResult};
use serde::Serialize;

/// The views of the processed data which can be written out as a JSON report.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ReportType {
    CustomerSummary,
    Metrics,
    Transactions,
}

impl std::str::FromStr for ReportType {
    type Err = ProcessError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "customer_summary" => Ok(ReportType::CustomerSummary),
            "metrics" => Ok(ReportType::Metrics),
            "transactions" => Ok(ReportType::Transactions),
            _ => Err(ProcessError::UnsupportedFormat {
                kind: "report type",
                value: s.to_owned(),
            }),
        }
    }
}

impl std::fmt::Display for ReportType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ReportType::CustomerSummary => "customer_summary",
            ReportType::Metrics => "metrics",
            ReportType::Transactions => "transactions",
        };
        f.write_str(name)
    }
}

/// Supported formats when exporting the customer store.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ExportFormat {
    Csv,
    Json,
}

impl std::str::FromStr for ExportFormat {
    type Err = ProcessError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "csv" => Ok(ExportFormat::Csv),
            "json" => Ok(ExportFormat::Json),
            _ => Err(ProcessError::UnsupportedFormat {
                kind: "format",
                value: s.to_owned(),
            }),
        }
    }
}

impl std::fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Json => "json",
        };
        f.write_str(name)
    }
}

/// A JSON report, stamped with the time it was generated.
#[derive(Debug, Serialize)]
pub struct Report<'a> {
    pub generated_at: String,
    #[serde(flatten)]
    pub body: ReportBody<'a>,
}

/// The content of a [Report], serialized under a key named after its variant.
#[derive(Debug, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportBody<'a> {
    /// The customer records, without their ids.
    Customers(Vec<&'a CustomerEntry>),
    /// Missing metrics, i.e: when there were no customers, are written as an empty object.
    #[serde(serialize_with = "metrics_or_empty")]
    Metrics(Option<Metrics>),
    Transactions(&'a TransactionLog),
}

fn metrics_or_empty<S: serde::Serializer>(
    metrics: &Option<Metrics>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    use serde::ser::SerializeMap;
    match metrics {
        Some(metrics) => metrics.serialize(serializer),
        None => serializer.serialize_map(Some(0))?.end(),
    }
}

impl<'a> Report<'a> {
    /// A report stamped with the current local time, in ISO-8601 format.
    pub fn now(body: ReportBody<'a>) -> Self {
        Self::at(chrono::Local::now().naive_local(), body)
    }

    pub fn at(generated_at: chrono::NaiveDateTime, body: ReportBody<'a>) -> Self {
        Self {
            generated_at: generated_at.format("%Y-%m-%dT%H:%M:%S%.6f").to_string(),
            body,
        }
    }

    pub fn to_json(&self) -> ProcessResult<Vec<u8>> {
        Ok(serde_json::to_vec_pretty(self)?)
    }
}

/// Render the whole customer store in the given format.
pub fn render_customers(customers: &CustomerStore, format: ExportFormat) -> ProcessResult<Vec<u8>> {
    match format {
        ExportFormat::Csv => {
            let mut writer = csv::Writer::from_writer(vec![]);
            customers.dump_csv(&mut writer)?;
            writer.into_inner().map_err(|err| err.into_error().into())
        }
        ExportFormat::Json => Ok(serde_json::to_vec_pretty(customers)?),
    }
}
