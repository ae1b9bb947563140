//! Locations of the pipeline's inputs and outputs.

use std::env;
use std::path::PathBuf;

/// Where the default pipeline reads its sources from, and names its outputs.
///
/// Output destinations are names handed over to a [crate::Sink], resolved relative to
/// `output_dir` by [crate::FileSink].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PipelineConfig {
    pub customers_path: PathBuf,
    pub transactions_path: PathBuf,
    pub output_dir: PathBuf,
    pub customer_summary_report: String,
    pub metrics_report: String,
    pub transactions_report: String,
    pub csv_export: String,
    pub json_export: String,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self::in_dirs(PathBuf::from("."), PathBuf::from("."))
    }
}

impl PipelineConfig {
    /// The fixed input and output file names, under the given directories.
    pub fn in_dirs(input_dir: PathBuf, output_dir: PathBuf) -> Self {
        Self {
            customers_path: input_dir.join("customers.csv"),
            transactions_path: input_dir.join("transactions.csv"),
            output_dir,
            customer_summary_report: "customer_summary.json".to_owned(),
            metrics_report: "metrics.json".to_owned(),
            transactions_report: "transactions.json".to_owned(),
            csv_export: "customers_export.csv".to_owned(),
            json_export: "customers_export.json".to_owned(),
        }
    }

    /// Load configuration from environment variables
    ///
    /// Environment variables:
    /// - `ANALYTICS_INPUT_DIR` (default: current directory)
    /// - `ANALYTICS_OUTPUT_DIR` (default: current directory)
    pub fn from_env() -> Self {
        let input_dir = env::var_os("ANALYTICS_INPUT_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("."));
        let output_dir = env::var_os("ANALYTICS_OUTPUT_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("."));
        Self::in_dirs(input_dir, output_dir)
    }
}
