//! The processing pipeline: load customers, fold transactions into them, then report.
//!
//! Every public operation reports its outcome as a plain `bool`. Faults never escape, they are
//! logged through the processor's [Diagnostics] instead.

use crate::core::{required, CustomerId, Row};
use crate::customer::{Customer, CustomerStore};
use crate::diagnostics::{Diagnostics, LogDiagnostics};
use crate::metrics::{self, Metrics};
use crate::report::{self, ExportFormat, Report, ReportBody, ReportType};
use crate::sink::{FileSink, Sink};
use crate::source::CsvSource;
use crate::transaction::{Transaction, TransactionLog};
use crate::{PipelineConfig, ProcessError, ProcessResult};
use serde::Serialize;

/// A customer which matched a search, along with its id.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct CustomerMatch {
    pub customer_id: CustomerId,
    #[serde(flatten)]
    pub customer: Customer,
}

/// Holds the customers and transactions of a run, and produces reports out of them.
#[derive(Debug)]
pub struct DataProcessor<D = LogDiagnostics, S = FileSink> {
    customers: CustomerStore,
    transactions: TransactionLog,
    diagnostics: D,
    sink: S,
}

impl Default for DataProcessor {
    fn default() -> Self {
        Self::new(LogDiagnostics, FileSink::new())
    }
}

impl<D: Diagnostics, S: Sink> DataProcessor<D, S> {
    pub fn new(diagnostics: D, sink: S) -> Self {
        Self {
            customers: CustomerStore::new(),
            transactions: TransactionLog::new(),
            diagnostics,
            sink,
        }
    }

    pub fn customers(&self) -> &CustomerStore {
        &self.customers
    }

    /// Direct access to the store, e.g: to seed it with entries which did not come from a source.
    pub fn customers_mut(&mut self) -> &mut CustomerStore {
        &mut self.customers
    }

    pub fn transactions(&self) -> &TransactionLog {
        &self.transactions
    }

    pub fn diagnostics(&self) -> &D {
        &self.diagnostics
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Load customers from the CSV file at `path`. See [DataProcessor::load_data].
    pub fn load_data_from_path<P: AsRef<std::path::Path>>(&mut self, path: P) -> bool {
        match CsvSource::open(path) {
            Ok(source) => self.load_data(source),
            Err(err) => {
                self.report_load_error(&err);
                false
            }
        }
    }

    /// Insert one customer per row, overwriting any customer already known under the same id
    /// and resetting its totals. Stops at the first faulty row, leaving the customers loaded up
    /// to that point in the store.
    pub fn load_data<I>(&mut self, rows: I) -> bool
    where
        I: IntoIterator<Item = ProcessResult<Row>>,
    {
        match self.try_load(rows) {
            Ok(()) => {
                self.diagnostics
                    .info(&format!("Loaded {} customers", self.customers.len()));
                true
            }
            Err(err) => {
                self.report_load_error(&err);
                false
            }
        }
    }

    fn try_load<I>(&mut self, rows: I) -> ProcessResult<()>
    where
        I: IntoIterator<Item = ProcessResult<Row>>,
    {
        for (row, index) in rows.into_iter().zip(1..) {
            let row = row?;
            let id = CustomerId::from(required(&row, "customer_id", index)?);
            let customer = Customer::new(
                required(&row, "name", index)?.to_owned(),
                required(&row, "email", index)?.to_owned(),
                required(&row, "join_date", index)?.to_owned(),
            );
            self.customers.insert(id, customer);
        }
        Ok(())
    }

    fn report_load_error(&self, err: &ProcessError) {
        match err {
            ProcessError::SourceNotFound(path) => self
                .diagnostics
                .error(&format!("Input file {} not found", path.display())),
            err => self.diagnostics.error(&format!("Error loading data: {}", err)),
        }
    }

    /// Process transactions from the CSV file at `path`. See [DataProcessor::process_transactions].
    pub fn process_transactions_from_path<P: AsRef<std::path::Path>>(&mut self, path: P) -> bool {
        match CsvSource::open(path) {
            Ok(source) => self.process_transactions(source),
            Err(err) => {
                self.report_transaction_error(&err);
                false
            }
        }
    }

    /// Append every row to the transaction log, and credit its amount to the matching customer.
    /// Transactions for unknown customers are logged as-is, with a warning. Stops at the first
    /// faulty row, keeping the transactions processed up to that point.
    pub fn process_transactions<I>(&mut self, rows: I) -> bool
    where
        I: IntoIterator<Item = ProcessResult<Row>>,
    {
        match self.try_process(rows) {
            Ok(()) => {
                self.diagnostics.info(&format!(
                    "Processed {} transactions",
                    self.transactions.len()
                ));
                true
            }
            Err(err) => {
                self.report_transaction_error(&err);
                false
            }
        }
    }

    fn try_process<I>(&mut self, rows: I) -> ProcessResult<()>
    where
        I: IntoIterator<Item = ProcessResult<Row>>,
    {
        for (row, index) in rows.into_iter().zip(1..) {
            let tx = Transaction::from_row(&row?, index)?;
            match self
                .customers
                .get_mut(&tx.customer_id)
                .and_then(|entry| entry.as_record_mut())
            {
                Some(customer) => customer.record(tx.amount),
                None => self.diagnostics.warn(&format!(
                    "Transaction for unknown customer: {}",
                    tx.customer_id
                )),
            }
            self.transactions.append(tx);
        }
        Ok(())
    }

    fn report_transaction_error(&self, err: &ProcessError) {
        match err {
            ProcessError::SourceNotFound(path) => self
                .diagnostics
                .error(&format!("Transaction file {} not found", path.display())),
            err => self
                .diagnostics
                .error(&format!("Error processing transactions: {}", err)),
        }
    }

    /// Compute the current [Metrics], or `None` when no customer has been loaded.
    pub fn calculate_customer_metrics(&self) -> Option<Metrics> {
        let metrics = metrics::calculate(&self.customers, &self.transactions);
        if metrics.is_none() {
            self.diagnostics.error("No customer data available");
        }
        metrics
    }

    /// Case-insensitive substring search of `term` in the given field of every customer, in
    /// store order. Customers without such a field never match.
    pub fn find_matches(&self, term: &str, field: &str) -> Vec<CustomerMatch> {
        let term = term.to_lowercase();
        self.customers
            .records()
            .filter(|(_, customer)| {
                customer
                    .field(field)
                    .map_or(false, |value| value.to_lowercase().contains(&term))
            })
            .map(|(id, customer)| CustomerMatch {
                customer_id: id.clone(),
                customer: customer.clone(),
            })
            .collect()
    }

    /// Search customers by name, see [DataProcessor::find_matches].
    pub fn find_name_matches(&self, term: &str) -> Vec<CustomerMatch> {
        self.find_matches(term, "name")
    }

    /// Write the named report to `destination`. Unknown report types are rejected without
    /// writing anything.
    pub fn generate_report(&mut self, report_type: &str, destination: &str) -> bool {
        match report_type.parse() {
            Ok(report_type) => self.generate_typed_report(report_type, destination),
            Err(_) => {
                self.diagnostics
                    .error(&format!("Unknown report type: {}", report_type));
                false
            }
        }
    }

    pub fn generate_typed_report(&mut self, report_type: ReportType, destination: &str) -> bool {
        match self.try_generate_report(report_type, destination) {
            Ok(()) => {
                self.diagnostics.info(&format!(
                    "Generated {} report: {}",
                    report_type, destination
                ));
                true
            }
            Err(err) => {
                self.diagnostics
                    .error(&format!("Error generating report: {}", err));
                false
            }
        }
    }

    fn try_generate_report(&mut self, report_type: ReportType, destination: &str) -> ProcessResult<()> {
        let body = match report_type {
            ReportType::CustomerSummary => ReportBody::Customers(self.customers.values().collect()),
            ReportType::Metrics => ReportBody::Metrics(self.calculate_customer_metrics()),
            ReportType::Transactions => ReportBody::Transactions(&self.transactions),
        };
        let payload = Report::now(body).to_json()?;
        self.sink.write(destination, &payload)?;
        Ok(())
    }

    /// Export the customer store to `destination` in the named format, either `csv` or `json`.
    /// Unsupported formats are rejected without writing anything.
    pub fn export_customer_data(&mut self, destination: &str, format: &str) -> bool {
        match format.parse() {
            Ok(format) => self.export_typed(destination, format),
            Err(_) => {
                self.diagnostics
                    .error(&format!("Unsupported format: {}", format));
                false
            }
        }
    }

    /// Export the customer store in the given format. Nothing is written if the store cannot be
    /// rendered, e.g: a CSV export whose first entry is not a structured record.
    pub fn export_typed(&mut self, destination: &str, format: ExportFormat) -> bool {
        let result = report::render_customers(&self.customers, format)
            .and_then(|payload| Ok(self.sink.write(destination, &payload)?));
        match result {
            Ok(()) => {
                self.diagnostics
                    .info(&format!("Exported customer data to {}", destination));
                true
            }
            Err(ProcessError::Serialization(message)) => {
                self.diagnostics.error(&message);
                false
            }
            Err(err) => {
                self.diagnostics
                    .error(&format!("Error exporting data: {}", err));
                false
            }
        }
    }

    /// Run the default pipeline: load, aggregate, then write all reports and exports.
    ///
    /// Returns `false` only if either input could not be processed, a failed report or export
    /// is logged but does not prevent the remaining ones from being written.
    pub fn run_pipeline(&mut self, config: &PipelineConfig) -> bool {
        if !self.load_data_from_path(&config.customers_path) {
            self.diagnostics.error("Failed to load customer data");
            return false;
        }

        if !self.process_transactions_from_path(&config.transactions_path) {
            self.diagnostics.error("Failed to process transactions");
            return false;
        }

        self.generate_typed_report(ReportType::CustomerSummary, &config.customer_summary_report);
        self.generate_typed_report(ReportType::Metrics, &config.metrics_report);
        self.generate_typed_report(ReportType::Transactions, &config.transactions_report);

        self.export_typed(&config.csv_export, ExportFormat::Csv);
        self.export_typed(&config.json_export, ExportFormat::Json);

        self.diagnostics.info("Data processing completed successfully");
        true
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::customer::CustomerEntry;
    use crate::diagnostics::MemoryDiagnostics;
    use crate::sink::MemorySink;
    use expect_test::expect;
    use log::Level;

    macro_rules! inline_csv {
        ($line:literal) => {
            $line
        };
        ($line:literal, $($lines:literal),+ $(,)?) => {
            concat!($line, "\n", inline_csv!($($lines),+))
        };
    }

    type TestProcessor = DataProcessor<MemoryDiagnostics, MemorySink>;

    fn processor() -> TestProcessor {
        DataProcessor::new(MemoryDiagnostics::new(), MemorySink::new())
    }

    fn rows(input: &str) -> CsvSource<&[u8]> {
        CsvSource::from_reader(input.as_bytes()).unwrap()
    }

    fn loaded(customers: &str, transactions: &str) -> TestProcessor {
        let mut processor = processor();
        assert!(processor.load_data(rows(customers)));
        assert!(processor.process_transactions(rows(transactions)));
        processor
    }

    const CUSTOMERS: &str = inline_csv!(
        "customer_id,name,email,join_date",
        "1,Ann,a@x.com,2023-01-01",
        "2,Bob,b@x.com,2023-01-02",
        "3,Cid,c@x.com,2023-01-03",
    );

    const TRANSACTIONS: &str = inline_csv!(
        "transaction_id,customer_id,amount,date,category",
        "t1,1,10.5,2023-02-01,food",
        "t2,2,20.0,2023-02-02,travel",
        "t3,1,4.5,2023-02-03,food",
        "t4,9,100.0,2023-02-04,books",
    );

    fn spending(processor: &TestProcessor, id: &str) -> (f64, u64) {
        let customer = processor
            .customers()
            .get(&id.into())
            .and_then(CustomerEntry::as_record)
            .unwrap();
        (customer.total_spent, customer.transaction_count)
    }

    #[test]
    fn single_customer_example() {
        let processor = loaded(
            inline_csv!(
                "customer_id,name,email,join_date",
                "1,Ann,a@x.com,2023-01-01",
            ),
            inline_csv!(
                "transaction_id,customer_id,amount,category,date",
                "t1,1,10.5,food,2023-02-01",
            ),
        );
        assert_eq!(spending(&processor, "1"), (10.5, 1));
        let metrics = processor.calculate_customer_metrics().unwrap();
        assert_eq!(metrics.total_revenue, 10.5);
        assert_eq!(metrics.average_transaction_value, 10.5);
    }

    #[test]
    fn load_logs_customer_count() {
        let mut processor = processor();
        assert!(processor.load_data(rows(CUSTOMERS)));
        assert_eq!(processor.customers().len(), 3);
        assert_eq!(
            processor.diagnostics().entries(),
            [(Level::Info, "Loaded 3 customers".to_owned())]
        );
    }

    #[test]
    fn load_duplicate_ids_last_row_wins() {
        let mut processor = processor();
        assert!(processor.load_data(rows(inline_csv!(
            "customer_id,name,email,join_date",
            "1,Ann,a@x.com,2023-01-01",
            "2,Bob,b@x.com,2023-01-02",
            "1,Annie,annie@x.com,2023-03-01",
        ))));
        let names: Vec<_> = processor
            .customers()
            .records()
            .map(|(id, c)| (id.0.as_str(), c.name.as_str()))
            .collect();
        assert_eq!(names, [("1", "Annie"), ("2", "Bob")]);
    }

    #[test]
    fn reload_resets_totals() {
        let mut processor = loaded(CUSTOMERS, TRANSACTIONS);
        assert!(processor.load_data(rows(CUSTOMERS)));
        assert_eq!(spending(&processor, "1"), (0.0, 0));
        assert_eq!(processor.transactions().len(), 4);
    }

    #[test]
    fn load_missing_field() {
        let mut processor = processor();
        assert!(!processor.load_data(rows(inline_csv!(
            "customer_id,name,join_date",
            "1,Ann,2023-01-01",
        ))));
        assert_eq!(
            processor.diagnostics().messages(Level::Error),
            ["Error loading data: malformed row 1: missing field 'email'"]
        );
    }

    #[test]
    fn load_partial_on_failure() {
        let mut processor = processor();
        assert!(!processor.load_data(rows(inline_csv!(
            "customer_id,name,email,join_date",
            "1,Ann,a@x.com,2023-01-01",
            "2,Bob",
            "3,Cid,c@x.com,2023-01-03",
        ))));
        assert_eq!(processor.customers().len(), 1);
        assert_eq!(
            processor.diagnostics().messages(Level::Error),
            ["Error loading data: malformed row 2: missing field 'email'"]
        );
    }

    #[test]
    fn load_optional_column_left_out() {
        let mut processor = processor();
        assert!(processor.load_data(rows(inline_csv!(
            "customer_id,name,email,join_date,phone",
            "1,Ann,a@x.com,2023-01-01,555-0100",
            "2,Bob,b@x.com,2023-01-02",
        ))));
        assert_eq!(processor.customers().len(), 2);
        assert!(processor.diagnostics().messages(Level::Error).is_empty());
    }

    #[test]
    fn load_extra_cells_ignored() {
        let mut processor = processor();
        assert!(processor.load_data(rows(inline_csv!(
            "customer_id,name,email,join_date",
            "1,Ann,a@x.com,2023-01-01,extra",
        ))));
        let (id, entry) = processor.customers().first().unwrap();
        assert_eq!(id, &CustomerId::from("1"));
        assert_eq!(entry.as_record().unwrap().join_date, "2023-01-01");
    }

    #[test]
    fn load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("customers.csv");
        let mut processor = processor();
        assert!(!processor.load_data_from_path(&path));
        assert_eq!(
            processor.diagnostics().messages(Level::Error),
            [format!("Input file {} not found", path.display())]
        );
    }

    #[test]
    fn transactions_fold_into_customers() {
        let processor = loaded(CUSTOMERS, TRANSACTIONS);
        assert_eq!(spending(&processor, "1"), (15.0, 2));
        assert_eq!(spending(&processor, "2"), (20.0, 1));
        assert_eq!(spending(&processor, "3"), (0.0, 0));
        assert_eq!(processor.transactions().len(), 4);
    }

    #[test]
    fn unknown_customer_is_logged_and_kept() {
        let processor = loaded(CUSTOMERS, TRANSACTIONS);
        assert_eq!(
            processor.diagnostics().messages(Level::Warn),
            ["Transaction for unknown customer: 9"]
        );
        let last = processor.transactions().iter().last().unwrap();
        assert_eq!(last.customer_id, CustomerId::from("9"));
        assert_eq!(
            processor.diagnostics().messages(Level::Info),
            ["Loaded 3 customers", "Processed 4 transactions"]
        );
    }

    #[test]
    fn late_customers_are_not_credited() {
        let mut processor = processor();
        assert!(processor.process_transactions(rows(TRANSACTIONS)));
        assert!(processor.load_data(rows(CUSTOMERS)));
        assert_eq!(spending(&processor, "1"), (0.0, 0));
        assert_eq!(processor.transactions().len(), 4);
    }

    #[test]
    fn invalid_amount_aborts() {
        let mut processor = processor();
        assert!(processor.load_data(rows(CUSTOMERS)));
        assert!(!processor.process_transactions(rows(inline_csv!(
            "transaction_id,customer_id,amount,date,category",
            "t1,1,10.5,2023-02-01,food",
            "t2,1,lots,2023-02-02,food",
            "t3,1,1.0,2023-02-03,food",
        ))));
        assert_eq!(processor.transactions().len(), 1);
        assert_eq!(spending(&processor, "1"), (10.5, 1));
        let errors = processor.diagnostics().messages(Level::Error);
        assert_eq!(errors.len(), 1);
        assert!(errors[0].starts_with("Error processing transactions: malformed row 2"));
    }

    #[test]
    fn non_finite_amount_aborts() {
        let mut processor = processor();
        assert!(processor.load_data(rows(CUSTOMERS)));
        assert!(!processor.process_transactions(rows(inline_csv!(
            "transaction_id,customer_id,amount,date,category",
            "t1,1,NaN,2023-02-01,food",
        ))));
        assert!(processor.transactions().is_empty());
        assert_eq!(spending(&processor, "1"), (0.0, 0));
        assert_eq!(
            processor.diagnostics().messages(Level::Error),
            ["Error processing transactions: malformed row 1: invalid amount 'NaN': not a finite number"]
        );
    }

    #[test]
    fn transactions_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("transactions.csv");
        let mut processor = processor();
        assert!(!processor.process_transactions_from_path(&path));
        assert_eq!(
            processor.diagnostics().messages(Level::Error),
            [format!("Transaction file {} not found", path.display())]
        );
    }

    #[test]
    fn metrics_without_customers() {
        let processor = processor();
        assert_eq!(processor.calculate_customer_metrics(), None);
        assert_eq!(
            processor.diagnostics().messages(Level::Error),
            ["No customer data available"]
        );
    }

    #[test]
    fn metrics_ignore_unknown_customer_amounts() {
        let processor = loaded(CUSTOMERS, TRANSACTIONS);
        let metrics = processor.calculate_customer_metrics().unwrap();
        assert_eq!(metrics.total_customers, 3);
        assert_eq!(metrics.total_transactions, 4);
        assert_eq!(metrics.total_revenue, 35.0);
        assert_eq!(processor.transactions().total_amount(), 135.0);
        assert_eq!(metrics.average_transaction_value, 8.75);
        let top: Vec<_> = metrics.top_customers.iter().map(|(id, _)| id.0.as_str()).collect();
        assert_eq!(top, ["2", "1", "3"]);
    }

    #[test]
    fn find_matches_case_insensitive() {
        let processor = loaded(CUSTOMERS, TRANSACTIONS);
        let matches = processor.find_name_matches("AN");
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].customer_id, CustomerId::from("1"));
        assert_eq!(matches[0].customer.name, "Ann");
    }

    #[test]
    fn find_matches_other_fields() {
        let processor = loaded(CUSTOMERS, TRANSACTIONS);
        let ids = |matches: Vec<CustomerMatch>| -> Vec<String> {
            matches.into_iter().map(|m| m.customer_id.0).collect()
        };
        assert_eq!(ids(processor.find_matches("x.com", "email")), ["1", "2", "3"]);
        assert_eq!(ids(processor.find_matches("15.0", "total_spent")), ["1"]);
        assert_eq!(ids(processor.find_matches("2023", "phone")), Vec::<String>::new());
        assert!(processor.find_name_matches("zed").is_empty());
    }

    #[test]
    fn match_serializes_flat() {
        let processor = loaded(CUSTOMERS, TRANSACTIONS);
        let matches = processor.find_name_matches("bob");
        let actual = serde_json::to_string(&matches).unwrap();
        expect![[r#"[{"customer_id":"2","name":"Bob","email":"b@x.com","join_date":"2023-01-02","total_spent":20.0,"transaction_count":1}]"#]]
            .assert_eq(&actual);
    }

    #[test]
    fn generate_each_report() {
        let mut processor = loaded(CUSTOMERS, TRANSACTIONS);
        for (report_type, key) in [
            ("customer_summary", "customers"),
            ("metrics", "metrics"),
            ("transactions", "transactions"),
        ] {
            let destination = format!("{}.json", report_type);
            assert!(processor.generate_report(report_type, &destination));
            let payload = processor.sink().contents(&destination).unwrap();
            let value: serde_json::Value = serde_json::from_str(&payload).unwrap();
            assert!(value["generated_at"].is_string());
            assert!(!value[key].is_null());
        }
        let payload = processor.sink().contents("transactions.json").unwrap();
        let value: serde_json::Value = serde_json::from_str(&payload).unwrap();
        assert_eq!(value["transactions"].as_array().unwrap().len(), 4);
        assert_eq!(value["transactions"][0]["amount"], 10.5);
        assert!(processor
            .diagnostics()
            .messages(Level::Info)
            .contains(&"Generated metrics report: metrics.json".to_owned()));
    }

    #[test]
    fn metrics_report_without_customers() {
        let mut processor = processor();
        assert!(processor.generate_report("metrics", "metrics.json"));
        let payload = processor.sink().contents("metrics.json").unwrap();
        let value: serde_json::Value = serde_json::from_str(&payload).unwrap();
        assert_eq!(value["metrics"], serde_json::json!({}));
    }

    #[test]
    fn unknown_report_type() {
        let mut processor = loaded(CUSTOMERS, TRANSACTIONS);
        assert!(!processor.generate_report("bogus", "bogus.json"));
        assert!(processor.sink().outputs.is_empty());
        assert_eq!(
            processor.diagnostics().messages(Level::Error),
            ["Unknown report type: bogus"]
        );
    }

    #[test]
    fn unsupported_export_format() {
        let mut processor = loaded(CUSTOMERS, TRANSACTIONS);
        assert!(!processor.export_customer_data("customers.xml", "xml"));
        assert!(processor.sink().outputs.is_empty());
        assert_eq!(
            processor.diagnostics().messages(Level::Error),
            ["Unsupported format: xml"]
        );
    }

    #[test]
    fn export_csv() {
        let mut processor = loaded(CUSTOMERS, TRANSACTIONS);
        assert!(processor.export_customer_data("customers_export.csv", "csv"));
        expect![[r#"
            customer_id,name,email,join_date,total_spent,transaction_count
            1,Ann,a@x.com,2023-01-01,15.0,2
            2,Bob,b@x.com,2023-01-02,20.0,1
            3,Cid,c@x.com,2023-01-03,0.0,0
        "#]]
        .assert_eq(&processor.sink().contents("customers_export.csv").unwrap());
        assert!(processor
            .diagnostics()
            .messages(Level::Info)
            .contains(&"Exported customer data to customers_export.csv".to_owned()));
    }

    #[test]
    fn export_csv_empty_store() {
        let mut processor = processor();
        assert!(processor.export_customer_data("customers_export.csv", "csv"));
        assert_eq!(
            processor.sink().contents("customers_export.csv").as_deref(),
            Some("")
        );
    }

    #[test]
    fn export_csv_rejects_opaque_first_record() {
        let mut processor = processor();
        processor
            .customers_mut()
            .insert("1".into(), CustomerEntry::Opaque(serde_json::json!({})));
        assert!(!processor.export_customer_data("customers_export.csv", "csv"));
        assert!(processor.sink().outputs.is_empty());
        assert_eq!(
            processor.diagnostics().messages(Level::Error),
            ["Customer records must be dicts to export to CSV"]
        );
    }

    #[test]
    fn export_csv_skips_later_opaque_records() {
        let mut processor = loaded(CUSTOMERS, TRANSACTIONS);
        processor
            .customers_mut()
            .insert("4".into(), CustomerEntry::Opaque(serde_json::json!("n/a")));
        assert!(processor.export_customer_data("customers_export.csv", "csv"));
        let csv = processor.sink().contents("customers_export.csv").unwrap();
        let lines: Vec<_> = csv.lines().collect();
        assert_eq!(lines.len(), 4);
        assert_eq!(lines[0], "customer_id,name,email,join_date,total_spent,transaction_count");
        assert!(lines.iter().all(|line| !line.starts_with("4,")));
    }

    #[test]
    fn export_json_round_trip() {
        let mut processor = loaded(CUSTOMERS, TRANSACTIONS);
        assert!(processor.export_customer_data("customers_export.json", "json"));
        let payload = processor.sink().contents("customers_export.json").unwrap();
        let parsed: std::collections::HashMap<CustomerId, Customer> =
            serde_json::from_str(&payload).unwrap();
        assert_eq!(parsed.len(), processor.customers().len());
        for (id, customer) in processor.customers().records() {
            assert_eq!(parsed.get(id), Some(customer));
        }
    }

    #[test]
    fn sink_failure_is_reported() {
        struct FailingSink;

        impl Sink for FailingSink {
            fn write(&mut self, _: &str, _: &[u8]) -> std::io::Result<()> {
                Err(std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only"))
            }
        }

        let mut processor = DataProcessor::new(MemoryDiagnostics::new(), FailingSink);
        assert!(!processor.generate_report("transactions", "transactions.json"));
        assert!(!processor.export_customer_data("customers_export.json", "json"));
        assert_eq!(
            processor.diagnostics().messages(Level::Error),
            [
                "Error generating report: I/O error: read-only",
                "Error exporting data: I/O error: read-only",
            ]
        );
    }
}
