use thiserror::Error;

use customer_analytics::{DataProcessor, FileSink, LogDiagnostics, PipelineConfig};

/// Any kind of error in the pipeline CSV loading -> aggregation -> report output.
#[derive(Debug, Error)]
pub enum Error {
    #[error("output directory '{0}' does not exist")]
    MissingOutputDir(std::path::PathBuf),
    #[error("pipeline aborted, see the log for details")]
    PipelineFailed,
}

fn main() -> Result<(), Error> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Stderr)
        .init();

    let mut config = PipelineConfig::from_env();
    // An explicit input directory takes precedence over the environment
    if let Some(input_dir) = std::env::args_os().nth(1) {
        config = PipelineConfig::in_dirs(input_dir.into(), config.output_dir);
    }

    if !config.output_dir.is_dir() {
        return Err(Error::MissingOutputDir(config.output_dir));
    }

    log::info!(
        "Reading {} and {}",
        config.customers_path.display(),
        config.transactions_path.display()
    );

    let mut processor = DataProcessor::new(LogDiagnostics, FileSink::in_dir(&config.output_dir));
    if !processor.run_pipeline(&config) {
        return Err(Error::PipelineFailed);
    }

    Ok(())
}
