pub mod config;
pub use crate::config::*;

pub mod core;
pub use crate::core::*;

pub mod customer;
pub use crate::customer::*;

pub mod diagnostics;
pub use crate::diagnostics::*;

pub mod error;
pub use crate::error::*;

pub mod metrics;
pub use crate::metrics::{CategoryBreakdown, Metrics, TOP_CUSTOMERS};

pub mod processor;
pub use crate::processor::*;

pub mod report;
pub use crate::report::*;

pub mod sink;
pub use crate::sink::*;

pub mod source;
pub use crate::source::*;

pub mod transaction;
pub use crate::transaction::*;
