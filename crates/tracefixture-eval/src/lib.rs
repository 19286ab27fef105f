//! Integrity checks for generated fixture directories.

pub mod checks;
pub mod dataset;
pub mod engine;
pub mod errors;
pub mod model;
pub mod report;

pub use dataset::{Dataset, LoadedTable};
pub use engine::IntegrityChecker;
pub use errors::EvalError;
pub use model::{CheckOptions, IntegrityReport, TableSummary, Violation};
pub use report::render_report;
