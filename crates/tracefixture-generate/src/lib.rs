//! Seeded fixture generation for tracefixture.
//!
//! Produces the five cross-referenced CSV tables (issues, wiki pages, change
//! requests, change tasks, issue activity) in a fixed order so every foreign
//! reference names an id minted earlier in the same run.

pub mod dates;
pub mod engine;
pub mod errors;
pub mod foreign;
pub mod generators;
pub mod model;
pub mod output;
pub mod roster;
pub mod text;

pub use engine::{GenerationEngine, GenerationResult, hash_seed};
pub use errors::GenerationError;
pub use model::{GenerateOptions, GenerationIssue, GenerationReport, TableReport};
