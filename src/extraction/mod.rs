pub mod ollama;
pub mod parser;
pub mod prompt;
pub mod provider;
pub mod schema;

pub use ollama::*;
pub use parser::*;
pub use prompt::*;
pub use provider::*;
pub use schema::*;

use thiserror::Error;

/// Errors turning raw model output into an [`schema::ExtractionResult`].
///
/// `MissingSection` is the structural contract error: the invocation
/// capability returned a result without one of the eight mandatory sections.
/// It is fatal for the message's pipeline run, unlike per-item parse
/// failures which are skipped leniently.
#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("Required section '{0}' missing from extraction result")]
    MissingSection(&'static str),

    #[error("No JSON found in model response")]
    NoJsonBlock,

    #[error("JSON parsing error: {0}")]
    JsonParsing(String),

    #[error("Malformed '{section}' section: {reason}")]
    MalformedSection {
        section: &'static str,
        reason: String,
    },
}
