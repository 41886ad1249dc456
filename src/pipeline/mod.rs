pub mod classify;
pub mod derive;
pub mod processor;
pub mod triggers;

pub use classify::*;
pub use derive::*;
pub use processor::*;
pub use triggers::*;

use thiserror::Error;

use crate::extraction::InvocationError;

/// Failure of one message's pipeline run.
///
/// Invocation failures leave the message unprocessed (no `processed_at`
/// stamp, no partial records) so the caller can retry later.
#[derive(Debug, Error)]
pub enum ProcessingError {
    #[error("Model invocation failed: {0}")]
    Invocation(#[from] InvocationError),
}
