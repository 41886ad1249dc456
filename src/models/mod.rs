pub mod deadline;
pub mod enums;
pub mod message;
pub mod obligation;
pub mod task;
pub mod usage;

pub use deadline::DeadlineRecord;
pub use message::Message;
pub use obligation::ObligationRecord;
pub use task::TaskRecord;
pub use usage::UsageRecord;

use thiserror::Error;

/// A string that does not belong to a closed enum set.
#[derive(Debug, Error)]
#[error("Invalid {field} value: '{value}'")]
pub struct InvalidEnum {
    pub field: String,
    pub value: String,
}
