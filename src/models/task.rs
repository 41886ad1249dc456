use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::enums::TaskStatus;

/// A task auto-created from a mandatory obligation when extraction confidence
/// clears the automation threshold. Lives its own lifecycle once created.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskRecord {
    pub id: Uuid,
    pub message_id: Uuid,
    pub obligation_id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub due_date: Option<NaiveDate>,
    pub priority: u8,
    pub status: TaskStatus,
    pub created_at: DateTime<Utc>,
}
