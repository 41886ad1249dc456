use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::enums::{ObligationStatus, TriggerType};

/// An action the message implies the recipient must take.
///
/// The confidence score is the overall extraction confidence, not a per-item
/// value; the trigger value is kept raw so collaborators can re-interpret it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObligationRecord {
    pub id: Uuid,
    pub message_id: Uuid,
    pub action: String,
    pub trigger_type: TriggerType,
    pub trigger_value: Option<String>,
    pub mandatory: bool,
    pub consequence: Option<String>,
    pub estimated_minutes: Option<u32>,
    /// 1 is highest, 5 lowest.
    pub priority: u8,
    pub confidence: f32,
    pub status: ObligationStatus,
    pub created_at: DateTime<Utc>,
}
