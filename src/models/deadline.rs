use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::enums::{DeadlineKind, DeadlineStatus};

/// A dated or event-anchored deadline derived from one message.
///
/// Shape invariant: `Absolute` carries `date` and no trigger/duration;
/// `Relative` carries `trigger_event` (plus `duration_days` when the window
/// was parseable) and no date; `Recurring` carries the pattern text in
/// `trigger_event` only.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeadlineRecord {
    pub id: Uuid,
    pub message_id: Uuid,
    pub kind: DeadlineKind,
    pub date: Option<NaiveDate>,
    pub trigger_event: Option<String>,
    pub duration_days: Option<u32>,
    pub description: String,
    pub critical: bool,
    pub status: DeadlineStatus,
    pub obligation_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}
