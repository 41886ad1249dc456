use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::enums::{TaskComplexity, TaskType};

/// One immutable log entry per model invocation attempt.
///
/// Append-only: never mutated after creation. `invocation_id` is the
/// deduplication key that prevents double counting on retries.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UsageRecord {
    pub id: Uuid,
    pub invocation_id: Uuid,
    pub model_name: String,
    pub task_type: TaskType,
    pub complexity: TaskComplexity,
    pub input_tokens: u64,
    pub output_tokens: u64,
    pub cost_usd: f64,
    pub latency_ms: u64,
    pub quality_rating: Option<u8>,
    pub analysis_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}
