//! Usage accounting: one immutable record per invocation attempt.
//!
//! Records are write-once and append-only. The invocation id is the
//! idempotency key: a retried pipeline can never double-count an attempt.

use std::collections::HashSet;
use std::sync::Mutex;

use chrono::Utc;
use uuid::Uuid;

use crate::catalog::profiles::cost_of;
use crate::models::enums::{TaskComplexity, TaskType};
use crate::models::UsageRecord;

#[derive(Default)]
struct Ledger {
    records: Vec<UsageRecord>,
    seen: HashSet<Uuid>,
}

/// Append-only usage log, safe for concurrent appends.
#[derive(Default)]
pub struct UsageAccountant {
    ledger: Mutex<Ledger>,
}

impl UsageAccountant {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one invocation attempt. Cost is computed from the catalog,
    /// never supplied by the caller.
    ///
    /// Returns `None` when the invocation id was already accounted for;
    /// that is a caller bug worth a warning, not a reason to fail.
    #[allow(clippy::too_many_arguments)]
    pub fn record(
        &self,
        invocation_id: Uuid,
        model_name: &str,
        task_type: TaskType,
        complexity: TaskComplexity,
        input_tokens: u64,
        output_tokens: u64,
        latency_ms: u64,
        analysis_id: Option<Uuid>,
    ) -> Option<UsageRecord> {
        let mut ledger = self.ledger.lock().unwrap_or_else(|e| e.into_inner());

        if !ledger.seen.insert(invocation_id) {
            tracing::warn!(
                invocation_id = %invocation_id,
                model = model_name,
                "Duplicate usage record rejected"
            );
            return None;
        }

        let record = UsageRecord {
            id: Uuid::new_v4(),
            invocation_id,
            model_name: model_name.to_string(),
            task_type,
            complexity,
            input_tokens,
            output_tokens,
            cost_usd: cost_of(model_name, input_tokens, output_tokens),
            latency_ms,
            quality_rating: None,
            analysis_id,
            created_at: Utc::now(),
        };

        ledger.records.push(record.clone());
        Some(record)
    }

    /// Snapshot of all records so far.
    pub fn records(&self) -> Vec<UsageRecord> {
        self.ledger
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .records
            .clone()
    }

    /// Total spend across all recorded invocations.
    pub fn total_cost(&self) -> f64 {
        self.ledger
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .records
            .iter()
            .map(|r| r.cost_usd)
            .sum()
    }
}
