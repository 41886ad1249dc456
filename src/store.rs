//! Persistence contract. The core hands records to a collaborator and never
//! assumes a storage technology; `MemoryStore` backs the tests.

use std::sync::Mutex;

use thiserror::Error;
use uuid::Uuid;

use crate::models::{DeadlineRecord, ObligationRecord, TaskRecord, UsageRecord};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Storage backend error: {0}")]
    Backend(String),
}

/// Storage collaborator: accepts derived records and returns their ids.
pub trait RecordStore {
    fn save_obligation(&self, record: &ObligationRecord) -> Result<Uuid, StoreError>;
    fn save_deadline(&self, record: &DeadlineRecord) -> Result<Uuid, StoreError>;
    fn save_task(&self, record: &TaskRecord) -> Result<Uuid, StoreError>;
    fn save_usage(&self, record: &UsageRecord) -> Result<Uuid, StoreError>;
}

#[derive(Default)]
struct Shelves {
    obligations: Vec<ObligationRecord>,
    deadlines: Vec<DeadlineRecord>,
    tasks: Vec<TaskRecord>,
    usage: Vec<UsageRecord>,
}

/// In-memory store for tests and examples.
#[derive(Default)]
pub struct MemoryStore {
    shelves: Mutex<Shelves>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn obligations(&self) -> Vec<ObligationRecord> {
        self.lock().obligations.clone()
    }

    pub fn deadlines(&self) -> Vec<DeadlineRecord> {
        self.lock().deadlines.clone()
    }

    pub fn tasks(&self) -> Vec<TaskRecord> {
        self.lock().tasks.clone()
    }

    pub fn usage(&self) -> Vec<UsageRecord> {
        self.lock().usage.clone()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Shelves> {
        self.shelves.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl RecordStore for MemoryStore {
    fn save_obligation(&self, record: &ObligationRecord) -> Result<Uuid, StoreError> {
        self.lock().obligations.push(record.clone());
        Ok(record.id)
    }

    fn save_deadline(&self, record: &DeadlineRecord) -> Result<Uuid, StoreError> {
        self.lock().deadlines.push(record.clone());
        Ok(record.id)
    }

    fn save_task(&self, record: &TaskRecord) -> Result<Uuid, StoreError> {
        self.lock().tasks.push(record.clone());
        Ok(record.id)
    }

    fn save_usage(&self, record: &UsageRecord) -> Result<Uuid, StoreError> {
        self.lock().usage.push(record.clone());
        Ok(record.id)
    }
}
