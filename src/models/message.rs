use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::enums::{Importance, LifeDomain};

/// A correspondence message (email or chat) awaiting or past analysis.
///
/// `processed_at` stays `None` until a pipeline run completes; a failed
/// invocation leaves the message untouched so it can be retried.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub id: Uuid,
    pub sender_name: Option<String>,
    pub sender_address: String,
    pub subject: Option<String>,
    pub body_text: Option<String>,
    pub body_html: Option<String>,
    pub received_at: DateTime<Utc>,
    pub life_domain: Option<LifeDomain>,
    pub importance: Option<Importance>,
    pub processed_at: Option<DateTime<Utc>>,
}

impl Message {
    /// Build an unprocessed message with a fresh id.
    pub fn new(sender_address: &str, received_at: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            sender_name: None,
            sender_address: sender_address.to_string(),
            subject: None,
            body_text: None,
            body_html: None,
            received_at,
            life_domain: None,
            importance: None,
            processed_at: None,
        }
    }

    /// Display name for prompt construction: sender name, else address.
    pub fn sender_display(&self) -> &str {
        self.sender_name.as_deref().unwrap_or(&self.sender_address)
    }

    /// Body for analysis: plain text preferred, HTML as fallback.
    pub fn analysis_body(&self) -> &str {
        self.body_text
            .as_deref()
            .or(self.body_html.as_deref())
            .unwrap_or("")
    }
}
