//! The eight-section extraction schema every invocation capability must fill.
//!
//! Field values stay close to the wire (raw strings for dates, domains,
//! trigger expressions); the derivation pipeline owns their interpretation.

use serde::{Deserialize, Serialize};

/// Top-level section keys, in schema order. All eight are mandatory on a
/// well-formed result; sub-collections may be empty but never absent.
pub const REQUIRED_SECTIONS: &[&str] = &[
    "classification",
    "key_entities",
    "obligations",
    "deadlines",
    "financial_significance",
    "attachments",
    "storage",
    "confidence",
];

/// Complete result of analyzing one message.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExtractionResult {
    pub classification: Classification,
    pub key_entities: KeyEntities,
    pub obligations: Vec<ExtractedObligation>,
    pub deadlines: ExtractedDeadlines,
    pub financial_significance: FinancialSignificance,
    pub attachments: Vec<ExtractedAttachment>,
    pub storage: StorageAdvice,
    pub confidence: ConfidenceReport,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Classification {
    /// What kind of message this is, e.g. "request", "notification", "statement".
    pub message_kind: String,
    /// Raw life-domain string; typed by the pipeline.
    pub life_domain: String,
    /// Raw importance string; typed by the pipeline.
    pub importance: String,
    pub requires_response: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct KeyEntities {
    pub people: Vec<String>,
    pub organizations: Vec<String>,
    pub amounts: Vec<String>,
    pub dates: Vec<String>,
    pub locations: Vec<String>,
    pub reference_numbers: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractedObligation {
    pub action: String,
    /// `"immediate"`, `"date:<ISO date>"`, or `"event:<description>"`.
    pub trigger: String,
    pub mandatory: bool,
    pub consequence: Option<String>,
    /// Free text like "30 minutes" or "2 hours".
    pub estimated_time: Option<String>,
    /// 1 is highest, 5 lowest.
    pub priority: u8,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExtractedDeadlines {
    pub absolute: Vec<AbsoluteDeadline>,
    pub relative: Vec<RelativeDeadline>,
    pub recurring: Vec<RecurringDeadline>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AbsoluteDeadline {
    pub date: String,
    pub description: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RelativeDeadline {
    pub trigger_event: String,
    /// Window like "45 days" or "2 weeks".
    pub window: String,
    pub description: String,
    pub critical: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecurringDeadline {
    /// Recurrence description, e.g. "every first Monday of the month".
    pub pattern: String,
    pub description: String,
    pub critical: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FinancialSignificance {
    pub has_financial_impact: bool,
    pub amount: Option<f64>,
    pub currency: Option<String>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractedAttachment {
    pub filename: Option<String>,
    pub description: String,
    pub action_required: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StorageAdvice {
    /// Raw retention suggestion: "keep", "archive", or "discard".
    pub retention: String,
    pub suggested_folder: Option<String>,
    pub keywords: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConfidenceReport {
    /// Overall extraction confidence, 0.00–1.00.
    pub confidence_score: f32,
    pub uncertain_fields: Vec<String>,
    pub needs_review: bool,
}

/// Machine-checkable description of the output contract, handed to the
/// invocation capability to constrain or validate the model's answer.
#[derive(Debug, Clone, Serialize)]
pub struct SchemaDescriptor {
    pub required_sections: &'static [&'static str],
    pub json_template: &'static str,
}

/// The JSON shape requested from the model, embedded verbatim in the prompt.
pub const JSON_TEMPLATE: &str = r#"{
  "classification": {
    "message_kind": "request | notification | statement | reminder | other",
    "life_domain": "work | finance | health | legal | housing | family | administrative | social | other",
    "importance": "low | normal | high | critical",
    "requires_response": false
  },
  "key_entities": {
    "people": ["name"],
    "organizations": ["name"],
    "amounts": ["amount as written"],
    "dates": ["date as written"],
    "locations": ["place"],
    "reference_numbers": ["invoice/case/contract number"]
  },
  "obligations": [
    {
      "action": "what the recipient must do",
      "trigger": "immediate | date:YYYY-MM-DD | event:<description>",
      "mandatory": true,
      "consequence": "what happens if ignored, or null",
      "estimated_time": "e.g. 30 minutes, 2 hours, or null",
      "priority": 3
    }
  ],
  "deadlines": {
    "absolute": [
      {"date": "YYYY-MM-DD", "description": "what is due"}
    ],
    "relative": [
      {"trigger_event": "event anchoring the window", "window": "e.g. 45 days", "description": "what is due", "critical": false}
    ],
    "recurring": [
      {"pattern": "recurrence as written", "description": "what recurs", "critical": false}
    ]
  },
  "financial_significance": {
    "has_financial_impact": false,
    "amount": null,
    "currency": null,
    "notes": null
  },
  "attachments": [
    {"filename": "name or null", "description": "what it is", "action_required": false}
  ],
  "storage": {
    "retention": "keep | archive | discard",
    "suggested_folder": "folder name or null",
    "keywords": ["search keyword"]
  },
  "confidence": {
    "confidence_score": 0.0,
    "uncertain_fields": ["field names you are unsure about"],
    "needs_review": false
  }
}"#;

/// The contract any invocation capability must satisfy.
pub fn extraction_contract() -> SchemaDescriptor {
    SchemaDescriptor {
        required_sections: REQUIRED_SECTIONS,
        json_template: JSON_TEMPLATE,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn contract_lists_eight_sections() {
        let descriptor = extraction_contract();
        assert_eq!(descriptor.required_sections.len(), 8);
    }

    #[test]
    fn template_is_valid_json() {
        let value: serde_json::Value = serde_json::from_str(JSON_TEMPLATE).unwrap();
        for section in REQUIRED_SECTIONS {
            assert!(value.get(section).is_some(), "template missing {section}");
        }
    }

    #[test]
    fn template_covers_only_required_sections() {
        let value: serde_json::Value = serde_json::from_str(JSON_TEMPLATE).unwrap();
        let keys = value.as_object().unwrap();
        assert_eq!(keys.len(), REQUIRED_SECTIONS.len());
    }

    #[test]
    fn result_round_trips_through_serde() {
        let result = ExtractionResult {
            classification: Classification {
                message_kind: "request".into(),
                life_domain: "finance".into(),
                importance: "high".into(),
                requires_response: true,
            },
            key_entities: KeyEntities::default(),
            obligations: vec![ExtractedObligation {
                action: "Pay invoice".into(),
                trigger: "date:2026-03-01".into(),
                mandatory: true,
                consequence: Some("Late fee".into()),
                estimated_time: Some("15 minutes".into()),
                priority: 2,
            }],
            deadlines: ExtractedDeadlines::default(),
            financial_significance: FinancialSignificance::default(),
            attachments: vec![],
            storage: StorageAdvice::default(),
            confidence: ConfidenceReport {
                confidence_score: 0.9,
                uncertain_fields: vec![],
                needs_review: false,
            },
        };
        let json = serde_json::to_string(&result).unwrap();
        let back: ExtractionResult = serde_json::from_str(&json).unwrap();
        assert_eq!(back.obligations[0].action, "Pay invoice");
        assert!((back.confidence.confidence_score - 0.9).abs() < f32::EPSILON);
    }
}
