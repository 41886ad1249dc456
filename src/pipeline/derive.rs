//! Derivation: map one completed extraction into domain records.
//!
//! Item-level parse failures are deliberately lossy (dropped or left null);
//! structural validity is guaranteed by the typed [`ExtractionResult`], so a
//! derivation run always succeeds atomically and returns all four outputs.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::extraction::schema::ExtractionResult;
use crate::models::enums::{
    DeadlineKind, DeadlineStatus, Importance, LifeDomain, ObligationStatus, TaskStatus,
    TriggerType,
};
use crate::models::{DeadlineRecord, Message, ObligationRecord, TaskRecord};

use super::classify::{classify_importance, classify_life_domain};
use super::triggers::{
    classify_trigger, parse_estimated_minutes, parse_permissive_date, parse_relative_days,
    trigger_date,
};

/// Minimum overall extraction confidence for auto-creating a task from a
/// mandatory obligation.
pub const AUTO_TASK_CONFIDENCE: f32 = 0.85;

/// Life-domain/importance annotation applied to the source message.
#[derive(Debug, Clone)]
pub struct MessageAnnotation {
    pub life_domain: LifeDomain,
    pub importance: Importance,
    pub processed_at: DateTime<Utc>,
}

/// Everything one derivation run produces.
#[derive(Debug, Clone)]
pub struct DerivationOutcome {
    pub obligations: Vec<ObligationRecord>,
    pub deadlines: Vec<DeadlineRecord>,
    pub tasks: Vec<TaskRecord>,
    pub annotation: MessageAnnotation,
}

/// Derive obligation, deadline, and task records from one extraction.
pub fn derive(message: &Message, extraction: &ExtractionResult) -> DerivationOutcome {
    let now = Utc::now();
    let confidence = extraction.confidence.confidence_score;
    let importance = classify_importance(&extraction.classification.importance);

    let obligations = derive_obligations(message.id, extraction, confidence, now);
    let deadlines = derive_deadlines(message.id, extraction, importance, now);
    let tasks = derive_tasks(message.id, &obligations, confidence, now);

    tracing::debug!(
        message_id = %message.id,
        obligations = obligations.len(),
        deadlines = deadlines.len(),
        tasks = tasks.len(),
        confidence,
        "Derivation complete"
    );

    DerivationOutcome {
        obligations,
        deadlines,
        tasks,
        annotation: MessageAnnotation {
            life_domain: classify_life_domain(&extraction.classification.life_domain),
            importance,
            processed_at: now,
        },
    }
}

/// Write the annotation back onto the message.
pub fn apply_annotation(message: &mut Message, annotation: &MessageAnnotation) {
    message.life_domain = Some(annotation.life_domain);
    message.importance = Some(annotation.importance);
    message.processed_at = Some(annotation.processed_at);
}

fn derive_obligations(
    message_id: Uuid,
    extraction: &ExtractionResult,
    confidence: f32,
    now: DateTime<Utc>,
) -> Vec<ObligationRecord> {
    extraction
        .obligations
        .iter()
        .map(|item| ObligationRecord {
            id: Uuid::new_v4(),
            message_id,
            action: item.action.clone(),
            trigger_type: classify_trigger(&item.trigger),
            trigger_value: Some(item.trigger.clone()),
            mandatory: item.mandatory,
            consequence: item.consequence.clone(),
            estimated_minutes: item
                .estimated_time
                .as_deref()
                .and_then(parse_estimated_minutes),
            priority: item.priority.clamp(1, 5),
            confidence,
            status: ObligationStatus::Pending,
            created_at: now,
        })
        .collect()
}

fn derive_deadlines(
    message_id: Uuid,
    extraction: &ExtractionResult,
    importance: Importance,
    now: DateTime<Utc>,
) -> Vec<DeadlineRecord> {
    let mut records = Vec::new();

    for item in &extraction.deadlines.absolute {
        // Unparseable dates are dropped, siblings still processed.
        let Some(date) = parse_permissive_date(&item.date) else {
            tracing::debug!(
                message_id = %message_id,
                raw = item.date.as_str(),
                "Dropping absolute deadline with unparseable date"
            );
            continue;
        };
        records.push(DeadlineRecord {
            id: Uuid::new_v4(),
            message_id,
            kind: DeadlineKind::Absolute,
            date: Some(date),
            trigger_event: None,
            duration_days: None,
            description: item.description.clone(),
            critical: importance == Importance::Critical,
            status: DeadlineStatus::Active,
            obligation_id: None,
            created_at: now,
        });
    }

    for item in &extraction.deadlines.relative {
        records.push(DeadlineRecord {
            id: Uuid::new_v4(),
            message_id,
            kind: DeadlineKind::Relative,
            date: None,
            trigger_event: Some(item.trigger_event.clone()),
            duration_days: parse_relative_days(&item.window),
            description: item.description.clone(),
            critical: item.critical,
            status: DeadlineStatus::Active,
            obligation_id: None,
            created_at: now,
        });
    }

    for item in &extraction.deadlines.recurring {
        records.push(DeadlineRecord {
            id: Uuid::new_v4(),
            message_id,
            kind: DeadlineKind::Recurring,
            date: None,
            trigger_event: Some(item.pattern.clone()),
            duration_days: None,
            description: item.description.clone(),
            critical: item.critical,
            status: DeadlineStatus::Active,
            obligation_id: None,
            created_at: now,
        });
    }

    records
}

fn derive_tasks(
    message_id: Uuid,
    obligations: &[ObligationRecord],
    confidence: f32,
    now: DateTime<Utc>,
) -> Vec<TaskRecord> {
    if confidence < AUTO_TASK_CONFIDENCE {
        return Vec::new();
    }

    obligations
        .iter()
        .filter(|o| o.mandatory)
        .map(|o| TaskRecord {
            id: Uuid::new_v4(),
            message_id,
            obligation_id: o.id,
            title: o.action.clone(),
            description: o.consequence.clone(),
            due_date: match o.trigger_type {
                TriggerType::Date => o.trigger_value.as_deref().and_then(trigger_date),
                _ => None,
            },
            priority: o.priority,
            status: TaskStatus::Pending,
            created_at: now,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extraction::schema::{
        AbsoluteDeadline, Classification, ConfidenceReport, ExtractedObligation,
        RecurringDeadline, RelativeDeadline,
    };
    use chrono::{NaiveDate, TimeZone};

    fn message() -> Message {
        Message::new(
            "sender@example.com",
            Utc.with_ymd_and_hms(2026, 2, 10, 9, 0, 0).unwrap(),
        )
    }

    fn extraction_with_confidence(score: f32) -> ExtractionResult {
        ExtractionResult {
            classification: Classification {
                message_kind: "request".into(),
                life_domain: "finance".into(),
                importance: "high".into(),
                requires_response: true,
            },
            confidence: ConfidenceReport {
                confidence_score: score,
                uncertain_fields: vec![],
                needs_review: false,
            },
            ..Default::default()
        }
    }

    fn obligation(action: &str, trigger: &str, mandatory: bool, priority: u8) -> ExtractedObligation {
        ExtractedObligation {
            action: action.into(),
            trigger: trigger.into(),
            mandatory,
            consequence: Some("it lapses".into()),
            estimated_time: None,
            priority,
        }
    }

    // ── Obligation derivation ────────────────────────────────────────

    #[test]
    fn obligation_inherits_overall_confidence() {
        let mut extraction = extraction_with_confidence(0.77);
        extraction.obligations.push(obligation("Reply", "immediate", false, 3));
        let outcome = derive(&message(), &extraction);
        assert!((outcome.obligations[0].confidence - 0.77).abs() < f32::EPSILON);
    }

    #[test]
    fn obligation_trigger_classification_and_raw_value() {
        let mut extraction = extraction_with_confidence(0.5);
        extraction.obligations.push(obligation("A", "date:2026-03-01", true, 1));
        extraction.obligations.push(obligation("B", "event:after move", true, 2));
        extraction.obligations.push(obligation("C", "whenever", true, 3));
        let outcome = derive(&message(), &extraction);

        assert_eq!(outcome.obligations[0].trigger_type, TriggerType::Date);
        assert_eq!(
            outcome.obligations[0].trigger_value.as_deref(),
            Some("date:2026-03-01")
        );
        assert_eq!(outcome.obligations[1].trigger_type, TriggerType::Event);
        assert_eq!(outcome.obligations[2].trigger_type, TriggerType::Immediate);
    }

    #[test]
    fn obligation_duration_heuristics() {
        let mut extraction = extraction_with_confidence(0.5);
        let mut with_minutes = obligation("A", "immediate", false, 3);
        with_minutes.estimated_time = Some("45 minutes".into());
        let mut with_hours = obligation("B", "immediate", false, 3);
        with_hours.estimated_time = Some("2 hours".into());
        let mut vague = obligation("C", "immediate", false, 3);
        vague.estimated_time = Some("a while".into());
        extraction.obligations.extend([with_minutes, with_hours, vague]);

        let outcome = derive(&message(), &extraction);
        assert_eq!(outcome.obligations[0].estimated_minutes, Some(45));
        assert_eq!(outcome.obligations[1].estimated_minutes, Some(120));
        assert_eq!(outcome.obligations[2].estimated_minutes, None);
    }

    #[test]
    fn obligation_priority_is_clamped() {
        let mut extraction = extraction_with_confidence(0.5);
        extraction.obligations.push(obligation("A", "immediate", false, 0));
        extraction.obligations.push(obligation("B", "immediate", false, 9));
        let outcome = derive(&message(), &extraction);
        assert_eq!(outcome.obligations[0].priority, 1);
        assert_eq!(outcome.obligations[1].priority, 5);
    }

    #[test]
    fn obligations_start_pending() {
        let mut extraction = extraction_with_confidence(0.9);
        extraction.obligations.push(obligation("A", "immediate", true, 3));
        let outcome = derive(&message(), &extraction);
        assert_eq!(outcome.obligations[0].status, ObligationStatus::Pending);
    }

    // ── Deadline derivation ──────────────────────────────────────────

    #[test]
    fn absolute_deadline_parses_and_unparseable_sibling_is_dropped() {
        let mut extraction = extraction_with_confidence(0.9);
        extraction.deadlines.absolute.push(AbsoluteDeadline {
            date: "sometime soon".into(),
            description: "vague".into(),
        });
        extraction.deadlines.absolute.push(AbsoluteDeadline {
            date: "2026-04-15".into(),
            description: "tax filing".into(),
        });

        let outcome = derive(&message(), &extraction);
        assert_eq!(outcome.deadlines.len(), 1);
        assert_eq!(outcome.deadlines[0].description, "tax filing");
        assert_eq!(
            outcome.deadlines[0].date,
            Some(NaiveDate::from_ymd_opt(2026, 4, 15).unwrap())
        );
        assert_eq!(outcome.deadlines[0].kind, DeadlineKind::Absolute);
        assert!(outcome.deadlines[0].trigger_event.is_none());
        assert!(outcome.deadlines[0].duration_days.is_none());
    }

    #[test]
    fn absolute_deadline_critical_follows_classification_importance() {
        let mut extraction = extraction_with_confidence(0.9);
        extraction.classification.importance = "critical".into();
        extraction.deadlines.absolute.push(AbsoluteDeadline {
            date: "2026-04-15".into(),
            description: "court filing".into(),
        });
        let outcome = derive(&message(), &extraction);
        assert!(outcome.deadlines[0].critical);

        let mut extraction = extraction_with_confidence(0.9);
        extraction.classification.importance = "high".into();
        extraction.deadlines.absolute.push(AbsoluteDeadline {
            date: "2026-04-15".into(),
            description: "reminder".into(),
        });
        let outcome = derive(&message(), &extraction);
        assert!(!outcome.deadlines[0].critical);
    }

    #[test]
    fn relative_deadline_durations() {
        let mut extraction = extraction_with_confidence(0.9);
        extraction.deadlines.relative.push(RelativeDeadline {
            trigger_event: "contract signature".into(),
            window: "45 days".into(),
            description: "cancellation window".into(),
            critical: true,
        });
        extraction.deadlines.relative.push(RelativeDeadline {
            trigger_event: "delivery".into(),
            window: "2 weeks".into(),
            description: "return window".into(),
            critical: false,
        });

        let outcome = derive(&message(), &extraction);
        assert_eq!(outcome.deadlines[0].duration_days, Some(45));
        assert!(outcome.deadlines[0].critical);
        assert_eq!(outcome.deadlines[1].duration_days, Some(14));
        assert!(!outcome.deadlines[1].critical);
        assert_eq!(outcome.deadlines[0].kind, DeadlineKind::Relative);
        assert!(outcome.deadlines[0].date.is_none());
    }

    #[test]
    fn relative_deadline_unknown_unit_keeps_record_with_null_duration() {
        let mut extraction = extraction_with_confidence(0.9);
        extraction.deadlines.relative.push(RelativeDeadline {
            trigger_event: "the ceremony".into(),
            window: "3 sparkles".into(),
            description: "glitter cleanup".into(),
            critical: false,
        });
        let outcome = derive(&message(), &extraction);
        assert_eq!(outcome.deadlines.len(), 1);
        assert_eq!(outcome.deadlines[0].duration_days, None);
        assert_eq!(
            outcome.deadlines[0].trigger_event.as_deref(),
            Some("the ceremony")
        );
        assert_eq!(outcome.deadlines[0].description, "glitter cleanup");
    }

    #[test]
    fn recurring_deadline_preserves_pattern() {
        let mut extraction = extraction_with_confidence(0.9);
        extraction.deadlines.recurring.push(RecurringDeadline {
            pattern: "every first Monday".into(),
            description: "submit timesheet".into(),
            critical: false,
        });
        let outcome = derive(&message(), &extraction);
        assert_eq!(outcome.deadlines[0].kind, DeadlineKind::Recurring);
        assert_eq!(
            outcome.deadlines[0].trigger_event.as_deref(),
            Some("every first Monday")
        );
        assert!(outcome.deadlines[0].date.is_none());
        assert!(outcome.deadlines[0].duration_days.is_none());
    }

    #[test]
    fn deadlines_start_active() {
        let mut extraction = extraction_with_confidence(0.9);
        extraction.deadlines.absolute.push(AbsoluteDeadline {
            date: "2026-04-15".into(),
            description: "x".into(),
        });
        let outcome = derive(&message(), &extraction);
        assert_eq!(outcome.deadlines[0].status, DeadlineStatus::Active);
    }

    // ── Task auto-creation ───────────────────────────────────────────

    #[test]
    fn task_created_at_exact_threshold() {
        let mut extraction = extraction_with_confidence(0.85);
        extraction.obligations.push(obligation("Renew", "immediate", true, 2));
        let outcome = derive(&message(), &extraction);
        assert_eq!(outcome.tasks.len(), 1);
    }

    #[test]
    fn no_task_just_below_threshold() {
        let mut extraction = extraction_with_confidence(0.84999);
        extraction.obligations.push(obligation("Renew", "immediate", true, 2));
        let outcome = derive(&message(), &extraction);
        assert!(outcome.tasks.is_empty());
    }

    #[test]
    fn no_task_for_optional_obligation() {
        let mut extraction = extraction_with_confidence(0.95);
        extraction.obligations.push(obligation("Consider upgrade", "immediate", false, 4));
        let outcome = derive(&message(), &extraction);
        assert!(outcome.tasks.is_empty());
    }

    #[test]
    fn task_due_date_only_for_date_triggers() {
        let mut extraction = extraction_with_confidence(0.9);
        extraction.obligations.push(obligation("A", "date:2026-03-01", true, 1));
        extraction.obligations.push(obligation("B", "event:after move", true, 2));
        let outcome = derive(&message(), &extraction);

        assert_eq!(
            outcome.tasks[0].due_date,
            Some(NaiveDate::from_ymd_opt(2026, 3, 1).unwrap())
        );
        assert!(outcome.tasks[1].due_date.is_none());
    }

    #[test]
    fn task_copies_title_description_priority_and_links_obligation() {
        let mut extraction = extraction_with_confidence(0.9);
        extraction.obligations.push(obligation("Renew passport", "date:2026-06-01", true, 1));
        let outcome = derive(&message(), &extraction);

        let task = &outcome.tasks[0];
        assert_eq!(task.title, "Renew passport");
        assert_eq!(task.description.as_deref(), Some("it lapses"));
        assert_eq!(task.priority, 1);
        assert_eq!(task.obligation_id, outcome.obligations[0].id);
        assert_eq!(task.status, TaskStatus::Pending);
    }

    // ── Annotation & round trip ──────────────────────────────────────

    #[test]
    fn empty_extraction_yields_empty_collections_but_still_annotates() {
        let extraction = extraction_with_confidence(0.9);
        let outcome = derive(&message(), &extraction);
        assert!(outcome.obligations.is_empty());
        assert!(outcome.deadlines.is_empty());
        assert!(outcome.tasks.is_empty());
        assert_eq!(outcome.annotation.life_domain, LifeDomain::Finance);
        assert_eq!(outcome.annotation.importance, Importance::High);
    }

    #[test]
    fn apply_annotation_stamps_message() {
        let mut msg = message();
        let extraction = extraction_with_confidence(0.9);
        let outcome = derive(&msg, &extraction);
        apply_annotation(&mut msg, &outcome.annotation);
        assert_eq!(msg.life_domain, Some(LifeDomain::Finance));
        assert_eq!(msg.importance, Some(Importance::High));
        assert!(msg.processed_at.is_some());
    }

    // ── End-to-end scenario from the product brief ───────────────────

    #[test]
    fn renew_passport_scenario() {
        let mut extraction = extraction_with_confidence(0.9);
        extraction.obligations.push(ExtractedObligation {
            action: "Renew passport".into(),
            trigger: "date:2026-06-01".into(),
            mandatory: true,
            consequence: None,
            estimated_time: None,
            priority: 1,
        });

        let outcome = derive(&message(), &extraction);

        assert_eq!(outcome.obligations.len(), 1);
        assert_eq!(outcome.obligations[0].trigger_type, TriggerType::Date);
        assert!(outcome.deadlines.is_empty());
        assert_eq!(outcome.tasks.len(), 1);
        assert_eq!(outcome.tasks[0].title, "Renew passport");
        assert_eq!(
            outcome.tasks[0].due_date,
            Some(NaiveDate::from_ymd_opt(2026, 6, 1).unwrap())
        );
        assert_eq!(outcome.tasks[0].priority, 1);
    }
}
