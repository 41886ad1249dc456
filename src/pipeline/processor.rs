//! Per-message orchestration: select model → invoke → derive → account.
//!
//! Each message's run is independent; the only shared state is the
//! read-only catalog and the append-only usage log, so runs may execute
//! concurrently with no ordering guarantees.

use uuid::Uuid;

use crate::accounting::UsageAccountant;
use crate::catalog::selector::select_model;
use crate::config::AnalysisSettings;
use crate::extraction::prompt::build_extraction_prompt;
use crate::extraction::provider::{CancelFlag, ExtractionProvider, InvocationError};
use crate::extraction::schema::{extraction_contract, ExtractionResult};
use crate::models::enums::{TaskComplexity, TaskType};
use crate::models::Message;

use super::derive::{apply_annotation, derive, DerivationOutcome};
use super::ProcessingError;

/// Everything one successful pipeline run produces.
#[derive(Debug, Clone)]
pub struct ProcessedMessage {
    /// The message with life-domain, importance, and `processed_at` applied.
    pub message: Message,
    pub extraction: ExtractionResult,
    pub outcome: DerivationOutcome,
    pub model_used: String,
}

/// Sequential per-message pipeline bound to one invocation provider.
pub struct MessageProcessor {
    provider: Box<dyn ExtractionProvider + Send + Sync>,
    accountant: UsageAccountant,
    settings: AnalysisSettings,
}

impl MessageProcessor {
    pub fn new(
        provider: Box<dyn ExtractionProvider + Send + Sync>,
        settings: AnalysisSettings,
    ) -> Self {
        Self {
            provider,
            accountant: UsageAccountant::new(),
            settings,
        }
    }

    pub fn accountant(&self) -> &UsageAccountant {
        &self.accountant
    }

    /// Run the full pipeline for one message.
    ///
    /// On invocation failure the message is left untouched (no stamp, no
    /// records) so the caller can retry the whole run later.
    pub fn process(
        &self,
        message: &Message,
        cancel: &CancelFlag,
    ) -> Result<ProcessedMessage, ProcessingError> {
        let _span =
            tracing::info_span!("process_message", message_id = %message.id).entered();

        let complexity = estimate_complexity(message);
        let task = task_type_for(complexity);
        let candidates = self.candidate_models(task, complexity);
        let prompt = build_extraction_prompt(message);
        let schema = extraction_contract();

        let mut last_error = InvocationError::Provider {
            status: 0,
            message: "no candidate models".into(),
        };

        let attempts = candidates.len();
        for (attempt, model) in candidates.iter().enumerate() {
            // Fresh id per attempt: usage is tied to the invocation, not
            // to pipeline re-entry.
            let invocation_id = Uuid::new_v4();

            match self.provider.extract(model, &prompt, &schema, cancel) {
                Ok(response) => {
                    self.accountant.record(
                        invocation_id,
                        model,
                        task,
                        complexity,
                        response.input_tokens,
                        response.output_tokens,
                        response.latency_ms,
                        Some(message.id),
                    );

                    let outcome = derive(message, &response.extraction);
                    let mut annotated = message.clone();
                    apply_annotation(&mut annotated, &outcome.annotation);

                    tracing::info!(
                        message_id = %message.id,
                        model,
                        attempt = attempt + 1,
                        "Message processed"
                    );

                    return Ok(ProcessedMessage {
                        message: annotated,
                        extraction: response.extraction,
                        outcome,
                        model_used: model.clone(),
                    });
                }
                Err(InvocationError::Cancelled) => {
                    // Nothing billed for certain; no usage record.
                    tracing::info!(message_id = %message.id, "Extraction cancelled");
                    return Err(InvocationError::Cancelled.into());
                }
                Err(e) => {
                    // The attempt happened; account for it at zero cost.
                    self.accountant.record(
                        invocation_id,
                        model,
                        task,
                        complexity,
                        0,
                        0,
                        0,
                        Some(message.id),
                    );

                    if e.is_retryable() && attempt + 1 < attempts {
                        tracing::warn!(
                            message_id = %message.id,
                            model,
                            error = %e,
                            "Invocation failed, trying fallback model"
                        );
                        last_error = e;
                        continue;
                    }
                    return Err(e.into());
                }
            }
        }

        Err(last_error.into())
    }

    /// Candidate model names in invocation order: the override when pinned,
    /// else the selector's choice plus fallbacks (same-provider only unless
    /// cross-provider fallback is enabled).
    fn candidate_models(&self, task: TaskType, complexity: TaskComplexity) -> Vec<String> {
        if let Some(name) = &self.settings.model_override {
            return vec![name.clone()];
        }

        let selection = select_model(task, complexity, self.settings.budget_mode);
        let mut models = vec![selection.chosen.name.to_string()];
        for fallback in &selection.fallbacks {
            if self.settings.cross_provider_enabled
                || fallback.provider == selection.chosen.provider
            {
                models.push(fallback.name.to_string());
            }
        }
        models
    }
}

/// Rough complexity estimate from message length.
pub fn estimate_complexity(message: &Message) -> TaskComplexity {
    match message.analysis_body().len() {
        0..=400 => TaskComplexity::Simple,
        401..=2000 => TaskComplexity::Medium,
        2001..=8000 => TaskComplexity::Complex,
        _ => TaskComplexity::VeryComplex,
    }
}

fn task_type_for(complexity: TaskComplexity) -> TaskType {
    if complexity >= TaskComplexity::Complex {
        TaskType::ComplexAnalysis
    } else {
        TaskType::SimpleExtraction
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extraction::ollama::MockProvider;
    use crate::extraction::schema::{
        Classification, ConfidenceReport, ExtractedObligation, ExtractionResult,
    };
    use chrono::{TimeZone, Utc};

    fn message() -> Message {
        let mut msg = Message::new(
            "sender@example.com",
            Utc.with_ymd_and_hms(2026, 2, 10, 9, 0, 0).unwrap(),
        );
        msg.body_text = Some("Please renew your passport before June.".into());
        msg
    }

    fn extraction() -> ExtractionResult {
        ExtractionResult {
            classification: Classification {
                message_kind: "request".into(),
                life_domain: "administrative".into(),
                importance: "high".into(),
                requires_response: false,
            },
            obligations: vec![ExtractedObligation {
                action: "Renew passport".into(),
                trigger: "date:2026-06-01".into(),
                mandatory: true,
                consequence: None,
                estimated_time: None,
                priority: 1,
            }],
            confidence: ConfidenceReport {
                confidence_score: 0.9,
                uncertain_fields: vec![],
                needs_review: false,
            },
            ..Default::default()
        }
    }

    fn processor_with(provider: MockProvider) -> MessageProcessor {
        MessageProcessor::new(Box::new(provider), AnalysisSettings::default())
    }

    #[test]
    fn successful_run_derives_and_accounts_once() {
        let processor = processor_with(MockProvider::new().then_ok(extraction(), 1200, 400));
        let processed = processor.process(&message(), &CancelFlag::new()).unwrap();

        assert_eq!(processed.outcome.obligations.len(), 1);
        assert_eq!(processed.outcome.tasks.len(), 1);
        assert!(processed.message.processed_at.is_some());

        let usage = processor.accountant().records();
        assert_eq!(usage.len(), 1);
        assert_eq!(usage[0].input_tokens, 1200);
        assert_eq!(usage[0].analysis_id, Some(processed.message.id));
    }

    #[test]
    fn retryable_failure_falls_back_and_accounts_every_attempt() {
        let provider = MockProvider::new()
            .then_err(InvocationError::RateLimited)
            .then_ok(extraction(), 1000, 300);
        let processor = processor_with(provider);

        let processed = processor.process(&message(), &CancelFlag::new()).unwrap();
        assert!(!processed.model_used.is_empty());

        let usage = processor.accountant().records();
        assert_eq!(usage.len(), 2);
        // Failed attempt billed at zero.
        assert_eq!(usage[0].input_tokens, 0);
        assert_eq!(usage[0].cost_usd, 0.0);
        // Two distinct invocation ids.
        assert_ne!(usage[0].invocation_id, usage[1].invocation_id);
    }

    #[test]
    fn timeout_aborts_without_fallback() {
        let provider = MockProvider::new()
            .then_err(InvocationError::Timeout { secs: 300 })
            .then_ok(extraction(), 1, 1);
        let processor = processor_with(provider);

        let result = processor.process(&message(), &CancelFlag::new());
        assert!(matches!(
            result,
            Err(ProcessingError::Invocation(InvocationError::Timeout { .. }))
        ));
        // Only the timed-out attempt was accounted.
        assert_eq!(processor.accountant().records().len(), 1);
    }

    #[test]
    fn schema_violation_aborts_without_fallback() {
        let provider = MockProvider::new()
            .then_err(InvocationError::SchemaViolation("missing 'storage'".into()))
            .then_ok(extraction(), 1, 1);
        let processor = processor_with(provider);

        let result = processor.process(&message(), &CancelFlag::new());
        assert!(matches!(
            result,
            Err(ProcessingError::Invocation(InvocationError::SchemaViolation(_)))
        ));
    }

    #[test]
    fn cancellation_leaves_no_usage_record() {
        let provider = MockProvider::new().then_ok(extraction(), 1, 1);
        let processor = processor_with(provider);
        let cancel = CancelFlag::new();
        cancel.cancel();

        let result = processor.process(&message(), &cancel);
        assert!(matches!(
            result,
            Err(ProcessingError::Invocation(InvocationError::Cancelled))
        ));
        assert!(processor.accountant().records().is_empty());
    }

    #[test]
    fn exhausted_fallbacks_return_last_error() {
        let provider = MockProvider::new()
            .then_err(InvocationError::RateLimited)
            .then_err(InvocationError::RateLimited)
            .then_err(InvocationError::RateLimited)
            .then_err(InvocationError::RateLimited);
        let processor = processor_with(provider);

        let result = processor.process(&message(), &CancelFlag::new());
        assert!(result.is_err());
        // Every attempt was accounted exactly once.
        let usage = processor.accountant().records();
        assert!(!usage.is_empty());
        let mut ids: Vec<_> = usage.iter().map(|u| u.invocation_id).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), usage.len());
    }

    #[test]
    fn model_override_bypasses_selection() {
        let provider = MockProvider::new().then_ok(extraction(), 1, 1);
        let settings = AnalysisSettings {
            model_override: Some("my-pinned-model".into()),
            ..Default::default()
        };
        let processor = MessageProcessor::new(Box::new(provider), settings);

        let processed = processor.process(&message(), &CancelFlag::new()).unwrap();
        assert_eq!(processed.model_used, "my-pinned-model");
    }

    #[test]
    fn override_has_no_fallbacks() {
        let provider = MockProvider::new()
            .then_err(InvocationError::RateLimited)
            .then_ok(extraction(), 1, 1);
        let settings = AnalysisSettings {
            model_override: Some("my-pinned-model".into()),
            ..Default::default()
        };
        let processor = MessageProcessor::new(Box::new(provider), settings);

        let result = processor.process(&message(), &CancelFlag::new());
        assert!(result.is_err());
    }

    #[test]
    fn complexity_scales_with_body_length() {
        let mut msg = message();
        msg.body_text = Some("hi".into());
        assert_eq!(estimate_complexity(&msg), TaskComplexity::Simple);
        msg.body_text = Some("x".repeat(1000));
        assert_eq!(estimate_complexity(&msg), TaskComplexity::Medium);
        msg.body_text = Some("x".repeat(5000));
        assert_eq!(estimate_complexity(&msg), TaskComplexity::Complex);
        msg.body_text = Some("x".repeat(10_000));
        assert_eq!(estimate_complexity(&msg), TaskComplexity::VeryComplex);
    }

    #[test]
    fn failed_run_does_not_stamp_message() {
        let provider = MockProvider::new().then_err(InvocationError::Timeout { secs: 10 });
        let processor = processor_with(provider);
        let msg = message();

        let _ = processor.process(&msg, &CancelFlag::new());
        // Caller's message is untouched; only a successful run returns an
        // annotated copy.
        assert!(msg.processed_at.is_none());
    }
}
