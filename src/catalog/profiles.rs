//! Static model catalog: load once, never mutate, safe for concurrent read.
//!
//! Pricing is per million tokens in USD. Latency figures are coarse
//! averages used only for relative comparison, not SLAs.

use serde::Serialize;

use crate::models::enums::TaskType;

// ──────────────────────────────────────────────
// Types
// ──────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Provider {
    OpenAi,
    Anthropic,
    Google,
    Mistral,
    Ollama,
}

impl Provider {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::OpenAi => "openai",
            Self::Anthropic => "anthropic",
            Self::Google => "google",
            Self::Mistral => "mistral",
            Self::Ollama => "ollama",
        }
    }
}

/// One immutable catalog entry describing a model's cost/quality envelope.
#[derive(Debug, Clone, Serialize)]
pub struct ModelProfile {
    pub name: &'static str,
    pub provider: Provider,
    pub input_cost_per_1m: f64,
    pub output_cost_per_1m: f64,
    pub avg_latency_ms: u32,
    /// Ordinal output quality, 1 (worst) to 5 (best).
    pub quality_tier: u8,
    pub task_affinity: &'static [TaskType],
    pub max_context_tokens: u32,
}

impl ModelProfile {
    pub fn suits(&self, task: TaskType) -> bool {
        self.task_affinity.contains(&task)
    }

    /// Cost of one invocation in USD, linear in token counts.
    pub fn cost(&self, input_tokens: u64, output_tokens: u64) -> f64 {
        input_tokens as f64 / 1_000_000.0 * self.input_cost_per_1m
            + output_tokens as f64 / 1_000_000.0 * self.output_cost_per_1m
    }
}

// ──────────────────────────────────────────────
// Catalog
// ──────────────────────────────────────────────

use TaskType::*;

/// The process-wide model table. Defined once, never mutated.
pub static MODEL_CATALOG: &[ModelProfile] = &[
    ModelProfile {
        name: "claude-sonnet-4",
        provider: Provider::Anthropic,
        input_cost_per_1m: 3.00,
        output_cost_per_1m: 15.00,
        avg_latency_ms: 1400,
        quality_tier: 5,
        task_affinity: &[ComplexAnalysis, MultiStepReasoning, Summarization],
        max_context_tokens: 200_000,
    },
    ModelProfile {
        name: "gpt-4o",
        provider: Provider::OpenAi,
        input_cost_per_1m: 2.50,
        output_cost_per_1m: 10.00,
        avg_latency_ms: 1200,
        quality_tier: 4,
        task_affinity: &[ComplexAnalysis, MultiStepReasoning, Summarization, GeneralChat],
        max_context_tokens: 128_000,
    },
    ModelProfile {
        name: "gemini-2.5-pro",
        provider: Provider::Google,
        input_cost_per_1m: 1.25,
        output_cost_per_1m: 10.00,
        avg_latency_ms: 1600,
        quality_tier: 4,
        task_affinity: &[ComplexAnalysis, MultiStepReasoning, Summarization],
        max_context_tokens: 1_000_000,
    },
    ModelProfile {
        name: "gpt-4o-mini",
        provider: Provider::OpenAi,
        input_cost_per_1m: 0.15,
        output_cost_per_1m: 0.60,
        avg_latency_ms: 600,
        quality_tier: 3,
        task_affinity: &[SimpleExtraction, Classification, Summarization, GeneralChat],
        max_context_tokens: 128_000,
    },
    ModelProfile {
        name: "claude-haiku-3.5",
        provider: Provider::Anthropic,
        input_cost_per_1m: 0.80,
        output_cost_per_1m: 4.00,
        avg_latency_ms: 500,
        quality_tier: 3,
        task_affinity: &[SimpleExtraction, Classification, GeneralChat],
        max_context_tokens: 200_000,
    },
    ModelProfile {
        name: "gemini-2.0-flash",
        provider: Provider::Google,
        input_cost_per_1m: 0.10,
        output_cost_per_1m: 0.40,
        avg_latency_ms: 400,
        quality_tier: 3,
        task_affinity: &[SimpleExtraction, Classification, Summarization],
        max_context_tokens: 1_000_000,
    },
    ModelProfile {
        name: "mistral-small",
        provider: Provider::Mistral,
        input_cost_per_1m: 0.20,
        output_cost_per_1m: 0.60,
        avg_latency_ms: 450,
        quality_tier: 2,
        task_affinity: &[Classification, SimpleExtraction, GeneralChat],
        max_context_tokens: 32_000,
    },
    ModelProfile {
        name: "llama3.3:70b",
        provider: Provider::Ollama,
        input_cost_per_1m: 0.0,
        output_cost_per_1m: 0.0,
        avg_latency_ms: 2500,
        quality_tier: 2,
        task_affinity: &[SimpleExtraction, Classification, GeneralChat],
        max_context_tokens: 128_000,
    },
];

/// Look up a catalog entry by exact model name.
pub fn find_profile(name: &str) -> Option<&'static ModelProfile> {
    MODEL_CATALOG.iter().find(|p| p.name == name)
}

/// Invocation cost for a model by name.
///
/// An unknown model is a data-integrity problem somewhere upstream, never a
/// reason to fail an accounting write: it costs 0.0 and logs a warning.
pub fn cost_of(model_name: &str, input_tokens: u64, output_tokens: u64) -> f64 {
    match find_profile(model_name) {
        Some(profile) => profile.cost(input_tokens, output_tokens),
        None => {
            tracing::warn!(
                model = model_name,
                "Unknown model in cost lookup, recording zero cost"
            );
            0.0
        }
    }
}
