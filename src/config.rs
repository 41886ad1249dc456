use serde::{Deserialize, Serialize};

use crate::models::enums::BudgetMode;

/// Per-run analysis configuration.
///
/// Read once when a processing run starts; the core never mutates it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisSettings {
    /// Active invocation provider, e.g. "ollama".
    pub provider: String,
    /// Pin a specific model, bypassing selection entirely.
    pub model_override: Option<String>,
    pub temperature: f32,
    pub max_tokens: u32,
    pub budget_mode: BudgetMode,
    /// Whether fallback models may come from a different provider than the
    /// chosen one.
    pub cross_provider_enabled: bool,
}

impl Default for AnalysisSettings {
    fn default() -> Self {
        Self {
            provider: "ollama".into(),
            model_override: None,
            temperature: 0.2,
            max_tokens: 2048,
            budget_mode: BudgetMode::Balanced,
            cross_provider_enabled: true,
        }
    }
}
