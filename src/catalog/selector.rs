//! Model selection: rank catalog entries for a task under a budget policy.
//!
//! Selection reads the static catalog only; it never mutates state and it
//! never fails: a task type with no affine model falls back to ranking the
//! full catalog.

use crate::models::enums::{BudgetMode, TaskComplexity, TaskType};

use super::profiles::{ModelProfile, MODEL_CATALOG};

/// Maximum number of fallback models returned alongside the chosen one.
pub const MAX_FALLBACKS: usize = 3;

/// Balanced mode only considers models within this many quality tiers of the
/// best tier available for the task. Tune here, not inline.
const BALANCED_TIER_WINDOW: u8 = 1;

/// A chosen model plus an ordered fallback list for invocation failures.
#[derive(Debug, Clone)]
pub struct ModelSelection {
    pub chosen: &'static ModelProfile,
    pub fallbacks: Vec<&'static ModelProfile>,
}

/// Rank the catalog for `task` under `budget` and return the winner plus
/// up to [`MAX_FALLBACKS`] runners-up.
pub fn select_model(
    task: TaskType,
    complexity: TaskComplexity,
    budget: BudgetMode,
) -> ModelSelection {
    let mut candidates: Vec<&'static ModelProfile> =
        MODEL_CATALOG.iter().filter(|p| p.suits(task)).collect();

    if candidates.is_empty() {
        tracing::debug!(task = task.as_str(), "No affine model, ranking full catalog");
        candidates = MODEL_CATALOG.iter().collect();
    }

    let mut ranked = rank(candidates, complexity, budget);

    let chosen = ranked.remove(0);
    ranked.truncate(MAX_FALLBACKS);

    tracing::debug!(
        task = task.as_str(),
        complexity = complexity.as_str(),
        budget = budget.as_str(),
        chosen = chosen.name,
        fallbacks = ranked.len(),
        "Model selected"
    );

    ModelSelection {
        chosen,
        fallbacks: ranked,
    }
}

/// Order candidates per budget policy. Input is non-empty, output likewise.
fn rank(
    mut candidates: Vec<&'static ModelProfile>,
    complexity: TaskComplexity,
    budget: BudgetMode,
) -> Vec<&'static ModelProfile> {
    match budget {
        BudgetMode::Premium => {
            candidates.sort_by(|a, b| {
                b.quality_tier
                    .cmp(&a.quality_tier)
                    .then(cheaper_first(a, b))
            });
            candidates
        }
        BudgetMode::Balanced => {
            let max_tier = candidates
                .iter()
                .map(|p| p.quality_tier)
                .max()
                .unwrap_or(1);
            // Very complex work gets no tier slack.
            let window = if complexity == TaskComplexity::VeryComplex {
                0
            } else {
                BALANCED_TIER_WINDOW
            };
            let floor = max_tier.saturating_sub(window);
            let mut eligible: Vec<&'static ModelProfile> = candidates
                .iter()
                .copied()
                .filter(|p| p.quality_tier >= floor)
                .collect();
            eligible.sort_by(|a, b| cheaper_first(a, b));
            eligible
        }
        BudgetMode::Economy => {
            candidates.sort_by(|a, b| cheaper_first(a, b));
            candidates
        }
    }
}

fn cheaper_first(a: &ModelProfile, b: &ModelProfile) -> std::cmp::Ordering {
    a.input_cost_per_1m
        .total_cmp(&b.input_cost_per_1m)
        .then(a.output_cost_per_1m.total_cmp(&b.output_cost_per_1m))
}
