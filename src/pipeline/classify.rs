//! Lenient mapping of raw classification strings into closed sets.

use crate::models::enums::{Importance, LifeDomain};

/// Classify the life-domain string from the model's Classification section.
/// Unknown strings fall back to `Other`, never an error.
pub fn classify_life_domain(raw: &str) -> LifeDomain {
    match raw.to_lowercase().trim() {
        "work" | "job" | "career" | "professional" => LifeDomain::Work,
        "finance" | "financial" | "money" | "banking" | "tax" | "taxes" | "insurance" => {
            LifeDomain::Finance
        }
        "health" | "medical" | "healthcare" => LifeDomain::Health,
        "legal" | "law" | "juridical" => LifeDomain::Legal,
        "housing" | "home" | "rent" | "utilities" | "real estate" => LifeDomain::Housing,
        "family" | "children" | "parenting" => LifeDomain::Family,
        "administrative" | "admin" | "government" | "bureaucracy" => LifeDomain::Administrative,
        "social" | "community" | "personal" => LifeDomain::Social,
        _ => LifeDomain::Other,
    }
}

/// Classify the importance string. Unknown strings fall back to `Normal`.
pub fn classify_importance(raw: &str) -> Importance {
    match raw.to_lowercase().trim() {
        "low" | "minor" | "trivial" => Importance::Low,
        "normal" | "medium" | "routine" => Importance::Normal,
        "high" | "important" | "urgent" => Importance::High,
        "critical" | "severe" => Importance::Critical,
        _ => Importance::Normal,
    }
}
