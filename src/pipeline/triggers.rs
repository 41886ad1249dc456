//! Trigger classification and the lossy duration/date heuristics.

use std::sync::OnceLock;

use chrono::NaiveDate;
use regex::Regex;

use crate::models::enums::TriggerType;

/// Default estimate when an obligation mentions minutes without a number.
const DEFAULT_MINUTES: u32 = 15;

/// Default estimate when an obligation mentions hours without a number.
const DEFAULT_HOURS: u32 = 1;

fn digits_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\d+").expect("static regex"))
}

/// Classify a raw trigger string.
///
/// `"date:<ISO date>"` → Date, `"event:<description>"` → Event, anything
/// else (including malformed prefixes) → Immediate.
pub fn classify_trigger(raw: &str) -> TriggerType {
    let trimmed = raw.trim();
    if trimmed.starts_with("date:") {
        TriggerType::Date
    } else if trimmed.starts_with("event:") {
        TriggerType::Event
    } else {
        TriggerType::Immediate
    }
}

/// Parse the date out of a `"date:"`-prefixed trigger.
pub fn trigger_date(raw: &str) -> Option<NaiveDate> {
    let trimmed = raw.trim();
    let value = trimmed.strip_prefix("date:")?;
    parse_permissive_date(value)
}

/// Permissive date parser for model output.
/// Supports ISO 8601, European DD/MM/YYYY and DD-MM-YYYY, US MM/DD/YYYY.
pub fn parse_permissive_date(date_str: &str) -> Option<NaiveDate> {
    let trimmed = date_str.trim();
    if trimmed.is_empty() || trimmed == "null" {
        return None;
    }

    for format in ["%Y-%m-%d", "%d/%m/%Y", "%d-%m-%Y", "%m/%d/%Y"] {
        if let Ok(d) = NaiveDate::parse_from_str(trimmed, format) {
            return Some(d);
        }
    }
    None
}

/// Heuristic parse of a free-text effort estimate into minutes.
///
/// Mentions of "minute" take the leading digits (default 15); mentions of
/// "hour" take the leading digits (default 1) as hours. Anything else
/// records no duration.
pub fn parse_estimated_minutes(raw: &str) -> Option<u32> {
    let lower = raw.to_lowercase();
    let leading = digits_re()
        .find(&lower)
        .and_then(|m| m.as_str().parse::<u32>().ok());

    if lower.contains("minute") {
        Some(leading.unwrap_or(DEFAULT_MINUTES))
    } else if lower.contains("hour") {
        // Model output can carry absurd numbers; overflow means no estimate.
        leading.unwrap_or(DEFAULT_HOURS).checked_mul(60)
    } else {
        None
    }
}

/// Parse a relative-deadline window of the form `"<integer> <unit>"`.
///
/// Units: day(s), week(s) = 7 days, month(s) = 30 days, year(s) = 365 days.
/// An unrecognized unit yields `None`; the caller still keeps the record.
pub fn parse_relative_days(window: &str) -> Option<u32> {
    let lower = window.trim().to_lowercase();
    let mut parts = lower.split_whitespace();
    let count: u32 = parts.next()?.parse().ok()?;
    let unit = parts.next()?;

    let factor = if unit.starts_with("day") {
        1
    } else if unit.starts_with("week") {
        7
    } else if unit.starts_with("month") {
        30
    } else if unit.starts_with("year") {
        365
    } else {
        return None;
    };

    count.checked_mul(factor)
}
