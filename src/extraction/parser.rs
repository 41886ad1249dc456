//! Turn raw model output into a typed [`ExtractionResult`].
//!
//! Strict at the section level (all eight must be present), lenient at the
//! item level (a bad obligation or deadline entry is skipped, not fatal).

use serde::Deserialize;
use serde_json::Value;

use super::schema::{ExtractedDeadlines, ExtractionResult};
use super::ExtractionError;

/// Parse a model response into an extraction result.
pub fn parse_extraction_response(response: &str) -> Result<ExtractionResult, ExtractionError> {
    let json_str = extract_json_block(response)?;
    let value: Value = serde_json::from_str(&json_str)
        .map_err(|e| ExtractionError::JsonParsing(e.to_string()))?;

    let raw: RawResult = serde_json::from_value(value)
        .map_err(|e| ExtractionError::JsonParsing(e.to_string()))?;

    Ok(ExtractionResult {
        classification: require_section(raw.classification, "classification")?,
        key_entities: require_section(raw.key_entities, "key_entities")?,
        obligations: parse_array_lenient(required_array(raw.obligations, "obligations")?),
        deadlines: parse_deadlines(require_value(raw.deadlines, "deadlines")?)?,
        financial_significance: require_section(
            raw.financial_significance,
            "financial_significance",
        )?,
        attachments: parse_array_lenient(required_array(raw.attachments, "attachments")?),
        storage: require_section(raw.storage, "storage")?,
        confidence: require_section(raw.confidence, "confidence")?,
    })
}

#[derive(Deserialize)]
struct RawResult {
    classification: Option<Value>,
    key_entities: Option<Value>,
    obligations: Option<Vec<Value>>,
    deadlines: Option<Value>,
    financial_significance: Option<Value>,
    attachments: Option<Vec<Value>>,
    storage: Option<Value>,
    confidence: Option<Value>,
}

/// Extract the ```json fenced block, or fall back to treating the whole
/// trimmed response as JSON (some providers return bare JSON).
fn extract_json_block(response: &str) -> Result<String, ExtractionError> {
    if let Some(fence_start) = response.find("```json") {
        let content_start = fence_start + 7;
        let fence_end = response[content_start..]
            .find("```")
            .ok_or(ExtractionError::NoJsonBlock)?;
        return Ok(response[content_start..content_start + fence_end]
            .trim()
            .to_string());
    }

    let trimmed = response.trim();
    if trimmed.starts_with('{') {
        return Ok(trimmed.to_string());
    }

    Err(ExtractionError::NoJsonBlock)
}

fn require_value(value: Option<Value>, section: &'static str) -> Result<Value, ExtractionError> {
    match value {
        Some(Value::Null) | None => Err(ExtractionError::MissingSection(section)),
        Some(v) => Ok(v),
    }
}

/// A scalar section must be present, non-null, and well-formed.
fn require_section<T: for<'de> Deserialize<'de>>(
    value: Option<Value>,
    section: &'static str,
) -> Result<T, ExtractionError> {
    let value = require_value(value, section)?;
    serde_json::from_value(value).map_err(|e| ExtractionError::MalformedSection {
        section,
        reason: e.to_string(),
    })
}

/// A list section must be present; its items are parsed leniently.
fn required_array(
    items: Option<Vec<Value>>,
    section: &'static str,
) -> Result<Vec<Value>, ExtractionError> {
    items.ok_or(ExtractionError::MissingSection(section))
}

/// Skip items that fail to deserialize rather than failing the whole parse.
fn parse_array_lenient<T: for<'de> Deserialize<'de>>(items: Vec<Value>) -> Vec<T> {
    items
        .into_iter()
        .filter_map(|v| match serde_json::from_value(v) {
            Ok(item) => Some(item),
            Err(e) => {
                tracing::debug!(error = %e, "Skipping malformed extraction item");
                None
            }
        })
        .collect()
}

/// The deadlines section is an object of three lists; each list's items are
/// lenient, a missing list is treated as empty.
fn parse_deadlines(value: Value) -> Result<ExtractedDeadlines, ExtractionError> {
    #[derive(Deserialize)]
    struct RawDeadlines {
        absolute: Option<Vec<Value>>,
        relative: Option<Vec<Value>>,
        recurring: Option<Vec<Value>>,
    }

    let raw: RawDeadlines =
        serde_json::from_value(value).map_err(|e| ExtractionError::MalformedSection {
            section: "deadlines",
            reason: e.to_string(),
        })?;

    Ok(ExtractedDeadlines {
        absolute: parse_array_lenient(raw.absolute.unwrap_or_default()),
        relative: parse_array_lenient(raw.relative.unwrap_or_default()),
        recurring: parse_array_lenient(raw.recurring.unwrap_or_default()),
    })
}
