//! The invocation capability contract: one interface, many interchangeable
//! provider implementations selected at construction time.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use thiserror::Error;

use super::schema::{ExtractionResult, SchemaDescriptor};
use super::ExtractionError;

/// Caller-supplied cancellation signal for an in-flight extraction.
///
/// Cloned flags share state; providers must check it before committing to a
/// billable call.
#[derive(Debug, Clone, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Typed failure of one invocation attempt.
#[derive(Debug, Error)]
pub enum InvocationError {
    #[error("Provider rate limited the request")]
    RateLimited,

    #[error("Provider response could not be interpreted: {0}")]
    InvalidResponse(String),

    #[error("Provider violated the extraction contract: {0}")]
    SchemaViolation(String),

    #[error("Provider call timed out after {secs}s")]
    Timeout { secs: u64 },

    #[error("Provider error (status {status}): {message}")]
    Provider { status: u16, message: String },

    #[error("Extraction cancelled before completion")]
    Cancelled,
}

impl InvocationError {
    /// Whether trying a fallback model is worthwhile.
    ///
    /// Timeouts and cancellations abort the run so the message stays
    /// unprocessed; a schema violation means the provider is broken, not
    /// the model choice.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::RateLimited | Self::InvalidResponse(_) | Self::Provider { .. }
        )
    }
}

impl From<ExtractionError> for InvocationError {
    fn from(e: ExtractionError) -> Self {
        match e {
            ExtractionError::MissingSection(_) => Self::SchemaViolation(e.to_string()),
            other => Self::InvalidResponse(other.to_string()),
        }
    }
}

/// What a provider hands back on success: the typed extraction plus the
/// billing/latency facts the accountant needs.
#[derive(Debug, Clone)]
pub struct ProviderResponse {
    pub extraction: ExtractionResult,
    pub input_tokens: u64,
    pub output_tokens: u64,
    pub latency_ms: u64,
}

/// One extraction provider (strategy abstraction, no deeper hierarchy).
pub trait ExtractionProvider {
    fn name(&self) -> &str;

    /// Run one extraction against `model`. Must honor `cancel` and must
    /// return a value satisfying the schema descriptor or a typed failure.
    fn extract(
        &self,
        model: &str,
        prompt: &str,
        schema: &SchemaDescriptor,
        cancel: &CancelFlag,
    ) -> Result<ProviderResponse, InvocationError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cancel_flag_shares_state_across_clones() {
        let flag = CancelFlag::new();
        let clone = flag.clone();
        assert!(!clone.is_cancelled());
        flag.cancel();
        assert!(clone.is_cancelled());
    }

    #[test]
    fn rate_limit_and_provider_errors_are_retryable() {
        assert!(InvocationError::RateLimited.is_retryable());
        assert!(InvocationError::Provider {
            status: 500,
            message: "boom".into()
        }
        .is_retryable());
        assert!(InvocationError::InvalidResponse("garbage".into()).is_retryable());
    }

    #[test]
    fn timeout_cancel_and_contract_violations_are_not_retryable() {
        assert!(!InvocationError::Timeout { secs: 60 }.is_retryable());
        assert!(!InvocationError::Cancelled.is_retryable());
        assert!(!InvocationError::SchemaViolation("missing".into()).is_retryable());
    }

    #[test]
    fn missing_section_maps_to_schema_violation() {
        let err: InvocationError = ExtractionError::MissingSection("storage").into();
        assert!(matches!(err, InvocationError::SchemaViolation(_)));
    }

    #[test]
    fn parse_noise_maps_to_invalid_response() {
        let err: InvocationError = ExtractionError::NoJsonBlock.into();
        assert!(matches!(err, InvocationError::InvalidResponse(_)));
    }
}
