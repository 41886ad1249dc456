//! Mandata: correspondence analysis core.
//!
//! Ingests email/chat messages, asks a language model to extract
//! obligations, deadlines, entities, and storage metadata against a fixed
//! eight-section schema, and derives structured domain records under
//! confidence-gated automation rules, tracking which model was used and
//! what it cost.
//!
//! Pipeline per message: select model → invoke extraction → derive records
//! → account usage. Persistence, HTTP, and vendor wire formats live behind
//! the contracts in [`store`] and [`extraction::provider`].

pub mod accounting;
pub mod catalog;
pub mod config;
pub mod extraction;
pub mod models;
pub mod pipeline;
pub mod store;

use tracing_subscriber::EnvFilter;

/// Initialize tracing from `RUST_LOG`, defaulting to `info`.
///
/// Call once at process start; library code only ever emits events.
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();
}
