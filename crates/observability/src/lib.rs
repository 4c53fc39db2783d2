//! `jengamart-observability` — process-wide tracing setup.

pub mod tracing;

pub use tracing::init;
