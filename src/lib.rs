//! # Crop Collage
//!
//! Finds near-duplicate face and object crops across a photo collection and
//! plans a collage that links them.
//!
//! ## How It Works
//! - Crops that look alike are paired, unless their parent photos are
//!   themselves near-duplicates
//! - Linked crops are grouped and each group gets one color
//! - Parent photos are placed hub first so the best-connected crops lead
//!
//! ## Architecture
//! - `core` - The matching, coloring and layout engine
//! - `config` - JSON settings with per-user discovery
//! - `events` - Event-driven progress reporting
//! - `error` - Error types

pub mod config;
pub mod core;
pub mod error;
pub mod events;

// Re-export commonly used types at the crate root
pub use error::{CollageError, ConfigError, Result};

/// Initialize tracing for the library
///
/// This should be called once by the application entry point. Filters come
/// from `RUST_LOG`, falling back to `default_directive`.
pub fn init_tracing(default_directive: &str) -> Result<()> {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .or_else(|_| tracing_subscriber::EnvFilter::try_new(default_directive))
        .map_err(|e| ConfigError::Logging(e.to_string()))?;
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| ConfigError::Logging(e.to_string()))?;
    Ok(())
}
