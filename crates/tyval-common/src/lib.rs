//! Shared primitives for the tyval validator generator.
//!
//! This crate provides foundational types used across all tyval crates:
//! - Schema/programming error taxonomy (`SchemaError`)
//! - The `indent` text utility shared by the schema printer and the checker
//! - A `tracing` logging bootstrap used by the CLI binary

pub mod error;
pub use error::SchemaError;

pub mod indent;
pub use indent::indent;

pub mod logging;
