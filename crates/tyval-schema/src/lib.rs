//! The closed type-schema algebra and its reference/printing operations.
//!
//! This crate owns the `TypeNode`/`Schema` data model (spec §3, §4.1) and
//! property computation (§4.2). The conformance checker (`tyval-checker`)
//! depends on it but never mutates a `Schema` after it is loaded.

pub mod properties;
pub mod schema;
pub mod types;

pub use properties::compute_properties_of_type;
pub use schema::Schema;
pub use types::{CommonAttrs, Field, TypeNode};
