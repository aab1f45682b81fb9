//! Schema/programming error taxonomy.
//!
//! These are distinct from the checker's internal `CheckFailure` sentinel:
//! they indicate a bug in the schema or the caller, not a conformance
//! failure, and are therefore never accumulated into a diagnostic string.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SchemaError {
    #[error("undefined reference: '{0}'")]
    UndefinedReference(String),

    #[error("property set of '{0}' is not finite (open index signature or unrestricted mapped type)")]
    OpenPropertySet(String),

    #[error("Partial<T> requires T to resolve to an interface, got '{0}'")]
    PartialOnNonInterface(String),

    #[error("mapped type 'mapFrom' does not resolve to string, a string literal, or a union of string literals: '{0}'")]
    UnsupportedMapFrom(String),
}
