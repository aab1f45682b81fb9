//! Internal `CheckFailure` sentinel.
//!
//! Every recursive frame returns `CheckResult`. A `Check` outcome is the
//! conformance-diagnostic sentinel (spec §7's `CheckFailure`): frames catch
//! it, append a `While checking ...` line, and rethrow. A `Schema` outcome
//! is a schema/programming error and propagates completely unchanged —
//! frames never catch it.

use tyval_common::SchemaError;

#[derive(Debug)]
pub(crate) enum Outcome {
    Check(String),
    Schema(SchemaError),
}

pub(crate) type CheckResult = Result<(), Outcome>;

impl From<SchemaError> for Outcome {
    fn from(e: SchemaError) -> Self {
        Outcome::Schema(e)
    }
}

pub(crate) fn fail<T>(msg: impl Into<String>) -> Result<T, Outcome> {
    Err(Outcome::Check(msg.into()))
}
