//! Pure text-indentation utility shared by the schema printer and checker.

/// Prefixes every line after the first with two spaces.
///
/// This is the only place indentation logic lives; callers compose it
/// rather than hand-rolling `\n  ` concatenation.
pub fn indent(text: &str) -> String {
    text.replace('\n', "\n  ")
}
