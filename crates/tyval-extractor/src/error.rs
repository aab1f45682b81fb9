use thiserror::Error;

/// Errors raised while scanning and lowering annotated declarations. These
/// are distinct from `SchemaError`: they describe problems in the *source*,
/// not in an already-built schema.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExtractError {
    #[error("{0}:{1}: unexpected token while parsing a type expression: {2}")]
    UnexpectedToken(String, usize, String),
    #[error("{0}:{1}: unterminated string literal")]
    UnterminatedString(String, usize),
    #[error("{0}: generics on declarations are not supported ('{1}')")]
    GenericsNotSupported(String, String),
    #[error("duplicate type name '{0}'")]
    DuplicateTypeName(String),
    #[error("'{0}' references undefined type '{1}'")]
    UndefinedReference(String, String),
    #[error("heritage clauses are not supported on index-signature declarations ('{0}')")]
    HeritageOnIndexSignature(String),
    #[error("Omit's second type argument must resolve to a set of string literals")]
    OmitKeyNotEnumLike,
    #[error("'any' is not a supported type ('{0}')")]
    AnyNotSupported(String),
    #[error("unsupported type argument form '{0}<...>'")]
    UnsupportedTypeArgument(String),
    #[error("{0}: {1}")]
    Io(String, String),
}
