use thiserror::Error;

#[derive(Error, Debug)]
pub enum EmitError {
    #[error("failed to serialize schema: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("{0}: {1}")]
    Io(String, std::io::Error),
}
