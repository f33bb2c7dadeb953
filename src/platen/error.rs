use crate::model::ContentType;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PlatenError {
    #[error("{0} not found: {1}")]
    ItemNotFound(ContentType, String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Store error: {0}")]
    Store(String),

    #[error("Editor error: {0}")]
    Editor(String),

    #[error("Invalid input: {0}")]
    Invalid(String),
}

pub type Result<T> = std::result::Result<T, PlatenError>;
