use thiserror::Error;

#[derive(Error, Debug)]
pub enum LibraryError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Unsupported operation: {0}")]
    Unsupported(String),

    #[error("Channel unavailable: {0}")]
    ChannelUnavailable(String),

    #[error("Operation cancelled: {0}")]
    Cancelled(String),

    #[error("Invalid entity: {0}")]
    InvalidEntity(String),

    #[error("Model error: {0}")]
    Model(#[from] vireo_model::ModelError),
}

pub type Result<T> = std::result::Result<T, LibraryError>;
