use ai_client::ClientError;
use storage::StorageError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, SessionError>;

#[derive(Debug, Error)]
pub enum SessionError {
    /// Bad user input; the message is meant to be shown inline.
    #[error("{0}")]
    Validation(String),

    #[error("No analysis result loaded")]
    NotLoaded,

    #[error("A request is already in progress")]
    Busy,

    /// `message` is the user-facing text; `source` is for logs only.
    #[error("{message}")]
    Transport {
        message: String,
        #[source]
        source: ClientError,
    },

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
