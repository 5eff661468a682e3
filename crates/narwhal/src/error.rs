#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Graph(#[from] narwhal_graph::GraphError),

    #[error("layout was cancelled before its results were applied")]
    Cancelled,

    #[error("{algorithm} layout did not complete within {after_ms}ms")]
    TimedOut { algorithm: &'static str, after_ms: u64 },

    #[error("{algorithm} layout failed: {message}")]
    Underlying {
        algorithm: &'static str,
        message: String,
    },

    #[error("invalid topology document: {message}")]
    InvalidDocument { message: String },

    #[error("topology JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
