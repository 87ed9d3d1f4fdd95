use thiserror::Error;

/// Tab Sweeper error type
#[derive(Debug, Error)]
pub enum Error {
    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Failed to close tab {tab_id}: {reason}")]
    CloseTab { tab_id: i32, reason: String },

    #[error("Invalid URL '{url}': {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("Browser API error: {0}")]
    Host(String),

    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

// For UI display - converts Error to String
impl From<Error> for String {
    fn from(e: Error) -> Self {
        e.to_string()
    }
}
