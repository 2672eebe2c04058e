/*!
    Error types for the ffmpeg crate ecosystem.
*/

use thiserror::Error;

/**
    Error type for the ffmpeg crate ecosystem.
*/
#[derive(Debug, Error)]
pub enum Error {
    /// I/O error (worker thread could not be spawned, etc.)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// Invalid data (malformed or mismatched frame)
    #[error("invalid data: {message}")]
    InvalidData { message: String },
    /// Unsupported format (valid but not handled)
    #[error("unsupported format: {message}")]
    UnsupportedFormat { message: String },
    /// Invalid configuration (tracks or parameters rejected)
    #[error("invalid configuration: {message}")]
    InvalidConfig { message: String },
    /// The component was used before being started, or after being stopped
    #[error("not running")]
    NotRunning,
    /// A bounded queue rejected an item because it was full
    #[error("queue {urn} is full")]
    QueueFull { urn: String },
}

impl Error {
    /**
        Create an invalid data error with the given message.
    */
    pub fn invalid_data(message: impl Into<String>) -> Self {
        Self::InvalidData {
            message: message.into(),
        }
    }

    /**
        Create an unsupported format error with the given message.
    */
    pub fn unsupported_format(message: impl Into<String>) -> Self {
        Self::UnsupportedFormat {
            message: message.into(),
        }
    }

    /**
        Create an invalid configuration error with the given message.
    */
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            message: message.into(),
        }
    }

    /**
        Returns true if this error means the component is not running.
    */
    pub fn is_not_running(&self) -> bool {
        matches!(self, Self::NotRunning)
    }
}

/**
    Result type alias for the ffmpeg crate ecosystem.
*/
pub type Result<T> = std::result::Result<T, Error>;
