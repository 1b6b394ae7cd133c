use thiserror::Error;

pub type StockchatResult<T> = Result<T, StockchatError>;

/// Every transport failure is normalized to one of these before it leaves the
/// API layer; raw reqwest errors never escape.
#[derive(Debug, Error)]
pub enum StockchatError {
    #[error("request timed out")]
    Timeout,

    #[error("backend returned HTTP {status}")]
    Http { status: u16 },

    #[error("could not reach the backend")]
    NetworkUnavailable,

    #[error("unexpected failure: {0}")]
    Unknown(String),

    #[error("config error: {0}")]
    Config(String),

    #[error("storage error: {0}")]
    Storage(String),
}

impl StockchatError {
    pub fn config_error(msg: impl Into<String>) -> Self {
        StockchatError::Config(msg.into())
    }

    pub fn storage_error(msg: impl Into<String>) -> Self {
        StockchatError::Storage(msg.into())
    }

    /// Fixed, user-safe text shown in the chat log when a turn fails.
    pub fn user_message(&self) -> &'static str {
        match self {
            StockchatError::Timeout => {
                "Request timeout. Please check your connection and try again."
            }
            StockchatError::NetworkUnavailable => {
                "Unable to connect to our servers. Please check your internet connection."
            }
            _ => "Sorry, something went wrong. Please try again in a moment.",
        }
    }
}

impl From<reqwest::Error> for StockchatError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            StockchatError::Timeout
        } else if err.is_connect() {
            StockchatError::NetworkUnavailable
        } else if let Some(status) = err.status() {
            StockchatError::Http {
                status: status.as_u16(),
            }
        } else {
            StockchatError::Unknown(err.to_string())
        }
    }
}
