use thiserror::Error as ThisError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    InvalidKey,
    ValueTooLarge,
    InvalidConfig,
    InvalidInput,
    UnsafeQuery,
    Internal,
}

#[derive(Debug, ThisError)]
#[error("{kind:?}: {context}")]
pub struct Error {
    pub kind: ErrorKind,
    pub context: String,
}

impl Error {
    pub fn new(kind: ErrorKind, context: String) -> Self {
        Error { kind, context }
    }

    pub fn invalid_key(context: impl Into<String>) -> Self {
        Error::new(ErrorKind::InvalidKey, context.into())
    }

    pub fn value_too_large(context: impl Into<String>) -> Self {
        Error::new(ErrorKind::ValueTooLarge, context.into())
    }

    pub fn invalid_config(context: impl Into<String>) -> Self {
        Error::new(ErrorKind::InvalidConfig, context.into())
    }

    pub fn invalid_input(context: impl Into<String>) -> Self {
        Error::new(ErrorKind::InvalidInput, context.into())
    }

    pub fn unsafe_query(context: impl Into<String>) -> Self {
        Error::new(ErrorKind::UnsafeQuery, context.into())
    }

    /// True for errors caused by the caller's arguments rather than by this library.
    ///
    /// A service layer usually reacts to these by bypassing the cache and going
    /// straight to the source of truth.
    pub fn is_validation(&self) -> bool {
        !matches!(self.kind, ErrorKind::Internal)
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error {
            kind: ErrorKind::ValueTooLarge,
            context: format!("value is not serializable: {}", err),
        }
    }
}

impl From<regex::Error> for Error {
    fn from(err: regex::Error) -> Self {
        Error {
            kind: ErrorKind::Internal,
            context: format!("regex error: {}", err),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
