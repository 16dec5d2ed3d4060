use thiserror::Error;

pub type SystemResult<T> = core::result::Result<T, SystemError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SystemError {
    #[error("service: {0}")]
    ServiceError(#[from] ServiceError),
    #[error("storage: {0}")]
    StorageError(#[from] StorageError),
    #[error("network: {0}")]
    NetworkError(#[from] NetworkError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ServiceError {
    #[error("invalid state")]
    InvalidState,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum StorageError {
    #[error("no storage medium present")]
    Unavailable,
    #[error("not found")]
    NotFound,
    #[error("write failed")]
    WriteFailed,
    #[error("read failed")]
    ReadFailed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum NetworkError {
    #[error("not connected")]
    NotConnected,
    #[error("timeout")]
    Timeout,
    #[error("server error")]
    ServerError,
    #[error("malformed response")]
    MalformedResponse,
}
