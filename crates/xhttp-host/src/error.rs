//! Failure categories for the host functions.
//!
//! Internal code only ever produces an [`HttpError`]. The host-function
//! boundary in [`crate::handler`] is the one place a category becomes a
//! numeric [`ErrorCode`].

use thiserror::Error;
use xhttp_core::ErrorCode;

/// Result type alias for host-function internals.
pub type HttpResult<T> = Result<T, HttpError>;

#[derive(Debug, Error)]
pub enum HttpError {
    #[error("invalid handle: {0}")]
    InvalidHandle(u32),

    #[error("guest does not export memory")]
    MemoryNotFound,

    #[error("memory access out of bounds: {0}")]
    MemoryAccess(String),

    #[error("buffer too small: need {needed} bytes, capacity {capacity}")]
    BufferTooSmall { needed: usize, capacity: usize },

    #[error("{0} is not valid utf-8")]
    Utf8(&'static str),

    #[error("destination not allowed: {0}")]
    DestinationNotAllowed(String),

    #[error("invalid method: {0:?}")]
    InvalidMethod(String),

    #[error("invalid encoding: {0}")]
    InvalidEncoding(String),

    #[error("invalid url: {0:?}")]
    InvalidUrl(String),

    #[error("request failed: {0}")]
    RequestFailed(String),

    #[error("request limit of {limit} reached")]
    TooManySessions { limit: u32 },

    #[error("runtime error: {0}")]
    Runtime(String),
}

impl HttpError {
    pub fn code(&self) -> ErrorCode {
        match self {
            HttpError::InvalidHandle(_) => ErrorCode::InvalidHandle,
            HttpError::MemoryNotFound => ErrorCode::MemoryNotFound,
            HttpError::MemoryAccess(_) => ErrorCode::MemoryAccess,
            HttpError::BufferTooSmall { .. } => ErrorCode::BufferTooSmall,
            HttpError::Utf8(_) => ErrorCode::Utf8Error,
            HttpError::DestinationNotAllowed(_) => ErrorCode::DestinationNotAllowed,
            HttpError::InvalidMethod(_) => ErrorCode::InvalidMethod,
            HttpError::InvalidEncoding(_) => ErrorCode::InvalidEncoding,
            HttpError::InvalidUrl(_) => ErrorCode::InvalidUrl,
            HttpError::RequestFailed(_) => ErrorCode::RequestFailed,
            HttpError::TooManySessions { .. } => ErrorCode::TooManySessions,
            HttpError::Runtime(_) => ErrorCode::RuntimeError,
        }
    }
}

/// Collapse an operation result into the status returned to the guest.
pub fn to_status(op: &'static str, result: HttpResult<()>) -> u32 {
    match result {
        Ok(()) => ErrorCode::Success.into(),
        Err(e) => {
            let code = e.code();
            tracing::debug!(op, code = u32::from(code), error = %e, "host call failed");
            code.into()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn each_category_maps_to_its_code() {
        let cases = [
            (HttpError::InvalidHandle(7), ErrorCode::InvalidHandle),
            (HttpError::MemoryNotFound, ErrorCode::MemoryNotFound),
            (HttpError::MemoryAccess("x".into()), ErrorCode::MemoryAccess),
            (
                HttpError::BufferTooSmall { needed: 4, capacity: 2 },
                ErrorCode::BufferTooSmall,
            ),
            (HttpError::Utf8("url"), ErrorCode::Utf8Error),
            (
                HttpError::DestinationNotAllowed("evil.test".into()),
                ErrorCode::DestinationNotAllowed,
            ),
            (HttpError::InvalidMethod("FETCH".into()), ErrorCode::InvalidMethod),
            (HttpError::InvalidEncoding("bad".into()), ErrorCode::InvalidEncoding),
            (HttpError::InvalidUrl("".into()), ErrorCode::InvalidUrl),
            (HttpError::RequestFailed("refused".into()), ErrorCode::RequestFailed),
            (HttpError::TooManySessions { limit: 10 }, ErrorCode::TooManySessions),
            (HttpError::Runtime("boom".into()), ErrorCode::RuntimeError),
        ];
        for (err, code) in cases {
            assert_eq!(err.code(), code, "{err}");
        }
    }

    #[test]
    fn to_status_success_is_zero() {
        assert_eq!(to_status("close", Ok(())), 0);
    }

    #[test]
    fn to_status_uses_error_code() {
        assert_eq!(
            to_status("close", Err(HttpError::InvalidHandle(3))),
            u32::from(ErrorCode::InvalidHandle)
        );
    }

    #[test]
    fn messages_carry_context() {
        let err = HttpError::BufferTooSmall { needed: 16, capacity: 8 };
        assert_eq!(err.to_string(), "buffer too small: need 16 bytes, capacity 8");
        assert_eq!(HttpError::Utf8("method").to_string(), "method is not valid utf-8");
    }
}
