//! Guest ABI constants and the closed error-code table.

use thiserror::Error;

/// Host namespace the five functions are imported from.
pub const MODULE_NAME: &str = "wasi_experimental_http";

/// Name the guest must export its linear memory under.
pub const MEMORY_NAME: &str = "memory";

/// Lifetime request ceiling when none is configured.
pub const DEFAULT_HTTP_REQUEST_LIMIT: u32 = 10;

/// Largest lifetime request ceiling an embedder may configure.
pub const MAX_HTTP_REQUEST_LIMIT: u32 = 500;

/// Methods a guest may use, upper-case.
pub const ALLOWED_METHODS: [&str; 8] = [
    "DELETE", "GET", "HEAD", "OPTIONS", "PATCH", "POST", "PUT", "TRACE",
];

/// Status code returned by every host function.
///
/// The numbering is part of the guest ABI and must never change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum ErrorCode {
    Success = 0,
    InvalidHandle = 1,
    MemoryNotFound = 2,
    MemoryAccess = 3,
    BufferTooSmall = 4,
    /// Reserved. `header_get` reports a missing header as an empty value.
    HeaderNotFound = 5,
    Utf8Error = 6,
    DestinationNotAllowed = 7,
    InvalidMethod = 8,
    InvalidEncoding = 9,
    InvalidUrl = 10,
    RequestFailed = 11,
    RuntimeError = 12,
    TooManySessions = 13,
}

impl ErrorCode {
    pub fn is_success(self) -> bool {
        self == ErrorCode::Success
    }

    pub fn label(self) -> &'static str {
        match self {
            ErrorCode::Success => "success",
            ErrorCode::InvalidHandle => "invalid handle",
            ErrorCode::MemoryNotFound => "memory not found",
            ErrorCode::MemoryAccess => "memory access error",
            ErrorCode::BufferTooSmall => "buffer too small",
            ErrorCode::HeaderNotFound => "header not found",
            ErrorCode::Utf8Error => "utf-8 error",
            ErrorCode::DestinationNotAllowed => "destination not allowed",
            ErrorCode::InvalidMethod => "invalid method",
            ErrorCode::InvalidEncoding => "invalid encoding",
            ErrorCode::InvalidUrl => "invalid url",
            ErrorCode::RequestFailed => "request failed",
            ErrorCode::RuntimeError => "runtime error",
            ErrorCode::TooManySessions => "too many sessions",
        }
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.label(), *self as u32)
    }
}

impl From<ErrorCode> for u32 {
    fn from(code: ErrorCode) -> Self {
        code as u32
    }
}

/// A raw status value outside the ABI table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("unknown xhttp error code: {0}")]
pub struct UnknownErrorCode(pub u32);

impl TryFrom<u32> for ErrorCode {
    type Error = UnknownErrorCode;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        let code = match value {
            0 => ErrorCode::Success,
            1 => ErrorCode::InvalidHandle,
            2 => ErrorCode::MemoryNotFound,
            3 => ErrorCode::MemoryAccess,
            4 => ErrorCode::BufferTooSmall,
            5 => ErrorCode::HeaderNotFound,
            6 => ErrorCode::Utf8Error,
            7 => ErrorCode::DestinationNotAllowed,
            8 => ErrorCode::InvalidMethod,
            9 => ErrorCode::InvalidEncoding,
            10 => ErrorCode::InvalidUrl,
            11 => ErrorCode::RequestFailed,
            12 => ErrorCode::RuntimeError,
            13 => ErrorCode::TooManySessions,
            other => return Err(UnknownErrorCode(other)),
        };
        Ok(code)
    }
}
