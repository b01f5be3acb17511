use thiserror::Error;

/// Primary error type for loadstone extension surfaces.
///
/// Modeled after SQLite's error codes with Rust-idiomatic structure. Every
/// variant maps to a numeric [`ErrorCode`] for hosts that speak the C
/// result-code protocol.
#[derive(Error, Debug)]
pub enum LoadstoneError {
    /// A virtual table's query plan cannot satisfy the given constraints.
    ///
    /// Raised from `best_index` when an input-only (HIDDEN argument) column
    /// carries an unusable constraint and no usable replacement. The host
    /// must pick another plan or fail the query.
    #[error("constraint failed: {detail}")]
    Constraint { detail: String },

    /// A value of an unexpected storage class reached a typed boundary.
    #[error("type mismatch: expected {expected}, got {actual}")]
    TypeMismatch { expected: String, actual: String },

    /// A cancellation checkpoint observed a cancel request.
    #[error("interrupted")]
    Interrupted,

    /// SQL function domain/runtime error (analogous to `sqlite3_result_error`).
    #[error("{0}")]
    FunctionError(String),

    /// String or BLOB exceeds the size limit.
    #[error("string or BLOB exceeds size limit")]
    TooBig,

    /// Attempt to write a read-only virtual table.
    #[error("attempt to write a readonly table")]
    ReadOnly,

    /// Operation is not supported by this module.
    #[error("unsupported operation")]
    Unsupported,

    /// Internal logic error (should never happen).
    #[error("internal error: {0}")]
    Internal(String),
}

/// SQLite result/error codes for wire protocol compatibility.
///
/// These match the numeric values from C SQLite's `sqlite3.h`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(i32)]
pub enum ErrorCode {
    /// Successful result.
    Ok = 0,
    /// Generic error.
    Error = 1,
    /// Internal logic error.
    Internal = 2,
    /// Callback requested abort.
    Abort = 4,
    /// Attempt to write a read-only database.
    ReadOnly = 8,
    /// Interrupted by `sqlite3_interrupt()`.
    Interrupt = 9,
    /// String or BLOB exceeds size limit.
    TooBig = 18,
    /// Constraint violation.
    Constraint = 19,
    /// Data type mismatch.
    Mismatch = 20,
    /// Library used incorrectly.
    Misuse = 21,
    /// OS feature not available.
    NoLfs = 22,
    /// `step()` has another row ready.
    Row = 100,
    /// `step()` has finished executing.
    Done = 101,
}

impl LoadstoneError {
    /// Map this error to a SQLite error code for compatibility.
    pub const fn error_code(&self) -> ErrorCode {
        match self {
            Self::Constraint { .. } => ErrorCode::Constraint,
            Self::TypeMismatch { .. } => ErrorCode::Mismatch,
            Self::Interrupted => ErrorCode::Interrupt,
            Self::FunctionError(_) => ErrorCode::Error,
            Self::TooBig => ErrorCode::TooBig,
            Self::ReadOnly => ErrorCode::ReadOnly,
            Self::Unsupported => ErrorCode::NoLfs,
            Self::Internal(_) => ErrorCode::Internal,
        }
    }

    /// Get the process exit code for this error (for CLI hosts).
    pub const fn exit_code(&self) -> i32 {
        self.error_code() as i32
    }

    /// Create a constraint error.
    pub fn constraint(detail: impl Into<String>) -> Self {
        Self::Constraint {
            detail: detail.into(),
        }
    }

    /// Create a type mismatch error.
    pub fn type_mismatch(expected: impl Into<String>, actual: impl Into<String>) -> Self {
        Self::TypeMismatch {
            expected: expected.into(),
            actual: actual.into(),
        }
    }

    /// Create a function domain error.
    pub fn function_error(msg: impl Into<String>) -> Self {
        Self::FunctionError(msg.into())
    }

    /// Create an internal error.
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }
}

/// Result type alias using `LoadstoneError`.
pub type Result<T> = std::result::Result<T, LoadstoneError>;
