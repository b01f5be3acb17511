//! Scalar (row-level) function trait.
//!
//! Scalar functions compute a single output value from zero or more input
//! values. They are stateless across rows: each invocation is independent.
//!
//! This trait is **open** (user-implementable). Extension authors implement
//! `ScalarFunction` to register custom SQL functions.
//!
//! # Send + Sync
//!
//! Scalar functions may be shared across threads via `Arc` for use by
//! concurrent query executors. Implementations must be thread-safe.
//!
//! `invoke` does not take `&Cx`: deterministic scalar functions are pure
//! computations with no yield points.

use loadstone_error::Result;
use loadstone_types::SqliteValue;

/// A scalar (row-level) SQL function.
///
/// Scalar functions are invoked once per row and return a single value.
/// They are stored in the [`FunctionRegistry`](crate::FunctionRegistry) as
/// `Arc<dyn ScalarFunction>`.
///
/// # Error Handling
///
/// - Return [`LoadstoneError::FunctionError`](loadstone_error::LoadstoneError::FunctionError)
///   for domain errors (e.g. `abs(i64::MIN)`).
/// - Return [`LoadstoneError::TooBig`](loadstone_error::LoadstoneError::TooBig)
///   if the result exceeds the host's length limit.
pub trait ScalarFunction: Send + Sync {
    /// Execute this function on the given arguments.
    fn invoke(&self, args: &[SqliteValue]) -> Result<SqliteValue>;

    /// Whether this function is deterministic (same inputs, same output).
    ///
    /// Deterministic functions enable constant folding and plan-level
    /// caching by the host. Defaults to `true`.
    fn is_deterministic(&self) -> bool {
        true
    }

    /// The number of arguments this function accepts.
    ///
    /// `-1` means variadic (any number of arguments).
    fn num_args(&self) -> i32;

    /// The function name, used for registration and in error messages.
    fn name(&self) -> &str;
}
