//! Shared types for the loadstone extension surfaces.
//!
//! - [`SqliteValue`]: the dynamically-typed value exchanged between a host
//!   engine and extension code (function arguments, cursor columns, filter
//!   arguments).
//! - [`Cx`]: the cancellation context threaded through effectful cursor
//!   methods.

pub mod cx;
pub mod value;

pub use cx::Cx;
pub use value::SqliteValue;
