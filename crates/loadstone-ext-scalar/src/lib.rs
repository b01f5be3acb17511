//! Demonstration scalar functions: `add`, `yo`, and `surround`.
//!
//! Three deliberately small functions exercising the scalar registration
//! surface at each arity class: two arguments, zero arguments, and one
//! argument. [`register_all`] installs them into a
//! [`FunctionRegistry`].

use loadstone_error::{LoadstoneError, Result};
use loadstone_func::{FunctionRegistry, ScalarFunction};
use loadstone_types::SqliteValue;
use tracing::info;

#[must_use]
pub const fn extension_name() -> &'static str {
    "scalar"
}

/// `add(x, y)`: integer addition of the two arguments.
///
/// Both arguments are coerced to integers with the usual SQLite rules, so
/// `add('3', 4.9)` is 7. Overflow wraps.
pub struct AddFunc;

impl ScalarFunction for AddFunc {
    fn invoke(&self, args: &[SqliteValue]) -> Result<SqliteValue> {
        if args.len() != 2 {
            return Err(LoadstoneError::internal("add requires exactly 2 arguments"));
        }
        let sum = args[0].to_integer().wrapping_add(args[1].to_integer());
        Ok(SqliteValue::Integer(sum))
    }

    fn num_args(&self) -> i32 {
        2
    }

    fn name(&self) -> &str {
        "add"
    }
}

/// `yo()`: returns the text `'yo'`. A zero-argument smoke-test function.
pub struct YoFunc;

impl ScalarFunction for YoFunc {
    fn invoke(&self, _args: &[SqliteValue]) -> Result<SqliteValue> {
        Ok(SqliteValue::Text("yo".to_owned()))
    }

    fn num_args(&self) -> i32 {
        0
    }

    fn name(&self) -> &str {
        "yo"
    }
}

/// `surround(s)`: wraps the text form of the argument in `x...x`.
pub struct SurroundFunc;

impl ScalarFunction for SurroundFunc {
    fn invoke(&self, args: &[SqliteValue]) -> Result<SqliteValue> {
        if args.len() != 1 {
            return Err(LoadstoneError::internal(
                "surround requires exactly 1 argument",
            ));
        }
        Ok(SqliteValue::Text(format!("x{}x", args[0].to_text())))
    }

    fn num_args(&self) -> i32 {
        1
    }

    fn name(&self) -> &str {
        "surround"
    }
}

/// Register all three demonstration functions.
pub fn register_all(registry: &mut FunctionRegistry) {
    registry.register_scalar(AddFunc);
    registry.register_scalar(YoFunc);
    registry.register_scalar(SurroundFunc);
    info!(extension = extension_name(), "scalar functions registered");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add() {
        assert_eq!(
            AddFunc
                .invoke(&[SqliteValue::Integer(40), SqliteValue::Integer(2)])
                .unwrap(),
            SqliteValue::Integer(42)
        );
    }

    #[test]
    fn test_add_coerces_arguments() {
        assert_eq!(
            AddFunc
                .invoke(&[SqliteValue::Text("3".to_owned()), SqliteValue::Float(4.9)])
                .unwrap(),
            SqliteValue::Integer(7)
        );
        // NULL coerces to 0.
        assert_eq!(
            AddFunc
                .invoke(&[SqliteValue::Null, SqliteValue::Integer(5)])
                .unwrap(),
            SqliteValue::Integer(5)
        );
    }

    #[test]
    fn test_add_wraps_on_overflow() {
        assert_eq!(
            AddFunc
                .invoke(&[SqliteValue::Integer(i64::MAX), SqliteValue::Integer(1)])
                .unwrap(),
            SqliteValue::Integer(i64::MIN)
        );
    }

    #[test]
    fn test_yo() {
        assert_eq!(
            YoFunc.invoke(&[]).unwrap(),
            SqliteValue::Text("yo".to_owned())
        );
    }

    #[test]
    fn test_surround() {
        assert_eq!(
            SurroundFunc
                .invoke(&[SqliteValue::Text("abc".to_owned())])
                .unwrap(),
            SqliteValue::Text("xabcx".to_owned())
        );
        // Non-text arguments are rendered as text first.
        assert_eq!(
            SurroundFunc.invoke(&[SqliteValue::Integer(7)]).unwrap(),
            SqliteValue::Text("x7x".to_owned())
        );
        assert_eq!(
            SurroundFunc.invoke(&[SqliteValue::Null]).unwrap(),
            SqliteValue::Text("xx".to_owned())
        );
    }

    #[test]
    fn test_wrong_arity_is_an_error_not_a_panic() {
        let err = AddFunc.invoke(&[SqliteValue::Integer(1)]).unwrap_err();
        assert!(matches!(
            err,
            LoadstoneError::Internal(ref msg) if msg.contains("2 arguments")
        ));

        let err = AddFunc.invoke(&[]).unwrap_err();
        assert!(matches!(err, LoadstoneError::Internal(_)));

        let err = SurroundFunc.invoke(&[]).unwrap_err();
        assert!(matches!(
            err,
            LoadstoneError::Internal(ref msg) if msg.contains("1 argument")
        ));

        let err = SurroundFunc
            .invoke(&[SqliteValue::Integer(1), SqliteValue::Integer(2)])
            .unwrap_err();
        assert!(matches!(err, LoadstoneError::Internal(_)));
    }

    #[test]
    fn test_all_deterministic() {
        assert!(AddFunc.is_deterministic());
        assert!(YoFunc.is_deterministic());
        assert!(SurroundFunc.is_deterministic());
    }

    #[test]
    fn test_register_all() {
        let mut registry = FunctionRegistry::new();
        register_all(&mut registry);

        let f = registry.find_scalar("ADD", 2).expect("add registered");
        assert_eq!(
            f.invoke(&[SqliteValue::Integer(1), SqliteValue::Integer(2)])
                .unwrap(),
            SqliteValue::Integer(3)
        );
        assert!(registry.find_scalar("yo", 0).is_some());
        assert!(registry.find_scalar("surround", 1).is_some());
        // Wrong arity and no variadic fallback: miss.
        assert!(registry.find_scalar("surround", 2).is_none());
    }
}
