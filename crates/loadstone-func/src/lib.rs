//! Extension trait surfaces: scalar functions and virtual tables.
//!
//! This crate defines the open, user-implementable traits extension authors
//! build against:
//! - scalar functions ([`ScalarFunction`])
//! - virtual table modules and cursors ([`VirtualTable`],
//!   [`VirtualTableCursor`]) with the planner negotiation types
//!
//! It also provides a small in-memory [`FunctionRegistry`] for registering
//! and resolving scalar functions by `(name, num_args)` key with variadic
//! fallback.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::debug;

pub mod scalar;
pub mod vtab;

pub use scalar::ScalarFunction;
pub use vtab::{
    ColumnContext, ConstraintOp, ConstraintUsage, IndexConstraint, IndexInfoInput,
    IndexInfoOutput, IndexOrderBy, VirtualTable, VirtualTableCursor,
};

/// Composite lookup key for functions: `(UPPERCASE name, num_args)`.
///
/// `-1` for `num_args` means variadic (any number of arguments).
/// Names are stored as uppercase ASCII for case-insensitive matching.
#[derive(Debug, Clone, Hash, Eq, PartialEq)]
pub struct FunctionKey {
    /// Function name, stored as uppercase ASCII.
    pub name: String,
    /// Expected argument count, or `-1` for variadic.
    pub num_args: i32,
}

impl FunctionKey {
    /// Create a new function key with the name canonicalized to uppercase.
    #[must_use]
    pub fn new(name: &str, num_args: i32) -> Self {
        Self {
            name: canonical_name(name),
            num_args,
        }
    }
}

/// Registry for scalar functions, keyed by `(name, num_args)`.
///
/// Lookup strategy:
/// 1. Exact match on `(UPPERCASE_NAME, num_args)`.
/// 2. Fallback to the variadic version `(UPPERCASE_NAME, -1)`.
/// 3. `None` if neither is found (caller raises "no such function").
#[derive(Default)]
pub struct FunctionRegistry {
    scalars: HashMap<FunctionKey, Arc<dyn ScalarFunction>>,
}

impl FunctionRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a scalar function, keyed by `(name, num_args)`.
    ///
    /// Overwrites any existing function with the same key. Returns the
    /// previous function if one existed.
    pub fn register_scalar<F>(&mut self, function: F) -> Option<Arc<dyn ScalarFunction>>
    where
        F: ScalarFunction + 'static,
    {
        let key = FunctionKey::new(function.name(), function.num_args());
        self.scalars.insert(key, Arc::new(function))
    }

    /// Look up a scalar function by `(name, num_args)`.
    ///
    /// Tries exact match first, then falls back to the variadic version
    /// `(name, -1)` if no exact match exists.
    #[must_use]
    pub fn find_scalar(&self, name: &str, num_args: i32) -> Option<Arc<dyn ScalarFunction>> {
        let canon = canonical_name(name);
        let exact = FunctionKey {
            name: canon.clone(),
            num_args,
        };
        if let Some(f) = self.scalars.get(&exact) {
            debug!(name = %canon, arity = num_args, hit = "exact", "registry lookup");
            return Some(Arc::clone(f));
        }
        // Variadic fallback.
        let variadic = FunctionKey {
            name: canon.clone(),
            num_args: -1,
        };
        let result = self.scalars.get(&variadic).map(Arc::clone);
        debug!(
            name = %canon,
            arity = num_args,
            hit = if result.is_some() { "variadic" } else { "miss" },
            "registry lookup"
        );
        result
    }

    /// Whether the registry contains any scalar function with this name
    /// (any arg count).
    #[must_use]
    pub fn contains_scalar(&self, name: &str) -> bool {
        let canon = canonical_name(name);
        self.scalars.keys().any(|k| k.name == canon)
    }
}

fn canonical_name(name: &str) -> String {
    name.trim().to_ascii_uppercase()
}
