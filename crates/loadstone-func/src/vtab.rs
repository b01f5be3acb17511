//! Virtual table and cursor traits.
//!
//! Virtual tables expose computed data sources as SQL tables. They follow
//! the xCreate/xConnect/xBestIndex/xFilter/xNext protocol of the host
//! engine: the planner calls [`VirtualTable::best_index`] to negotiate which
//! WHERE-clause constraints the table will consume, then drives a
//! [`VirtualTableCursor`] with the chosen plan.
//!
//! These traits are **open** (user-implementable). Extension authors
//! implement them to create custom virtual table modules.
//!
//! # Cx on effectful methods
//!
//! Methods that may do real work (`filter`, `next`) accept `&Cx` for
//! cancellation propagation. Lightweight accessors (`eof`, `column`,
//! `rowid`) do not, since they operate on already-computed row state.

use loadstone_error::Result;
use loadstone_types::SqliteValue;
use loadstone_types::cx::Cx;

// ---------------------------------------------------------------------------
// Query planner types
// ---------------------------------------------------------------------------

/// Comparison operator for an index constraint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConstraintOp {
    Eq,
    Gt,
    Le,
    Lt,
    Ge,
    Match,
    Like,
    Glob,
    Regexp,
    Ne,
    IsNot,
    IsNotNull,
    IsNull,
    Is,
}

/// A single constraint from the WHERE clause that the planner is considering.
#[derive(Debug, Clone)]
pub struct IndexConstraint {
    /// Column index (0-based; `-1` for rowid).
    pub column: i32,
    /// The comparison operator.
    pub op: ConstraintOp,
    /// Whether the planner considers this constraint usable for this call.
    pub usable: bool,
}

/// A single ORDER BY term from the query.
#[derive(Debug, Clone)]
pub struct IndexOrderBy {
    /// Column index (0-based).
    pub column: i32,
    /// `true` if descending, `false` if ascending.
    pub desc: bool,
}

/// Per-constraint usage information produced by `best_index`.
#[derive(Debug, Clone, Default)]
pub struct ConstraintUsage {
    /// 1-based index into the `args` array passed to `filter`.
    /// 0 means this constraint is not consumed by the table.
    pub argv_index: i32,
    /// If `true`, the table guarantees this constraint is satisfied and
    /// the host need not double-check it.
    pub omit: bool,
}

/// What the host planner hands to `best_index`: the WHERE-clause constraints
/// under consideration and any requested ordering.
#[derive(Debug, Clone)]
pub struct IndexInfoInput {
    /// WHERE clause constraints the planner is considering.
    pub constraints: Vec<IndexConstraint>,
    /// ORDER BY terms from the query.
    pub order_by: Vec<IndexOrderBy>,
}

impl IndexInfoInput {
    /// Create a planner input from constraints and order-by terms.
    #[must_use]
    pub fn new(constraints: Vec<IndexConstraint>, order_by: Vec<IndexOrderBy>) -> Self {
        Self {
            constraints,
            order_by,
        }
    }
}

/// The plan descriptor `best_index` hands back to the host.
///
/// `idx_num` (and optionally `idx_str`) are opaque to the host: they are
/// passed verbatim to [`VirtualTableCursor::filter`], which reconstructs the
/// binding semantics without re-inspecting the constraint list.
#[derive(Debug, Clone)]
pub struct IndexInfoOutput {
    /// How each input constraint maps to filter arguments. Indexed in
    /// parallel with the input's `constraints`.
    pub constraint_usage: Vec<ConstraintUsage>,
    /// Integer identifier for the chosen plan.
    pub idx_num: i32,
    /// Optional string identifier for the chosen plan.
    pub idx_str: Option<String>,
    /// Whether the table guarantees the output is already sorted as
    /// requested (the host must not re-sort).
    pub order_by_consumed: bool,
    /// Estimated cost of the scan (lower is better).
    pub estimated_cost: f64,
    /// Estimated number of rows returned.
    pub estimated_rows: i64,
}

impl IndexInfoOutput {
    /// Create a descriptor for the given input, with no constraints consumed
    /// and deliberately pessimistic estimates.
    #[must_use]
    pub fn for_input(input: &IndexInfoInput) -> Self {
        Self {
            constraint_usage: vec![ConstraintUsage::default(); input.constraints.len()],
            idx_num: 0,
            idx_str: None,
            order_by_consumed: false,
            estimated_cost: 1_000_000.0,
            estimated_rows: 1_000_000,
        }
    }
}

// ---------------------------------------------------------------------------
// Column context
// ---------------------------------------------------------------------------

/// A context object passed to [`VirtualTableCursor::column`] for writing
/// the column value.
///
/// Analogous to C SQLite's `sqlite3_context*` used with `sqlite3_result_*`.
#[derive(Debug, Default)]
pub struct ColumnContext {
    value: Option<SqliteValue>,
}

impl ColumnContext {
    /// Create a new empty column context.
    #[must_use]
    pub fn new() -> Self {
        Self { value: None }
    }

    /// Set the value for this column.
    pub fn set_value(&mut self, val: SqliteValue) {
        self.value = Some(val);
    }

    /// Take the value out of this context, leaving `None`.
    pub fn take_value(&mut self) -> Option<SqliteValue> {
        self.value.take()
    }
}

// ---------------------------------------------------------------------------
// VirtualTable trait
// ---------------------------------------------------------------------------

/// A read-only virtual table module.
///
/// This trait covers the lifecycle of a computed table: creation,
/// connection, plan negotiation, scanning, and destruction. The `Sized`
/// bound on constructor methods (`create`, `connect`) allows the trait to
/// be used as `dyn VirtualTable<Cursor = C>` for other methods.
///
/// At minimum, implement `connect`, `declaration`, `best_index`, and `open`.
pub trait VirtualTable: Send + Sync {
    /// The cursor type for scanning this virtual table.
    type Cursor: VirtualTableCursor;

    /// Called for `CREATE VIRTUAL TABLE`.
    ///
    /// Default delegates to `connect` (suitable for eponymous tables with
    /// no backing storage).
    fn create(cx: &Cx, args: &[&str]) -> Result<Self>
    where
        Self: Sized,
    {
        Self::connect(cx, args)
    }

    /// Called for subsequent opens of an existing virtual table.
    fn connect(cx: &Cx, args: &[&str]) -> Result<Self>
    where
        Self: Sized;

    /// The `CREATE TABLE` statement declaring this table's shape.
    ///
    /// Argument columns are declared `HIDDEN`: they are reachable only via
    /// equality constraints, never emitted as ordinary output.
    fn declaration(&self) -> String;

    /// Negotiate a query plan with the host's optimizer.
    ///
    /// Inspects the usable constraints and requested ordering, and returns
    /// a plan descriptor: which constraints the table consumes (and in what
    /// argument order), cost/row estimates, and whether the requested
    /// ordering is satisfied by the scan itself.
    ///
    /// Returns [`LoadstoneError::Constraint`](loadstone_error::LoadstoneError::Constraint)
    /// when no valid plan exists for these constraints; the host must try
    /// another plan or fail the query.
    fn best_index(&self, input: &IndexInfoInput) -> Result<IndexInfoOutput>;

    /// Open a new scan cursor.
    fn open(&self) -> Result<Self::Cursor>;

    /// Drop a virtual table instance (opposite of `connect`).
    fn disconnect(&mut self, _cx: &Cx) -> Result<()> {
        Ok(())
    }

    /// Called for `DROP VIRTUAL TABLE` — destroy backing storage.
    ///
    /// Default delegates to `disconnect`.
    fn destroy(&mut self, cx: &Cx) -> Result<()> {
        self.disconnect(cx)
    }
}

// ---------------------------------------------------------------------------
// VirtualTableCursor trait
// ---------------------------------------------------------------------------

/// A cursor for scanning a virtual table.
///
/// Cursors are `Send` but **not** `Sync`: each is a single-threaded scan
/// object owned by the host for the duration of one table scan.
///
/// # Lifecycle
///
/// 1. [`filter`](Self::filter) begins a scan with planner-chosen parameters.
/// 2. Iterate: check [`eof`](Self::eof), read [`column`](Self::column) /
///    [`rowid`](Self::rowid), advance with [`next`](Self::next).
/// 3. The cursor is dropped when the scan is complete.
pub trait VirtualTableCursor: Send {
    /// Begin a scan with the plan chosen by `best_index`.
    ///
    /// `args` holds the values of the consumed constraints, ordered by
    /// their `argv_index` assignments.
    fn filter(
        &mut self,
        cx: &Cx,
        idx_num: i32,
        idx_str: Option<&str>,
        args: &[SqliteValue],
    ) -> Result<()>;

    /// Advance to the next row.
    ///
    /// Termination is the caller's responsibility via [`eof`](Self::eof);
    /// advancing past the end is not itself an error.
    fn next(&mut self, cx: &Cx) -> Result<()>;

    /// Whether the cursor has moved past the last row.
    fn eof(&self) -> bool;

    /// Write the value of column `col` into `ctx`.
    fn column(&self, ctx: &mut ColumnContext, col: i32) -> Result<()>;

    /// Return the row identifier of the current row.
    fn rowid(&self) -> Result<i64>;
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
