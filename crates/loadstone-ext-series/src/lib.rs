//! `generate_series(START, STOP [, STEP])`: a virtual table that generates
//! a sequence of integers, commonly used in joins and CTEs.
//!
//! The table has one visible column (`value`) and three HIDDEN argument
//! columns (`start`, `stop`, `step`). The arguments reach the table as
//! equality constraints, which [`SeriesTable::best_index`] folds into a
//! bitmask plan number; [`SeriesCursor::filter`] reconstructs the scan
//! parameters from that plan without re-inspecting the constraint list.
//!
//! Usage: `SELECT value FROM generate_series(1, 10)` produces rows 1..=10.
//! The optional third argument specifies the step (default 1). With both
//! bounds constrained the scan can also run descending, letting the host
//! drop its ORDER BY sort step.

use loadstone_error::{LoadstoneError, Result};
use loadstone_func::vtab::{
    ColumnContext, ConstraintUsage, IndexInfoInput, IndexInfoOutput, VirtualTable,
    VirtualTableCursor,
};
use loadstone_types::SqliteValue;
use loadstone_types::cx::Cx;
use tracing::debug;

#[must_use]
pub const fn extension_name() -> &'static str {
    "series"
}

/// Column order of the declared table shape.
pub const SERIES_COLUMN_VALUE: i32 = 0;
pub const SERIES_COLUMN_START: i32 = 1;
pub const SERIES_COLUMN_STOP: i32 = 2;
pub const SERIES_COLUMN_STEP: i32 = 3;

// Plan bitmask handed from best_index to filter. Bits 0..2 say which of the
// start/stop/step arguments are bound; bit 3 requests a descending scan.
const PLAN_START: i32 = 1;
const PLAN_STOP: i32 = 2;
const PLAN_STEP: i32 = 4;
const PLAN_DESC: i32 = 8;

/// The `generate_series` virtual table module.
///
/// Eponymous and read-only: `create` shares the `connect` path and there is
/// no backing storage to destroy.
pub struct SeriesTable;

impl VirtualTable for SeriesTable {
    type Cursor = SeriesCursor;

    fn connect(_cx: &Cx, _args: &[&str]) -> Result<Self> {
        Ok(Self)
    }

    fn declaration(&self) -> String {
        "CREATE TABLE generate_series(value, start HIDDEN, stop HIDDEN, step HIDDEN)".to_owned()
    }

    fn best_index(&self, input: &IndexInfoInput) -> Result<IndexInfoOutput> {
        let mut output = IndexInfoOutput::for_input(input);
        // The query plan bitmask.
        let mut idx_num = 0_i32;
        // Mask of unusable constraints on the argument columns.
        let mut unusable_mask = 0_i32;
        // Constraint index holding each of start, stop, step.
        let mut arg_constraint: [Option<usize>; 3] = [None; 3];

        for (i, con) in input.constraints.iter().enumerate() {
            if con.column < SERIES_COLUMN_START || con.column > SERIES_COLUMN_STEP {
                continue;
            }
            // Hidden argument columns are only ever constrained by equality.
            let arg = (con.column - SERIES_COLUMN_START) as usize;
            let mask = 1_i32 << arg;
            if con.usable {
                idx_num |= mask;
                arg_constraint[arg] = Some(i);
            } else {
                unusable_mask |= mask;
            }
        }

        // Filter arguments are bound 1, 2, 3 in fixed start, stop, step
        // order, skipping arguments with no usable constraint.
        let mut args = 0_i32;
        for i in arg_constraint.into_iter().flatten() {
            args += 1;
            output.constraint_usage[i] = ConstraintUsage {
                argv_index: args,
                omit: false,
            };
        }

        if unusable_mask & !idx_num != 0 {
            // start, stop, and step are inputs, not filterable outputs. An
            // unusable constraint on any of them, with no usable
            // replacement for the same column, leaves the generator with no
            // way to obtain that argument: the whole plan is invalid.
            return Err(LoadstoneError::constraint(
                "generate_series: unusable constraint on an argument column",
            ));
        }

        if idx_num & (PLAN_START | PLAN_STOP) == PLAN_START | PLAN_STOP {
            // Both bounds are available: the preferred case.
            output.estimated_cost = if idx_num & PLAN_STEP != 0 { 1.0 } else { 2.0 };
            output.estimated_rows = 1000;
            if let [order] = input.order_by.as_slice() {
                if order.desc {
                    idx_num |= PLAN_DESC;
                }
                output.order_by_consumed = true;
            }
        } else {
            // A missing bound means generating a huge span of numbers.
            // Make this case very expensive so the host's planner works
            // hard to avoid it.
            output.estimated_cost = 2_147_483_647.0;
            output.estimated_rows = 2_147_483_647;
        }
        output.idx_num = idx_num;
        debug!(
            idx_num,
            cost = output.estimated_cost,
            rows = output.estimated_rows,
            order_by_consumed = output.order_by_consumed,
            "generate_series: plan selected"
        );
        Ok(output)
    }

    fn open(&self) -> Result<SeriesCursor> {
        Ok(SeriesCursor {
            value: 0,
            min_value: 0,
            max_value: 0,
            step: 1,
            descending: false,
            rowid: 0,
        })
    }
}

/// Cursor for one `generate_series` scan.
pub struct SeriesCursor {
    /// Current emitted value (the `value` column).
    value: i64,
    /// Lower bound (the `start` column).
    min_value: i64,
    /// Upper bound (the `stop` column).
    max_value: i64,
    /// Increment magnitude; always >= 1. Direction is carried by
    /// `descending`, not by the sign of the step.
    step: i64,
    /// True to count down rather than up.
    descending: bool,
    /// 1-based row counter.
    rowid: i64,
}

/// Read the bound argument at `slot`.
///
/// NULL is `Ok(None)`: a NULL range bound means "no rows", not an error.
/// Any other non-integer storage class is rejected rather than coerced.
fn bound_value(args: &[SqliteValue], slot: usize) -> Result<Option<i64>> {
    match args.get(slot) {
        Some(SqliteValue::Integer(i)) => Ok(Some(*i)),
        Some(SqliteValue::Null) => Ok(None),
        Some(other) => Err(LoadstoneError::type_mismatch("integer", other.typeof_str())),
        None => Err(LoadstoneError::internal(
            "generate_series: filter argument missing for plan",
        )),
    }
}

impl VirtualTableCursor for SeriesCursor {
    fn filter(
        &mut self,
        cx: &Cx,
        idx_num: i32,
        _idx_str: Option<&str>,
        args: &[SqliteValue],
    ) -> Result<()> {
        cx.checkpoint()?;
        self.min_value = 0;
        self.max_value = 0xFFFF_FFFF;
        self.step = 1;

        // Bound arguments arrive in start, stop, step order, only for the
        // bits actually set in the plan.
        let mut slot = 0_usize;
        let mut saw_null = false;

        if idx_num & PLAN_START != 0 {
            match bound_value(args, slot)? {
                Some(v) => self.min_value = v,
                None => saw_null = true,
            }
            slot += 1;
        }
        if idx_num & PLAN_STOP != 0 {
            match bound_value(args, slot)? {
                Some(v) => self.max_value = v,
                None => saw_null = true,
            }
            slot += 1;
        }
        if idx_num & PLAN_STEP != 0 {
            match bound_value(args, slot)? {
                // A non-positive step is clamped to 1, never an error.
                Some(v) => self.step = v.max(1),
                None => saw_null = true,
            }
        }

        if saw_null {
            // NULL on any bound forces an empty result set: an inherently
            // empty ascending range, regardless of direction.
            self.min_value = 1;
            self.max_value = 0;
        }

        self.descending = idx_num & PLAN_DESC != 0;
        if self.descending {
            // Start at the largest value <= max_value reachable from
            // min_value by whole steps, so the descending scan visits
            // exactly the ascending value set, reversed.
            self.value = self.max_value.wrapping_sub(
                self.max_value.wrapping_sub(self.min_value) % self.step,
            );
        } else {
            self.value = self.min_value;
        }
        self.rowid = 1;
        debug!(
            min = self.min_value,
            max = self.max_value,
            step = self.step,
            descending = self.descending,
            "generate_series: cursor initialized"
        );
        Ok(())
    }

    fn next(&mut self, cx: &Cx) -> Result<()> {
        cx.checkpoint()?;
        // Overflow is unguarded: callers must not request spans exceeding
        // the i64 domain. Termination is the caller's job via eof().
        if self.descending {
            self.value = self.value.wrapping_sub(self.step);
        } else {
            self.value = self.value.wrapping_add(self.step);
        }
        self.rowid += 1;
        Ok(())
    }

    fn eof(&self) -> bool {
        if self.descending {
            self.value < self.min_value
        } else {
            self.value > self.max_value
        }
    }

    fn column(&self, ctx: &mut ColumnContext, col: i32) -> Result<()> {
        // Any column index other than the three arguments resolves to the
        // live generator value.
        let x = match col {
            SERIES_COLUMN_START => self.min_value,
            SERIES_COLUMN_STOP => self.max_value,
            SERIES_COLUMN_STEP => self.step,
            _ => self.value,
        };
        ctx.set_value(SqliteValue::Integer(x));
        Ok(())
    }

    fn rowid(&self) -> Result<i64> {
        Ok(self.rowid)
    }
}
