//! End-to-end scans of `generate_series`, driven the way a host engine
//! drives a virtual table: `best_index` picks the plan, the constraint
//! usage map orders the filter arguments, and the cursor runs to eof.

use loadstone_func::vtab::{
    ColumnContext, ConstraintOp, IndexConstraint, IndexInfoInput, IndexOrderBy, VirtualTable,
    VirtualTableCursor,
};
use loadstone_ext_series::{
    SERIES_COLUMN_START, SERIES_COLUMN_STEP, SERIES_COLUMN_STOP, SERIES_COLUMN_VALUE, SeriesTable,
};
use loadstone_types::SqliteValue;
use loadstone_types::cx::Cx;
use proptest::prelude::*;

/// Drive a complete query: plan with `best_index` over equality constraints
/// on the given argument columns, bind the values in argv order, scan.
fn run_query(
    bindings: &[(i32, i64)],
    order_by: Vec<IndexOrderBy>,
) -> loadstone_error::Result<Vec<i64>> {
    let cx = Cx::new();
    let table = SeriesTable::connect(&cx, &[])?;

    let constraints: Vec<IndexConstraint> = bindings
        .iter()
        .map(|&(column, _)| IndexConstraint {
            column,
            op: ConstraintOp::Eq,
            usable: true,
        })
        .collect();
    let input = IndexInfoInput::new(constraints, order_by);
    let output = table.best_index(&input)?;

    // Place each binding into the slot its argv_index demands, exactly as a
    // host assembles the filter argument array.
    let mut args: Vec<(i32, SqliteValue)> = bindings
        .iter()
        .zip(&output.constraint_usage)
        .filter(|(_, usage)| usage.argv_index > 0)
        .map(|(&(_, value), usage)| (usage.argv_index, SqliteValue::Integer(value)))
        .collect();
    args.sort_by_key(|&(idx, _)| idx);
    let args: Vec<SqliteValue> = args.into_iter().map(|(_, v)| v).collect();

    let mut cursor = table.open()?;
    cursor.filter(&cx, output.idx_num, output.idx_str.as_deref(), &args)?;

    let mut values = Vec::new();
    while !cursor.eof() {
        let mut ctx = ColumnContext::new();
        cursor.column(&mut ctx, SERIES_COLUMN_VALUE)?;
        if let Some(v) = ctx.take_value() {
            values.push(v.to_integer());
        }
        cursor.next(&cx)?;
    }
    Ok(values)
}

fn order(desc: bool) -> Vec<IndexOrderBy> {
    vec![IndexOrderBy {
        column: SERIES_COLUMN_VALUE,
        desc,
    }]
}

#[test]
fn full_query_ascending() {
    let values = run_query(
        &[
            (SERIES_COLUMN_START, 1),
            (SERIES_COLUMN_STOP, 9),
            (SERIES_COLUMN_STEP, 2),
        ],
        vec![],
    )
    .unwrap();
    assert_eq!(values, vec![1, 3, 5, 7, 9]);
}

#[test]
fn full_query_order_by_desc() {
    let values = run_query(
        &[(SERIES_COLUMN_START, 1), (SERIES_COLUMN_STOP, 5)],
        order(true),
    )
    .unwrap();
    assert_eq!(values, vec![5, 4, 3, 2, 1]);
}

#[test]
fn full_query_shuffled_constraint_order() {
    // The host is free to present constraints in any order; the argv
    // protocol still binds start before stop before step.
    let values = run_query(
        &[
            (SERIES_COLUMN_STEP, 3),
            (SERIES_COLUMN_START, 0),
            (SERIES_COLUMN_STOP, 10),
        ],
        vec![],
    )
    .unwrap();
    assert_eq!(values, vec![0, 3, 6, 9]);
}

#[test]
fn full_query_stop_only() {
    let values = run_query(&[(SERIES_COLUMN_STOP, 4)], vec![]).unwrap();
    assert_eq!(values, vec![0, 1, 2, 3, 4]);
}

proptest! {
    /// Ascending scans visit exactly start, start+step, ... up to stop.
    #[test]
    fn prop_ascending_matches_reference(
        start in -10_000_i64..10_000,
        span in 0_i64..2_000,
        step in 1_i64..500,
    ) {
        let stop = start + span;
        let values = run_query(
            &[
                (SERIES_COLUMN_START, start),
                (SERIES_COLUMN_STOP, stop),
                (SERIES_COLUMN_STEP, step),
            ],
            vec![],
        )
        .unwrap();

        let expected: Vec<i64> = (start..=stop).step_by(step as usize).collect();
        prop_assert_eq!(values, expected);
    }

    /// A descending scan is the exact reverse of the ascending scan over
    /// the same range.
    #[test]
    fn prop_descending_reverses_ascending(
        start in -10_000_i64..10_000,
        span in 0_i64..2_000,
        step in 1_i64..500,
    ) {
        let bindings = [
            (SERIES_COLUMN_START, start),
            (SERIES_COLUMN_STOP, start + span),
            (SERIES_COLUMN_STEP, step),
        ];
        let asc = run_query(&bindings, order(false)).unwrap();
        let mut desc = run_query(&bindings, order(true)).unwrap();
        desc.reverse();
        prop_assert_eq!(asc, desc);
    }

    /// Row count follows (stop - start) / step + 1 whenever start <= stop.
    #[test]
    fn prop_row_count(
        start in -10_000_i64..10_000,
        span in 0_i64..5_000,
        step in 1_i64..1_000,
    ) {
        let stop = start + span;
        let values = run_query(
            &[
                (SERIES_COLUMN_START, start),
                (SERIES_COLUMN_STOP, stop),
                (SERIES_COLUMN_STEP, step),
            ],
            vec![],
        )
        .unwrap();
        prop_assert_eq!(values.len() as i64, (stop - start) / step + 1);
    }

    /// Every emitted value lies on the step grid within the bounds.
    #[test]
    fn prop_values_on_grid(
        start in -10_000_i64..10_000,
        span in 0_i64..2_000,
        step in 1_i64..500,
        desc in proptest::bool::ANY,
    ) {
        let stop = start + span;
        let values = run_query(
            &[
                (SERIES_COLUMN_START, start),
                (SERIES_COLUMN_STOP, stop),
                (SERIES_COLUMN_STEP, step),
            ],
            order(desc),
        )
        .unwrap();
        for v in values {
            prop_assert!(v >= start && v <= stop);
            prop_assert_eq!((v - start) % step, 0);
        }
    }
}
