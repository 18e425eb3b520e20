// Property-based tests for the agenda grid model
mod fixtures;

use proptest::prelude::*;

use fixtures::{column_matrix, MONDAY};
use salon_agenda::models::agenda::{AgendaCell, AgendaMatrix, AgendaRow, DateColumn};
use salon_agenda::models::ui::{AgendaQuery, ViewMode};
use salon_agenda::services::grid::{
    appointment_id_at, build_grid, compute_span, derive_columns, is_span_anchor, GridCell,
};
use chrono::NaiveDate;

/// Column contents drawn from a small id pool so that runs actually form.
fn column_ids() -> impl Strategy<Value = Vec<Option<i64>>> {
    prop::collection::vec(prop::option::of(1..4i64), 0..24)
}

proptest! {
    /// Property: a span covers exactly the maximal run of the anchor's appointment
    #[test]
    fn prop_span_is_maximal_contiguous_run(ids in column_ids(), start in 0usize..24) {
        let matrix = column_matrix(&ids);
        prop_assume!(start < matrix.len());
        let column = DateColumn::new(MONDAY);

        let id = appointment_id_at(&matrix, start, &column);
        let span = compute_span(&matrix, start, &column, id);

        match id {
            None => prop_assert_eq!(span, 1),
            Some(id) => {
                for row in start..start + span {
                    prop_assert_eq!(appointment_id_at(&matrix, row, &column), Some(id));
                }
                let after = start + span;
                prop_assert!(after >= matrix.len() || appointment_id_at(&matrix, after, &column) != Some(id));
            }
        }
    }

    /// Property: every row is either rendered once or covered by exactly one span
    #[test]
    fn prop_rendered_spans_tile_each_column(ids in column_ids()) {
        let matrix = column_matrix(&ids);
        let grid = build_grid(&matrix);
        let column = DateColumn::new(MONDAY);

        let mut covered_until = 0;
        for (index, row) in grid.rows.iter().enumerate() {
            match &row.cells[0] {
                GridCell::Render { row_span, .. } => {
                    prop_assert_eq!(index, covered_until);
                    prop_assert!(is_span_anchor(&matrix, index, &column));
                    covered_until = index + row_span;
                }
                GridCell::Covered => {
                    prop_assert!(index < covered_until);
                    prop_assert!(!is_span_anchor(&matrix, index, &column));
                }
            }
        }
        prop_assert_eq!(covered_until, matrix.len());
    }

    /// Property: derivation is a pure function of the matrix
    #[test]
    fn prop_grid_is_idempotent(ids in column_ids()) {
        let matrix = column_matrix(&ids);
        prop_assert_eq!(build_grid(&matrix), build_grid(&matrix));
        prop_assert_eq!(derive_columns(&matrix), derive_columns(&matrix));
    }

    /// Property: columns are the first row's keys in insertion order
    #[test]
    fn prop_columns_match_first_row(day_offsets in prop::collection::vec(0i64..60, 1..8)) {
        let base = NaiveDate::from_ymd_opt(2025, 4, 1).unwrap();
        let mut row = AgendaRow::new("09:00");
        let mut expected: Vec<DateColumn> = Vec::new();
        for offset in day_offsets {
            let column = DateColumn::from(base + chrono::Duration::days(offset));
            if !expected.contains(&column) {
                expected.push(column.clone());
            }
            row.insert(column, AgendaCell::Available);
        }

        let matrix = AgendaMatrix::new(vec![row]);
        prop_assert_eq!(derive_columns(&matrix), expected);
    }

    /// Property: whatever sequence of start/end edits happens, a week query never inverts
    #[test]
    fn prop_week_range_never_inverts(
        edits in prop::collection::vec((any::<bool>(), 0i64..40), 1..20)
    ) {
        let base = NaiveDate::from_ymd_opt(2025, 4, 21).unwrap();
        let mut query = AgendaQuery::new(base, ViewMode::Week);

        for (is_start, offset) in edits {
            let value = (base + chrono::Duration::days(offset)).format("%Y-%m-%d").to_string();
            if is_start {
                query.set_start_date(value);
            } else {
                query.set_end_date(value);
            }
            let (start, end) = query.date_range().unwrap();
            prop_assert!(start <= end);
        }
    }
}
