//! Agenda grid model.
//!
//! Turns the slot matrix returned by the API into render instructions: the ordered
//! date columns and, for every (time, date) position, either a cell to draw (with its
//! label, style and vertical span) or nothing at all because an appointment started
//! in an earlier row already covers it.
//!
//! Everything here is a pure function of the matrix; nothing is cached between calls.

use crate::models::agenda::{AgendaCell, AgendaMatrix, DateColumn, TimeSlot, TIME_FIELD};
use crate::models::appointment::AppointmentStatus;

/// Style key of a rendered cell. The renderer maps it to a CSS class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CellStyle {
    OutsideHours,
    Available,
    Active,
    Completed,
    Cancelled,
}

impl CellStyle {
    pub fn class_name(self) -> &'static str {
        match self {
            CellStyle::OutsideHours => "slot-outside",
            CellStyle::Available => "slot-available",
            CellStyle::Active => "slot-active",
            CellStyle::Completed => "slot-completed",
            CellStyle::Cancelled => "slot-cancelled",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CellDescriptor {
    pub label: String,
    pub interactive: bool,
    pub style: CellStyle,
}

/// What clicking a rendered cell opens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CellAction {
    AddBooking { date: DateColumn, time: TimeSlot },
    EditBooking {
        appointment_id: i64,
        recurrence_id: Option<String>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GridCell {
    Render {
        descriptor: CellDescriptor,
        row_span: usize,
        action: CellAction,
    },
    /// Covered by a span anchored in an earlier row; emit nothing.
    Covered,
}

impl GridCell {
    pub fn row_span(&self) -> Option<usize> {
        match self {
            GridCell::Render { row_span, .. } => Some(*row_span),
            GridCell::Covered => None,
        }
    }

    pub fn is_covered(&self) -> bool {
        matches!(self, GridCell::Covered)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GridRow {
    pub time: TimeSlot,
    /// One entry per grid column, in column order.
    pub cells: Vec<GridCell>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AgendaGrid {
    pub columns: Vec<DateColumn>,
    pub rows: Vec<GridRow>,
}

impl AgendaGrid {
    /// True when there is nothing to tabulate; show an empty-state message instead.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty() || self.columns.is_empty()
    }
}

/// Date columns of the grid: the keys of the first row minus the time field, in
/// the order the server sent them.
pub fn derive_columns(matrix: &AgendaMatrix) -> Vec<DateColumn> {
    match matrix.row(0) {
        Some(first) => first
            .columns()
            .filter(|column| column.key() != TIME_FIELD)
            .cloned()
            .collect(),
        None => Vec::new(),
    }
}

/// Appointment id at (row, column); missing rows or keys have none.
pub fn appointment_id_at(matrix: &AgendaMatrix, row_index: usize, column: &DateColumn) -> Option<i64> {
    matrix
        .cell(row_index, column)
        .and_then(AgendaCell::appointment_id)
}

/// Number of contiguous rows, starting at `row_index`, whose cell in `column`
/// belongs to `appointment_id`. Without an appointment the span is always 1.
pub fn compute_span(
    matrix: &AgendaMatrix,
    row_index: usize,
    column: &DateColumn,
    appointment_id: Option<i64>,
) -> usize {
    let Some(id) = appointment_id else {
        return 1;
    };
    if row_index >= matrix.len() {
        return 1;
    }

    let mut span = 1;
    let mut next = row_index + 1;
    while next < matrix.len() && appointment_id_at(matrix, next, column) == Some(id) {
        span += 1;
        next += 1;
    }
    span
}

/// An occupied cell anchors a span only if the row above holds a different
/// appointment (or it is the first row). Cells without an appointment always anchor.
///
/// `build_grid` reaches the same anchors by jumping over each span; this is the
/// per-position query for callers that inspect a single cell.
pub fn is_span_anchor(matrix: &AgendaMatrix, row_index: usize, column: &DateColumn) -> bool {
    let Some(id) = appointment_id_at(matrix, row_index, column) else {
        return true;
    };

    row_index == 0 || appointment_id_at(matrix, row_index - 1, column) != Some(id)
}

pub fn classify_cell(cell: &AgendaCell) -> CellDescriptor {
    match cell {
        AgendaCell::OutsideHours => CellDescriptor {
            label: "Fora do expediente".to_string(),
            interactive: true,
            style: CellStyle::OutsideHours,
        },
        AgendaCell::Available => CellDescriptor {
            label: "Disponível".to_string(),
            interactive: true,
            style: CellStyle::Available,
        },
        AgendaCell::Occupied(slot) => {
            let style = match slot.status {
                AppointmentStatus::Completed => CellStyle::Completed,
                AppointmentStatus::Cancelled => CellStyle::Cancelled,
                _ => CellStyle::Active,
            };

            let label = match (slot.client_name.trim(), slot.service_name.trim()) {
                ("", "") => format!("Agendamento #{}", slot.appointment_id),
                (client, "") => client.to_string(),
                ("", service) => service.to_string(),
                (client, service) => format!("{} - {}", client, service),
            };

            CellDescriptor {
                label,
                interactive: true,
                style,
            }
        }
    }
}

/// Build the full render plan.
///
/// Each position is visited once: a span scan only runs from anchor cells,
/// every row it walks over is marked covered, and cell lookups are constant
/// time by column key. The whole pass is O(rows × columns).
pub fn build_grid(matrix: &AgendaMatrix) -> AgendaGrid {
    let columns = derive_columns(matrix);
    let mut rows: Vec<GridRow> = matrix
        .rows()
        .iter()
        .map(|row| GridRow {
            time: row.time().clone(),
            cells: Vec::with_capacity(columns.len()),
        })
        .collect();

    for column in &columns {
        let mut row_index = 0;
        while row_index < matrix.len() {
            // A missing key degrades to outside hours.
            let cell = matrix
                .cell(row_index, column)
                .cloned()
                .unwrap_or(AgendaCell::OutsideHours);
            let appointment_id = cell.appointment_id();
            let row_span = compute_span(matrix, row_index, column, appointment_id);

            let action = match &cell {
                AgendaCell::Occupied(slot) => CellAction::EditBooking {
                    appointment_id: slot.appointment_id,
                    recurrence_id: slot.recurrence_id.clone(),
                },
                _ => CellAction::AddBooking {
                    date: column.clone(),
                    time: rows[row_index].time.clone(),
                },
            };

            debug_assert!(is_span_anchor(matrix, row_index, column));
            rows[row_index].cells.push(GridCell::Render {
                descriptor: classify_cell(&cell),
                row_span,
                action,
            });
            for covered in (row_index + 1)..(row_index + row_span) {
                rows[covered].cells.push(GridCell::Covered);
            }

            row_index += row_span;
        }
    }

    AgendaGrid { columns, rows }
}
