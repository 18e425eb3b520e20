// HTML rendering for the agenda grid
// Emits a plain <table>; covered positions produce no <td> at all

use maud::{html, Markup};

use crate::models::agenda::DateColumn;
use crate::services::grid::{AgendaGrid, CellAction, GridCell};
use crate::utils::date::format_column_header;

pub const EMPTY_STATE_MESSAGE: &str = "Nenhum horário encontrado para o período selecionado.";

pub fn render_html(grid: &AgendaGrid) -> String {
    render_agenda(grid).into_string()
}

/// The agenda table, or the empty-state paragraph when there is nothing to show.
pub fn render_agenda(grid: &AgendaGrid) -> Markup {
    if grid.is_empty() {
        return html! {
            p.agenda-empty { (EMPTY_STATE_MESSAGE) }
        };
    }

    html! {
        table.agenda {
            thead {
                tr {
                    th { "Horário" }
                    @for column in &grid.columns {
                        th data-date=(column.key()) { (column_header(column)) }
                    }
                }
            }
            tbody {
                @for row in &grid.rows {
                    tr {
                        th scope="row" { (row.time.label()) }
                        @for cell in &row.cells {
                            @if let (GridCell::Render { descriptor, row_span, action }) = cell {
                                @let rowspan = (*row_span > 1).then_some(*row_span);
                                @let target = CellTarget::from(action);
                                @let tabindex = descriptor.interactive.then_some(0);
                                td
                                    rowspan=[rowspan]
                                    class=(descriptor.style.class_name())
                                    data-date=[target.date]
                                    data-time=[target.time]
                                    data-appointment=[target.appointment_id]
                                    data-recurrence=[target.recurrence_id]
                                    tabindex=[tabindex]
                                { (descriptor.label) }
                            }
                        }
                    }
                }
            }
        }
    }
}

fn column_header(column: &DateColumn) -> String {
    column
        .date()
        .map(format_column_header)
        .unwrap_or_else(|| column.key().to_string())
}

/// Data attributes that tell the front-end which booking a cell opens.
struct CellTarget<'a> {
    date: Option<&'a str>,
    time: Option<&'a str>,
    appointment_id: Option<i64>,
    recurrence_id: Option<&'a str>,
}

impl<'a> From<&'a CellAction> for CellTarget<'a> {
    fn from(action: &'a CellAction) -> Self {
        match action {
            CellAction::AddBooking { date, time } => Self {
                date: Some(date.key()),
                time: Some(time.label()),
                appointment_id: None,
                recurrence_id: None,
            },
            CellAction::EditBooking {
                appointment_id,
                recurrence_id,
            } => Self {
                date: None,
                time: None,
                appointment_id: Some(*appointment_id),
                recurrence_id: recurrence_id.as_deref(),
            },
        }
    }
}
