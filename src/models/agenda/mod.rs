// Agenda module
// Slot matrix returned by the scheduling API for one professional and date range

use std::fmt;

use chrono::{NaiveDate, NaiveTime, Timelike};
use indexmap::IndexMap;
use serde_json::{Map, Value};
use thiserror::Error;

use crate::models::appointment::AppointmentStatus;

/// Reserved row field holding the time of day. Every other field is a date column.
pub const TIME_FIELD: &str = "horario";

/// Row key of the agenda grid (`HH:MM`).
///
/// The label is kept exactly as the server sent it; parsing is only done on demand
/// so that an odd label never prevents a grid from being built.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TimeSlot(String);

impl TimeSlot {
    pub fn new(label: impl Into<String>) -> Self {
        Self(label.into())
    }

    pub fn label(&self) -> &str {
        &self.0
    }

    /// Parse the label as `HH:MM` (or `HH:MM:SS`).
    pub fn time(&self) -> Option<NaiveTime> {
        let label = self.0.trim();
        NaiveTime::parse_from_str(label, "%H:%M")
            .or_else(|_| NaiveTime::parse_from_str(label, "%H:%M:%S"))
            .ok()
    }

    pub fn is_half_hour_aligned(&self) -> bool {
        self.time()
            .map(|t| t.minute() % 30 == 0 && t.second() == 0)
            .unwrap_or(false)
    }
}

impl From<NaiveTime> for TimeSlot {
    fn from(time: NaiveTime) -> Self {
        Self(time.format("%H:%M").to_string())
    }
}

impl fmt::Display for TimeSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Column key of the agenda grid (`YYYY-MM-DD`).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DateColumn(String);

impl DateColumn {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn key(&self) -> &str {
        &self.0
    }

    pub fn date(&self) -> Option<NaiveDate> {
        NaiveDate::parse_from_str(self.0.trim(), "%Y-%m-%d").ok()
    }
}

impl From<NaiveDate> for DateColumn {
    fn from(date: NaiveDate) -> Self {
        Self(date.format("%Y-%m-%d").to_string())
    }
}

impl fmt::Display for DateColumn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Booking details attached to an occupied slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OccupiedSlot {
    pub appointment_id: i64,
    pub client_id: Option<i64>,
    pub client_name: String,
    pub service_id: Option<i64>,
    pub service_name: String,
    pub status: AppointmentStatus,
    pub recurrence_id: Option<String>,
}

impl OccupiedSlot {
    pub fn new(appointment_id: i64, client_name: impl Into<String>, service_name: impl Into<String>) -> Self {
        Self {
            appointment_id,
            client_id: None,
            client_name: client_name.into(),
            service_id: None,
            service_name: service_name.into(),
            status: AppointmentStatus::Scheduled,
            recurrence_id: None,
        }
    }

    pub fn with_status(mut self, status: AppointmentStatus) -> Self {
        self.status = status;
        self
    }

    pub fn with_recurrence(mut self, recurrence_id: impl Into<String>) -> Self {
        self.recurrence_id = Some(recurrence_id.into());
        self
    }

    pub fn is_recurring(&self) -> bool {
        self.recurrence_id.is_some()
    }
}

/// One (time, date) slot of the agenda.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AgendaCell {
    /// The professional does not work this slot.
    OutsideHours,
    /// Bookable, no appointment yet.
    Available,
    Occupied(OccupiedSlot),
}

impl AgendaCell {
    pub fn appointment_id(&self) -> Option<i64> {
        match self {
            AgendaCell::Occupied(slot) => Some(slot.appointment_id),
            _ => None,
        }
    }

    pub fn is_occupied(&self) -> bool {
        matches!(self, AgendaCell::Occupied(_))
    }

    /// Decode one date field of a server row.
    ///
    /// Anything that cannot be understood degrades to `OutsideHours`.
    pub fn from_value(value: &Value) -> Self {
        match value {
            Value::Bool(true) => AgendaCell::Available,
            Value::String(marker) if marker.trim().eq_ignore_ascii_case("disponivel") => {
                AgendaCell::Available
            }
            Value::Object(fields) => Self::from_object(fields),
            _ => AgendaCell::OutsideHours,
        }
    }

    fn from_object(fields: &Map<String, Value>) -> Self {
        if let Some(appointment_id) = fields.get("agendamento_id").and_then(value_as_id) {
            let status = fields
                .get("status")
                .and_then(Value::as_str)
                .map(AppointmentStatus::parse)
                .unwrap_or_default();

            return AgendaCell::Occupied(OccupiedSlot {
                appointment_id,
                client_id: fields.get("cliente_id").and_then(value_as_id),
                client_name: string_field(fields, "cliente_nome"),
                service_id: fields.get("servico_id").and_then(value_as_id),
                service_name: string_field(fields, "servico_nome"),
                status,
                recurrence_id: fields.get("recorrencia_id").and_then(value_as_key),
            });
        }

        match fields.get("disponivel") {
            Some(Value::Bool(true)) => AgendaCell::Available,
            _ => AgendaCell::OutsideHours,
        }
    }
}

fn string_field(fields: &Map<String, Value>, name: &str) -> String {
    fields
        .get(name)
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}

/// Ids arrive as numbers, or as numeric strings from older endpoints.
fn value_as_id(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn value_as_key(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// One time row: the slot label plus its date cells in server order.
/// Cells are keyed by column so lookups stay constant time on wide ranges.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AgendaRow {
    time: TimeSlot,
    cells: IndexMap<DateColumn, AgendaCell>,
}

impl AgendaRow {
    pub fn new(time: impl Into<String>) -> Self {
        Self {
            time: TimeSlot::new(time),
            cells: IndexMap::new(),
        }
    }

    /// Append a cell; a repeated column replaces the earlier value in place.
    pub fn with_cell(mut self, column: impl Into<String>, cell: AgendaCell) -> Self {
        self.insert(DateColumn::new(column), cell);
        self
    }

    pub fn insert(&mut self, column: DateColumn, cell: AgendaCell) {
        self.cells.insert(column, cell);
    }

    pub fn time(&self) -> &TimeSlot {
        &self.time
    }

    pub fn cell(&self, column: &DateColumn) -> Option<&AgendaCell> {
        self.cells.get(column)
    }

    pub fn columns(&self) -> impl Iterator<Item = &DateColumn> {
        self.cells.keys()
    }

    fn from_object(fields: &Map<String, Value>) -> Self {
        let time = match fields.get(TIME_FIELD) {
            Some(Value::String(label)) => label.clone(),
            Some(other) if !other.is_null() => other.to_string(),
            _ => String::new(),
        };

        let mut row = AgendaRow::new(time);
        row.cells.reserve(fields.len());
        for (key, value) in fields {
            if key == TIME_FIELD {
                continue;
            }
            row.insert(DateColumn::new(key.as_str()), AgendaCell::from_value(value));
        }
        row
    }
}

#[derive(Debug, Error)]
pub enum MatrixError {
    #[error("agenda response must be a JSON array, got {0}")]
    NotAnArray(&'static str),
    #[error("agenda response is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Full slot matrix for one query, rows ordered by time as the server sent them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AgendaMatrix {
    rows: Vec<AgendaRow>,
}

impl AgendaMatrix {
    pub fn new(rows: Vec<AgendaRow>) -> Self {
        Self { rows }
    }

    pub fn rows(&self) -> &[AgendaRow] {
        &self.rows
    }

    pub fn row(&self, index: usize) -> Option<&AgendaRow> {
        self.rows.get(index)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Cell at (row, column). Out-of-range rows and missing keys yield `None`.
    pub fn cell(&self, row_index: usize, column: &DateColumn) -> Option<&AgendaCell> {
        self.rows.get(row_index).and_then(|row| row.cell(column))
    }

    /// First (earliest) position holding `appointment_id`, scanning rows in order.
    pub fn find_appointment(&self, appointment_id: i64) -> Option<(&TimeSlot, &DateColumn, &OccupiedSlot)> {
        self.rows.iter().find_map(|row| {
            row.cells.iter().find_map(|(column, cell)| match cell {
                AgendaCell::Occupied(slot) if slot.appointment_id == appointment_id => {
                    Some((&row.time, column, slot))
                }
                _ => None,
            })
        })
    }

    pub fn from_json_str(body: &str) -> Result<Self, MatrixError> {
        let value: Value = serde_json::from_str(body)?;
        Self::from_json_value(&value)
    }

    pub fn from_json_value(value: &Value) -> Result<Self, MatrixError> {
        let items = match value {
            Value::Array(items) => items,
            Value::Null => return Err(MatrixError::NotAnArray("null")),
            Value::Bool(_) => return Err(MatrixError::NotAnArray("a boolean")),
            Value::Number(_) => return Err(MatrixError::NotAnArray("a number")),
            Value::String(_) => return Err(MatrixError::NotAnArray("a string")),
            Value::Object(_) => return Err(MatrixError::NotAnArray("an object")),
        };

        let mut rows = Vec::with_capacity(items.len());
        for (index, item) in items.iter().enumerate() {
            match item {
                Value::Object(fields) => rows.push(AgendaRow::from_object(fields)),
                other => log::warn!("Skipping agenda row {}: expected an object, got {}", index, other),
            }
        }

        Ok(Self { rows })
    }
}
