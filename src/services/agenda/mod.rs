//! State holder for the agenda view.
//!
//! Owns the query tuple, the last fetched matrix and the booking editor. Every
//! query change requires a full re-fetch; every successful booking mutation triggers
//! one. Responses are fenced by a request token so a slow, stale fetch can never
//! overwrite the result of a newer one.

use chrono::NaiveDate;

use crate::models::agenda::AgendaMatrix;
use crate::models::appointment::BookingPayloadBuilder;
use crate::models::ui::{AgendaQuery, ViewMode};
use crate::services::api::{AgendaApi, AgendaRequest, ApiError};
use crate::services::grid::{build_grid, AgendaGrid, CellAction};

/// Identifies one issued agenda fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RequestToken(u64);

#[derive(Debug, Clone, Default)]
pub enum BookingEditor {
    #[default]
    Closed,
    Creating {
        draft: BookingPayloadBuilder,
    },
    Editing {
        appointment_id: i64,
        recurrence_id: Option<String>,
        draft: BookingPayloadBuilder,
    },
}

impl BookingEditor {
    pub fn is_open(&self) -> bool {
        !matches!(self, BookingEditor::Closed)
    }

    pub fn draft(&self) -> Option<&BookingPayloadBuilder> {
        match self {
            BookingEditor::Closed => None,
            BookingEditor::Creating { draft } | BookingEditor::Editing { draft, .. } => Some(draft),
        }
    }
}

pub struct AgendaController {
    query: AgendaQuery,
    matrix: Option<AgendaMatrix>,
    last_error: Option<String>,
    editor: BookingEditor,
    issued: u64,
    pending: Option<RequestToken>,
}

impl AgendaController {
    pub fn new(query: AgendaQuery) -> Self {
        Self {
            query,
            matrix: None,
            last_error: None,
            editor: BookingEditor::Closed,
            issued: 0,
            pending: None,
        }
    }

    pub fn query(&self) -> &AgendaQuery {
        &self.query
    }

    pub fn matrix(&self) -> Option<&AgendaMatrix> {
        self.matrix.as_ref()
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn editor(&self) -> &BookingEditor {
        &self.editor
    }

    pub fn is_loading(&self) -> bool {
        self.pending.is_some()
    }

    /// Render plan for the current matrix; empty while nothing has been fetched.
    pub fn grid(&self) -> AgendaGrid {
        self.matrix.as_ref().map(build_grid).unwrap_or_default()
    }

    pub fn set_professional(&mut self, professional_id: Option<i64>) -> bool {
        self.query.set_professional(professional_id)
    }

    pub fn set_view_mode(&mut self, view_mode: ViewMode, today: NaiveDate) -> bool {
        self.query.set_view_mode(view_mode, today)
    }

    pub fn set_start_date(&mut self, value: impl Into<String>) -> bool {
        self.query.set_start_date(value)
    }

    pub fn set_end_date(&mut self, value: impl Into<String>) -> bool {
        self.query.set_end_date(value)
    }

    /// Issue a new fetch for the current query.
    ///
    /// Returns `None` (and clears the matrix) when no professional is selected or the
    /// range does not parse. Any token issued earlier becomes stale.
    pub fn begin_fetch(&mut self) -> Option<(RequestToken, AgendaRequest)> {
        let request = match (self.query.professional_id(), self.query.date_range()) {
            (Some(professional_id), Some((start_date, end_date))) => AgendaRequest {
                professional_id,
                start_date,
                end_date,
            },
            _ => {
                log::debug!("Agenda query incomplete, nothing to fetch: {:?}", self.query);
                self.pending = None;
                self.matrix = None;
                return None;
            }
        };

        self.issued += 1;
        let token = RequestToken(self.issued);
        self.pending = Some(token);
        log::info!(
            "Fetching agenda for professional {} from {} to {}",
            request.professional_id,
            request.start_date,
            request.end_date
        );
        Some((token, request))
    }

    /// Apply a fetch result. Results for anything but the latest token are dropped.
    pub fn complete_fetch(&mut self, token: RequestToken, result: Result<AgendaMatrix, ApiError>) -> bool {
        if self.pending != Some(token) {
            log::debug!(
                "Discarding stale agenda response {:?} (latest is {:?})",
                token,
                self.pending
            );
            return false;
        }
        self.pending = None;

        match result {
            Ok(matrix) => {
                log::info!("Agenda loaded with {} time rows", matrix.len());
                self.matrix = Some(matrix);
                self.last_error = None;
            }
            Err(err) => {
                log::error!("Failed to load agenda: {}", err);
                self.matrix = None;
                self.last_error = Some(format!("Erro ao carregar agenda: {}", err));
            }
        }
        true
    }

    /// Fetch and apply in one step.
    pub fn refresh(&mut self, api: &dyn AgendaApi) -> bool {
        match self.begin_fetch() {
            Some((token, request)) => {
                let result = api.fetch_agenda(&request);
                self.complete_fetch(token, result)
            }
            None => false,
        }
    }

    /// Open the editor for a clicked cell, prefilled from the query and the matrix.
    pub fn open_booking_editor(&mut self, action: &CellAction) {
        let mut draft = BookingPayloadBuilder::new();
        if let Some(professional_id) = self.query.professional_id() {
            draft = draft.professional(professional_id);
        }

        self.editor = match action {
            CellAction::AddBooking { date, time } => {
                if let Some(date) = date.date() {
                    draft = draft.date(date);
                }
                if let Some(time) = time.time() {
                    draft = draft.time(time);
                }
                BookingEditor::Creating { draft }
            }
            CellAction::EditBooking {
                appointment_id,
                recurrence_id,
            } => {
                let found = self
                    .matrix
                    .as_ref()
                    .and_then(|matrix| matrix.find_appointment(*appointment_id));
                if let Some((time, column, slot)) = found {
                    if let Some(date) = column.date() {
                        draft = draft.date(date);
                    }
                    if let Some(time) = time.time() {
                        draft = draft.time(time);
                    }
                    if let Some(client_id) = slot.client_id {
                        draft = draft.client(client_id);
                    }
                    if let Some(service_id) = slot.service_id {
                        draft = draft.service(service_id);
                    }
                    // The server rejects statuses it does not know, so an
                    // unrecognised one is left out and kept as is on update.
                    if slot.status.is_known() {
                        draft = draft.status(slot.status.clone());
                    }
                }

                BookingEditor::Editing {
                    appointment_id: *appointment_id,
                    recurrence_id: recurrence_id.clone(),
                    draft,
                }
            }
        };
    }

    pub fn close_booking_editor(&mut self) {
        self.editor = BookingEditor::Closed;
    }

    /// Apply form edits to the open draft. No-op when the editor is closed.
    pub fn update_draft<F>(&mut self, edit: F)
    where
        F: FnOnce(BookingPayloadBuilder) -> BookingPayloadBuilder,
    {
        match &mut self.editor {
            BookingEditor::Closed => {}
            BookingEditor::Creating { draft } | BookingEditor::Editing { draft, .. } => {
                *draft = edit(std::mem::take(draft));
            }
        }
    }

    /// Create or update the booking in the editor, then re-fetch the agenda.
    pub fn submit_booking(&mut self, api: &dyn AgendaApi) -> Result<(), ApiError> {
        let result = match &self.editor {
            BookingEditor::Closed => Err(ApiError::InvalidRequest("no booking is open".to_string())),
            BookingEditor::Creating { draft } => draft
                .clone()
                .build()
                .map_err(ApiError::InvalidRequest)
                .and_then(|payload| api.create_appointment(&payload)),
            BookingEditor::Editing {
                appointment_id,
                draft,
                ..
            } => draft
                .clone()
                .build()
                .map_err(ApiError::InvalidRequest)
                .and_then(|payload| api.update_appointment(*appointment_id, &payload)),
        };

        self.finish_mutation(api, result)
    }

    /// Delete the appointment open in the editor.
    pub fn delete_booking(&mut self, api: &dyn AgendaApi) -> Result<(), ApiError> {
        let result = match &self.editor {
            BookingEditor::Editing { appointment_id, .. } => api.delete_appointment(*appointment_id),
            _ => Err(ApiError::InvalidRequest("no appointment is open".to_string())),
        };

        self.finish_mutation(api, result)
    }

    /// Delete every appointment of the recurrence the open appointment belongs to.
    pub fn delete_recurrence(&mut self, api: &dyn AgendaApi) -> Result<(), ApiError> {
        let result = match &self.editor {
            BookingEditor::Editing {
                recurrence_id: Some(recurrence_id),
                ..
            } => api.delete_recurrence(recurrence_id),
            BookingEditor::Editing { .. } => Err(ApiError::InvalidRequest(
                "appointment is not part of a recurrence".to_string(),
            )),
            BookingEditor::Closed | BookingEditor::Creating { .. } => {
                Err(ApiError::InvalidRequest("no appointment is open".to_string()))
            }
        };

        self.finish_mutation(api, result)
    }

    fn finish_mutation(&mut self, api: &dyn AgendaApi, result: Result<(), ApiError>) -> Result<(), ApiError> {
        match result {
            Ok(()) => {
                self.editor = BookingEditor::Closed;
                self.last_error = None;
                self.refresh(api);
                Ok(())
            }
            Err(err) => {
                log::warn!("Booking change failed: {}", err);
                self.last_error = Some(err.to_string());
                Err(err)
            }
        }
    }
}
