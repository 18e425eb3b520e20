// Scheduling API boundary
// Everything the agenda needs from the backend goes through `AgendaApi`

mod client;

pub use client::HttpAgendaClient;

use chrono::NaiveDate;
use thiserror::Error;

use crate::models::agenda::{AgendaMatrix, MatrixError};
use crate::models::appointment::BookingPayload;
use crate::utils::date::format_iso_date;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("network error: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("request failed with HTTP status {status}: {message}")]
    Status { status: u16, message: String },
    #[error("unexpected response: {0}")]
    Decode(#[from] MatrixError),
    #[error("invalid request: {0}")]
    InvalidRequest(String),
}

/// Parameters of one agenda fetch. Dates are inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AgendaRequest {
    pub professional_id: i64,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

impl AgendaRequest {
    pub fn query_pairs(&self) -> [(&'static str, String); 3] {
        [
            ("profissional_id", self.professional_id.to_string()),
            ("data_inicio", format_iso_date(self.start_date)),
            ("data_fim", format_iso_date(self.end_date)),
        ]
    }
}

#[cfg_attr(test, mockall::automock)]
pub trait AgendaApi {
    fn fetch_agenda(&self, request: &AgendaRequest) -> Result<AgendaMatrix, ApiError>;

    fn create_appointment(&self, payload: &BookingPayload) -> Result<(), ApiError>;

    fn update_appointment(&self, appointment_id: i64, payload: &BookingPayload) -> Result<(), ApiError>;

    fn delete_appointment(&self, appointment_id: i64) -> Result<(), ApiError>;

    /// Delete every appointment generated from one recurring booking.
    fn delete_recurrence(&self, recurrence_id: &str) -> Result<(), ApiError>;
}
