use std::thread;
use std::time::Duration;

use reqwest::blocking::{Client, RequestBuilder, Response};
use reqwest::Url;
use serde_json::Value;

use super::{AgendaApi, AgendaRequest, ApiError};
use crate::models::agenda::AgendaMatrix;
use crate::models::appointment::BookingPayload;
use crate::models::settings::Settings;

/// Blocking REST client for the scheduling API.
pub struct HttpAgendaClient {
    client: Client,
    base_url: Url,
    auth_token: Option<String>,
    max_retries: usize,
    retry_delay_ms: u64,
}

impl HttpAgendaClient {
    pub fn from_settings(settings: &Settings) -> Result<Self, ApiError> {
        settings.validate().map_err(ApiError::InvalidRequest)?;

        let client = Client::builder()
            .timeout(Duration::from_secs(settings.request_timeout_secs))
            .build()?;
        let base_url = Url::parse(settings.base_url())
            .map_err(|err| ApiError::InvalidRequest(format!("invalid API URL: {}", err)))?;

        Ok(Self {
            client,
            base_url,
            auth_token: settings.auth_token.clone(),
            max_retries: settings.max_retries,
            retry_delay_ms: settings.retry_delay_ms,
        })
    }

    /// Append path segments to the base URL. Each segment is percent-encoded,
    /// so ids containing `/`, `?` or `#` stay inside their own segment.
    fn endpoint(&self, segments: &[&str]) -> Result<Url, ApiError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| {
                ApiError::InvalidRequest(format!("cannot append a path to {}", self.base_url))
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn authorized(&self, builder: RequestBuilder) -> RequestBuilder {
        match &self.auth_token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    fn fetch_once(&self, request: &AgendaRequest) -> Result<AgendaMatrix, ApiError> {
        let response = self
            .authorized(self.client.get(self.endpoint(&["agenda"])?))
            .query(&request.query_pairs())
            .send()?;

        let body = check_status(response)?.text()?;
        Ok(AgendaMatrix::from_json_str(&body)?)
    }

    fn send_mutation(&self, builder: RequestBuilder, what: &str) -> Result<(), ApiError> {
        let response = self.authorized(builder).send()?;
        check_status(response)?;
        log::info!("{} succeeded", what);
        Ok(())
    }
}

impl AgendaApi for HttpAgendaClient {
    fn fetch_agenda(&self, request: &AgendaRequest) -> Result<AgendaMatrix, ApiError> {
        let mut attempt = 0;
        loop {
            match self.fetch_once(request) {
                Ok(matrix) => return Ok(matrix),
                Err(err) if attempt < self.max_retries && is_retryable(&err) => {
                    attempt += 1;
                    log::warn!(
                        "Agenda fetch attempt {} for professional {} failed: {}",
                        attempt,
                        request.professional_id,
                        err
                    );
                    thread::sleep(Duration::from_millis(self.retry_delay_ms));
                }
                Err(err) => return Err(err),
            }
        }
    }

    fn create_appointment(&self, payload: &BookingPayload) -> Result<(), ApiError> {
        payload.validate().map_err(ApiError::InvalidRequest)?;
        let builder = self.client.post(self.endpoint(&["agendamentos"])?).json(payload);
        self.send_mutation(builder, "Create appointment")
    }

    fn update_appointment(&self, appointment_id: i64, payload: &BookingPayload) -> Result<(), ApiError> {
        payload.validate().map_err(ApiError::InvalidRequest)?;
        let id = appointment_id.to_string();
        let builder = self
            .client
            .put(self.endpoint(&["agendamentos", &id])?)
            .json(payload);
        self.send_mutation(builder, &format!("Update appointment {}", appointment_id))
    }

    fn delete_appointment(&self, appointment_id: i64) -> Result<(), ApiError> {
        let id = appointment_id.to_string();
        let builder = self
            .client
            .delete(self.endpoint(&["agendamentos", &id])?);
        self.send_mutation(builder, &format!("Delete appointment {}", appointment_id))
    }

    fn delete_recurrence(&self, recurrence_id: &str) -> Result<(), ApiError> {
        let recurrence_id = recurrence_id.trim();
        if recurrence_id.is_empty() {
            return Err(ApiError::InvalidRequest(format!(
                "invalid recurrence id '{}'",
                recurrence_id
            )));
        }

        let builder = self
            .client
            .delete(self.endpoint(&["agendamentos", "recorrencia", recurrence_id])?);
        self.send_mutation(builder, &format!("Delete recurrence {}", recurrence_id))
    }
}

fn check_status(response: Response) -> Result<Response, ApiError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().unwrap_or_default();
    Err(ApiError::Status {
        status: status.as_u16(),
        message: error_message(&body).unwrap_or_else(|| {
            status
                .canonical_reason()
                .unwrap_or("unknown error")
                .to_string()
        }),
    })
}

/// Pull the human readable message out of an error body, if there is one.
fn error_message(body: &str) -> Option<String> {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return None;
    }

    match serde_json::from_str::<Value>(trimmed) {
        Ok(Value::Object(fields)) => ["erro", "error", "mensagem", "message"]
            .iter()
            .find_map(|key| fields.get(*key).and_then(Value::as_str))
            .map(str::to_string),
        Ok(_) => None,
        Err(_) => Some(trimmed.chars().take(200).collect()),
    }
}

fn is_retryable(err: &ApiError) -> bool {
    match err {
        ApiError::Transport(_) => true,
        ApiError::Status { status, .. } => *status >= 500,
        ApiError::Decode(_) | ApiError::InvalidRequest(_) => false,
    }
}
