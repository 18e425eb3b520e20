// Appointment module
// Status values and the outbound booking payload sent to the scheduling API

use std::fmt;

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Slot length used by the API. Custom durations must be a multiple of it.
pub const SLOT_MINUTES: u32 = 30;

/// Appointment status as stored by the API.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum AppointmentStatus {
    #[default]
    Scheduled,
    Completed,
    Cancelled,
    /// Any status this client does not know about. Rendered as active.
    Other(String),
}

impl AppointmentStatus {
    pub fn parse(value: &str) -> Self {
        let normalized = value.trim().to_uppercase();
        match normalized.as_str() {
            "AGENDADO" => AppointmentStatus::Scheduled,
            "CONCLUIDO" | "CONCLUÍDO" => AppointmentStatus::Completed,
            "CANCELADO" => AppointmentStatus::Cancelled,
            _ => AppointmentStatus::Other(value.trim().to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            AppointmentStatus::Scheduled => "AGENDADO",
            AppointmentStatus::Completed => "CONCLUIDO",
            AppointmentStatus::Cancelled => "CANCELADO",
            AppointmentStatus::Other(raw) => raw,
        }
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, AppointmentStatus::Other(_))
    }
}

impl fmt::Display for AppointmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for AppointmentStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for AppointmentStatus {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(AppointmentStatus::parse(&raw))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RecurrenceFrequency {
    #[serde(rename = "semanal")]
    Weekly,
    #[serde(rename = "quinzenal")]
    Fortnightly,
    #[serde(rename = "mensal")]
    Monthly,
}

/// Request to generate a series of appointments from this booking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recurrence {
    #[serde(rename = "frequencia")]
    pub frequency: RecurrenceFrequency,
    /// Total number of appointments in the series, the first one included.
    #[serde(rename = "repeticoes")]
    pub repetitions: u32,
}

impl Recurrence {
    pub fn new(frequency: RecurrenceFrequency, repetitions: u32) -> Self {
        Self {
            frequency,
            repetitions,
        }
    }
}

/// Body of a create or update appointment request.
///
/// Optional fields are left out of the JSON entirely when unset; the API treats
/// a missing `status` as "keep current" on update and "AGENDADO" on create.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookingPayload {
    #[serde(rename = "cliente_id")]
    pub client_id: i64,
    #[serde(rename = "profissional_id")]
    pub professional_id: i64,
    #[serde(rename = "servico_id")]
    pub service_id: i64,
    #[serde(rename = "data", with = "date_format")]
    pub date: NaiveDate,
    #[serde(rename = "horario", with = "time_format")]
    pub time: NaiveTime,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<AppointmentStatus>,
    #[serde(rename = "recorrencia", default, skip_serializing_if = "Option::is_none")]
    pub recurrence: Option<Recurrence>,
    #[serde(
        rename = "duracao_personalizada",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub custom_duration_minutes: Option<u32>,
}

impl BookingPayload {
    pub fn builder() -> BookingPayloadBuilder {
        BookingPayloadBuilder::new()
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.client_id <= 0 {
            return Err("A client must be selected".to_string());
        }
        if self.professional_id <= 0 {
            return Err("A professional must be selected".to_string());
        }
        if self.service_id <= 0 {
            return Err("A service must be selected".to_string());
        }

        if let Some(status) = &self.status {
            if !status.is_known() {
                return Err(format!("Unknown appointment status '{}'", status));
            }
        }

        if let Some(minutes) = self.custom_duration_minutes {
            if minutes == 0 || minutes % SLOT_MINUTES != 0 {
                return Err(format!(
                    "Custom duration must be a positive multiple of {} minutes",
                    SLOT_MINUTES
                ));
            }
        }

        if let Some(recurrence) = &self.recurrence {
            if recurrence.repetitions < 2 {
                return Err("A recurring booking needs at least 2 repetitions".to_string());
            }
        }

        Ok(())
    }
}

/// Builder for booking payloads; used by the booking editor to fill a draft.
#[derive(Debug, Clone, Default)]
pub struct BookingPayloadBuilder {
    client_id: Option<i64>,
    professional_id: Option<i64>,
    service_id: Option<i64>,
    date: Option<NaiveDate>,
    time: Option<NaiveTime>,
    status: Option<AppointmentStatus>,
    recurrence: Option<Recurrence>,
    custom_duration_minutes: Option<u32>,
}

impl BookingPayloadBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn client(mut self, client_id: i64) -> Self {
        self.client_id = Some(client_id);
        self
    }

    pub fn professional(mut self, professional_id: i64) -> Self {
        self.professional_id = Some(professional_id);
        self
    }

    pub fn service(mut self, service_id: i64) -> Self {
        self.service_id = Some(service_id);
        self
    }

    pub fn date(mut self, date: NaiveDate) -> Self {
        self.date = Some(date);
        self
    }

    pub fn time(mut self, time: NaiveTime) -> Self {
        self.time = Some(time);
        self
    }

    pub fn status(mut self, status: AppointmentStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn recurrence(mut self, recurrence: Recurrence) -> Self {
        self.recurrence = Some(recurrence);
        self
    }

    pub fn custom_duration(mut self, minutes: u32) -> Self {
        self.custom_duration_minutes = Some(minutes);
        self
    }

    pub fn build(self) -> Result<BookingPayload, String> {
        let payload = BookingPayload {
            client_id: self.client_id.ok_or("Client is required")?,
            professional_id: self.professional_id.ok_or("Professional is required")?,
            service_id: self.service_id.ok_or("Service is required")?,
            date: self.date.ok_or("Date is required")?,
            time: self.time.ok_or("Time is required")?,
            status: self.status,
            recurrence: self.recurrence,
            custom_duration_minutes: self.custom_duration_minutes,
        };

        payload.validate()?;
        Ok(payload)
    }
}

mod date_format {
    use chrono::NaiveDate;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(date: &NaiveDate, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&date.format("%Y-%m-%d").to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveDate, D::Error> {
        let raw = String::deserialize(deserializer)?;
        NaiveDate::parse_from_str(&raw, "%Y-%m-%d").map_err(serde::de::Error::custom)
    }
}

mod time_format {
    use chrono::NaiveTime;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(time: &NaiveTime, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&time.format("%H:%M").to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveTime, D::Error> {
        let raw = String::deserialize(deserializer)?;
        NaiveTime::parse_from_str(&raw, "%H:%M")
            .or_else(|_| NaiveTime::parse_from_str(&raw, "%H:%M:%S"))
            .map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use test_case::test_case;

    fn base_builder() -> BookingPayloadBuilder {
        BookingPayload::builder()
            .client(7)
            .professional(3)
            .service(2)
            .date(NaiveDate::from_ymd_opt(2025, 4, 21).unwrap())
            .time(NaiveTime::from_hms_opt(9, 30, 0).unwrap())
    }

    #[test_case("AGENDADO", AppointmentStatus::Scheduled ; "scheduled")]
    #[test_case("concluido", AppointmentStatus::Completed ; "completed lowercase")]
    #[test_case(" CANCELADO ", AppointmentStatus::Cancelled ; "cancelled padded")]
    #[test_case("EM_ATENDIMENTO", AppointmentStatus::Other("EM_ATENDIMENTO".to_string()) ; "unknown")]
    fn test_status_parse(raw: &str, expected: AppointmentStatus) {
        assert_eq!(AppointmentStatus::parse(raw), expected);
    }

    #[test]
    fn test_minimal_payload_omits_optional_fields() {
        let payload = base_builder().build().unwrap();
        let value = serde_json::to_value(&payload).unwrap();

        assert_eq!(
            value,
            json!({
                "cliente_id": 7,
                "profissional_id": 3,
                "servico_id": 2,
                "data": "2025-04-21",
                "horario": "09:30"
            })
        );
    }

    #[test]
    fn test_full_payload_includes_optional_fields() {
        let payload = base_builder()
            .status(AppointmentStatus::Completed)
            .recurrence(Recurrence::new(RecurrenceFrequency::Weekly, 4))
            .custom_duration(90)
            .build()
            .unwrap();
        let value = serde_json::to_value(&payload).unwrap();

        assert_eq!(value["status"], json!("CONCLUIDO"));
        assert_eq!(
            value["recorrencia"],
            json!({ "frequencia": "semanal", "repeticoes": 4 })
        );
        assert_eq!(value["duracao_personalizada"], json!(90));
    }

    #[test]
    fn test_payload_deserializes() {
        let payload: BookingPayload = serde_json::from_value(json!({
            "cliente_id": 7,
            "profissional_id": 3,
            "servico_id": 2,
            "data": "2025-04-21",
            "horario": "09:30:00",
            "status": "CANCELADO"
        }))
        .unwrap();

        assert_eq!(payload.status, Some(AppointmentStatus::Cancelled));
        assert_eq!(payload.time, NaiveTime::from_hms_opt(9, 30, 0).unwrap());
        assert!(payload.recurrence.is_none());
    }

    #[test]
    fn test_builder_missing_client() {
        let result = BookingPayload::builder()
            .professional(3)
            .service(2)
            .date(NaiveDate::from_ymd_opt(2025, 4, 21).unwrap())
            .time(NaiveTime::from_hms_opt(9, 0, 0).unwrap())
            .build();

        assert_eq!(result.unwrap_err(), "Client is required");
    }

    #[test_case(0 ; "zero minutes")]
    #[test_case(45 ; "not a slot multiple")]
    fn test_invalid_custom_duration(minutes: u32) {
        let result = base_builder().custom_duration(minutes).build();
        assert!(result.unwrap_err().contains("multiple of 30"));
    }

    #[test]
    fn test_single_repetition_rejected() {
        let result = base_builder()
            .recurrence(Recurrence::new(RecurrenceFrequency::Monthly, 1))
            .build();
        assert!(result.is_err());
    }

    #[test]
    fn test_unknown_status_rejected_on_outbound_payload() {
        let result = base_builder()
            .status(AppointmentStatus::Other("PENDENTE".to_string()))
            .build();
        assert!(result.unwrap_err().contains("PENDENTE"));
    }

    #[test]
    fn test_non_positive_ids_rejected() {
        let mut payload = base_builder().build().unwrap();
        payload.service_id = 0;
        assert_eq!(payload.validate().unwrap_err(), "A service must be selected");
    }
}
