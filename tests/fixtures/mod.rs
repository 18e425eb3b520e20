// Test fixtures - reusable agenda responses
// Provides consistent agenda data across all test files
#![allow(dead_code)]

use salon_agenda::models::agenda::{AgendaCell, AgendaMatrix, AgendaRow, OccupiedSlot};

pub const MONDAY: &str = "2025-04-21";
pub const TUESDAY: &str = "2025-04-22";

/// Two days, 09:00-10:30. Appointment 42 covers Monday 09:00-10:00,
/// recurring appointment 43 covers Tuesday 09:30-10:00, Tuesday 09:00 is outside hours.
pub const WEEK_RESPONSE: &str = r#"[
    {
        "horario": "09:00",
        "2025-04-21": {"agendamento_id": 42, "cliente_id": 7, "cliente_nome": "Ana Souza",
                       "servico_id": 2, "servico_nome": "Progressiva", "status": "AGENDADO"},
        "2025-04-22": null
    },
    {
        "horario": "09:30",
        "2025-04-21": {"agendamento_id": 42, "cliente_id": 7, "cliente_nome": "Ana Souza",
                       "servico_id": 2, "servico_nome": "Progressiva", "status": "AGENDADO"},
        "2025-04-22": {"agendamento_id": 43, "cliente_id": 8, "cliente_nome": "Bia Lima",
                       "servico_id": 5, "servico_nome": "Manicure", "status": "CONCLUIDO",
                       "recorrencia_id": "rec-77"}
    },
    {
        "horario": "10:00",
        "2025-04-21": {"agendamento_id": 42, "cliente_id": 7, "cliente_nome": "Ana Souza",
                       "servico_id": 2, "servico_nome": "Progressiva", "status": "AGENDADO"},
        "2025-04-22": {"agendamento_id": 43, "cliente_id": 8, "cliente_nome": "Bia Lima",
                       "servico_id": 5, "servico_nome": "Manicure", "status": "CONCLUIDO",
                       "recorrencia_id": "rec-77"}
    },
    {
        "horario": "10:30",
        "2025-04-21": {"disponivel": true},
        "2025-04-22": "disponivel"
    }
]"#;

pub fn week_matrix() -> AgendaMatrix {
    AgendaMatrix::from_json_str(WEEK_RESPONSE).expect("fixture must parse")
}

pub fn occupied(id: i64) -> AgendaCell {
    AgendaCell::Occupied(OccupiedSlot::new(id, "Cliente", "Serviço"))
}

/// Single-column matrix from a list of optional appointment ids
/// (`None` = available slot), one row per half hour from 08:00.
pub fn column_matrix(ids: &[Option<i64>]) -> AgendaMatrix {
    let rows = ids
        .iter()
        .enumerate()
        .map(|(index, id)| {
            let minutes = 8 * 60 + 30 * index;
            let label = format!("{:02}:{:02}", (minutes / 60) % 24, minutes % 60);
            let cell = match id {
                Some(id) => occupied(*id),
                None => AgendaCell::Available,
            };
            AgendaRow::new(label).with_cell(MONDAY, cell)
        })
        .collect();
    AgendaMatrix::new(rows)
}
