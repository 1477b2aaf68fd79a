use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::location::Location;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub enum TicketStatus {
    #[serde(rename = "aberto")]
    Open,
    #[serde(rename = "atribuido")]
    Assigned,
    #[serde(rename = "finalizado")]
    Completed,
}

/// Closing report attached when a ticket is finalized. All fields are
/// optional free text supplied by the technician.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CompletionDetails {
    #[serde(rename = "servicos_realizados")]
    pub services_performed: Option<String>,
    #[serde(rename = "pecas_trocadas")]
    pub parts_replaced: Option<String>,
    #[serde(rename = "observacoes")]
    pub notes: Option<String>,
}

/// A service call. External field names follow the legacy client contract
/// (`id_chamado`, `descricao_problema`, ...); `data_conclusao` is rendered
/// as `DD/MM/YYYY HH:MM`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ticket {
    #[serde(rename = "id_chamado")]
    pub id: Uuid,
    #[serde(rename = "descricao_problema")]
    pub description: String,
    #[serde(rename = "pessoa_presa")]
    pub person_trapped: bool,
    #[serde(rename = "elevador_id")]
    pub elevator_id: Uuid,
    pub location: Location,
    pub status: TicketStatus,
    #[serde(rename = "tecnico_id")]
    pub technician_id: Option<Uuid>,
    #[serde(rename = "servicos_realizados")]
    pub services_performed: Option<String>,
    #[serde(rename = "pecas_trocadas")]
    pub parts_replaced: Option<String>,
    #[serde(rename = "observacoes")]
    pub notes: Option<String>,
    #[serde(rename = "data_conclusao", default, with = "br_timestamp")]
    pub completed_at: Option<DateTime<Utc>>,
    #[serde(rename = "data_abertura")]
    pub created_at: DateTime<Utc>,
}

/// `DD/MM/YYYY HH:MM` timestamps, the format the legacy admin page expects.
pub mod br_timestamp {
    use chrono::{DateTime, NaiveDateTime, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    const FORMAT: &str = "%d/%m/%Y %H:%M";

    pub fn serialize<S>(value: &Option<DateTime<Utc>>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(ts) => serializer.serialize_str(&ts.format(FORMAT).to_string()),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw: Option<String> = Option::deserialize(deserializer)?;
        match raw {
            Some(text) => {
                let naive = NaiveDateTime::parse_from_str(&text, FORMAT)
                    .map_err(serde::de::Error::custom)?;
                Ok(Some(naive.and_utc()))
            }
            None => Ok(None),
        }
    }
}
