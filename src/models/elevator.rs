use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::location::Location;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Elevator {
    pub id: Uuid,
    #[serde(rename = "cliente")]
    pub customer: String,
    #[serde(rename = "endereco")]
    pub address: String,
    pub location: Location,
    pub created_at: DateTime<Utc>,
}
