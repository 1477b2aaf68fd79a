use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::location::Location;

/// Roster entry for a field technician. Coordinates are stored as two
/// independently-nullable fields because position reports and the on-duty
/// toggle arrive separately; a technician with only one coordinate set has
/// no usable position.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Technician {
    pub id: Uuid,
    #[serde(rename = "nome")]
    pub name: String,
    #[serde(rename = "de_plantao")]
    pub on_duty: bool,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub updated_at: DateTime<Utc>,
}

impl Technician {
    pub fn position(&self) -> Option<Location> {
        match (self.latitude, self.longitude) {
            (Some(lat), Some(lng)) => Some(Location { lat, lng }),
            _ => None,
        }
    }

    /// Dispatch-eligible: on duty with a known position.
    pub fn is_dispatchable(&self) -> bool {
        self.on_duty && self.position().is_some()
    }
}
