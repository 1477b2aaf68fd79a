use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::ticket::TicketStatus;

/// Broadcast to live subscribers whenever a dispatch decision is made.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DispatchEvent {
    pub ticket_id: Uuid,
    pub technician_id: Option<Uuid>,
    pub distance_km: Option<f64>,
    pub status: TicketStatus,
    pub decided_at: DateTime<Utc>,
}
