use dashmap::DashMap;
use tokio::sync::broadcast;
use uuid::Uuid;

use crate::models::elevator::Elevator;
use crate::models::event::DispatchEvent;
use crate::models::technician::Technician;
use crate::models::ticket::Ticket;
use crate::observability::metrics::Metrics;

/// The collaborator side of the system: registries the handlers mutate and
/// the dispatch core only reads snapshots of.
pub struct AppState {
    pub technicians: DashMap<Uuid, Technician>,
    pub elevators: DashMap<Uuid, Elevator>,
    pub tickets: DashMap<Uuid, Ticket>,
    pub dispatch_events_tx: broadcast::Sender<DispatchEvent>,
    pub metrics: Metrics,
}

impl AppState {
    pub fn new(event_buffer_size: usize) -> Self {
        let (dispatch_events_tx, _unused_rx) = broadcast::channel(event_buffer_size);

        Self {
            technicians: DashMap::new(),
            elevators: DashMap::new(),
            tickets: DashMap::new(),
            dispatch_events_tx,
            metrics: Metrics::new(),
        }
    }
}
