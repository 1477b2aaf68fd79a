use uuid::Uuid;

use crate::geo::haversine_km;
use crate::models::location::Location;
use crate::models::technician::Technician;

#[derive(Debug, Clone, PartialEq)]
pub enum DispatchOutcome {
    Assigned {
        technician_id: Uuid,
        distance_km: f64,
    },
    NoneAvailable,
}

/// Selects the candidate nearest to `origin`. Pure over its inputs: no I/O,
/// nothing mutated, nothing reserved.
///
/// Callers supply candidates already filtered to on-duty technicians with a
/// known position; anyone who slips through without one is skipped rather
/// than ranked. Ties keep the first candidate in iteration order, so the
/// result is stable for a fixed input ordering. An empty pool is a normal
/// outcome, not an error.
pub fn dispatch(origin: &Location, candidates: &[Technician]) -> DispatchOutcome {
    let mut nearest: Option<(Uuid, f64)> = None;

    for technician in candidates {
        let Some(position) = technician.position() else {
            continue;
        };

        let distance_km = haversine_km(origin, &position);
        match nearest {
            Some((_, best_km)) if distance_km >= best_km => {}
            _ => nearest = Some((technician.id, distance_km)),
        }
    }

    match nearest {
        Some((technician_id, distance_km)) => DispatchOutcome::Assigned {
            technician_id,
            distance_km,
        },
        None => DispatchOutcome::NoneAvailable,
    }
}
