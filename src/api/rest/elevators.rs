use std::sync::Arc;

use axum::extract::{Path, State};
use axum::routing::{get, post};
use axum::Json;
use axum::Router;
use chrono::Utc;
use serde::Deserialize;
use uuid::Uuid;

use crate::error::AppError;
use crate::models::elevator::Elevator;
use crate::models::location::Location;
use crate::state::AppState;

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/elevators", post(create_elevator).get(list_elevators))
        .route("/elevators/:id", get(get_elevator))
}

#[derive(Deserialize)]
pub struct CreateElevatorRequest {
    #[serde(rename = "cliente")]
    pub customer: String,
    #[serde(rename = "endereco")]
    pub address: String,
    pub location: Location,
}

async fn create_elevator(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<CreateElevatorRequest>,
) -> Result<Json<Elevator>, AppError> {
    if payload.customer.trim().is_empty() {
        return Err(AppError::Validation("cliente cannot be empty".to_string()));
    }

    if payload.address.trim().is_empty() {
        return Err(AppError::Validation("endereco cannot be empty".to_string()));
    }

    if !payload.location.is_valid() {
        return Err(AppError::Validation(
            "latitude/longitude out of range".to_string(),
        ));
    }

    let elevator = Elevator {
        id: Uuid::new_v4(),
        customer: payload.customer,
        address: payload.address,
        location: payload.location,
        created_at: Utc::now(),
    };

    state.elevators.insert(elevator.id, elevator.clone());
    Ok(Json(elevator))
}

async fn list_elevators(State(state): State<Arc<AppState>>) -> Json<Vec<Elevator>> {
    let elevators = state
        .elevators
        .iter()
        .map(|entry| entry.value().clone())
        .collect();
    Json(elevators)
}

async fn get_elevator(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<Elevator>, AppError> {
    let elevator = state
        .elevators
        .get(&id)
        .ok_or_else(|| AppError::NotFound(format!("elevator {} not found", id)))?;

    Ok(Json(elevator.value().clone()))
}
