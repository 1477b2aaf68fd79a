use std::sync::Arc;

use axum::extract::{Path, State};
use axum::routing::{post, put};
use axum::Json;
use axum::Router;
use chrono::Utc;
use serde::Deserialize;
use uuid::Uuid;

use crate::error::AppError;
use crate::models::location::Location;
use crate::models::technician::Technician;
use crate::state::AppState;

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/technicians", post(create_technician).get(list_technicians))
        .route("/technicians/:id/status", put(update_technician_status))
        .route("/technicians/:id/location", put(update_technician_location))
}

#[derive(Deserialize)]
pub struct CreateTechnicianRequest {
    #[serde(rename = "nome")]
    pub name: String,
    #[serde(rename = "de_plantao", default)]
    pub on_duty: bool,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

#[derive(Deserialize)]
pub struct UpdateStatusRequest {
    #[serde(rename = "de_plantao")]
    pub on_duty: bool,
}

#[derive(Deserialize)]
pub struct UpdateLocationRequest {
    pub latitude: f64,
    pub longitude: f64,
}

async fn create_technician(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<CreateTechnicianRequest>,
) -> Result<Json<Technician>, AppError> {
    if payload.name.trim().is_empty() {
        return Err(AppError::Validation("nome cannot be empty".to_string()));
    }

    if let (Some(lat), Some(lng)) = (payload.latitude, payload.longitude) {
        let position = Location { lat, lng };
        if !position.is_valid() {
            return Err(AppError::Validation(
                "latitude/longitude out of range".to_string(),
            ));
        }
    }

    let technician = Technician {
        id: Uuid::new_v4(),
        name: payload.name,
        on_duty: payload.on_duty,
        latitude: payload.latitude,
        longitude: payload.longitude,
        updated_at: Utc::now(),
    };

    state.technicians.insert(technician.id, technician.clone());
    Ok(Json(technician))
}

async fn list_technicians(State(state): State<Arc<AppState>>) -> Json<Vec<Technician>> {
    let technicians = state
        .technicians
        .iter()
        .map(|entry| entry.value().clone())
        .collect();
    Json(technicians)
}

async fn update_technician_status(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateStatusRequest>,
) -> Result<Json<Technician>, AppError> {
    let mut technician = state
        .technicians
        .get_mut(&id)
        .ok_or_else(|| AppError::NotFound(format!("technician {} not found", id)))?;

    technician.on_duty = payload.on_duty;
    technician.updated_at = Utc::now();

    Ok(Json(technician.clone()))
}

async fn update_technician_location(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateLocationRequest>,
) -> Result<Json<Technician>, AppError> {
    let position = Location {
        lat: payload.latitude,
        lng: payload.longitude,
    };
    if !position.is_valid() {
        return Err(AppError::Validation(
            "latitude/longitude out of range".to_string(),
        ));
    }

    let mut technician = state
        .technicians
        .get_mut(&id)
        .ok_or_else(|| AppError::NotFound(format!("technician {} not found", id)))?;

    technician.latitude = Some(payload.latitude);
    technician.longitude = Some(payload.longitude);
    technician.updated_at = Utc::now();

    Ok(Json(technician.clone()))
}
