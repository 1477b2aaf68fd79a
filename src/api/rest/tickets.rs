use std::sync::Arc;

use axum::extract::{Path, State};
use axum::routing::{get, post};
use axum::Json;
use axum::Router;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::engine::dispatch::{dispatch, DispatchOutcome};
use crate::engine::lifecycle;
use crate::error::AppError;
use crate::models::event::DispatchEvent;
use crate::models::technician::Technician;
use crate::models::ticket::{CompletionDetails, Ticket, TicketStatus};
use crate::state::AppState;

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/tickets", post(open_ticket).get(list_tickets))
        .route("/tickets/:id", get(get_ticket))
        .route("/tickets/:id/assign", post(assign_ticket))
        .route("/tickets/:id/reject", post(reject_ticket))
        .route("/tickets/:id/complete", post(complete_ticket))
}

#[derive(Deserialize)]
pub struct OpenTicketRequest {
    #[serde(rename = "elevador_id")]
    pub elevator_id: Uuid,
    #[serde(rename = "descricao_problema")]
    pub description: String,
    #[serde(rename = "pessoa_presa", default)]
    pub person_trapped: bool,
}

/// Response shape the legacy chatbot client parses.
#[derive(Serialize)]
pub struct OpenTicketResponse {
    pub mensagem: String,
    pub id_chamado: Uuid,
    pub tecnico_atribuido: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub distancia_km: Option<f64>,
}

#[derive(Deserialize)]
pub struct AssignTicketRequest {
    #[serde(rename = "tecnico_id")]
    pub technician_id: Uuid,
}

async fn open_ticket(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<OpenTicketRequest>,
) -> Result<Json<OpenTicketResponse>, AppError> {
    if payload.description.trim().is_empty() {
        return Err(AppError::Validation(
            "descricao_problema cannot be empty".to_string(),
        ));
    }

    let elevator_location = state
        .elevators
        .get(&payload.elevator_id)
        .map(|entry| entry.location)
        .ok_or_else(|| AppError::NotFound(format!("elevator {} not found", payload.elevator_id)))?;

    // Snapshot of the eligible pool; the dispatch core never touches the
    // registry itself.
    let candidates: Vec<Technician> = state
        .technicians
        .iter()
        .filter(|entry| entry.value().is_dispatchable())
        .map(|entry| entry.value().clone())
        .collect();

    let outcome = dispatch(&elevator_location, &candidates);

    let ticket = lifecycle::open_ticket(
        payload.description,
        payload.person_trapped,
        payload.elevator_id,
        elevator_location,
        &outcome,
    );
    state.tickets.insert(ticket.id, ticket.clone());

    let response = match &outcome {
        DispatchOutcome::Assigned {
            technician_id,
            distance_km,
        } => {
            state
                .metrics
                .dispatches_total
                .with_label_values(&["assigned"])
                .inc();
            state.metrics.dispatch_distance_km.observe(*distance_km);

            let technician_name = candidates
                .iter()
                .find(|t| t.id == *technician_id)
                .map(|t| t.name.clone());

            info!(
                ticket_id = %ticket.id,
                technician_id = %technician_id,
                distance_km = *distance_km,
                person_trapped = ticket.person_trapped,
                "ticket dispatched to nearest technician"
            );

            OpenTicketResponse {
                mensagem: "Chamado aberto e atribuído ao técnico mais próximo.".to_string(),
                id_chamado: ticket.id,
                tecnico_atribuido: technician_name,
                distancia_km: Some(round_two_places(*distance_km)),
            }
        }
        DispatchOutcome::NoneAvailable => {
            state
                .metrics
                .dispatches_total
                .with_label_values(&["unassigned"])
                .inc();
            state.metrics.tickets_open.inc();

            info!(
                ticket_id = %ticket.id,
                person_trapped = ticket.person_trapped,
                "ticket opened with no technician available"
            );

            OpenTicketResponse {
                mensagem: "Chamado aberto. Nenhum técnico de plantão disponível no momento."
                    .to_string(),
                id_chamado: ticket.id,
                tecnico_atribuido: None,
                distancia_km: None,
            }
        }
    };

    let event = DispatchEvent {
        ticket_id: ticket.id,
        technician_id: ticket.technician_id,
        distance_km: match &outcome {
            DispatchOutcome::Assigned { distance_km, .. } => Some(*distance_km),
            DispatchOutcome::NoneAvailable => None,
        },
        status: ticket.status,
        decided_at: Utc::now(),
    };
    let _ = state.dispatch_events_tx.send(event);

    Ok(Json(response))
}

async fn list_tickets(State(state): State<Arc<AppState>>) -> Json<Vec<Ticket>> {
    let tickets = state
        .tickets
        .iter()
        .map(|entry| entry.value().clone())
        .collect();
    Json(tickets)
}

async fn get_ticket(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<Ticket>, AppError> {
    let ticket = state
        .tickets
        .get(&id)
        .ok_or_else(|| AppError::NotFound(format!("ticket {} not found", id)))?;

    Ok(Json(ticket.value().clone()))
}

async fn assign_ticket(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Json(payload): Json<AssignTicketRequest>,
) -> Result<Json<Ticket>, AppError> {
    // Technician existence is checked before the transition runs.
    if !state.technicians.contains_key(&payload.technician_id) {
        return Err(AppError::NotFound(format!(
            "technician {} not found",
            payload.technician_id
        )));
    }

    let mut ticket = state
        .tickets
        .get_mut(&id)
        .ok_or_else(|| AppError::NotFound(format!("ticket {} not found", id)))?;

    let prior = ticket.status;
    apply_transition(&state, "assign", || {
        lifecycle::assign(&mut ticket, payload.technician_id)
    })?;

    if prior == TicketStatus::Open {
        state.metrics.tickets_open.dec();
    }

    info!(ticket_id = %id, technician_id = %payload.technician_id, "ticket assigned");
    Ok(Json(ticket.clone()))
}

async fn reject_ticket(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<Ticket>, AppError> {
    let mut ticket = state
        .tickets
        .get_mut(&id)
        .ok_or_else(|| AppError::NotFound(format!("ticket {} not found", id)))?;

    apply_transition(&state, "reject", || lifecycle::reject(&mut ticket))?;
    state.metrics.tickets_open.inc();

    info!(ticket_id = %id, "ticket rejected, returned to open queue");
    Ok(Json(ticket.clone()))
}

async fn complete_ticket(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Json(payload): Json<CompletionDetails>,
) -> Result<Json<Ticket>, AppError> {
    let mut ticket = state
        .tickets
        .get_mut(&id)
        .ok_or_else(|| AppError::NotFound(format!("ticket {} not found", id)))?;

    let prior = ticket.status;
    apply_transition(&state, "complete", || {
        lifecycle::complete(&mut ticket, payload)
    })?;

    if prior == TicketStatus::Open {
        state.metrics.tickets_open.dec();
    }

    info!(ticket_id = %id, "ticket completed");
    Ok(Json(ticket.clone()))
}

fn apply_transition(
    state: &AppState,
    transition: &str,
    apply: impl FnOnce() -> Result<(), AppError>,
) -> Result<(), AppError> {
    let result = apply();
    let outcome = if result.is_ok() { "ok" } else { "error" };
    state
        .metrics
        .ticket_transitions_total
        .with_label_values(&[transition, outcome])
        .inc();
    result
}

fn round_two_places(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
