use chrono::Utc;
use uuid::Uuid;

use crate::engine::dispatch::DispatchOutcome;
use crate::error::AppError;
use crate::models::location::Location;
use crate::models::ticket::{CompletionDetails, Ticket, TicketStatus};

/// Materializes a new ticket from a dispatch decision: `Assigned` opens it
/// directly in the assigned state, `NoneAvailable` leaves it open with no
/// technician.
pub fn open_ticket(
    description: String,
    person_trapped: bool,
    elevator_id: Uuid,
    location: Location,
    outcome: &DispatchOutcome,
) -> Ticket {
    let (status, technician_id) = match outcome {
        DispatchOutcome::Assigned { technician_id, .. } => {
            (TicketStatus::Assigned, Some(*technician_id))
        }
        DispatchOutcome::NoneAvailable => (TicketStatus::Open, None),
    };

    Ticket {
        id: Uuid::new_v4(),
        description,
        person_trapped,
        elevator_id,
        location,
        status,
        technician_id,
        services_performed: None,
        parts_replaced: None,
        notes: None,
        completed_at: None,
        created_at: Utc::now(),
    }
}

/// Puts the ticket in a technician's hands. Valid from `open` and from
/// `assigned` (reassignment); a finalized ticket can never be reopened this
/// way. Technician existence is the caller's lookup, done before this call.
pub fn assign(ticket: &mut Ticket, technician_id: Uuid) -> Result<(), AppError> {
    match ticket.status {
        TicketStatus::Open | TicketStatus::Assigned => {
            ticket.status = TicketStatus::Assigned;
            ticket.technician_id = Some(technician_id);
            Ok(())
        }
        TicketStatus::Completed => Err(AppError::InvalidTransition(
            "chamado finalizado não pode ser atribuído".to_string(),
        )),
    }
}

/// The assigned technician declines; the ticket returns to the open queue.
/// Only valid from `assigned` — rejecting an already-open ticket is an
/// error, not a no-op.
pub fn reject(ticket: &mut Ticket) -> Result<(), AppError> {
    match ticket.status {
        TicketStatus::Assigned => {
            ticket.status = TicketStatus::Open;
            ticket.technician_id = None;
            Ok(())
        }
        TicketStatus::Open => Err(AppError::InvalidTransition(
            "chamado aberto não tem técnico para recusar".to_string(),
        )),
        TicketStatus::Completed => Err(AppError::InvalidTransition(
            "chamado finalizado não pode ser recusado".to_string(),
        )),
    }
}

/// Finalizes the ticket with the technician's closing report and stamps the
/// completion time. Terminal: nothing transitions out of `completed`.
pub fn complete(ticket: &mut Ticket, details: CompletionDetails) -> Result<(), AppError> {
    match ticket.status {
        TicketStatus::Open | TicketStatus::Assigned => {
            ticket.status = TicketStatus::Completed;
            ticket.services_performed = details.services_performed;
            ticket.parts_replaced = details.parts_replaced;
            ticket.notes = details.notes;
            ticket.completed_at = Some(Utc::now());
            Ok(())
        }
        TicketStatus::Completed => Err(AppError::InvalidTransition(
            "chamado já finalizado".to_string(),
        )),
    }
}
