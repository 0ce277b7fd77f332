use axum::extract::{Path, State};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use uuid::Uuid;

use crate::auth::{require_admin, CurrentUser};
use crate::ledger;
use crate::models::{Event, Ticket, TicketAvailability};
use crate::state::AppState;
use crate::store;
use crate::store::events::NewEvent;
use crate::utils::error::AppError;
use crate::utils::response::{created, empty_success, success};

#[derive(Serialize)]
pub struct TicketPayload {
    pub id: Uuid,
    pub event_id: Uuid,
    pub name: String,
    pub spaces: i32,
    pub sold: i64,
    pub remaining: i32,
}

impl From<TicketAvailability> for TicketPayload {
    fn from(ticket: TicketAvailability) -> Self {
        let remaining = ledger::remaining_spaces(ticket.spaces, ticket.sold);
        Self {
            id: ticket.id,
            event_id: ticket.event_id,
            name: ticket.name,
            spaces: ticket.spaces,
            sold: ticket.sold,
            remaining,
        }
    }
}

impl From<Ticket> for TicketPayload {
    fn from(ticket: Ticket) -> Self {
        Self {
            id: ticket.id,
            event_id: ticket.event_id,
            name: ticket.name,
            spaces: ticket.spaces,
            sold: 0,
            remaining: ticket.spaces,
        }
    }
}

#[derive(Serialize)]
pub struct EventPayload {
    #[serde(flatten)]
    pub event: Event,
    pub tickets: Vec<TicketPayload>,
}

pub async fn list_events(State(state): State<AppState>) -> Result<Response, AppError> {
    let events = store::events::list_with_tickets(&state.db).await?;

    let payload: Vec<EventPayload> = events
        .into_iter()
        .map(|(event, tickets)| EventPayload {
            event,
            tickets: tickets.into_iter().map(TicketPayload::from).collect(),
        })
        .collect();

    Ok(success(payload, "Events fetched successfully").into_response())
}

pub async fn create_event(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Json(request): Json<NewEvent>,
) -> Result<Response, AppError> {
    require_admin(&current_user)?;
    validate_new_event(&request)?;

    let (event, tickets) = store::events::insert(&state.db, &request).await?;

    tracing::info!(event_id = %event.id, tickets = tickets.len(), "Event created");

    let payload = EventPayload {
        event,
        tickets: tickets.into_iter().map(TicketPayload::from).collect(),
    };
    Ok(created(payload, "Event created successfully").into_response())
}

pub async fn delete_event(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(event_id): Path<Uuid>,
) -> Result<Response, AppError> {
    require_admin(&current_user)?;

    store::events::delete(&state.db, event_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Event not found".to_string()))?;

    Ok(empty_success("Event deleted successfully").into_response())
}

fn validate_new_event(request: &NewEvent) -> Result<(), AppError> {
    if request.name.trim().is_empty() {
        return Err(AppError::ValidationError("Event name is required".to_string()));
    }
    if request.details.trim().is_empty() {
        return Err(AppError::ValidationError(
            "Event details are required".to_string(),
        ));
    }
    if request.end_time < request.start_time {
        return Err(AppError::ValidationError(
            "Event end time must not be before its start time".to_string(),
        ));
    }
    if request.tickets.is_empty() {
        return Err(AppError::ValidationError(
            "At least one ticket type is required".to_string(),
        ));
    }
    for ticket in &request.tickets {
        if ticket.name.trim().is_empty() {
            return Err(AppError::ValidationError(
                "Every ticket needs a name".to_string(),
            ));
        }
        if ticket.spaces < 0 {
            return Err(AppError::ValidationError(
                "Ticket spaces must not be negative".to_string(),
            ));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::events::NewTicket;
    use chrono::{NaiveDate, NaiveTime};

    fn valid_event() -> NewEvent {
        NewEvent {
            name: "Hack Night".to_string(),
            date: NaiveDate::from_ymd_opt(2026, 9, 12).unwrap(),
            start_time: NaiveTime::from_hms_opt(18, 0, 0).unwrap(),
            end_time: NaiveTime::from_hms_opt(21, 0, 0).unwrap(),
            details: "Bring a laptop.".to_string(),
            tickets: vec![NewTicket {
                name: "General".to_string(),
                spaces: 30,
            }],
        }
    }

    #[test]
    fn valid_payload_passes() {
        assert!(validate_new_event(&valid_event()).is_ok());
    }

    #[test]
    fn blank_name_or_details_is_rejected() {
        let mut event = valid_event();
        event.name = " ".to_string();
        assert!(validate_new_event(&event).is_err());

        let mut event = valid_event();
        event.details = String::new();
        assert!(validate_new_event(&event).is_err());
    }

    #[test]
    fn end_before_start_is_rejected() {
        let mut event = valid_event();
        event.end_time = NaiveTime::from_hms_opt(17, 0, 0).unwrap();
        assert!(validate_new_event(&event).is_err());
    }

    #[test]
    fn empty_ticket_list_is_rejected() {
        let mut event = valid_event();
        event.tickets.clear();
        assert!(validate_new_event(&event).is_err());
    }

    #[test]
    fn negative_ticket_spaces_are_rejected() {
        let mut event = valid_event();
        event.tickets[0].spaces = -1;
        assert!(validate_new_event(&event).is_err());
    }

    #[test]
    fn zero_space_ticket_is_allowed() {
        let mut event = valid_event();
        event.tickets[0].spaces = 0;
        assert!(validate_new_event(&event).is_ok());
    }

    #[test]
    fn unnamed_ticket_is_rejected() {
        let mut event = valid_event();
        event.tickets[0].name = "  ".to_string();
        assert!(validate_new_event(&event).is_err());
    }
}
