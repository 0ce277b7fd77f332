use axum::extract::{Path, State};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Deserialize;
use uuid::Uuid;

use crate::auth::CurrentUser;
use crate::handlers::events::TicketPayload;
use crate::state::AppState;
use crate::store;
use crate::utils::error::AppError;
use crate::utils::response::{created, success};

#[derive(Debug, Deserialize)]
pub struct PurchaseRequest {
    pub ticket_id: Uuid,
    pub quantity: i32,
}

/// Availability for one ticket, so the events page can refresh a single
/// tier without refetching the whole listing.
pub async fn get_ticket(
    State(state): State<AppState>,
    Path(ticket_id): Path<Uuid>,
) -> Result<Response, AppError> {
    let ticket = store::tickets::find_with_sold(&state.db, ticket_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Ticket not found".to_string()))?;

    Ok(success(TicketPayload::from(ticket), "Ticket fetched successfully").into_response())
}

/// Buy spaces on a ticket. The capacity check and the insert run in one
/// row-locked transaction inside the store, so a rejected request never
/// mutates state and concurrent buyers cannot oversell.
pub async fn purchase_ticket(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Json(request): Json<PurchaseRequest>,
) -> Result<Response, AppError> {
    if request.quantity < 1 {
        return Err(AppError::ValidationError(
            "Quantity must be at least 1".to_string(),
        ));
    }

    let purchase = store::tickets::purchase(
        &state.db,
        request.ticket_id,
        current_user.id,
        request.quantity,
    )
    .await?;

    tracing::info!(
        ticket_id = %request.ticket_id,
        user_id = %current_user.id,
        quantity = request.quantity,
        "Ticket purchased"
    );

    Ok(created(purchase, "Ticket purchased successfully").into_response())
}
