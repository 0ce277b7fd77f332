use sqlx::PgPool;
use uuid::Uuid;

use crate::ledger;
use crate::models::{Ticket, TicketAvailability, TicketPurchase};
use crate::utils::error::AppError;

/// A ticket with its sold total, or None when the id is unknown.
pub async fn find_with_sold(
    pool: &PgPool,
    ticket_id: Uuid,
) -> Result<Option<TicketAvailability>, AppError> {
    let ticket = sqlx::query_as::<_, TicketAvailability>(
        "SELECT t.id, t.event_id, t.name, t.spaces, \
                COALESCE(SUM(p.quantity), 0) AS sold \
         FROM tickets t \
         LEFT JOIN ticket_purchases p ON p.ticket_id = t.id \
         WHERE t.id = $1 \
         GROUP BY t.id, t.event_id, t.name, t.spaces",
    )
    .bind(ticket_id)
    .fetch_optional(pool)
    .await?;
    Ok(ticket)
}

/// Admit and record a purchase in one transaction.
///
/// The ticket row is locked with FOR UPDATE before the sold total is read,
/// so two concurrent purchases against the same ticket serialize: the
/// second sees the first's committed quantity and the admission check holds
/// the capacity invariant even under racing writers.
pub async fn purchase(
    pool: &PgPool,
    ticket_id: Uuid,
    user_id: Uuid,
    quantity: i32,
) -> Result<TicketPurchase, AppError> {
    let mut tx = pool.begin().await?;

    let ticket = sqlx::query_as::<_, Ticket>(
        "SELECT id, event_id, name, spaces FROM tickets WHERE id = $1 FOR UPDATE",
    )
    .bind(ticket_id)
    .fetch_optional(&mut *tx)
    .await?
    .ok_or_else(|| AppError::NotFound("Ticket not found".to_string()))?;

    let purchases = sqlx::query_as::<_, TicketPurchase>(
        "SELECT id, ticket_id, user_id, quantity, created_at \
         FROM ticket_purchases WHERE ticket_id = $1",
    )
    .bind(ticket_id)
    .fetch_all(&mut *tx)
    .await?;

    ledger::admit_purchase(ticket.spaces, ledger::sold_quantity(&purchases), quantity)?;

    let purchase = sqlx::query_as::<_, TicketPurchase>(
        "INSERT INTO ticket_purchases (id, ticket_id, user_id, quantity) \
         VALUES ($1, $2, $3, $4) \
         RETURNING id, ticket_id, user_id, quantity, created_at",
    )
    .bind(Uuid::new_v4())
    .bind(ticket_id)
    .bind(user_id)
    .bind(quantity)
    .fetch_one(&mut *tx)
    .await?;

    tx.commit().await?;
    Ok(purchase)
}
