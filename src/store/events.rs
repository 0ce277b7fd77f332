use std::collections::HashMap;

use chrono::{NaiveDate, NaiveTime};
use serde::Deserialize;
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::{Event, Ticket, TicketAvailability};
use crate::utils::error::AppError;

#[derive(Debug, Clone, Deserialize)]
pub struct NewTicket {
    pub name: String,
    pub spaces: i32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewEvent {
    pub name: String,
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub details: String,
    pub tickets: Vec<NewTicket>,
}

const EVENT_COLUMNS: &str = "id, name, date, start_time, end_time, details, created_at, updated_at";

/// Create an event together with its ticket definitions, atomically.
pub async fn insert(pool: &PgPool, new_event: &NewEvent) -> Result<(Event, Vec<Ticket>), AppError> {
    let mut tx = pool.begin().await?;

    let sql = format!(
        "INSERT INTO events (id, name, date, start_time, end_time, details) \
         VALUES ($1, $2, $3, $4, $5, $6) \
         RETURNING {EVENT_COLUMNS}"
    );

    let event = sqlx::query_as::<_, Event>(&sql)
        .bind(Uuid::new_v4())
        .bind(&new_event.name)
        .bind(new_event.date)
        .bind(new_event.start_time)
        .bind(new_event.end_time)
        .bind(&new_event.details)
        .fetch_one(&mut *tx)
        .await?;

    let mut tickets = Vec::with_capacity(new_event.tickets.len());
    for ticket in &new_event.tickets {
        let created = sqlx::query_as::<_, Ticket>(
            "INSERT INTO tickets (id, event_id, name, spaces) \
             VALUES ($1, $2, $3, $4) \
             RETURNING id, event_id, name, spaces",
        )
        .bind(Uuid::new_v4())
        .bind(event.id)
        .bind(&ticket.name)
        .bind(ticket.spaces)
        .fetch_one(&mut *tx)
        .await?;
        tickets.push(created);
    }

    tx.commit().await?;
    Ok((event, tickets))
}

/// All events, newest first, each with its tickets and their sold totals.
pub async fn list_with_tickets(
    pool: &PgPool,
) -> Result<Vec<(Event, Vec<TicketAvailability>)>, AppError> {
    let sql = format!("SELECT {EVENT_COLUMNS} FROM events ORDER BY created_at DESC");
    let events = sqlx::query_as::<_, Event>(&sql).fetch_all(pool).await?;

    let tickets = sqlx::query_as::<_, TicketAvailability>(
        "SELECT t.id, t.event_id, t.name, t.spaces, \
                COALESCE(SUM(p.quantity), 0) AS sold \
         FROM tickets t \
         LEFT JOIN ticket_purchases p ON p.ticket_id = t.id \
         GROUP BY t.id, t.event_id, t.name, t.spaces",
    )
    .fetch_all(pool)
    .await?;

    let mut by_event: HashMap<Uuid, Vec<TicketAvailability>> = HashMap::new();
    for ticket in tickets {
        by_event.entry(ticket.event_id).or_default().push(ticket);
    }

    Ok(events
        .into_iter()
        .map(|event| {
            let tickets = by_event.remove(&event.id).unwrap_or_default();
            (event, tickets)
        })
        .collect())
}

/// Delete an event; tickets and their purchase rows go with it. Returns the
/// number of purchase rows that were abandoned, or None when the event does
/// not exist.
pub async fn delete(pool: &PgPool, id: Uuid) -> Result<Option<i64>, AppError> {
    let abandoned = sqlx::query_scalar::<_, i64>(
        "SELECT COUNT(*) FROM ticket_purchases p \
         JOIN tickets t ON t.id = p.ticket_id \
         WHERE t.event_id = $1",
    )
    .bind(id)
    .fetch_one(pool)
    .await?;

    let result = sqlx::query("DELETE FROM events WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Ok(None);
    }

    if abandoned > 0 {
        tracing::warn!(
            event_id = %id,
            abandoned_purchases = abandoned,
            "Event deleted; purchase history cascaded away"
        );
    }

    Ok(Some(abandoned))
}
