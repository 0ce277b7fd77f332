use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Ticket {
    pub id: Uuid,
    pub event_id: Uuid,
    pub name: String,
    pub spaces: i32,
}

/// A ticket together with its aggregated sold total, as read back from the
/// store in one grouped query. `sold` is i64 because it comes from SUM().
#[derive(Debug, Clone, FromRow)]
pub struct TicketAvailability {
    pub id: Uuid,
    pub event_id: Uuid,
    pub name: String,
    pub spaces: i32,
    pub sold: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct TicketPurchase {
    pub id: Uuid,
    pub ticket_id: Uuid,
    pub user_id: Uuid,
    pub quantity: i32,
    pub created_at: DateTime<Utc>,
}
