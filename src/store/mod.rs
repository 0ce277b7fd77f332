//! Persistence gateway: every database statement in the application lives
//! here, as a typed function over the shared `PgPool`. Handlers never issue
//! SQL directly.

pub mod courses;
pub mod events;
pub mod sessions;
pub mod tickets;
pub mod users;
