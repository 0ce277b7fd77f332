use sqlx::PgPool;

/// Shared handles injected into every handler. Constructed once in `main`
/// and cloned per request by axum.
#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
}

impl AppState {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}
