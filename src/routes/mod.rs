use axum::routing::{delete, get, post, put};
use axum::Router;
use tower_http::trace::TraceLayer;

use crate::config::{create_cors_layer, create_security_headers_layer};
use crate::handlers::{auth, courses, events, health_check, tickets, users};
use crate::state::AppState;

pub fn create_routes(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/api/auth/register", post(auth::register))
        .route("/api/auth/login", post(auth::login))
        .route("/api/auth/logout", post(auth::logout))
        .route(
            "/api/courses",
            get(courses::list_courses).post(courses::create_course),
        )
        .route("/api/courses/:course_id", get(courses::get_course))
        .route("/api/courses/:course_id/lessons", post(courses::create_lessons))
        .route(
            "/api/events",
            get(events::list_events).post(events::create_event),
        )
        .route("/api/events/:event_id", delete(events::delete_event))
        .route("/api/tickets/purchase", post(tickets::purchase_ticket))
        .route("/api/tickets/:ticket_id", get(tickets::get_ticket))
        .route("/api/users", get(users::list_users))
        .route(
            "/api/users/:user_id",
            put(users::update_user).delete(users::delete_user),
        )
        .layer(TraceLayer::new_for_http())
        .layer(create_security_headers_layer())
        .layer(create_cors_layer())
        .with_state(state)
}
