use axum::{
    routing::{get, post},
    Router,
};

use crate::handlers::{bookings, event_types, health, schedule};
use crate::store::AppState;

pub fn api_routes() -> Router<AppState> {
    Router::new()
        // Health check
        .route("/health", get(health::health_check))
        // Event type routes
        .route("/event-types", get(event_types::list_event_types))
        .route("/event-types/:slug", get(event_types::get_event_type))
        // Availability routes
        .route("/schedule", get(schedule::get_schedule))
        // Booking routes
        .route(
            "/bookings",
            get(bookings::list_bookings).post(bookings::create_booking),
        )
        .route("/bookings/:uid", get(bookings::get_booking))
        .route("/bookings/:uid/cancel", post(bookings::cancel_booking))
}
