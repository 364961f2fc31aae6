use axum::{
    body::Body,
    extract::Request,
    routing::{get, post, put},
    Router,
};
use std::sync::Arc;
use std::time::Duration;
use crate::state::AppState;
use crate::api::handlers::{admin, auth, booking, client, health, resource};
use tower_http::{
    trace::TraceLayer,
    classify::ServerErrorsFailureClass,
};
use tracing::{info_span, Span, error, info};
use uuid::Uuid;

pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health::health_check))

        // Identity
        .route("/api/v1/auth/register", post(auth::register))
        .route("/api/v1/auth/login", post(auth::login))

        // Catalog & slots
        .route("/api/v1/resources", get(resource::list_resources))
        .route("/api/v1/resources/{resource_id}/slots", get(resource::get_slots))

        // Customer
        .route("/api/v1/bookings", post(booking::create_booking))
        .route("/api/v1/me/bookings", get(booking::my_bookings))

        // Staff dashboard
        .route("/api/v1/admin/bookings", get(admin::list_bookings).post(admin::create_booking))
        .route("/api/v1/admin/bookings/unpaid", get(admin::unpaid_bookings))
        .route("/api/v1/admin/planning", get(admin::daily_planning))
        .route("/api/v1/admin/availability", get(admin::availability))
        .route("/api/v1/admin/bookings/{booking_id}", get(admin::get_booking).patch(admin::update_booking))
        .route("/api/v1/admin/bookings/{booking_id}/check-in", post(admin::check_in))
        .route("/api/v1/admin/bookings/{booking_id}/seats/{seat}", post(admin::toggle_seat))
        .route("/api/v1/admin/bookings/{booking_id}/rackets", post(admin::change_rackets))
        .route("/api/v1/admin/bookings/{booking_id}/payment", put(admin::update_payment))
        .route("/api/v1/admin/bookings/{booking_id}/settle", post(admin::settle))
        .route("/api/v1/admin/bookings/{booking_id}/cancel", post(admin::cancel))

        // Clients
        .route("/api/v1/admin/clients", get(client::list_clients).post(client::create_client))
        .route("/api/v1/admin/clients/{user_id}/history", get(client::client_history))

        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &Request<Body>| {
                    let request_id = Uuid::new_v4().to_string();
                    info_span!(
                        "http_request",
                        request_id = %request_id,
                        method = ?request.method(),
                        uri = ?request.uri(),
                        version = ?request.version(),
                        user_id = tracing::field::Empty,
                    )
                })
                .on_request(|request: &Request<Body>, _span: &Span| {
                    info!("started processing request: {} {}", request.method(), request.uri().path());
                })
                .on_response(|response: &axum::http::Response<Body>, latency: Duration, _span: &Span| {
                    info!(
                        status = response.status().as_u16(),
                        latency_ms = latency.as_millis(),
                        "finished processing request"
                    );
                })
                .on_failure(|error: ServerErrorsFailureClass, _latency: Duration, _span: &Span| {
                    error!("request failed: {:?}", error);
                })
        )
        .with_state(state)
}
