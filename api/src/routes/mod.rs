//! HTTP route entry point for `/api/...`.
//!
//! Routes are organized by domain, each protected via the appropriate access
//! control middleware:
//! - `/health` → Health check endpoint (public)
//! - `/auth` → Authentication endpoints (login/verify, public)
//! - `/courses`, `/sections`, `/students`, `/lecturers` → Catalog CRUD (admin-only)
//! - `/attendance` → Token issuance, scans, overrides, history (authenticated;
//!   per-action capability checks inside the handlers)
//! - `/reports` → Aggregate rollups and dashboards (authenticated; scoped inside)
//! - `/subscriptions` → Push subscription registration (authenticated)

use crate::auth::guards::{allow_admin, allow_authenticated};
use axum::{Router, middleware::from_fn};
use util::state::AppState;

pub mod attendance;
pub mod auth;
pub mod courses;
pub mod health;
pub mod lecturers;
pub mod reports;
pub mod sections;
pub mod students;
pub mod subscriptions;

/// Builds the complete application router for all HTTP endpoints.
pub fn routes(app_state: AppState) -> Router {
    Router::new()
        .nest("/health", health::health_routes())
        .nest("/auth", auth::auth_routes())
        .nest(
            "/courses",
            courses::courses_routes().route_layer(from_fn(allow_admin)),
        )
        .nest(
            "/sections",
            sections::sections_routes().route_layer(from_fn(allow_admin)),
        )
        .nest(
            "/students",
            students::students_routes().route_layer(from_fn(allow_admin)),
        )
        .nest(
            "/lecturers",
            lecturers::lecturers_routes().route_layer(from_fn(allow_admin)),
        )
        .nest(
            "/attendance",
            attendance::attendance_routes().route_layer(from_fn(allow_authenticated)),
        )
        .nest(
            "/reports",
            reports::reports_routes().route_layer(from_fn(allow_authenticated)),
        )
        .nest(
            "/subscriptions",
            subscriptions::subscriptions_routes().route_layer(from_fn(allow_authenticated)),
        )
        .with_state(app_state)
}
