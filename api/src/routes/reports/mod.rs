use axum::{Router, routing::get};
use util::state::AppState;

mod common;
mod get;

pub use get::{at_risk, attendance_rates, dashboard_summary, day_roster};

pub fn reports_routes() -> Router<AppState> {
    Router::new()
        .route("/attendance-rates", get(attendance_rates))
        .route("/sections/{section_id}/days/{date}", get(day_roster))
        .route("/at-risk-students", get(at_risk))
        .route("/dashboard-summary", get(dashboard_summary))
}
