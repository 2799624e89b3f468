use actix_web::http::StatusCode;
use actix_web::web::{Data, Json};
use actix_web::{get, HttpResponse};
use serde::Serialize;

use crate::auth::CurrentUser;
use crate::data::DashboardStats;
use crate::error::CrmError;
use crate::router::html;
use crate::state::AppState;

#[derive(Serialize)]
struct DashboardData<'a> {
    title: &'static str,
    user: &'a str,
    stats: DashboardStats,
}

#[get("/")]
pub(super) async fn dashboard(state: Data<AppState>, user: CurrentUser) -> Result<HttpResponse, CrmError> {
    let stats = state.contacts().stats();
    let body = state.templates.render("dashboard", &DashboardData {
        title: "Dashboard",
        user: &user.username,
        stats,
    })?;
    Ok(html(StatusCode::OK, body))
}

/// Chart data for the dashboard.
#[get("/api/stats")]
pub(super) async fn stats_json(state: Data<AppState>, _user: CurrentUser) -> Json<DashboardStats> {
    Json(state.contacts().stats())
}
