use actix_web::{get, web, HttpResponse, Responder};

use crate::database::MongoDB;
use crate::middleware::auth::Claims;
use crate::services::dashboard_service;

/// GET /api/v1/dashboard - Métricas agregadas do host
#[utoipa::path(
    get,
    path = "/api/v1/dashboard",
    tag = "Dashboard",
    responses(
        (status = 200, description = "Aggregated host metrics", body = dashboard_service::DashboardResponse)
    ),
    security(("bearer_auth" = []))
)]
#[get("")]
pub async fn get_dashboard(user: web::ReqData<Claims>, db: web::Data<MongoDB>) -> impl Responder {
    let host_id = &user.sub;

    match dashboard_service::get_dashboard(&db, host_id).await {
        Ok(response) => HttpResponse::Ok().json(response),
        Err(e) => HttpResponse::InternalServerError().json(serde_json::json!({
            "success": false,
            "error": e
        })),
    }
}
