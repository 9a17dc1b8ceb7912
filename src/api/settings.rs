// ==================== SETTINGS & PROFILE API ====================

use actix_web::{delete, get, put, web, HttpResponse, Responder};
use mongodb::bson::doc;

use crate::database::MongoDB;
use crate::middleware::auth::Claims;
use crate::models::{HostProfile, SaveProfileRequest, SaveSettingsRequest};
use crate::services::settings_service;

/// GET /api/v1/settings - Settings de email do host (credenciais mascaradas)
#[get("")]
pub async fn get_settings(user: web::ReqData<Claims>, db: web::Data<MongoDB>) -> impl Responder {
    let host_id = &user.sub;

    match settings_service::get_settings(&db, host_id).await {
        Ok(Some(settings)) => HttpResponse::Ok().json(serde_json::json!({
            "success": true,
            "settings": settings
        })),
        Ok(None) => HttpResponse::Ok().json(serde_json::json!({
            "success": true,
            "settings": serde_json::Value::Null
        })),
        Err(e) => HttpResponse::InternalServerError().json(serde_json::json!({
            "success": false,
            "error": e
        })),
    }
}

/// PUT /api/v1/settings - Cria ou substitui as settings de email do host
#[utoipa::path(
    put,
    path = "/api/v1/settings",
    tag = "Settings",
    request_body = SaveSettingsRequest,
    responses(
        (status = 200, description = "Settings saved"),
        (status = 400, description = "Invalid provider or missing credentials")
    ),
    security(("bearer_auth" = []))
)]
#[put("")]
pub async fn save_settings(
    user: web::ReqData<Claims>,
    body: web::Json<SaveSettingsRequest>,
    db: web::Data<MongoDB>,
) -> impl Responder {
    let host_id = &user.sub;

    match settings_service::save_settings(&db, host_id, body.into_inner()).await {
        Ok(()) => HttpResponse::Ok().json(serde_json::json!({
            "success": true,
            "message": "Settings saved successfully"
        })),
        Err(e) => HttpResponse::BadRequest().json(serde_json::json!({
            "success": false,
            "error": e
        })),
    }
}

/// DELETE /api/v1/settings - Remove as settings de email do host
#[delete("")]
pub async fn delete_settings(user: web::ReqData<Claims>, db: web::Data<MongoDB>) -> impl Responder {
    let host_id = &user.sub;

    match settings_service::delete_settings(&db, host_id).await {
        Ok(true) => HttpResponse::Ok().json(serde_json::json!({
            "success": true,
            "message": "Settings deleted"
        })),
        Ok(false) => HttpResponse::NotFound().json(serde_json::json!({
            "success": false,
            "error": "No settings to delete"
        })),
        Err(e) => HttpResponse::InternalServerError().json(serde_json::json!({
            "success": false,
            "error": e
        })),
    }
}

/// GET /api/v1/profile - Perfil do host
#[get("")]
pub async fn get_profile(user: web::ReqData<Claims>, db: web::Data<MongoDB>) -> impl Responder {
    let host_id = &user.sub;

    let collection = db.collection::<HostProfile>("users");

    match collection.find_one(doc! { "host_id": &host_id }).await {
        Ok(Some(profile)) => HttpResponse::Ok().json(serde_json::json!({
            "success": true,
            "profile": {
                "host_id": profile.host_id,
                "display_name": profile.display_name,
                "email": profile.email,
                "updated_at": profile.updated_at
            }
        })),
        Ok(None) => HttpResponse::NotFound().json(serde_json::json!({
            "success": false,
            "error": "Profile not found"
        })),
        Err(e) => HttpResponse::InternalServerError().json(serde_json::json!({
            "success": false,
            "error": format!("Failed to fetch profile: {}", e)
        })),
    }
}

/// PUT /api/v1/profile - Cria ou atualiza o perfil do host
#[put("")]
pub async fn save_profile(
    user: web::ReqData<Claims>,
    body: web::Json<SaveProfileRequest>,
    db: web::Data<MongoDB>,
) -> impl Responder {
    let host_id = &user.sub;

    let collection = db.collection::<HostProfile>("users");
    let now = chrono::Utc::now().timestamp_millis();

    let mut update_doc = doc! { "updated_at": now };
    if let Some(display_name) = &body.display_name {
        update_doc.insert("display_name", display_name);
    }
    if let Some(email) = &body.email {
        update_doc.insert("email", email);
    }

    match collection
        .update_one(
            doc! { "host_id": &host_id },
            doc! {
                "$set": update_doc,
                "$setOnInsert": { "host_id": &host_id, "created_at": now }
            },
        )
        .upsert(true)
        .await
    {
        Ok(_) => HttpResponse::Ok().json(serde_json::json!({
            "success": true,
            "message": "Profile saved"
        })),
        Err(e) => HttpResponse::InternalServerError().json(serde_json::json!({
            "success": false,
            "error": format!("Failed to save profile: {}", e)
        })),
    }
}
