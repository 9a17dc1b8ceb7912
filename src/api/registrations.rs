// ==================== PUBLIC REGISTRATION PAGE ====================
// Endpoints sem autenticação: a página pública de inscrição lê o evento
// e submete a inscrição do participante.

use actix_web::{get, post, web, HttpResponse, Responder};
use mongodb::bson::{doc, oid::ObjectId};

use crate::database::MongoDB;
use crate::models::{Event, EventResponse, RegisterRequest};
use crate::services::registration_service;

/// GET /api/v1/public/events/{id} - Dados do evento para a página de inscrição
#[utoipa::path(
    get,
    path = "/api/v1/public/events/{id}",
    tag = "Public",
    responses(
        (status = 200, description = "Event data for the registration page", body = EventResponse),
        (status = 404, description = "Event not found")
    )
)]
#[get("/{id}")]
pub async fn get_public_event(path: web::Path<String>, db: web::Data<MongoDB>) -> impl Responder {
    let event_id = path.into_inner();
    let object_id = match ObjectId::parse_str(&event_id) {
        Ok(id) => id,
        Err(_) => {
            return HttpResponse::BadRequest().json(serde_json::json!({
                "success": false,
                "error": "Invalid event ID"
            }))
        }
    };

    let collection = db.collection::<Event>("events");

    match collection.find_one(doc! { "_id": object_id }).await {
        Ok(Some(event)) => HttpResponse::Ok().json(serde_json::json!({
            "success": true,
            "event": EventResponse::from(event)
        })),
        Ok(None) => HttpResponse::NotFound().json(serde_json::json!({
            "success": false,
            "error": "Event not found"
        })),
        Err(e) => HttpResponse::InternalServerError().json(serde_json::json!({
            "success": false,
            "error": format!("Failed to fetch event: {}", e)
        })),
    }
}

/// POST /api/v1/public/events/{id}/register - Submete inscrição
#[utoipa::path(
    post,
    path = "/api/v1/public/events/{id}/register",
    tag = "Public",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Registration created"),
        (status = 400, description = "Validation failed or duplicate registration")
    )
)]
#[post("/{id}/register")]
pub async fn register(
    path: web::Path<String>,
    body: web::Json<RegisterRequest>,
    db: web::Data<MongoDB>,
) -> impl Responder {
    let event_id = path.into_inner();

    let response =
        registration_service::register_attendee(&db, &event_id, body.into_inner()).await;

    if response.success {
        HttpResponse::Created().json(response)
    } else if response.error.as_deref() == Some("Event not found") {
        HttpResponse::NotFound().json(response)
    } else {
        HttpResponse::BadRequest().json(response)
    }
}
