use actix_web::{delete, get, post, put, web, HttpResponse, Responder};
use futures::stream::StreamExt;
use mongodb::bson::{doc, oid::ObjectId};

use crate::database::MongoDB;
use crate::middleware::auth::Claims;
use crate::models::{
    AttendeeInfo, CreateEventRequest, Event, EventListItem, EventResponse, Registration,
    UpdateEventRequest,
};

/// GET /api/v1/events - Lista os eventos do host (compacta)
#[get("")]
pub async fn get_events(user: web::ReqData<Claims>, db: web::Data<MongoDB>) -> impl Responder {
    let host_id = &user.sub;

    let collection = db.collection::<Event>("events");

    match collection.find(doc! { "host_id": &host_id }).await {
        Ok(mut cursor) => {
            let mut events = Vec::new();

            while let Some(result) = cursor.next().await {
                match result {
                    Ok(event) => events.push(EventListItem::from(event)),
                    Err(e) => {
                        log::error!("❌ Error reading event: {}", e);
                    }
                }
            }

            // Próximos primeiro
            events.sort_by(|a, b| a.start_at.cmp(&b.start_at));

            let total = events.len();

            HttpResponse::Ok().json(serde_json::json!({
                "success": true,
                "events": events,
                "total": total
            }))
        }
        Err(e) => HttpResponse::InternalServerError().json(serde_json::json!({
            "success": false,
            "error": format!("Failed to fetch events: {}", e)
        })),
    }
}

/// GET /api/v1/events/{id} - Busca evento completo do host
#[get("/{id}")]
pub async fn get_event(
    user: web::ReqData<Claims>,
    path: web::Path<String>,
    db: web::Data<MongoDB>,
) -> impl Responder {
    let host_id = &user.sub;

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

    match collection
        .find_one(doc! { "_id": object_id, "host_id": &host_id })
        .await
    {
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

/// POST /api/v1/events - Cria novo evento
#[utoipa::path(
    post,
    path = "/api/v1/events",
    tag = "Events",
    request_body = CreateEventRequest,
    responses(
        (status = 201, description = "Event created"),
        (status = 400, description = "Invalid payload")
    ),
    security(("bearer_auth" = []))
)]
#[post("")]
pub async fn create_event(
    user: web::ReqData<Claims>,
    body: web::Json<CreateEventRequest>,
    db: web::Data<MongoDB>,
) -> impl Responder {
    let host_id = &user.sub;

    if body.title.trim().is_empty() {
        return HttpResponse::BadRequest().json(serde_json::json!({
            "success": false,
            "error": "Title is required"
        }));
    }

    if body.end_at < body.start_at {
        return HttpResponse::BadRequest().json(serde_json::json!({
            "success": false,
            "error": "Event end must not be before its start"
        }));
    }

    let collection = db.collection::<Event>("events");

    let now = chrono::Utc::now().timestamp_millis();
    let request = body.into_inner();
    let event = Event {
        id: None,
        host_id: host_id.to_string(),
        title: request.title.trim().to_string(),
        description: request.description,
        start_at: request.start_at,
        end_at: request.end_at,
        location: request.location,
        cover_image_url: request.cover_image_url,
        agenda: request.agenda,
        questions: request.questions,
        theme: request.theme.unwrap_or_else(|| "classic".to_string()),
        price: request.price,
        reminder_sent_at: None,
        created_at: now,
        updated_at: now,
    };

    match collection.insert_one(&event).await {
        Ok(result) => {
            let mut created = event;
            created.id = result.inserted_id.as_object_id();

            HttpResponse::Created().json(serde_json::json!({
                "success": true,
                "event": EventResponse::from(created)
            }))
        }
        Err(e) => HttpResponse::InternalServerError().json(serde_json::json!({
            "success": false,
            "error": format!("Failed to create event: {}", e)
        })),
    }
}

/// PUT /api/v1/events/{id} - Atualiza evento
#[put("/{id}")]
pub async fn update_event(
    user: web::ReqData<Claims>,
    path: web::Path<String>,
    body: web::Json<UpdateEventRequest>,
    db: web::Data<MongoDB>,
) -> impl Responder {
    let host_id = &user.sub;

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

    // Verifica se o evento existe e pertence ao host
    match collection
        .find_one(doc! { "_id": object_id, "host_id": &host_id })
        .await
    {
        Ok(Some(_)) => {}
        Ok(None) => {
            return HttpResponse::NotFound().json(serde_json::json!({
                "success": false,
                "error": "Event not found"
            }))
        }
        Err(e) => {
            return HttpResponse::InternalServerError().json(serde_json::json!({
                "success": false,
                "error": format!("Failed to verify event: {}", e)
            }))
        }
    }

    // Constrói o documento de atualização
    let mut update_doc = doc! {
        "updated_at": chrono::Utc::now().timestamp_millis()
    };

    if let Some(title) = &body.title {
        update_doc.insert("title", title);
    }
    if let Some(description) = &body.description {
        update_doc.insert("description", description);
    }
    if let Some(start_at) = body.start_at {
        update_doc.insert("start_at", start_at);
    }
    if let Some(end_at) = body.end_at {
        update_doc.insert("end_at", end_at);
    }
    if let Some(location) = &body.location {
        update_doc.insert("location", location);
    }
    if let Some(cover_image_url) = &body.cover_image_url {
        update_doc.insert("cover_image_url", cover_image_url);
    }
    if let Some(agenda) = &body.agenda {
        update_doc.insert("agenda", agenda.clone());
    }
    if let Some(questions) = &body.questions {
        update_doc.insert("questions", questions.clone());
    }
    if let Some(theme) = &body.theme {
        update_doc.insert("theme", theme);
    }
    if let Some(price) = body.price {
        update_doc.insert("price", price);
    }

    match collection
        .update_one(
            doc! { "_id": object_id, "host_id": &host_id },
            doc! { "$set": update_doc },
        )
        .await
    {
        Ok(_) => {
            match collection.find_one(doc! { "_id": object_id }).await {
                Ok(Some(event)) => HttpResponse::Ok().json(serde_json::json!({
                    "success": true,
                    "event": EventResponse::from(event)
                })),
                _ => HttpResponse::Ok().json(serde_json::json!({
                    "success": true,
                    "message": "Event updated successfully"
                })),
            }
        }
        Err(e) => HttpResponse::InternalServerError().json(serde_json::json!({
            "success": false,
            "error": format!("Failed to update event: {}", e)
        })),
    }
}

/// DELETE /api/v1/events/{id} - Deleta evento e suas inscrições
#[delete("/{id}")]
pub async fn delete_event(
    user: web::ReqData<Claims>,
    path: web::Path<String>,
    db: web::Data<MongoDB>,
) -> impl Responder {
    let host_id = &user.sub;

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

    match collection
        .delete_one(doc! { "_id": object_id, "host_id": &host_id })
        .await
    {
        Ok(result) => {
            if result.deleted_count > 0 {
                // Limpa as inscrições órfãs (best-effort)
                let registrations = db.collection::<Registration>("registrations");
                if let Err(e) = registrations
                    .delete_many(doc! { "event_id": &event_id })
                    .await
                {
                    log::error!("❌ Failed to delete registrations for event {}: {}", event_id, e);
                }

                HttpResponse::Ok().json(serde_json::json!({
                    "success": true,
                    "message": "Event deleted successfully"
                }))
            } else {
                HttpResponse::NotFound().json(serde_json::json!({
                    "success": false,
                    "error": "Event not found"
                }))
            }
        }
        Err(e) => HttpResponse::InternalServerError().json(serde_json::json!({
            "success": false,
            "error": format!("Failed to delete event: {}", e)
        })),
    }
}

/// Query de paginação
#[derive(Debug, serde::Deserialize)]
pub struct PaginationQuery {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

impl PaginationQuery {
    /// Cap em [1, 200] — limit 0 chegaria ao driver como "sem limite"
    fn limit(&self) -> i64 {
        self.limit.unwrap_or(50).clamp(1, 200)
    }

    fn offset(&self) -> i64 {
        self.offset.unwrap_or(0).max(0)
    }
}

/// GET /api/v1/events/{id}/registrations - Lista de participantes (paginada)
#[get("/{id}/registrations")]
pub async fn get_event_registrations(
    user: web::ReqData<Claims>,
    path: web::Path<String>,
    query: web::Query<PaginationQuery>,
    db: web::Data<MongoDB>,
) -> impl Responder {
    let host_id = &user.sub;

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

    let events = db.collection::<Event>("events");

    // Só o dono do evento vê a lista de participantes
    match events
        .find_one(doc! { "_id": object_id, "host_id": &host_id })
        .await
    {
        Ok(Some(_)) => {}
        Ok(None) => {
            return HttpResponse::NotFound().json(serde_json::json!({
                "success": false,
                "error": "Event not found"
            }))
        }
        Err(e) => {
            return HttpResponse::InternalServerError().json(serde_json::json!({
                "success": false,
                "error": format!("Failed to verify event: {}", e)
            }))
        }
    }

    let limit = query.limit();
    let offset = query.offset();

    let registrations = db.collection::<Registration>("registrations");

    let total = match registrations
        .count_documents(doc! { "event_id": &event_id })
        .await
    {
        Ok(count) => count,
        Err(e) => {
            return HttpResponse::InternalServerError().json(serde_json::json!({
                "success": false,
                "error": format!("Failed to count registrations: {}", e)
            }))
        }
    };

    match registrations
        .find(doc! { "event_id": &event_id })
        .sort(doc! { "registered_at": -1 })
        .skip(offset as u64)
        .limit(limit)
        .await
    {
        Ok(mut cursor) => {
            let mut attendees = Vec::new();

            while let Some(result) = cursor.next().await {
                match result {
                    Ok(registration) => attendees.push(AttendeeInfo::from(registration)),
                    Err(e) => {
                        log::error!("❌ Error reading registration: {}", e);
                    }
                }
            }

            HttpResponse::Ok().json(serde_json::json!({
                "success": true,
                "attendees": attendees,
                "total": total,
                "limit": limit,
                "offset": offset
            }))
        }
        Err(e) => HttpResponse::InternalServerError().json(serde_json::json!({
            "success": false,
            "error": format!("Failed to fetch registrations: {}", e)
        })),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pagination_limit_is_clamped() {
        // 0 e negativos virariam "sem limite"/lixo no driver
        let query = PaginationQuery { limit: Some(0), offset: None };
        assert_eq!(query.limit(), 1);

        let query = PaginationQuery { limit: Some(-5), offset: Some(-10) };
        assert_eq!(query.limit(), 1);
        assert_eq!(query.offset(), 0);

        let query = PaginationQuery { limit: Some(10_000), offset: None };
        assert_eq!(query.limit(), 200);

        let query = PaginationQuery { limit: None, offset: None };
        assert_eq!(query.limit(), 50);
        assert_eq!(query.offset(), 0);
    }
}
