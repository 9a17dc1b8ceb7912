// ==================== EMAIL API ====================
// Envio em nome do host, histórico de tracking e webhook de entrega do
// provedor. A config de provedor é resolvida UMA vez por request e passada
// para o pipeline de dispatch.

use actix_web::{get, post, web, HttpResponse, Responder};

use crate::database::MongoDB;
use crate::middleware::auth::Claims;
use crate::services::email_service::{self, ProviderEvent, SendEmailRequest};
use crate::services::settings_service;

/// POST /api/v1/emails/send - Envia email (lista explícita ou inscritos de um evento)
#[utoipa::path(
    post,
    path = "/api/v1/emails/send",
    tag = "Emails",
    request_body = SendEmailRequest,
    responses(
        (status = 200, description = "Email dispatched", body = email_service::SendEmailResponse),
        (status = 400, description = "Validation, quota or provider failure")
    ),
    security(("bearer_auth" = []))
)]
#[post("/send")]
pub async fn send_email(
    user: web::ReqData<Claims>,
    body: web::Json<SendEmailRequest>,
    db: web::Data<MongoDB>,
) -> impl Responder {
    let host_id = &user.sub;

    // Resolução única da config do provedor para este request
    let config = match settings_service::resolve_sender_config(&db, host_id).await {
        Ok(config) => config,
        Err(e) => {
            return HttpResponse::BadRequest().json(serde_json::json!({
                "success": false,
                "error": e.to_string()
            }))
        }
    };

    let response = email_service::send_email(&db, host_id, config, body.into_inner()).await;

    if response.success {
        HttpResponse::Ok().json(response)
    } else {
        HttpResponse::BadRequest().json(response)
    }
}

/// GET /api/v1/emails/history - Histórico recente de envios do host
#[get("/history")]
pub async fn get_history(user: web::ReqData<Claims>, db: web::Data<MongoDB>) -> impl Responder {
    let host_id = &user.sub;

    match email_service::get_send_history(&db, host_id).await {
        Ok(history) => {
            let total = history.len();
            HttpResponse::Ok().json(serde_json::json!({
                "success": true,
                "history": history,
                "total": total
            }))
        }
        Err(e) => HttpResponse::InternalServerError().json(serde_json::json!({
            "success": false,
            "error": e
        })),
    }
}

/// Autenticação mínima do webhook: com WEBHOOK_TOKEN setado, o provedor
/// precisa mandar o mesmo valor no header X-Webhook-Token. Sem a env var
/// o endpoint fica aberto (ambiente de desenvolvimento).
fn webhook_token_valid(expected: Option<&str>, provided: Option<&str>) -> bool {
    match expected {
        Some(expected) => provided == Some(expected),
        None => true,
    }
}

/// POST /api/v1/public/emails/events - Webhook de eventos de entrega do provedor.
/// Transiciona documentos de tracking para delivered/opened/clicked/bounced.
#[utoipa::path(
    post,
    path = "/api/v1/public/emails/events",
    tag = "Emails",
    request_body = Vec<ProviderEvent>,
    responses(
        (status = 200, description = "Events ingested"),
        (status = 401, description = "Missing or invalid webhook token")
    )
)]
#[post("/events")]
pub async fn provider_webhook(
    req: actix_web::HttpRequest,
    body: web::Json<Vec<ProviderEvent>>,
    db: web::Data<MongoDB>,
) -> impl Responder {
    let expected = std::env::var("WEBHOOK_TOKEN").ok();
    let provided = req
        .headers()
        .get("X-Webhook-Token")
        .and_then(|v| v.to_str().ok());

    if !webhook_token_valid(expected.as_deref(), provided) {
        return HttpResponse::Unauthorized().json(serde_json::json!({
            "success": false,
            "error": "Invalid webhook token"
        }));
    }

    match email_service::ingest_provider_events(&db, body.into_inner()).await {
        Ok(updated) => HttpResponse::Ok().json(serde_json::json!({
            "success": true,
            "updated": updated
        })),
        Err(e) => HttpResponse::InternalServerError().json(serde_json::json!({
            "success": false,
            "error": e
        })),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_webhook_token_check() {
        // Sem WEBHOOK_TOKEN configurado o endpoint aceita qualquer chamada
        assert!(webhook_token_valid(None, None));
        assert!(webhook_token_valid(None, Some("anything")));

        // Com token configurado, só o valor exato passa
        assert!(webhook_token_valid(Some("s3cret"), Some("s3cret")));
        assert!(!webhook_token_valid(Some("s3cret"), None));
        assert!(!webhook_token_valid(Some("s3cret"), Some("wrong")));
    }
}
