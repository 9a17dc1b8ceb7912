// ==================== EMAIL DISPATCH ====================
// Pipeline de envio em nome de um host: valida destinatários, checa a quota
// da janela de 24h, despacha pelo transport configurado e grava UM documento
// de tracking por chamada (não por destinatário).

use crate::{
    database::MongoDB,
    models::{DeliveryStatus, EmailTracking, TrackingInfo},
    services::email_transport::{OutboundEmail, SenderConfig},
    utils::error::AppError,
    utils::validation::is_valid_email,
};
use futures::stream::StreamExt;
use mongodb::bson::doc;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Máximo de envios trackeados por host dentro da janela móvel
pub const EMAIL_QUOTA_PER_WINDOW: usize = 100;
pub const QUOTA_WINDOW_HOURS: i64 = 24;

// ==================== REQUEST/RESPONSE MODELS ====================

#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct SendEmailRequest {
    /// Destinatários explícitos. Alternativamente, event_id envia para todos
    /// os inscritos do evento.
    #[serde(default)]
    pub recipients: Vec<String>,
    pub event_id: Option<String>,
    pub subject: String,
    pub html: Option<String>,
    pub text: Option<String>,
    #[serde(default)]
    pub template_params: HashMap<String, String>,
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct SendEmailResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recipients_count: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

// ==================== QUOTA WINDOW ====================

/// Conta quantos timestamps de envio caem dentro da janela móvel de 24h.
pub fn sends_within_window(sent_timestamps: &[i64], now_ms: i64) -> usize {
    let cutoff = now_ms - QUOTA_WINDOW_HOURS * 60 * 60 * 1000;
    sent_timestamps.iter().filter(|ts| **ts > cutoff).count()
}

/// Busca os timestamps de envio trackeados do host.
/// Conhecido: checagem e gravação são dois round trips independentes, então
/// envios concorrentes do mesmo host podem ultrapassar a quota.
async fn tracked_send_timestamps(db: &MongoDB, host_id: &str) -> Result<Vec<i64>, AppError> {
    let collection = db.collection::<EmailTracking>("email_tracking");

    let cutoff = chrono::Utc::now().timestamp_millis() - QUOTA_WINDOW_HOURS * 60 * 60 * 1000;

    // Mesma comparação estrita de sends_within_window: exatamente 24h atrás fica fora
    let mut cursor = collection
        .find(doc! { "host_id": host_id, "sent_at": { "$gt": cutoff } })
        .await
        .map_err(|e| AppError::DatabaseError(e.to_string()))?;

    let mut timestamps = Vec::new();
    while let Some(result) = cursor.next().await {
        match result {
            Ok(tracking) => timestamps.push(tracking.sent_at),
            Err(e) => log::error!("❌ Error reading tracking document: {}", e),
        }
    }

    Ok(timestamps)
}

// ==================== SEND PIPELINE ====================

/// Envia um email em nome do host. A SenderConfig já vem resolvida pelo
/// caller (uma resolução por request) — ver settings_service::resolve_sender_config.
/// Qualquer falha volta como {success: false, error} — nada é enfileirado
/// nem retentado.
pub async fn send_email(
    db: &MongoDB,
    host_id: &str,
    config: SenderConfig,
    request: SendEmailRequest,
) -> SendEmailResponse {
    match dispatch(db, host_id, config, request).await {
        Ok((message_id, recipients_count)) => SendEmailResponse {
            success: true,
            message_id: Some(message_id),
            recipients_count: Some(recipients_count),
            error: None,
        },
        Err(e) => {
            log::error!("❌ Email dispatch failed for host {}: {}", host_id, e);
            SendEmailResponse {
                success: false,
                message_id: None,
                recipients_count: None,
                error: Some(e.to_string()),
            }
        }
    }
}

async fn dispatch(
    db: &MongoDB,
    host_id: &str,
    config: SenderConfig,
    request: SendEmailRequest,
) -> Result<(String, usize), AppError> {
    // 1. Resolver destinatários (lista explícita ou inscritos do evento)
    let recipients = resolve_recipients(db, host_id, &request).await?;

    if recipients.is_empty() {
        return Err(AppError::InvalidRequest(
            "No recipients to send to".to_string(),
        ));
    }

    // 2. Validar sintaxe de TODOS os destinatários — um inválido falha a chamada inteira
    for recipient in &recipients {
        if !is_valid_email(recipient) {
            return Err(AppError::InvalidRequest(format!(
                "Invalid recipient address: {}",
                recipient
            )));
        }
    }

    // 3. Quota da janela móvel de 24h
    let now = chrono::Utc::now().timestamp_millis();
    let timestamps = tracked_send_timestamps(db, host_id).await?;

    let used = sends_within_window(&timestamps, now);
    if used >= EMAIL_QUOTA_PER_WINDOW {
        log::warn!(
            "🚫 Email quota reached for host {}: {}/{} in the last {}h",
            host_id,
            used,
            EMAIL_QUOTA_PER_WINDOW,
            QUOTA_WINDOW_HOURS
        );
        return Err(AppError::QuotaExceeded(format!(
            "{} sends per {}h. Try again later.",
            EMAIL_QUOTA_PER_WINDOW, QUOTA_WINDOW_HOURS
        )));
    }

    // 4. Despachar pelo transport configurado (sem retry, sem fallback)
    let message_id = uuid::Uuid::new_v4().to_string();
    let provider = config.provider.provider_name().to_string();

    let outbound = OutboundEmail {
        message_id: message_id.clone(),
        recipients: recipients.clone(),
        subject: request.subject.clone(),
        html: request.html.clone(),
        text: request.text.clone(),
        template_params: request.template_params.clone(),
        from_email: config.from_email.clone(),
        from_name: config.from_name.clone(),
    };

    let transport = config.provider.into_transport();
    transport.send(&outbound).await?;

    // 5. Gravar UM documento de tracking por chamada, status "sent"
    let tracking = EmailTracking {
        id: None,
        message_id: message_id.clone(),
        host_id: host_id.to_string(),
        recipients: recipients.clone(),
        subject: request.subject,
        provider,
        status: DeliveryStatus::Sent,
        sent_at: now,
        updated_at: now,
    };

    let collection = db.collection::<EmailTracking>("email_tracking");
    if let Err(e) = collection.insert_one(&tracking).await {
        // Email já saiu — não falhamos a chamada, mas o envio fica fora da quota
        log::error!("❌ Failed to write tracking document: {}", e);
    }

    crate::api::metrics::increment_emails_sent();

    log::info!(
        "✅ Email {} sent for host {} ({} recipients, quota {}/{})",
        message_id,
        host_id,
        recipients.len(),
        used + 1,
        EMAIL_QUOTA_PER_WINDOW
    );

    Ok((message_id, recipients.len()))
}

/// Lista explícita ou, se event_id presente, os emails dos inscritos do evento
async fn resolve_recipients(
    db: &MongoDB,
    host_id: &str,
    request: &SendEmailRequest,
) -> Result<Vec<String>, AppError> {
    if !request.recipients.is_empty() {
        return Ok(request.recipients.clone());
    }

    let event_id = request.event_id.as_deref().ok_or_else(|| {
        AppError::InvalidRequest("Either recipients or event_id must be provided".to_string())
    })?;

    // Garante que o evento pertence ao host antes de extrair os inscritos
    let object_id = mongodb::bson::oid::ObjectId::parse_str(event_id)
        .map_err(|_| AppError::InvalidRequest("Invalid event ID".to_string()))?;

    let events = db.collection::<crate::models::Event>("events");
    events
        .find_one(doc! { "_id": object_id, "host_id": host_id })
        .await
        .map_err(|e| AppError::DatabaseError(e.to_string()))?
        .ok_or_else(|| AppError::NotFound("Event not found".to_string()))?;

    let registrations = db.collection::<crate::models::Registration>("registrations");
    let mut cursor = registrations
        .find(doc! { "event_id": event_id })
        .await
        .map_err(|e| AppError::DatabaseError(e.to_string()))?;

    let mut recipients = Vec::new();
    while let Some(result) = cursor.next().await {
        match result {
            Ok(registration) => recipients.push(registration.email),
            Err(e) => log::error!("❌ Error reading registration: {}", e),
        }
    }

    Ok(recipients)
}

// ==================== HISTORY & WEBHOOK ====================

/// Histórico recente de envios do host (mais recentes primeiro, cap de 100)
pub async fn get_send_history(db: &MongoDB, host_id: &str) -> Result<Vec<TrackingInfo>, String> {
    let collection = db.collection::<EmailTracking>("email_tracking");

    let mut cursor = collection
        .find(doc! { "host_id": host_id })
        .sort(doc! { "sent_at": -1 })
        .limit(100)
        .await
        .map_err(|e| format!("Database error: {}", e))?;

    let mut history = Vec::new();
    while let Some(result) = cursor.next().await {
        match result {
            Ok(tracking) => history.push(TrackingInfo::from(tracking)),
            Err(e) => log::error!("❌ Error reading tracking document: {}", e),
        }
    }

    Ok(history)
}

/// Evento de entrega vindo do webhook do provedor
#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct ProviderEvent {
    pub message_id: String,
    pub event: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub timestamp: Option<i64>,
}

/// Ingesta eventos de entrega e transiciona o status dos documentos de tracking.
/// Eventos com nome desconhecido ou message_id não encontrado são ignorados.
pub async fn ingest_provider_events(
    db: &MongoDB,
    events: Vec<ProviderEvent>,
) -> Result<usize, String> {
    let collection = db.collection::<EmailTracking>("email_tracking");
    let mut updated = 0usize;

    for event in events {
        let status = match DeliveryStatus::from_provider_event(&event.event) {
            Some(s) => s,
            None => {
                log::debug!("ℹ️  Ignoring unknown provider event: {}", event.event);
                continue;
            }
        };

        let now = event
            .timestamp
            .unwrap_or_else(|| chrono::Utc::now().timestamp_millis());

        let result = collection
            .update_one(
                doc! { "message_id": &event.message_id },
                doc! { "$set": {
                    "status": mongodb::bson::to_bson(&status).map_err(|e| e.to_string())?,
                    "updated_at": now
                } },
            )
            .await
            .map_err(|e| format!("Database error: {}", e))?;

        if result.modified_count > 0 {
            updated += 1;
            log::info!(
                "📬 Tracking {} transitioned to {:?}",
                event.message_id,
                status
            );
        }
    }

    Ok(updated)
}

#[cfg(test)]
mod tests {
    use super::*;

    const HOUR_MS: i64 = 60 * 60 * 1000;

    #[test]
    fn test_window_counts_only_last_24h() {
        let now = 1_700_000_000_000;
        let timestamps = vec![
            now - HOUR_MS,      // dentro
            now - 23 * HOUR_MS, // dentro
            now - 24 * HOUR_MS, // exatamente no corte: fora
            now - 25 * HOUR_MS, // fora
            now - 48 * HOUR_MS, // fora
        ];
        assert_eq!(sends_within_window(&timestamps, now), 2);
    }

    #[test]
    fn test_quota_boundary_at_100() {
        let now = 1_700_000_000_000;

        // 99 envios na janela: próximo envio passa
        let ninety_nine: Vec<i64> = (0..99).map(|i| now - i * 60_000).collect();
        assert!(sends_within_window(&ninety_nine, now) < EMAIL_QUOTA_PER_WINDOW);

        // 100 envios na janela: próximo envio é rejeitado
        let hundred: Vec<i64> = (0..100).map(|i| now - i * 60_000).collect();
        assert!(sends_within_window(&hundred, now) >= EMAIL_QUOTA_PER_WINDOW);
    }

    #[test]
    fn test_old_sends_fall_out_of_window() {
        let now = 1_700_000_000_000;

        // 100 envios, todos de anteontem: janela vazia, envio passa
        let stale: Vec<i64> = (0..100).map(|i| now - 48 * HOUR_MS - i * 60_000).collect();
        assert_eq!(sends_within_window(&stale, now), 0);
    }
}
