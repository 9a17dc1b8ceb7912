// ==================== EVENT REMINDER SCHEDULER ====================
// Job em background que envia o lembrete de 24h para os inscritos que
// optaram por notify_me. Roda a cada hora; cada evento só é lembrado uma
// vez (reminder_sent_at marca o envio).

use crate::{
    database::MongoDB,
    models::{Event, Registration},
    services::email_service::{self, SendEmailRequest},
    services::settings_service,
};
use futures::stream::StreamExt;
use mongodb::bson::doc;
use std::collections::HashMap;
use tokio::time::{interval, Duration};

const REMINDER_WINDOW_MS: i64 = 24 * 60 * 60 * 1000;

/// Inicia o scheduler de lembretes.
/// Executa imediatamente no startup e depois a cada hora — eventos que
/// perderam um tick (restart do servidor) são pegos no próximo.
pub async fn start_reminder_scheduler(db: MongoDB) {
    log::info!("📅 Starting event reminder scheduler (runs every hour)");

    tokio::spawn(async move {
        log::info!("🚀 Running initial reminder check on startup...");
        match send_due_reminders(&db).await {
            Ok(count) => {
                log::info!("✅ Startup reminder check completed: {} events processed", count);
            }
            Err(e) => {
                log::error!("❌ Startup reminder check failed: {}", e);
            }
        }

        let mut interval = interval(Duration::from_secs(3600));

        loop {
            interval.tick().await;

            log::debug!("⏰ Hourly reminder check...");

            match send_due_reminders(&db).await {
                Ok(count) => {
                    log::debug!("✅ Hourly reminder check: {} events processed", count);
                }
                Err(e) => {
                    log::error!("❌ Hourly reminder check failed: {}", e);
                }
            }
        }
    });

    log::info!("✅ Event reminder scheduler started successfully");
}

/// Eventos que começam nas próximas 24h e ainda não foram lembrados
async fn send_due_reminders(db: &MongoDB) -> Result<usize, String> {
    let now = chrono::Utc::now().timestamp_millis();

    let events_collection = db.collection::<Event>("events");

    let filter = doc! {
        "start_at": { "$gt": now, "$lte": now + REMINDER_WINDOW_MS },
        "reminder_sent_at": { "$eq": mongodb::bson::Bson::Null }
    };

    let mut cursor = events_collection
        .find(filter)
        .await
        .map_err(|e| format!("Database error: {}", e))?;

    let mut processed = 0usize;

    while let Some(result) = cursor.next().await {
        let event = match result {
            Ok(event) => event,
            Err(e) => {
                log::error!("  ❌ Error reading event: {}", e);
                continue;
            }
        };

        processed += 1;

        match send_event_reminder(db, &event).await {
            Ok(sent) => {
                if sent {
                    log::info!("    ✅ Reminder sent for event \"{}\"", event.title);
                }
            }
            Err(e) => {
                log::error!("    ❌ Failed to send reminder for \"{}\": {}", event.title, e);
            }
        }

        // Pequeno delay entre eventos para não rajar o provedor
        tokio::time::sleep(Duration::from_millis(500)).await;
    }

    Ok(processed)
}

/// Decide se o evento deve ser marcado como lembrado neste tick.
/// Host sem provedor configurado NÃO consome o lembrete — o evento fica
/// elegível para quando as settings aparecerem.
fn marks_reminder_sent(has_recipients: bool, provider_configured: bool) -> bool {
    !has_recipients || provider_configured
}

/// Envia o lembrete de um evento para os inscritos com notify_me.
/// Retorna false quando não há nada a enviar. Sem inscritos optantes o
/// evento é marcado mesmo assim (nunca haverá o que enviar); sem provedor
/// configurado ele fica para um tick futuro.
async fn send_event_reminder(db: &MongoDB, event: &Event) -> Result<bool, String> {
    let event_id = event
        .id
        .map(|id| id.to_hex())
        .ok_or("Event has no ID")?;

    // 1. Inscritos que optaram pelo lembrete
    let registrations_collection = db.collection::<Registration>("registrations");
    let mut cursor = registrations_collection
        .find(doc! { "event_id": &event_id, "notify_me": true })
        .await
        .map_err(|e| format!("Database error: {}", e))?;

    let mut recipients = Vec::new();
    while let Some(result) = cursor.next().await {
        match result {
            Ok(registration) => recipients.push(registration.email),
            Err(e) => log::error!("    ❌ Error reading registration: {}", e),
        }
    }

    let mut sent = false;

    // 2. Config do provedor do host (só interessa se há destinatários)
    let config = if recipients.is_empty() {
        log::debug!("    ℹ️  No opted-in attendees for event {}", event_id);
        None
    } else {
        match settings_service::resolve_sender_config(db, &event.host_id).await {
            Ok(config) => Some(config),
            Err(e) => {
                log::debug!(
                    "    ℹ️  Host {} has no usable email provider, leaving event {} for a later tick: {}",
                    event.host_id,
                    event_id,
                    e
                );
                None
            }
        }
    };

    if !marks_reminder_sent(!recipients.is_empty(), config.is_some()) {
        return Ok(false);
    }

    if let Some(config) = config {
        let mut template_params = HashMap::new();
        template_params.insert("event_title".to_string(), event.title.clone());
        template_params.insert("event_location".to_string(), event.location.clone());

        let request = SendEmailRequest {
            recipients,
            event_id: None,
            subject: format!("Reminder: \"{}\" starts soon", event.title),
            html: Some(format!(
                "<p>This is a reminder that <strong>{}</strong> starts within the next 24 hours.</p><p>Location: {}</p>",
                event.title, event.location
            )),
            text: Some(format!(
                "Reminder: {} starts within the next 24 hours. Location: {}",
                event.title, event.location
            )),
            template_params,
        };

        // Passa pelo pipeline normal — a quota do host se aplica
        let response = email_service::send_email(db, &event.host_id, config, request).await;

        if response.success {
            sent = true;
        } else {
            log::warn!(
                "    ⚠️  Reminder dispatch failed for event {}: {}",
                event_id,
                response.error.unwrap_or_default()
            );
        }
    }

    // 3. Marca o evento como lembrado — uma tentativa de dispatch por evento
    let events_collection = db.collection::<Event>("events");
    events_collection
        .update_one(
            doc! { "_id": event.id },
            doc! { "$set": { "reminder_sent_at": chrono::Utc::now().timestamp_millis() } },
        )
        .await
        .map_err(|e| format!("Failed to mark reminder sent: {}", e))?;

    Ok(sent)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unconfigured_host_keeps_event_eligible() {
        // Há destinatários mas o host não configurou provedor: não consome o lembrete
        assert!(!marks_reminder_sent(true, false));

        // Dispatch tentado (sucesso ou falha do provedor): marca
        assert!(marks_reminder_sent(true, true));

        // Sem inscritos optantes nunca haverá o que enviar: marca
        assert!(marks_reminder_sent(false, false));
    }
}
