// ==================== EMAIL SETTINGS MANAGEMENT ====================
// Um documento de settings por host seleciona o provedor de email e guarda
// suas credenciais. Credenciais nunca voltam inteiras ao frontend.

use crate::{
    database::MongoDB,
    models::{EmailSettings, SaveSettingsRequest, SettingsInfo},
    services::email_transport::{EmailProviderConfig, SenderConfig},
    utils::error::AppError,
};
use mongodb::bson::doc;
use std::env;

/// Mascara uma credencial para exibição: só os 4 últimos caracteres ficam visíveis
pub fn mask_credential(value: &str) -> String {
    if value.len() <= 4 {
        return "••••".to_string();
    }
    format!("••••{}", &value[value.len() - 4..])
}

/// Valida e monta a config de provedor a partir do documento de settings
pub fn build_provider_config(settings: &EmailSettings) -> Result<EmailProviderConfig, AppError> {
    match settings.provider.as_str() {
        "sendgrid" => {
            let api_key = settings
                .sendgrid_api_key
                .clone()
                .filter(|k| !k.is_empty())
                .ok_or_else(|| {
                    AppError::InvalidRequest("SendGrid API key is not configured".to_string())
                })?;
            Ok(EmailProviderConfig::SendGrid { api_key })
        }
        "emailjs" => {
            let service_id = settings
                .emailjs_service_id
                .clone()
                .filter(|v| !v.is_empty())
                .ok_or_else(|| {
                    AppError::InvalidRequest("EmailJS service id is not configured".to_string())
                })?;
            let template_id = settings
                .emailjs_template_id
                .clone()
                .filter(|v| !v.is_empty())
                .ok_or_else(|| {
                    AppError::InvalidRequest("EmailJS template id is not configured".to_string())
                })?;
            let user_id = settings
                .emailjs_user_id
                .clone()
                .filter(|v| !v.is_empty())
                .ok_or_else(|| {
                    AppError::InvalidRequest("EmailJS user id is not configured".to_string())
                })?;
            Ok(EmailProviderConfig::EmailJs {
                service_id,
                template_id,
                user_id,
            })
        }
        other => Err(AppError::InvalidRequest(format!(
            "Unknown email provider: {}",
            other
        ))),
    }
}

/// Resolve a config de envio do host UMA vez — o resultado é passado
/// explicitamente para o pipeline de dispatch.
pub async fn resolve_sender_config(db: &MongoDB, host_id: &str) -> Result<SenderConfig, AppError> {
    let collection = db.collection::<EmailSettings>("settings");

    let settings = collection
        .find_one(doc! { "host_id": host_id })
        .await
        .map_err(|e| AppError::DatabaseError(e.to_string()))?
        .ok_or_else(|| {
            AppError::NotFound("No email provider configured for this host".to_string())
        })?;

    let provider = build_provider_config(&settings)?;

    let from_email = settings
        .from_email
        .filter(|v| !v.is_empty())
        .or_else(|| env::var("DEFAULT_FROM_EMAIL").ok())
        .ok_or_else(|| {
            AppError::InvalidRequest(
                "No sender address: set from_email or DEFAULT_FROM_EMAIL".to_string(),
            )
        })?;

    let from_name = settings
        .from_name
        .filter(|v| !v.is_empty())
        .or_else(|| env::var("DEFAULT_FROM_NAME").ok())
        .unwrap_or_else(|| "Event Host".to_string());

    Ok(SenderConfig {
        provider,
        from_email,
        from_name,
    })
}

// ==================== CRUD ====================

/// Cria ou substitui as settings do host (upsert)
pub async fn save_settings(
    db: &MongoDB,
    host_id: &str,
    request: SaveSettingsRequest,
) -> Result<(), String> {
    log::info!("📝 Saving email settings for host {} (provider: {})", host_id, request.provider);

    let now = chrono::Utc::now().timestamp_millis();

    let settings = EmailSettings {
        id: None,
        host_id: host_id.to_string(),
        provider: request.provider,
        sendgrid_api_key: request.sendgrid_api_key,
        emailjs_service_id: request.emailjs_service_id,
        emailjs_template_id: request.emailjs_template_id,
        emailjs_user_id: request.emailjs_user_id,
        from_email: request.from_email,
        from_name: request.from_name,
        created_at: now,
        updated_at: now,
    };

    // Valida antes de gravar — settings inválidas nunca entram no banco
    build_provider_config(&settings).map_err(|e| e.to_string())?;

    let collection = db.collection::<EmailSettings>("settings");

    let existing = collection
        .find_one(doc! { "host_id": host_id })
        .await
        .map_err(|e| format!("Database error: {}", e))?;

    match existing {
        Some(current) => {
            collection
                .update_one(
                    doc! { "host_id": host_id },
                    doc! { "$set": {
                        "provider": &settings.provider,
                        "sendgrid_api_key": settings.sendgrid_api_key.as_deref(),
                        "emailjs_service_id": settings.emailjs_service_id.as_deref(),
                        "emailjs_template_id": settings.emailjs_template_id.as_deref(),
                        "emailjs_user_id": settings.emailjs_user_id.as_deref(),
                        "from_email": settings.from_email.as_deref(),
                        "from_name": settings.from_name.as_deref(),
                        "created_at": current.created_at,
                        "updated_at": now
                    } },
                )
                .await
                .map_err(|e| format!("Failed to update settings: {}", e))?;
        }
        None => {
            collection
                .insert_one(&settings)
                .await
                .map_err(|e| format!("Failed to insert settings: {}", e))?;
        }
    }

    log::info!("✅ Email settings saved for host {}", host_id);

    Ok(())
}

/// Settings do host com credenciais mascaradas (None se nunca configurou)
pub async fn get_settings(db: &MongoDB, host_id: &str) -> Result<Option<SettingsInfo>, String> {
    let collection = db.collection::<EmailSettings>("settings");

    let settings = collection
        .find_one(doc! { "host_id": host_id })
        .await
        .map_err(|e| format!("Database error: {}", e))?;

    Ok(settings.map(|s| SettingsInfo {
        provider: s.provider,
        sendgrid_api_key_masked: s.sendgrid_api_key.as_deref().map(mask_credential),
        emailjs_service_id: s.emailjs_service_id,
        emailjs_template_id: s.emailjs_template_id,
        emailjs_user_id_masked: s.emailjs_user_id.as_deref().map(mask_credential),
        from_email: s.from_email,
        from_name: s.from_name,
        updated_at: s.updated_at,
    }))
}

pub async fn delete_settings(db: &MongoDB, host_id: &str) -> Result<bool, String> {
    let collection = db.collection::<EmailSettings>("settings");

    let result = collection
        .delete_one(doc! { "host_id": host_id })
        .await
        .map_err(|e| format!("Database error: {}", e))?;

    Ok(result.deleted_count > 0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_settings(provider: &str) -> EmailSettings {
        EmailSettings {
            id: None,
            host_id: "host-1".to_string(),
            provider: provider.to_string(),
            sendgrid_api_key: Some("SG.abcdef123456".to_string()),
            emailjs_service_id: Some("service_x".to_string()),
            emailjs_template_id: Some("template_y".to_string()),
            emailjs_user_id: Some("user_z".to_string()),
            from_email: Some("host@events.example".to_string()),
            from_name: Some("Host".to_string()),
            created_at: 0,
            updated_at: 0,
        }
    }

    #[test]
    fn test_provider_switch_changes_transport() {
        // Mesmo documento, só o campo provider muda — o roteamento segue o storage
        let sendgrid = build_provider_config(&base_settings("sendgrid")).unwrap();
        assert_eq!(sendgrid.provider_name(), "sendgrid");

        let emailjs = build_provider_config(&base_settings("emailjs")).unwrap();
        assert_eq!(emailjs.provider_name(), "emailjs");
    }

    #[test]
    fn test_missing_credentials_rejected() {
        let mut settings = base_settings("sendgrid");
        settings.sendgrid_api_key = None;
        assert!(build_provider_config(&settings).is_err());

        let mut settings = base_settings("emailjs");
        settings.emailjs_template_id = Some("".to_string());
        assert!(build_provider_config(&settings).is_err());
    }

    #[test]
    fn test_unknown_provider_rejected() {
        let settings = base_settings("mailchimp");
        assert!(build_provider_config(&settings).is_err());
    }

    #[test]
    fn test_mask_credential_keeps_last_four() {
        assert_eq!(mask_credential("SG.abcdef123456"), "••••3456");
        assert_eq!(mask_credential("abc"), "••••");
    }
}
