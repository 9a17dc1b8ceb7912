// ==================== EMAILJS TRANSPORT ====================
// Provedor por destinatário: a API só aceita um destinatário por request,
// então o fan-out é um request concorrente por destinatário (sem cap e sem
// rollback parcial — envios já emitidos não são desfeitos se outro falhar).

use crate::services::email_transport::{EmailTransport, OutboundEmail};
use crate::utils::error::AppError;
use async_trait::async_trait;
use serde_json::json;

const EMAILJS_API_BASE: &str = "https://api.emailjs.com/api/v1.0";

pub struct EmailJsTransport {
    service_id: String,
    template_id: String,
    user_id: String,
}

impl EmailJsTransport {
    pub fn new(service_id: String, template_id: String, user_id: String) -> Self {
        Self {
            service_id,
            template_id,
            user_id,
        }
    }

    /// Payload de um request individual (template id + mapa chave/valor)
    fn build_payload(&self, email: &OutboundEmail, recipient: &str) -> serde_json::Value {
        let mut template_params = serde_json::Map::new();
        for (key, value) in &email.template_params {
            template_params.insert(key.clone(), json!(value));
        }
        template_params.insert("to_email".to_string(), json!(recipient));
        template_params.insert("subject".to_string(), json!(email.subject));
        template_params.insert("from_name".to_string(), json!(email.from_name));
        if let Some(html) = &email.html {
            template_params.insert("message_html".to_string(), json!(html));
        }
        if let Some(text) = &email.text {
            template_params.insert("message".to_string(), json!(text));
        }
        template_params.insert("message_id".to_string(), json!(email.message_id));

        json!({
            "service_id": self.service_id,
            "template_id": self.template_id,
            "user_id": self.user_id,
            "template_params": template_params
        })
    }

    async fn send_one(
        &self,
        client: &reqwest::Client,
        email: &OutboundEmail,
        recipient: &str,
    ) -> Result<(), AppError> {
        let url = format!("{}/email/send", EMAILJS_API_BASE);
        let payload = self.build_payload(email, recipient);

        let response = client
            .post(&url)
            .header("Content-Type", "application/json")
            .timeout(std::time::Duration::from_secs(10))
            .json(&payload)
            .send()
            .await
            .map_err(|e| AppError::ProviderError(format!("EmailJS request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::ProviderError(format!(
                "EmailJS API error {} for {}: {}",
                status, recipient, body
            )));
        }

        Ok(())
    }
}

#[async_trait]
impl EmailTransport for EmailJsTransport {
    fn provider_name(&self) -> &'static str {
        "emailjs"
    }

    async fn send(&self, email: &OutboundEmail) -> Result<(), AppError> {
        log::info!(
            "📧 EmailJS: sending template {} to {} recipient(s), one request each",
            self.template_id,
            email.recipients.len()
        );

        let client = reqwest::Client::new();

        let tasks: Vec<_> = email
            .recipients
            .iter()
            .map(|recipient| self.send_one(&client, email, recipient))
            .collect();

        let results = futures::future::join_all(tasks).await;

        let mut sent = 0usize;
        let mut first_error: Option<AppError> = None;

        for result in results {
            match result {
                Ok(_) => sent += 1,
                Err(e) => {
                    log::error!("❌ EmailJS send failed: {}", e);
                    if first_error.is_none() {
                        first_error = Some(e);
                    }
                }
            }
        }

        if let Some(e) = first_error {
            log::warn!(
                "⚠️  EmailJS partial failure: {}/{} sent before reporting error",
                sent,
                email.recipients.len()
            );
            return Err(e);
        }

        log::info!("✅ EmailJS sent message {} to all recipients", email.message_id);

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_payload_has_template_id_and_recipient_params() {
        let transport = EmailJsTransport::new(
            "service_x".to_string(),
            "template_y".to_string(),
            "user_z".to_string(),
        );

        let mut params = HashMap::new();
        params.insert("event_title".to_string(), "Rust Meetup".to_string());

        let email = OutboundEmail {
            message_id: "msg-9".to_string(),
            recipients: vec!["a@b.co".to_string()],
            subject: "Reminder".to_string(),
            html: None,
            text: Some("See you tomorrow".to_string()),
            template_params: params,
            from_email: "host@events.example".to_string(),
            from_name: "Host".to_string(),
        };

        let payload = transport.build_payload(&email, "a@b.co");
        assert_eq!(payload["service_id"], "service_x");
        assert_eq!(payload["template_id"], "template_y");
        assert_eq!(payload["user_id"], "user_z");
        assert_eq!(payload["template_params"]["to_email"], "a@b.co");
        assert_eq!(payload["template_params"]["event_title"], "Rust Meetup");
        assert_eq!(payload["template_params"]["message"], "See you tomorrow");
    }
}
