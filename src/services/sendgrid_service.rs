// ==================== SENDGRID TRANSPORT ====================
// Provedor bulk: um único request HTTP leva o array completo de destinatários.

use crate::services::email_transport::{EmailTransport, OutboundEmail};
use crate::utils::error::AppError;
use async_trait::async_trait;
use serde_json::json;

const SENDGRID_API_BASE: &str = "https://api.sendgrid.com/v3";

pub struct SendGridTransport {
    api_key: String,
}

impl SendGridTransport {
    pub fn new(api_key: String) -> Self {
        Self { api_key }
    }

    /// Monta o payload do POST /mail/send
    fn build_payload(&self, email: &OutboundEmail) -> serde_json::Value {
        let to: Vec<serde_json::Value> = email
            .recipients
            .iter()
            .map(|r| json!({ "email": r }))
            .collect();

        let mut content = Vec::new();
        if let Some(text) = &email.text {
            content.push(json!({ "type": "text/plain", "value": text }));
        }
        if let Some(html) = &email.html {
            content.push(json!({ "type": "text/html", "value": html }));
        }

        json!({
            "personalizations": [{
                "to": to,
                "custom_args": { "message_id": email.message_id }
            }],
            "from": {
                "email": email.from_email,
                "name": email.from_name
            },
            "subject": email.subject,
            "content": content
        })
    }
}

#[async_trait]
impl EmailTransport for SendGridTransport {
    fn provider_name(&self) -> &'static str {
        "sendgrid"
    }

    async fn send(&self, email: &OutboundEmail) -> Result<(), AppError> {
        log::info!(
            "📧 SendGrid: sending \"{}\" to {} recipient(s)",
            email.subject,
            email.recipients.len()
        );

        let url = format!("{}/mail/send", SENDGRID_API_BASE);
        let payload = self.build_payload(email);

        let client = reqwest::Client::new();
        let response = client
            .post(&url)
            .bearer_auth(&self.api_key)
            .header("Accept", "application/json")
            .timeout(std::time::Duration::from_secs(10))
            .json(&payload)
            .send()
            .await
            .map_err(|e| AppError::ProviderError(format!("SendGrid request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::ProviderError(format!(
                "SendGrid API error {}: {}",
                status, body
            )));
        }

        log::info!("✅ SendGrid accepted message {}", email.message_id);

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn sample_email() -> OutboundEmail {
        OutboundEmail {
            message_id: "msg-123".to_string(),
            recipients: vec!["a@b.co".to_string(), "c@d.org".to_string()],
            subject: "Event update".to_string(),
            html: Some("<p>Hello</p>".to_string()),
            text: Some("Hello".to_string()),
            template_params: HashMap::new(),
            from_email: "host@events.example".to_string(),
            from_name: "Event Host".to_string(),
        }
    }

    #[test]
    fn test_payload_carries_all_recipients_in_one_request() {
        let transport = SendGridTransport::new("SG.key".to_string());
        let payload = transport.build_payload(&sample_email());

        let to = &payload["personalizations"][0]["to"];
        assert_eq!(to.as_array().unwrap().len(), 2);
        assert_eq!(to[0]["email"], "a@b.co");
        assert_eq!(
            payload["personalizations"][0]["custom_args"]["message_id"],
            "msg-123"
        );
        assert_eq!(payload["from"]["email"], "host@events.example");
        assert_eq!(payload["subject"], "Event update");
        assert_eq!(payload["content"].as_array().unwrap().len(), 2);
    }
}
