use serde::{Deserialize, Serialize};
use mongodb::bson::oid::ObjectId;

/// Status de entrega de um envio.
/// "sent" é gravado no dispatch; os demais chegam via webhook do provedor.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, utoipa::ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum DeliveryStatus {
    Sent,
    Delivered,
    Opened,
    Clicked,
    Bounced,
}

impl DeliveryStatus {
    /// Mapeia o nome de evento do webhook do provedor para um status.
    /// Eventos desconhecidos são ignorados pelo caller.
    pub fn from_provider_event(event: &str) -> Option<Self> {
        match event {
            "delivered" => Some(DeliveryStatus::Delivered),
            "open" | "opened" => Some(DeliveryStatus::Opened),
            "click" | "clicked" => Some(DeliveryStatus::Clicked),
            "bounce" | "bounced" | "dropped" => Some(DeliveryStatus::Bounced),
            _ => None,
        }
    }
}

/// Documento da collection "email_tracking" — um por chamada de envio (não por destinatário)
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct EmailTracking {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    /// UUID repassado ao provedor para correlação no webhook
    pub message_id: String,
    pub host_id: String,
    pub recipients: Vec<String>,
    pub subject: String,
    /// "sendgrid" | "emailjs"
    pub provider: String,
    pub status: DeliveryStatus,
    /// Epoch millis (UTC) — base da janela de quota de 24h
    pub sent_at: i64,
    pub updated_at: i64,
}

// ==================== RESPONSE MODELS ====================

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct TrackingInfo {
    pub message_id: String,
    pub recipients: Vec<String>,
    pub subject: String,
    pub provider: String,
    pub status: DeliveryStatus,
    pub sent_at: i64,
}

impl From<EmailTracking> for TrackingInfo {
    fn from(t: EmailTracking) -> Self {
        TrackingInfo {
            message_id: t.message_id,
            recipients: t.recipients,
            subject: t.subject,
            provider: t.provider,
            status: t.status,
            sent_at: t.sent_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_event_mapping() {
        assert_eq!(DeliveryStatus::from_provider_event("delivered"), Some(DeliveryStatus::Delivered));
        assert_eq!(DeliveryStatus::from_provider_event("open"), Some(DeliveryStatus::Opened));
        assert_eq!(DeliveryStatus::from_provider_event("click"), Some(DeliveryStatus::Clicked));
        assert_eq!(DeliveryStatus::from_provider_event("bounce"), Some(DeliveryStatus::Bounced));
        assert_eq!(DeliveryStatus::from_provider_event("processed"), None);
    }
}
