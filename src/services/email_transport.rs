// ==================== EMAIL TRANSPORT ABSTRACTION ====================
// Dois provedores intercambiáveis atrás da mesma capability: enviar uma
// mensagem endereçada a uma lista de destinatários. A seleção vem das
// settings do host, resolvida UMA vez por request e passada explicitamente
// para o dispatch — nunca re-buscada dentro da lógica de negócio.

use crate::services::{emailjs_service::EmailJsTransport, sendgrid_service::SendGridTransport};
use crate::utils::error::AppError;
use async_trait::async_trait;
use std::collections::HashMap;

/// Mensagem pronta para envio, já validada e com remetente resolvido
#[derive(Debug, Clone)]
pub struct OutboundEmail {
    /// UUID repassado ao provedor para correlação no webhook de entrega
    pub message_id: String,
    pub recipients: Vec<String>,
    pub subject: String,
    pub html: Option<String>,
    pub text: Option<String>,
    /// Parâmetros para o template do provedor (EmailJS)
    pub template_params: HashMap<String, String>,
    pub from_email: String,
    pub from_name: String,
}

#[async_trait]
pub trait EmailTransport: Send + Sync {
    fn provider_name(&self) -> &'static str;

    /// Envia a mensagem para todos os destinatários. Sem retry, sem fallback —
    /// qualquer falha do provedor volta como ProviderError.
    async fn send(&self, email: &OutboundEmail) -> Result<(), AppError>;
}

/// Credenciais do provedor configurado, extraídas do documento de settings do host
#[derive(Debug, Clone)]
pub enum EmailProviderConfig {
    SendGrid {
        api_key: String,
    },
    EmailJs {
        service_id: String,
        template_id: String,
        user_id: String,
    },
}

impl EmailProviderConfig {
    pub fn provider_name(&self) -> &'static str {
        match self {
            EmailProviderConfig::SendGrid { .. } => "sendgrid",
            EmailProviderConfig::EmailJs { .. } => "emailjs",
        }
    }

    /// Instancia o transport correspondente. Ponto único de seleção de provedor.
    pub fn into_transport(self) -> Box<dyn EmailTransport> {
        match self {
            EmailProviderConfig::SendGrid { api_key } => {
                Box::new(SendGridTransport::new(api_key))
            }
            EmailProviderConfig::EmailJs {
                service_id,
                template_id,
                user_id,
            } => Box::new(EmailJsTransport::new(service_id, template_id, user_id)),
        }
    }
}

/// Config completa de envio por host: provedor + identidade do remetente
#[derive(Debug, Clone)]
pub struct SenderConfig {
    pub provider: EmailProviderConfig,
    pub from_email: String,
    pub from_name: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transport_selection_follows_config() {
        let sendgrid = EmailProviderConfig::SendGrid {
            api_key: "SG.test".to_string(),
        };
        assert_eq!(sendgrid.provider_name(), "sendgrid");
        assert_eq!(sendgrid.into_transport().provider_name(), "sendgrid");

        let emailjs = EmailProviderConfig::EmailJs {
            service_id: "service_x".to_string(),
            template_id: "template_y".to_string(),
            user_id: "user_z".to_string(),
        };
        assert_eq!(emailjs.provider_name(), "emailjs");
        assert_eq!(emailjs.into_transport().provider_name(), "emailjs");
    }
}
