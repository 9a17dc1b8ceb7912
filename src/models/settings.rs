use serde::{Deserialize, Serialize};
use mongodb::bson::oid::ObjectId;

/// Documento da collection "settings" — configuração de provedor de email por host.
/// Exatamente um documento por host_id.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct EmailSettings {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub host_id: String,
    /// "sendgrid" | "emailjs"
    pub provider: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub sendgrid_api_key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub emailjs_service_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub emailjs_template_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub emailjs_user_id: Option<String>,
    /// Remetente. Se ausentes, caem no DEFAULT_FROM_EMAIL/DEFAULT_FROM_NAME do ambiente
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub from_email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub from_name: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
}

// ==================== REQUEST/RESPONSE MODELS ====================

#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct SaveSettingsRequest {
    pub provider: String,
    pub sendgrid_api_key: Option<String>,
    pub emailjs_service_id: Option<String>,
    pub emailjs_template_id: Option<String>,
    pub emailjs_user_id: Option<String>,
    pub from_email: Option<String>,
    pub from_name: Option<String>,
}

/// Settings retornadas ao frontend — credenciais sempre mascaradas
#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct SettingsInfo {
    pub provider: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sendgrid_api_key_masked: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub emailjs_service_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub emailjs_template_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub emailjs_user_id_masked: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from_email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from_name: Option<String>,
    pub updated_at: i64,
}

/// Documento da collection "users" — perfil do host
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct HostProfile {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub host_id: String,
    #[serde(default)]
    pub display_name: String,
    #[serde(default)]
    pub email: String,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct SaveProfileRequest {
    pub display_name: Option<String>,
    pub email: Option<String>,
}
