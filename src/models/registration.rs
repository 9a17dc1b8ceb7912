use serde::{Deserialize, Serialize};
use mongodb::bson::oid::ObjectId;
use std::collections::HashMap;

/// Documento da collection "registrations"
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Registration {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub event_id: String,
    pub name: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub company: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub address: Option<String>,
    /// Respostas às perguntas customizadas do evento, keyed pelo índice da pergunta ("0", "1", ...)
    #[serde(default)]
    pub custom_answers: HashMap<String, String>,
    /// Se o participante quer receber o lembrete de 24h antes do evento
    #[serde(default = "default_true")]
    pub notify_me: bool,
    pub registered_at: i64,
}

fn default_true() -> bool {
    true
}

// ==================== REQUEST/RESPONSE MODELS ====================

#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub company: Option<String>,
    pub address: Option<String>,
    #[serde(default)]
    pub custom_answers: HashMap<String, String>,
    #[serde(default = "default_true")]
    pub notify_me: bool,
}

/// Erro de validação por campo (exibido inline no formulário)
#[derive(Debug, Serialize, PartialEq, utoipa::ToSchema)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct RegisterResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub registration_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub field_errors: Vec<FieldError>,
}

/// Linha da lista de participantes (visão do host)
#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct AttendeeInfo {
    pub registration_id: String,
    pub name: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
    pub custom_answers: HashMap<String, String>,
    pub notify_me: bool,
    pub registered_at: i64,
}

impl From<Registration> for AttendeeInfo {
    fn from(reg: Registration) -> Self {
        AttendeeInfo {
            registration_id: reg.id.map(|id| id.to_hex()).unwrap_or_default(),
            name: reg.name,
            email: reg.email,
            phone: reg.phone,
            company: reg.company,
            custom_answers: reg.custom_answers,
            notify_me: reg.notify_me,
            registered_at: reg.registered_at,
        }
    }
}
