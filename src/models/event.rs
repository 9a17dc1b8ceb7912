use serde::{Deserialize, Serialize};
use mongodb::bson::oid::ObjectId;

/// Documento da collection "events"
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Event {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub host_id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    /// Epoch millis (UTC)
    pub start_at: i64,
    pub end_at: i64,
    #[serde(default)]
    pub location: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub cover_image_url: Option<String>,
    /// Itens de agenda, na ordem de exibição
    #[serde(default)]
    pub agenda: Vec<String>,
    /// Perguntas customizadas do formulário de inscrição (respostas keyed por índice)
    #[serde(default)]
    pub questions: Vec<String>,
    #[serde(default = "default_theme")]
    pub theme: String,
    /// Preço do ingresso em USD. None/0 = evento gratuito
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub price: Option<f64>,
    /// Timestamp do envio do lembrete 24h (ver jobs::reminder_scheduler)
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub reminder_sent_at: Option<i64>,
    pub created_at: i64,
    pub updated_at: i64,
}

fn default_theme() -> String {
    "classic".to_string()
}

// ==================== REQUEST/RESPONSE MODELS ====================

#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct CreateEventRequest {
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub start_at: i64,
    pub end_at: i64,
    #[serde(default)]
    pub location: String,
    pub cover_image_url: Option<String>,
    #[serde(default)]
    pub agenda: Vec<String>,
    #[serde(default)]
    pub questions: Vec<String>,
    pub theme: Option<String>,
    pub price: Option<f64>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateEventRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub start_at: Option<i64>,
    pub end_at: Option<i64>,
    pub location: Option<String>,
    pub cover_image_url: Option<String>,
    pub agenda: Option<Vec<String>>,
    pub questions: Option<Vec<String>>,
    pub theme: Option<String>,
    pub price: Option<f64>,
}

/// Versão compacta para listagens
#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct EventListItem {
    pub id: String,
    pub title: String,
    pub start_at: i64,
    pub end_at: i64,
    pub location: String,
    pub theme: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    pub updated_at: i64,
}

impl From<Event> for EventListItem {
    fn from(event: Event) -> Self {
        EventListItem {
            id: event.id.map(|id| id.to_hex()).unwrap_or_default(),
            title: event.title,
            start_at: event.start_at,
            end_at: event.end_at,
            location: event.location,
            theme: event.theme,
            price: event.price,
            updated_at: event.updated_at,
        }
    }
}

/// Versão completa retornada em GET /events/{id} e na página pública de inscrição
#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct EventResponse {
    pub id: String,
    pub title: String,
    pub description: String,
    pub start_at: i64,
    pub end_at: i64,
    pub location: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cover_image_url: Option<String>,
    pub agenda: Vec<String>,
    pub questions: Vec<String>,
    pub theme: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    pub created_at: i64,
    pub updated_at: i64,
}

impl From<Event> for EventResponse {
    fn from(event: Event) -> Self {
        EventResponse {
            id: event.id.map(|id| id.to_hex()).unwrap_or_default(),
            title: event.title,
            description: event.description,
            start_at: event.start_at,
            end_at: event.end_at,
            location: event.location,
            cover_image_url: event.cover_image_url,
            agenda: event.agenda,
            questions: event.questions,
            theme: event.theme,
            price: event.price,
            created_at: event.created_at,
            updated_at: event.updated_at,
        }
    }
}
