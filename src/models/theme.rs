use serde::{Deserialize, Serialize};
use mongodb::bson::oid::ObjectId;

/// Documento da collection "themes" — catálogo de temas visuais (seed no startup)
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ThemeCatalog {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub theme_id: String,
    pub name: String,
    pub primary_color: String,
    pub background_color: String,
    pub font_family: String,
    #[serde(default)]
    pub is_default: bool,
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct ThemeInfo {
    pub theme_id: String,
    pub name: String,
    pub primary_color: String,
    pub background_color: String,
    pub font_family: String,
}

impl From<ThemeCatalog> for ThemeInfo {
    fn from(t: ThemeCatalog) -> Self {
        ThemeInfo {
            theme_id: t.theme_id,
            name: t.name,
            primary_color: t.primary_color,
            background_color: t.background_color,
            font_family: t.font_family,
        }
    }
}
