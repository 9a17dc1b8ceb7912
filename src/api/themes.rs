use actix_web::{get, web, HttpResponse, Responder};
use futures::stream::StreamExt;
use mongodb::bson::doc;

use crate::database::MongoDB;
use crate::models::{ThemeCatalog, ThemeInfo};

/// GET /api/v1/themes - Catálogo de temas visuais (read-only, seed no startup)
#[utoipa::path(
    get,
    path = "/api/v1/themes",
    tag = "Themes",
    responses(
        (status = 200, description = "Available visual themes")
    )
)]
#[get("")]
pub async fn get_themes(db: web::Data<MongoDB>) -> impl Responder {
    let collection = db.collection::<ThemeCatalog>("themes");

    match collection.find(doc! {}).await {
        Ok(mut cursor) => {
            let mut themes = Vec::new();

            while let Some(result) = cursor.next().await {
                match result {
                    Ok(theme) => themes.push(ThemeInfo::from(theme)),
                    Err(e) => {
                        log::error!("❌ Error reading theme: {}", e);
                    }
                }
            }

            let total = themes.len();

            HttpResponse::Ok().json(serde_json::json!({
                "success": true,
                "themes": themes,
                "total": total
            }))
        }
        Err(e) => HttpResponse::InternalServerError().json(serde_json::json!({
            "success": false,
            "error": format!("Failed to fetch themes: {}", e)
        })),
    }
}
