use crate::database::MongoDB;
use crate::models::ThemeCatalog;
use mongodb::bson::doc;

/// Seed dos 6 temas padrão no MongoDB.
/// Só insere se a collection estiver vazia de defaults.
pub async fn seed_default_themes(db: &MongoDB) {
    let collection = db.collection::<ThemeCatalog>("themes");

    let count = collection
        .count_documents(doc! { "is_default": true })
        .await
        .unwrap_or(0);

    if count >= 6 {
        log::info!("🎨 Themes: {} defaults already in DB — skipping seed", count);
        return;
    }

    // Versão antiga ou parcial: remove e recria
    if count > 0 {
        log::info!("🎨 Themes: found {} defaults (expected 6) — recreating...", count);
        let _ = collection.delete_many(doc! { "is_default": true }).await;
    }

    log::info!("🎨 Themes: seeding 6 default themes into MongoDB...");

    let themes = build_default_themes();

    match collection.insert_many(&themes).await {
        Ok(result) => {
            log::info!("   ✅ Inserted {} default themes into themes collection",
                result.inserted_ids.len());
        }
        Err(e) => {
            log::error!("   ❌ Failed to seed default themes: {}", e);
        }
    }
}

fn build_default_themes() -> Vec<ThemeCatalog> {
    vec![
        ThemeCatalog {
            id: None,
            theme_id: "classic".into(),
            name: "Classic".into(),
            primary_color: "#1f2937".into(),
            background_color: "#ffffff".into(),
            font_family: "Inter".into(),
            is_default: true,
        },
        ThemeCatalog {
            id: None,
            theme_id: "midnight".into(),
            name: "Midnight".into(),
            primary_color: "#60a5fa".into(),
            background_color: "#0f172a".into(),
            font_family: "Inter".into(),
            is_default: true,
        },
        ThemeCatalog {
            id: None,
            theme_id: "sunset".into(),
            name: "Sunset".into(),
            primary_color: "#ea580c".into(),
            background_color: "#fff7ed".into(),
            font_family: "Poppins".into(),
            is_default: true,
        },
        ThemeCatalog {
            id: None,
            theme_id: "forest".into(),
            name: "Forest".into(),
            primary_color: "#166534".into(),
            background_color: "#f0fdf4".into(),
            font_family: "Lora".into(),
            is_default: true,
        },
        ThemeCatalog {
            id: None,
            theme_id: "festival".into(),
            name: "Festival".into(),
            primary_color: "#a21caf".into(),
            background_color: "#fdf4ff".into(),
            font_family: "Poppins".into(),
            is_default: true,
        },
        ThemeCatalog {
            id: None,
            theme_id: "corporate".into(),
            name: "Corporate".into(),
            primary_color: "#0e7490".into(),
            background_color: "#f8fafc".into(),
            font_family: "Roboto".into(),
            is_default: true,
        },
    ]
}
