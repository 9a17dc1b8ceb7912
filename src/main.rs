mod api;
mod database;
mod jobs;
mod middleware;
mod models;
mod seeds;
mod services;
mod utils;

use actix_cors::Cors;
use actix_web::{middleware::Logger, web, App, HttpServer};
use dotenv::dotenv;
use std::env;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load environment variables
    dotenv().ok();

    // Initialize logger
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    // Get configuration from environment
    let host = env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
    let port = env::var("PORT").unwrap_or_else(|_| "3002".to_string());
    let database_url = env::var("DATABASE_URL")
        .expect("DATABASE_URL must be set");

    if env::var("DEFAULT_FROM_EMAIL").is_err() {
        log::warn!("⚠️  DEFAULT_FROM_EMAIL not set — hosts must configure from_email in settings");
    }

    log::info!("🚀 Starting Event Service...");
    log::info!("📊 Database: {}", database_url);

    // Initialize MongoDB connection
    let db = database::MongoDB::new(&database_url)
        .await
        .expect("Failed to connect to MongoDB");

    let db_data = web::Data::new(db.clone());

    log::info!("✅ MongoDB connected successfully");

    // 🌱 Seed default visual themes
    seeds::theme_seed::seed_default_themes(&db).await;

    // 📅 Start event reminder scheduler
    log::info!("📅 Starting background jobs...");
    jobs::reminder_scheduler::start_reminder_scheduler(db.clone()).await;
    log::info!("✅ Background jobs started");

    log::info!("🌐 Server starting on {}:{}", host, port);
    log::info!("📚 Swagger UI available at: http://{}:{}/swagger-ui/", host, port);
    log::info!("📄 OpenAPI spec at: http://{}:{}/api-docs/openapi.json", host, port);

    // Start HTTP server
    HttpServer::new(move || {
        let cors = Cors::default()
            .allowed_origin("http://localhost:3000")
            .allowed_origin("http://localhost:5173")
            .allowed_origin("http://127.0.0.1:3000")
            .allowed_origin("http://127.0.0.1:5173")
            .allowed_methods(vec!["GET", "POST", "PUT", "DELETE", "OPTIONS"])
            .allowed_headers(vec![
                actix_web::http::header::AUTHORIZATION,
                actix_web::http::header::CONTENT_TYPE,
                actix_web::http::header::ACCEPT,
            ])
            .supports_credentials()
            .max_age(3600);

        // Generate OpenAPI specification
        let openapi = api::swagger::ApiDoc::openapi();

        App::new()
            .app_data(db_data.clone())
            .wrap(cors)
            .wrap(middleware::SecurityHeaders)
            .wrap(Logger::default())
            // Swagger UI
            .service(
                SwaggerUi::new("/swagger-ui/{_:.*}")
                    .url("/api-docs/openapi.json", openapi.clone())
            )
            // Health check
            .route("/health", web::get().to(api::health::health_check))
            // Metrics
            .route("/metrics", web::get().to(api::metrics::get_metrics))

            // ==================== HOST AREA (Bearer token) ====================

            // Events: CRUD + attendee list
            .service(
                web::scope("/api/v1/events")
                    .wrap(middleware::auth::AuthMiddleware)
                    .service(api::events::get_events)
                    .service(api::events::create_event)
                    .service(api::events::get_event_registrations)
                    .service(api::events::get_event)
                    .service(api::events::update_event)
                    .service(api::events::delete_event)
            )

            // Emails: dispatch + history (webhook fica na área pública)
            .service(
                web::scope("/api/v1/emails")
                    .wrap(middleware::auth::AuthMiddleware)
                    .service(api::emails::send_email)
                    .service(api::emails::get_history)
            )

            // Dashboard: agregação read-side
            .service(
                web::scope("/api/v1/dashboard")
                    .wrap(middleware::auth::AuthMiddleware)
                    .service(api::dashboard::get_dashboard)
            )

            // Settings: provedor de email por host
            .service(
                web::scope("/api/v1/settings")
                    .wrap(middleware::auth::AuthMiddleware)
                    .service(api::settings::get_settings)
                    .service(api::settings::save_settings)
                    .service(api::settings::delete_settings)
            )

            // Profile: perfil do host
            .service(
                web::scope("/api/v1/profile")
                    .wrap(middleware::auth::AuthMiddleware)
                    .service(api::settings::get_profile)
                    .service(api::settings::save_profile)
            )

            // ==================== PUBLIC AREA ====================

            // Registration page: leitura do evento + inscrição
            .service(
                web::scope("/api/v1/public/events")
                    .service(api::registrations::register)
                    .service(api::registrations::get_public_event)
            )

            // Provider delivery webhook (token compartilhado WEBHOOK_TOKEN, não Bearer de host)
            .service(
                web::scope("/api/v1/public/emails")
                    .service(api::emails::provider_webhook)
            )

            // Themes: catálogo read-only
            .service(
                web::scope("/api/v1/themes")
                    .service(api::themes::get_themes)
            )
    })
    .bind(format!("{}:{}", host, port))?
    .run()
    .await
}
