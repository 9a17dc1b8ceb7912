use utoipa::OpenApi;
use utoipa::openapi::security::{SecurityScheme, HttpAuthScheme, HttpBuilder};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Event Service API",
        version = "1.0.0",
        description = "API documentation for the Event Service. \n\n**Authentication:** Host-scoped endpoints require a Bearer token issued by the identity provider.\n\n**Features:**\n- Event management (agenda, custom questions, themes, pricing)\n- Public registration pages\n- Email dispatch through SendGrid or EmailJS with a 24h send quota\n- Delivery tracking with provider webhooks\n- Host dashboard aggregation",
        contact(
            name = "Event Service Team",
            email = "support@event-service.com"
        )
    ),
    paths(
        // Health & Metrics
        crate::api::health::health_check,
        crate::api::metrics::get_metrics,

        // Events
        crate::api::events::create_event,

        // Public registration page
        crate::api::registrations::get_public_event,
        crate::api::registrations::register,

        // Emails
        crate::api::emails::send_email,
        crate::api::emails::provider_webhook,

        // Settings
        crate::api::settings::save_settings,

        // Dashboard & Themes
        crate::api::dashboard::get_dashboard,
        crate::api::themes::get_themes,
    ),
    components(
        schemas(
            // Health & Metrics
            crate::api::health::HealthResponse,
            crate::api::metrics::MetricsResponse,

            // Events
            crate::models::event::CreateEventRequest,
            crate::models::event::EventResponse,
            crate::models::event::EventListItem,

            // Registrations
            crate::models::registration::RegisterRequest,
            crate::models::registration::RegisterResponse,
            crate::models::registration::FieldError,
            crate::models::registration::AttendeeInfo,

            // Emails
            crate::services::email_service::SendEmailRequest,
            crate::services::email_service::SendEmailResponse,
            crate::services::email_service::ProviderEvent,
            crate::models::email_tracking::TrackingInfo,
            crate::models::email_tracking::DeliveryStatus,

            // Settings
            crate::models::settings::SaveSettingsRequest,
            crate::models::settings::SettingsInfo,
            crate::models::settings::SaveProfileRequest,

            // Dashboard & Themes
            crate::services::dashboard_service::DashboardResponse,
            crate::services::dashboard_service::EventStat,
            crate::models::theme::ThemeInfo,
        )
    ),
    tags(
        (name = "Health", description = "Health check and system metrics endpoints for monitoring service status."),
        (name = "Events", description = "Event management endpoints: agenda, custom questions, theme and pricing."),
        (name = "Public", description = "Unauthenticated endpoints backing the public registration page."),
        (name = "Emails", description = "Email dispatch, send history and provider delivery webhooks."),
        (name = "Settings", description = "Per-host email provider configuration."),
        (name = "Dashboard", description = "Read-side aggregation of host metrics."),
        (name = "Themes", description = "Catalog of visual themes for event pages."),
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .description(Some("Enter the Bearer token issued by the identity provider"))
                        .build()
                ),
            );
        }
    }
}
