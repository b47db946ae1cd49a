use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "StudyHub Service API",
        version = "1.0.0",
        description = "Backend for the student resource-sharing platform.\n\n**Authentication:** user endpoints require a JWT Bearer token; admin endpoints additionally require the `admin` role claim.\n\n**Features:**\n- Student and admin authentication with token revocation\n- Alumni mentor directory (public listing + admin CRUD)\n- PDF study resources organized by branch/semester/category",
    ),
    paths(
        // Auth endpoints
        crate::api::auth::signup,
        crate::api::auth::login,
        crate::api::auth::logout,
        crate::api::auth::profile,
        crate::api::auth::admin_login,

        // Alumni
        crate::api::alumni::list_admin,
        crate::api::alumni::list_public,

        // Resources
        crate::api::resources::upload_pdf,
        crate::api::resources::list_pdfs,

        // Health
        crate::api::health::health_check,
    ),
    components(
        schemas(
            crate::services::auth_service::SignupRequest,
            crate::services::auth_service::LoginRequest,
            crate::services::auth_service::AdminAuthRequest,
            crate::models::CreateAlumniRequest,
            crate::models::UpdateAlumniRequest,
            crate::api::health::HealthResponse,
        )
    ),
    tags(
        (name = "Auth", description = "User and admin authentication. Logout revokes the presented token for the rest of the process lifetime."),
        (name = "Alumni", description = "Alumni mentor directory. Public listing shows active entries only; the rest is admin-guarded."),
        (name = "Resources", description = "PDF study resource upload and listing, organized as branch/semester/category."),
        (name = "Health", description = "Health check endpoint for monitoring service status."),
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
                        .description(Some("Enter your JWT token"))
                        .build(),
                ),
            );
        }
    }
}
