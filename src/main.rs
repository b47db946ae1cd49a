mod api;
mod config;
mod database;
mod middleware;
mod models;
mod services;
mod utils;

use actix_cors::Cors;
use actix_files::Files;
use actix_web::{middleware::Logger, web, App, HttpResponse, HttpServer};
use dotenv::dotenv;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::config::Config;
use crate::utils::blacklist::TokenBlacklist;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load environment variables
    dotenv().ok();

    // Initialize logger
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let config = Config::from_env();

    log::info!("🚀 Starting StudyHub Service...");

    // The uploads root must exist before multipart intake and static serving
    std::fs::create_dir_all(&config.upload_dir)?;

    // Initialize MongoDB connection
    let db = database::MongoDB::new(&config.mongo_uri)
        .await
        .expect("Failed to connect to MongoDB");

    log::info!("✅ MongoDB connected successfully");

    let db_data = web::Data::new(db);
    let blacklist = web::Data::new(TokenBlacklist::new());
    let config_data = web::Data::new(config.clone());

    log::info!("🌐 Server starting on {}:{}", config.host, config.port);
    log::info!(
        "📚 Swagger UI available at: http://{}:{}/swagger-ui/",
        config.host,
        config.port
    );

    let bind_addr = format!("{}:{}", config.host, config.port);
    let api_base = config.api_base.clone();
    let upload_dir = config.upload_dir.clone();
    let client_url = config.client_url.clone();

    // Start HTTP server
    HttpServer::new(move || {
        let cors = Cors::default()
            .allowed_origin(&client_url)
            .allowed_methods(vec!["GET", "POST", "PUT", "DELETE", "OPTIONS"])
            .allowed_headers(vec![
                actix_web::http::header::AUTHORIZATION,
                actix_web::http::header::CONTENT_TYPE,
                actix_web::http::header::ACCEPT,
            ])
            .max_age(3600);

        // Generate OpenAPI specification
        let openapi = api::swagger::ApiDoc::openapi();

        // Body parse failures answer with the same JSON {message} shape as
        // every other error
        let json_config = web::JsonConfig::default().error_handler(|err, _req| {
            let message = err.to_string();
            actix_web::error::InternalError::from_response(
                err,
                HttpResponse::BadRequest().json(serde_json::json!({ "message": message })),
            )
            .into()
        });

        App::new()
            .app_data(db_data.clone())
            .app_data(blacklist.clone())
            .app_data(config_data.clone())
            .app_data(json_config)
            .wrap(cors)
            .wrap(middleware::SecurityHeaders)
            .wrap(Logger::default())
            .service(
                SwaggerUi::new("/swagger-ui/{_:.*}").url("/api-docs/openapi.json", openapi.clone()),
            )
            // Health check
            .route("/health", web::get().to(api::health::health_check))
            .service(
                web::scope(&api_base)
                    // Auth endpoints
                    .route("/auth/signup", web::post().to(api::auth::signup))
                    .route("/auth/login", web::post().to(api::auth::login))
                    .route("/auth/verify-email", web::post().to(api::auth::verify_email))
                    .service(
                        web::resource("/auth/logout")
                            .wrap(middleware::auth::UserAuth)
                            .route(web::post().to(api::auth::logout)),
                    )
                    .service(
                        web::resource("/user/profile")
                            .wrap(middleware::auth::UserAuth)
                            .route(web::get().to(api::auth::profile)),
                    )
                    // Admin auth
                    .route("/auth/admin/signup", web::post().to(api::auth::admin_signup))
                    .route("/auth/admin/login", web::post().to(api::auth::admin_login))
                    .route("/auth/admin/verify", web::get().to(api::auth::admin_verify))
                    // Alumni management (admin token required)
                    .service(
                        web::scope("/admin/alumni")
                            .wrap(middleware::auth::AdminAuth)
                            .route("", web::get().to(api::alumni::list_admin))
                            .route("", web::post().to(api::alumni::create))
                            .route("/{id}", web::put().to(api::alumni::update))
                            .route("/{id}", web::delete().to(api::alumni::delete)),
                    )
                    // Public alumni listing
                    .route("/alumni", web::get().to(api::alumni::list_public))
                    // Study resources
                    .route("/upload/pdf", web::post().to(api::resources::upload_pdf))
                    .route("/pdfs", web::get().to(api::resources::list_pdfs))
                    .route(
                        "/uploads/pdfs",
                        web::get().to(api::resources::list_uploaded_pdfs),
                    ),
            )
            // Stored PDFs served as static files
            .service(Files::new("/uploads", upload_dir.clone()))
    })
    .bind(bind_addr)?
    .run()
    .await
}
