use actix_web::middleware::Logger;
use actix_web::{App, HttpServer, web::Data, web::JsonConfig};
use email_list_checker::config::AppConfig;
use email_list_checker::graphql::schema::create_schema;
use email_list_checker::handlers::validation::pipeline::Verifier;
use email_list_checker::openapi::ApiDoc;
use env_logger::Env;
use log::info;
use std::sync::Arc;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

/// Email List Checker Service Entry Point
///
/// # Endpoints
/// - REST: `/api/v1/health`, `/api/v1/deduplicate`, `/api/v1/verify`
/// - GraphQL: `/api/v1/graphql`, playground at `/api/v1/playground`
/// - Swagger UI: `/swagger-ui/`
/// - OpenAPI document: `/api-docs/openapi.json`
///
/// # Configuration
/// Environment variables, optionally from a `.env` file (see [`AppConfig`]).
/// Log level comes from `RUST_LOG`, `info` by default.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv::dotenv().ok();
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let config = AppConfig::from_env();
    let verifier = Arc::new(Verifier::from_config(&config));
    let schema = create_schema(verifier.clone());
    let max_upload_bytes = config.max_upload_bytes;

    info!(
        "Starting email list checker on {}:{} (SMTP probe sender {}, port {})",
        config.host, config.port, config.smtp.sender, config.smtp.port
    );

    HttpServer::new(move || {
        let openapi = ApiDoc::openapi();

        App::new()
            .wrap(Logger::default())
            .app_data(JsonConfig::default().limit(max_upload_bytes))
            .app_data(Data::new(openapi.clone()))
            .app_data(Data::from(verifier.clone()))
            .app_data(Data::new(schema.clone()))
            .configure(email_list_checker::routes::configure)
            .service(SwaggerUi::new("/swagger-ui/{_:.*}").url("/api-docs/openapi.json", openapi))
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await
}
