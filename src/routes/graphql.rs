use crate::graphql::handlers;
use actix_web::web;

/// Registers `POST /graphql` and `GET /playground`.
///
/// Expects a `web::Data<AppSchema>` in the app data.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/graphql").route(web::post().to(handlers::graphql_handler)))
        .service(web::resource("/playground").route(web::get().to(handlers::graphql_playground)));
}
