pub mod cors;
pub mod graphql;

use actix_web::web;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource(graphql::GRAPHQL_PATH)
            .route(web::post().to(graphql::graphql_post))
            .route(web::get().to(graphql::graphql_get))
            .route(web::method(actix_web::http::Method::OPTIONS).to(cors::preflight)),
    )
    .default_service(web::to(cors::fallback));
}
