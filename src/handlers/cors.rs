use actix_web::http::Method;
use actix_web::middleware::DefaultHeaders;
use actix_web::{HttpRequest, HttpResponse};

/// Headers attached to every response, whatever the origin.
pub fn cors_headers() -> DefaultHeaders {
    DefaultHeaders::new()
        .add(("Access-Control-Allow-Origin", "*"))
        .add(("Access-Control-Allow-Methods", "GET,PUT,POST,DELETE"))
        .add(("Access-Control-Allow-Headers", "Content-Type, Authorization, access_token"))
}

pub async fn preflight() -> HttpResponse {
    HttpResponse::Ok().finish()
}

/// Unrouted requests: OPTIONS is answered, anything else is a 404.
pub async fn fallback(req: HttpRequest) -> HttpResponse {
    if req.method() == Method::OPTIONS {
        HttpResponse::Ok().finish()
    } else {
        HttpResponse::NotFound().finish()
    }
}
