pub mod health;
pub mod redirect;
pub mod short_urls;

use actix_web::{HttpResponse, web};

use crate::api::response::{ApiResponse, ErrorCode};

pub use health::{AppStartTime, HealthService, health_routes};
pub use redirect::{RedirectService, redirect_routes};
pub use short_urls::short_url_routes;

/// Fallback for unknown admin routes, keeps the envelope uniform
async fn api_not_found() -> HttpResponse {
    HttpResponse::NotFound()
        .append_header(("Content-Type", "application/json; charset=utf-8"))
        .json(ApiResponse::<()> {
            code: ErrorCode::NotFound as i32,
            message: "Not Found".to_string(),
            data: None,
        })
}

/// Admin API routes, mounted under the configured API prefix and
/// guarded by `AdminAuth`
pub fn admin_routes() -> actix_web::Scope {
    web::scope("")
        .service(short_url_routes())
        .default_service(web::route().to(api_not_found))
}
