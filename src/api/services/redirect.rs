use actix_web::http::StatusCode;
use actix_web::{HttpResponse, Responder, web};
use std::sync::Arc;
use tracing::debug;
use tracing::instrument;

use crate::config::get_config;
use crate::services::ShortUrlService;

pub struct RedirectService {}

impl RedirectService {
    #[instrument(skip(service), fields(uid = %uid))]
    pub async fn handle_redirect(
        uid: web::Path<String>,
        service: web::Data<Arc<ShortUrlService>>,
    ) -> impl Responder {
        let uid = uid.into_inner();

        match service.resolve(&uid).await {
            Ok(record) => {
                // The stored path is relative; anchor it on the public
                // origin so clients land on the full URL
                let config = get_config();
                let location = format!(
                    "{}/{}",
                    config.server.public_url.trim_end_matches('/'),
                    record.path
                );

                HttpResponse::TemporaryRedirect()
                    .insert_header(("Location", location))
                    .finish()
            }
            Err(e) => {
                debug!("Redirect target not resolvable for '{}': {}", uid, e);
                Self::not_found_response()
            }
        }
    }

    /// 404 with a short client-side cache so repeated probes for dead
    /// UIDs do not reach storage
    fn not_found_response() -> HttpResponse {
        HttpResponse::build(StatusCode::NOT_FOUND)
            .insert_header(("Content-Type", "text/html; charset=utf-8"))
            .insert_header(("Cache-Control", "public, max-age=60"))
            .body("Not Found")
    }
}

/// Public redirect routes, mounted under `/goto`
pub fn redirect_routes() -> actix_web::Scope {
    web::scope("/goto")
        .route("/{uid}", web::get().to(RedirectService::handle_redirect))
        .route("/{uid}", web::head().to(RedirectService::handle_redirect))
}
