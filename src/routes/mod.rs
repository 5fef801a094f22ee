// Route exports
pub mod search;

use actix_web::web;

pub use search::AppState;

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/", web::get().to(search::root))
        .route("/health", web::get().to(search::health_check))
        .service(
            web::scope("/api/v1")
                .configure(search::configure),
        );
}
