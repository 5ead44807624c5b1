use actix_web::web;

pub mod health;
pub mod realtime;

/// Configure application routes for the server and for tests.
pub fn configure(cfg: &mut web::ServiceConfig) {
    // Health check routes: /health
    cfg.service(web::scope("/health").configure(health::configure_routes));

    // Realtime routes: /ws
    cfg.service(web::scope("/ws").configure(realtime::configure_routes));

    cfg.service(web::resource("/").route(web::get().to(health::root)));
}
