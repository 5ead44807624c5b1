use actix_cors::Cors;
use actix_web::{web, App, HttpServer};
use speed_backend::routes;
use speed_backend::AppState;

mod telemetry;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    telemetry::init_tracing();

    let host = std::env::var("SPEED_HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
    let port = std::env::var("SPEED_PORT")
        .unwrap_or_else(|_| "5169".to_string())
        .parse::<u16>()
        .unwrap_or_else(|_| {
            eprintln!("❌ SPEED_PORT must be a valid port number");
            std::process::exit(1);
        });

    println!("🚀 Starting Speed backend on http://{}:{}", host, port);

    let data = web::Data::new(AppState::new());

    HttpServer::new(move || {
        App::new()
            .wrap(Cors::permissive())
            .app_data(data.clone())
            .configure(routes::configure)
    })
    .bind((host.as_str(), port))?
    .run()
    .await
}
