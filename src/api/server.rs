use actix_web::{web, App, HttpServer};

use super::handlers::{self, AppState};

/// Start the order API server. Blocks until shutdown.
pub async fn start_http_server(state: AppState, bind_addr: &str) -> std::io::Result<()> {
    tracing::info!("🌐 Starting order API server on http://{}/", bind_addr);

    HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(state.clone()))
            .configure(handlers::routes)
    })
    .bind(bind_addr)?
    .run()
    .await
}
