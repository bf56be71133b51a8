use std::env;

use vcintel::{create_app, db};

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    // Load .env (if present) so DATABASE_URL and BIND_ADDR from file are visible
    let _ = dotenvy::dotenv();

    let conn = match db::connect().await {
        Ok(conn) => conn,
        Err(e) => {
            tracing::error!("failed to connect to database: {e}");
            std::process::exit(1);
        }
    };

    // Run our server
    let app = create_app(conn);
    let bind_addr = env::var("BIND_ADDR").unwrap_or_else(|_| "127.0.0.1:3000".to_string());
    let listener = tokio::net::TcpListener::bind(&bind_addr).await.unwrap();
    tracing::info!("Server running on http://{bind_addr}");
    axum::serve(listener, app).await.unwrap();
}
