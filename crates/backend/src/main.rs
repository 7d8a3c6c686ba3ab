pub mod domain;
pub mod handlers;
pub mod routes;
pub mod shared;
pub mod system;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    use axum::body::Body;
    use axum::http::{header, Method, Request};
    use axum::middleware::{self, Next};
    use axum::response::Response;
    use std::net::SocketAddr;
    use tokio::net::TcpListener;
    use tower_http::cors::{Any, CorsLayer};
    use tower_http::services::ServeDir;

    system::tracing::initialize()?;

    // Функция для форматирования чисел с разделителями триад
    fn format_number(n: usize) -> String {
        let s = n.to_string();
        let mut result = String::new();
        for (i, ch) in s.chars().rev().enumerate() {
            if i > 0 && i % 3 == 0 {
                result.push('.');
            }
            result.push(ch);
        }
        result.chars().rev().collect()
    }

    // Простой middleware для логирования запросов
    async fn request_logger(req: Request<Body>, next: Next) -> Response {
        use axum::body::to_bytes;
        use chrono::Local;

        let start = std::time::Instant::now();
        let method = req.method().clone();
        let uri = req.uri().clone();

        let response = next.run(req).await;
        let (parts, body) = response.into_parts();

        // Читаем тело ответа, чтобы узнать реальный размер
        let (bytes, size) = match to_bytes(body, usize::MAX).await {
            Ok(b) => {
                let size = format_number(b.len());
                (b, size)
            }
            Err(_) => (Default::default(), "error".to_string()),
        };

        // Голубой для 2xx, коричневый для остальных
        let color_code = if parts.status.is_success() { "36" } else { "33" };

        println!(
            "\x1b[{}m{}\x1b[0m | {:>5}ms | {:>12} | {} {:>6} {}",
            color_code,
            Local::now().format("%H:%M:%S"),
            start.elapsed().as_millis(),
            size,
            parts.status.as_u16(),
            method,
            uri.path()
        );

        Response::from_parts(parts, Body::from(bytes))
    }

    let config = shared::config::load_config()?;
    let db_path = shared::config::get_database_path(&config)?;
    let port = config.server.port;
    shared::config::install(config);

    shared::data::db::initialize_database(Some(&db_path.to_string_lossy()))
        .await
        .map_err(|e| anyhow::anyhow!("db init failed: {e}"))?;

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT]);

    let app = routes::configure_routes()
        .fallback_service(ServeDir::new("dist"))
        .layer(middleware::from_fn(request_logger))
        .layer(cors);

    let addr: SocketAddr = ([0, 0, 0, 0], port).into();

    tracing::info!("Attempting to bind server to http://{}", addr);
    let listener = match TcpListener::bind(addr).await {
        Ok(listener) => {
            tracing::info!("Server successfully bound to {}", addr);
            listener
        }
        Err(e) => {
            if e.kind() == std::io::ErrorKind::AddrInUse {
                tracing::error!("Port {} is already in use", port);
            } else {
                tracing::error!("Failed to bind to port {}. Error: {}", port, e);
            }
            return Err(e.into());
        }
    };

    axum::serve(listener, app).await?;

    Ok(())
}
