use std::net::SocketAddr;

use logger::LogFormat;

use crate::{router::create_router, state::AppState};

pub const DEFAULT_LOG_DIRECTIVES: &str =
    "backend_api=debug,session=debug,ai_client=debug,tower_http=debug,axum=info";

/// Run the API server
pub async fn run_server(state: AppState, host: &str, port: u16) -> anyhow::Result<()> {
    logger::init(DEFAULT_LOG_DIRECTIVES, LogFormat::from_env());

    let app = create_router(state);

    let addr = format!("{}:{}", host, port).parse::<SocketAddr>()?;
    tracing::info!("Starting server on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
