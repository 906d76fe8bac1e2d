use std::future::Future;

use tokio::net::TcpListener;
use tracing::info;

use crate::api::{create_router, AppState};
use crate::config::ServerConfig;
use crate::error::Result;
use crate::services::Predictor;

/// Start the API server, draining in-flight requests once `shutdown` resolves
pub async fn start_api_server<F>(
    config: &ServerConfig,
    predictor: Predictor,
    shutdown: F,
) -> Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let ready = predictor.is_ready();
    let app = create_router(AppState::new(predictor), config.max_body_bytes);

    let listener = TcpListener::bind(config.bind_addr()).await?;
    info!(
        ready,
        "API server listening on http://{}",
        listener.local_addr()?
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await?;

    info!("API server stopped");
    Ok(())
}
