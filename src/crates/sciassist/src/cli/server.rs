//! `sciassist serve`

use crate::api::create_router;
use crate::config::ServerSettings;
use crate::dispatcher::Dispatcher;
use std::sync::Arc;
use tracing::{info, warn};

/// Serve the form until Ctrl-C or SIGTERM
pub async fn serve(dispatcher: Arc<Dispatcher>, settings: &ServerSettings) -> std::io::Result<()> {
    let app = create_router(dispatcher);
    let addr = settings.bind_address();

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Serving form on http://{}", listener.local_addr()?);

    axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shut down gracefully");
    Ok(())
}

/// Signal for graceful shutdown (Ctrl-C or SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                warn!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received Ctrl-C, shutting down"),
        _ = terminate => info!("Received SIGTERM, shutting down"),
    }
}
