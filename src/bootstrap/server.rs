use crate::{app::Application, error::BootstrapError};

/// Serves the bootstrapped application until Ctrl-C.
///
/// This is a development server: plain HTTP, a single process, no
/// supervision.
pub async fn serve(app: Application) -> Result<(), BootstrapError> {
    let addr = app.listen_addr()?;

    // Build the router
    let router = app.into_router()?;

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|source| BootstrapError::Bind { addr, source })?;

    tracing::info!("Server listening on {}", addr);
    tracing::warn!("running the development server; put a hardened proxy in front of it in production");

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(BootstrapError::Serve)
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => tracing::info!("shutdown requested"),
        Err(err) => tracing::error!("cannot listen for Ctrl-C: {err}"),
    }
}
