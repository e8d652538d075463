use std::path::Path;

use crate::{
    app::{Application, cors},
    error::BootstrapError,
    persistence::Persistence,
    routes,
};

mod env;
mod logging;
mod server;

pub use server::serve;

pub async fn init_base() {
    // Load .env first so RUST_LOG can come from it; report once logging is up.
    let env_file = env::init_env().await;
    logging::init_logging();

    match env_file {
        Ok(Some(path)) => tracing::debug!("loaded environment from {}", path.display()),
        Ok(None) => {}
        Err(err) => tracing::warn!("cannot read `.env`: {err}"),
    }
}

/// Builds the application from the configuration file at `config_path`.
///
/// Steps run in a fixed order and the first failure aborts startup:
/// configuration, the `/api` blueprint, CORS, the database extension, and
/// finally schema creation inside an application context.
pub async fn create_app(config_path: &Path) -> Result<Application, BootstrapError> {
    let mut app = Application::new();

    app.load_config(config_path)?;

    app.register_blueprint(routes::api(), routes::API_PREFIX)?;

    app.enable_cors(cors::permissive());
    tracing::info!("CORS enabled for all origins");

    Persistence::init_app(&mut app).await?;

    {
        let ctx = app.app_context();
        ctx.database()?.create_all(&ctx).await?;
    }

    Ok(app)
}
