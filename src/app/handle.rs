use std::{
    net::SocketAddr,
    path::Path,
    sync::atomic::{AtomicUsize, Ordering},
};

use axum::Router;
use orchest_core::{
    blueprint::{Blueprint, RouteTable},
    config::ConfigBuilder,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use super::AppState;
use crate::{config::Settings, error::BootstrapError, persistence::Persistence};

/// The application being assembled: settings, routes and extensions.
///
/// Built once by the bootstrap sequence and consumed by
/// [`Application::into_router`] before any request is served.
pub struct Application {
    settings: Option<Settings>,
    routes: RouteTable<AppState>,
    cors: Option<CorsLayer>,
    persistence: Option<Persistence>,
    contexts: AtomicUsize,
}

impl Default for Application {
    fn default() -> Self {
        Self::new()
    }
}

impl Application {
    pub fn new() -> Self {
        Application {
            settings: None,
            routes: RouteTable::new(),
            cors: None,
            persistence: None,
            contexts: AtomicUsize::new(0),
        }
    }

    pub fn load_config(&mut self, path: &Path) -> Result<&Settings, BootstrapError> {
        let settings = Settings::build(path)?;
        tracing::info!(path = %path.display(), "configuration loaded");

        Ok(self.settings.insert(settings))
    }

    pub fn settings(&self) -> Option<&Settings> {
        self.settings.as_ref()
    }

    pub fn register_blueprint(
        &mut self,
        blueprint: Blueprint<AppState>,
        prefix: &str,
    ) -> Result<(), BootstrapError> {
        let name = blueprint.name().to_owned();
        let count = blueprint.routes().len();
        self.routes.mount(blueprint, prefix)?;
        tracing::info!(blueprint = %name, prefix, routes = count, "blueprint registered");

        Ok(())
    }

    pub fn has_endpoint(&self, endpoint: &str) -> bool {
        self.routes.contains_endpoint(endpoint)
    }

    pub fn enable_cors(&mut self, layer: CorsLayer) {
        self.cors = Some(layer);
    }

    pub fn cors_enabled(&self) -> bool {
        self.cors.is_some()
    }

    pub(crate) fn attach_persistence(&mut self, persistence: Persistence) {
        self.persistence = Some(persistence);
    }

    pub fn has_persistence(&self) -> bool {
        self.persistence.is_some()
    }

    /// Pushes an application context. It is popped when the guard drops.
    pub fn app_context(&self) -> AppContext<'_> {
        let depth = self.contexts.fetch_add(1, Ordering::SeqCst) + 1;
        tracing::debug!(depth, "application context pushed");

        AppContext { app: self }
    }

    pub fn is_context_active(&self) -> bool {
        self.contexts.load(Ordering::SeqCst) > 0
    }

    pub fn listen_addr(&self) -> Result<SocketAddr, BootstrapError> {
        self.settings
            .as_ref()
            .map(|settings| settings.server.listen_addr)
            .ok_or(BootstrapError::NotConfigured("serving"))
    }

    /// Builds the request router: routes, shared state, tracing and, when
    /// enabled, CORS as the outermost layer.
    pub fn into_router(self) -> Result<Router, BootstrapError> {
        let persistence = self.persistence.ok_or(BootstrapError::ExtensionMissing)?;
        let state = AppState {
            db: persistence.connection().clone(),
        };

        let router = self
            .routes
            .into_router()
            .with_state(state)
            .layer(TraceLayer::new_for_http());

        Ok(match self.cors {
            Some(cors) => router.layer(cors),
            None => router,
        })
    }
}

/// Proof that an application context is active.
///
/// Application-bound extensions are only reachable through it.
pub struct AppContext<'a> {
    app: &'a Application,
}

impl AppContext<'_> {
    pub fn database(&self) -> Result<&Persistence, BootstrapError> {
        self.app
            .persistence
            .as_ref()
            .ok_or(BootstrapError::ExtensionMissing)
    }
}

impl Drop for AppContext<'_> {
    fn drop(&mut self) {
        let depth = self.app.contexts.fetch_sub(1, Ordering::SeqCst) - 1;
        tracing::debug!(depth, "application context popped");
    }
}
