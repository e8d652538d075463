use axum::{http::Method, routing::get};
use orchest_core::blueprint::Blueprint;

use crate::app::{
    AppState,
    controller::{JobsController, ProjectsController},
};

pub const API_PREFIX: &str = "/api";

/// The endpoint collection mounted under [`API_PREFIX`].
pub fn api() -> Blueprint<AppState> {
    Blueprint::new("api")
        .route("specs", Method::GET, "/swagger.json", get(crate::docs::swagger))
        .controller::<ProjectsController>()
        .controller::<JobsController>()
}
