pub mod app;
pub mod bootstrap;
pub mod config;
pub mod docs;
pub mod error;
pub mod persistence;
pub mod routes;

pub use app::{AppContext, AppState, Application};
pub use error::BootstrapError;
