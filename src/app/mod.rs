pub mod controller;
pub mod cors;
pub mod model;
pub mod response;

mod handle;
mod state;

pub use handle::{AppContext, Application};
pub use state::AppState;
