mod jobs;
mod projects;

pub use jobs::{JobsController, JobsControllerApi};
pub use projects::{ProjectsController, ProjectsControllerApi};
