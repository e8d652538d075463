pub mod job;
pub mod project;

pub use job::JobStatus;
